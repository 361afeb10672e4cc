use std::{
    fs,
    io::{self, BufRead, Write},
};

use anyhow::{Context, Result};
use morse_drill::history::{HistoryStore, ImportMode, SessionRecord};

use super::{InitContext, Module};

pub struct History;

impl Module for History {
    fn name(&self) -> &'static str {
        "history"
    }

    fn run(&self, ctx: &mut InitContext) -> Result<()> {
        let store = &ctx.history_store;
        let (command, args) = ctx.args.subcommand().context("no history command given")?;

        match command {
            "list" => {
                let history = store.load()?;
                if history.is_empty() {
                    println!("[*] No sessions yet");
                }
                for (i, record) in history.records().iter().enumerate() {
                    println!("{i:>4}  {}", record.title());
                }
            }
            "show" => {
                let index = *args.get_one::<usize>("index").context("missing index")?;
                let history = store.load()?;
                let record = history
                    .get(index)
                    .with_context(|| format!("no session at index {index}"))?;
                show(record);
            }
            "progress" => {
                let progress = store.load()?.progress();
                if progress.is_empty() {
                    println!("[*] No sessions with attempts yet");
                }
                for point in progress {
                    println!(
                        "{}  {:>5.1}%  {:.2}s  {}",
                        point.date,
                        point.accuracy,
                        point.average_response_time,
                        "#".repeat((point.accuracy / 5.0).round() as usize)
                    );
                }
            }
            "export" => {
                let path = args.get_one::<String>("path").context("missing path")?;
                let history = store.load()?;
                fs::write(path, history.to_json()?)
                    .with_context(|| format!("can not write `{path}`"))?;
                println!("[*] Exported {} sessions to `{path}`", history.len());
            }
            "import" => {
                let path = args.get_one::<String>("path").context("missing path")?;
                let mode = match args.get_flag("replace") {
                    true => ImportMode::Replace,
                    false => ImportMode::Merge,
                };

                let payload = fs::read(path).with_context(|| format!("can not read `{path}`"))?;
                let mut history = store.load()?;
                let count = history
                    .import(&payload, mode)
                    .with_context(|| format!("can not import `{path}`"))?;
                store.save(&history)?;
                println!("[*] Imported {count} sessions, {} in total", history.len());
            }
            "clear" => {
                if !args.get_flag("yes") && !confirm("Delete all sessions?")? {
                    println!("[*] Nothing deleted");
                    return Ok(());
                }

                let mut history = store.load_or_default();
                history.clear();
                store.save(&history)?;
                println!("[*] History cleared");
            }
            _ => unreachable!(),
        }

        Ok(())
    }
}

fn show(record: &SessionRecord) {
    println!("[*] {}", record.title());
    println!(
        "    {} / {} WPM at {}Hz, {} rounds",
        record.char_wpm, record.word_wpm, record.frequency, record.rounds_completed
    );

    for &chr in &record.characters {
        let attempts = record.stats.get(&chr).map_or(0, |x| x.attempts);
        let stats = record.char_stats(chr);
        println!(
            "    {chr}  {:>5.1}%  {:.2}s  ({attempts} attempts)",
            stats.accuracy * 100.0,
            stats.average_response_time
        );
    }

    let overall = record.overall_stats();
    println!(
        "[*] Overall: {:.1}% correct, {:.2}s average response",
        overall.accuracy * 100.0,
        overall.average_response_time
    );
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
