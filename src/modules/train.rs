//! Interactive practice sessions.
//!
//! Characters are drawn from a [`Session`] and played one at a time. How the
//! answers are taken depends on the practice mode:
//! - hand copy: every character is revealed after it plays, nothing is recorded
//! - single keyboard: each character waits for a key press
//! - continuous keyboard: playback runs on its own thread and key presses are
//!   matched to the oldest unanswered character

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use crossbeam::channel;
use morse_drill::{
    audio::Player,
    coding::{morse, Preset},
    history::{HistoryStore, SessionRecord},
    session::{PracticeMode, RoundLimit, Session, SessionConfig},
};
use rand::Rng;
use tracing::debug;

use super::{
    terminal::{self, Key, RawMode},
    InitContext, Module,
};

/// How long a character played in continuous mode waits for its answer.
const ANSWER_WINDOW: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct Train;

/// Sent by the playback thread once a character finished playing.
struct Played {
    chr: char,
    at: Instant,
}

impl Module for Train {
    fn name(&self) -> &'static str {
        "train"
    }

    fn run(&self, ctx: &mut InitContext) -> Result<()> {
        let args = &ctx.args;
        let config = &mut ctx.config;
        if let Some(chars) = args.get_one::<String>("chars") {
            config.characters = chars.to_owned();
        }
        if let Some(preset) = args.get_one::<String>("preset") {
            let preset = Preset::from_name(preset).context("unknown preset")?;
            config.characters = preset.characters().to_owned();
        }
        if let Some(&rounds) = args.get_one::<u32>("rounds") {
            config.rounds = rounds;
        }
        if let Some(&size) = args.get_one::<u32>("round-size") {
            config.round_size = size as usize;
        }
        if let Some(mode) = args.get_one::<String>("mode") {
            config.mode = PracticeMode::from_name(mode).context("unknown practice mode")?;
        }
        let save_stats = !args.get_flag("no-stats");

        let mut session = Session::new(SessionConfig {
            characters: config.selection(),
            round_limit: config.round_limit(),
            round_size: config.round_size,
            mode: config.mode,
            tone: config.tone(),
        })
        .context("can not start session")?;
        let (_device, mut player) = ctx.open_player()?;

        println!(
            "[*] Practicing `{}` in {} mode, {} rounds of {}",
            session.characters().iter().collect::<String>(),
            session.config().mode,
            session.config().round_limit,
            session.config().round_size
        );
        println!("[*] Press Esc to stop");

        let mut rng = rand::thread_rng();
        {
            let _raw = RawMode::enable()?;
            terminal::flush_pending()?;
            match session.config().mode {
                PracticeMode::HandCopy => hand_copy(&mut session, &mut player, &mut rng)?,
                PracticeMode::SingleKeyboard => {
                    single_keyboard(&mut session, &mut player, &mut rng)?
                }
                PracticeMode::ContinuousKeyboard => {
                    continuous_keyboard(&mut session, &mut player, &mut rng)?
                }
            }
        }
        session.stop();
        print_stats(&session);

        if save_stats {
            let store = &ctx.history_store;
            let mut history = store.load_or_default();
            history.push(SessionRecord::from_session(&session, Local::now()));
            store.save(&history).context("can not save session history")?;
            println!("[*] Session saved to `{}`", store.path().display());
        }

        Ok(())
    }
}

fn hand_copy<R: Rng>(session: &mut Session, player: &mut Player, rng: &mut R) -> Result<()> {
    while let Some(chr) = session.next_character(rng) {
        announce_round(session);
        player.play_character(chr);
        terminal::line(format!("    {chr}"));
        player.pause(player.timing().char_gap);

        if let Some(Key::Stop) = terminal::poll_key(Duration::ZERO)? {
            break;
        }
    }

    Ok(())
}

fn single_keyboard<R: Rng>(session: &mut Session, player: &mut Player, rng: &mut R) -> Result<()> {
    while let Some(chr) = session.next_character(rng) {
        announce_round(session);
        terminal::flush_pending()?;
        player.play_character(chr);

        let start = Instant::now();
        let Key::Char(answer) = terminal::read_key()? else {
            break;
        };
        let response_time = start.elapsed().as_secs_f64();

        let correct = answer == chr;
        session.submit_result(chr, correct, response_time)?;
        report(chr, answer, response_time);
        if !correct {
            player.play_error_tone();
        }
    }

    Ok(())
}

fn continuous_keyboard<R: Rng>(
    session: &mut Session,
    player: &mut Player,
    rng: &mut R,
) -> Result<()> {
    let (char_tx, char_rx) = channel::bounded::<char>(1);
    let (played_tx, played_rx) = channel::unbounded::<Played>();

    crossbeam::scope(|s| {
        s.spawn(move |_| {
            for chr in char_rx {
                player.play_character(chr);
                let played = Played {
                    chr,
                    at: Instant::now(),
                };
                if played_tx.send(played).is_err() {
                    break;
                }
            }
        });

        let result = answer_loop(session, rng, &char_tx, &played_rx);
        // Lets the playback thread finish
        drop(char_tx);
        result
    })
    .map_err(|_| anyhow!("playback thread panicked"))?
}

fn answer_loop<R: Rng>(
    session: &mut Session,
    rng: &mut R,
    char_tx: &channel::Sender<char>,
    played_rx: &channel::Receiver<Played>,
) -> Result<()> {
    let mut pending = VecDeque::<Played>::new();
    let mut in_flight = 0;

    loop {
        for played in played_rx.try_iter() {
            in_flight -= 1;
            pending.push_back(played);
        }

        while let Some(missed) = pending.front().filter(|x| x.at.elapsed() > ANSWER_WINDOW) {
            terminal::line(format!("    _ -> {}  missed", missed.chr));
            debug!(chr = %missed.chr, "no answer in time");
            pending.pop_front();
        }

        // Keep playing within a round, wait for every answer before starting the next one
        let round_open = session.position() < session.current_round().len();
        if in_flight == 0 && (round_open || pending.is_empty()) {
            let Some(chr) = session.next_character(rng) else {
                break;
            };
            announce_round(session);
            char_tx
                .send(chr)
                .map_err(|_| anyhow!("playback thread stopped"))?;
            in_flight += 1;
        }

        match terminal::poll_key(POLL_INTERVAL)? {
            Some(Key::Stop) => break,
            Some(Key::Char(answer)) => {
                if let Some(played) = pending.pop_front() {
                    let response_time = played.at.elapsed().as_secs_f64();
                    session.submit_result(played.chr, answer == played.chr, response_time)?;
                    report(played.chr, answer, response_time);
                }
            }
            None => {}
        }
    }

    Ok(())
}

fn announce_round(session: &Session) {
    if session.position() != 1 {
        return;
    }

    match session.config().round_limit {
        RoundLimit::Finite(limit) => {
            terminal::line(format!("[*] Round {}/{limit}", session.round()))
        }
        RoundLimit::Unbounded => terminal::line(format!("[*] Round {}", session.round())),
    }
}

fn report(chr: char, answer: char, response_time: f64) {
    if answer == chr {
        terminal::line(format!("    {chr}  ({response_time:.2}s)"));
        return;
    }

    let code = morse::code_string(chr).unwrap_or_default();
    terminal::line(format!("    {answer} -> {chr}  {code}"));
}

fn print_stats(session: &Session) {
    println!("[*] Rounds completed: {}", session.rounds_completed());

    for &chr in session.characters() {
        let attempts = session.scheduler().stat(chr).map_or(0, |x| x.attempts);
        if attempts == 0 {
            continue;
        }

        let stats = session.stats(chr);
        println!(
            "    {chr}  {:>5.1}%  {:.2}s  ({attempts} attempts)",
            stats.accuracy * 100.0,
            stats.average_response_time
        );
    }

    let overall = session.overall_stats();
    println!(
        "[*] Overall: {:.1}% correct, {:.2}s average response",
        overall.accuracy * 100.0,
        overall.average_response_time
    );
}
