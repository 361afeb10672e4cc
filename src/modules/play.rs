//! Plays text or a test tone through the configured output.

use anyhow::Result;
use morse_drill::coding::morse;

use super::{InitContext, Module};

pub struct Play;

pub struct TestTone;

impl Module for Play {
    fn name(&self) -> &'static str {
        "play"
    }

    fn run(&self, ctx: &mut InitContext) -> Result<()> {
        let text = ctx
            .args
            .get_one::<String>("text")
            .map(String::as_str)
            .unwrap_or_default();

        let skipped = text
            .chars()
            .filter(|c| *c != ' ' && !morse::is_supported(c.to_ascii_uppercase()))
            .collect::<String>();
        if !skipped.is_empty() {
            println!("[-] No code for `{skipped}`, skipping");
        }

        let (_device, mut player) = ctx.open_player()?;
        for word in text.split(' ').filter(|x| !x.is_empty()) {
            let code = word
                .chars()
                .filter_map(|c| morse::code_string(c.to_ascii_uppercase()))
                .collect::<Vec<_>>()
                .join(" ");
            println!("[*] {word}: {code}");
        }

        let seconds = player.play_text(text);
        println!("[*] Played for {seconds:.2}s");
        Ok(())
    }
}

impl Module for TestTone {
    fn name(&self) -> &'static str {
        "test-tone"
    }

    fn run(&self, ctx: &mut InitContext) -> Result<()> {
        let (_device, mut player) = ctx.open_player()?;
        println!("[*] Playing a dit at {}Hz", player.frequency());
        player.play_character('E');
        Ok(())
    }
}
