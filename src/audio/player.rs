//! Blocking Morse playback.
//!
//! A [`Player`] turns characters into a [`Sequence`] and realises it through
//! two seams: an [`Output`] that receives synthesized samples and a [`Clock`]
//! that waits out every tone and gap. The call returns only once the whole
//! plan has elapsed on the clock.

use std::{thread, time::Duration};

use tracing::debug;

use crate::{
    config::ToneSettings,
    error::{Error, Result},
};

use super::{
    sequence::{Element, Sequence},
    timing::TimingProfile,
    tone::{self, SAMPLE_RATE},
};

pub const DEFAULT_FREQUENCY: f64 = 600.0;

/// Somewhere to send samples.
/// `play` queues the samples and returns right away; the [`Clock`] does the waiting.
pub trait Output: Send {
    fn sample_rate(&self) -> u32;
    fn play(&mut self, samples: &[i16]);
}

/// Waits out durations given in seconds.
pub trait Clock: Send {
    fn wait(&mut self, seconds: f64);
}

/// Blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepClock;

impl Clock for SleepClock {
    fn wait(&mut self, seconds: f64) {
        if seconds > 0.0 {
            thread::sleep(Duration::from_secs_f64(seconds));
        }
    }
}

/// Output used when no audio device is available.
/// Timing is unaffected, the tones are just not heard.
#[derive(Debug, Clone, Copy)]
pub struct SilentOutput {
    sample_rate: u32,
}

impl SilentOutput {
    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
        }
    }
}

impl Default for SilentOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for SilentOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play(&mut self, _samples: &[i16]) {}
}

pub struct Player {
    timing: TimingProfile,
    frequency: f64,
    output: Box<dyn Output>,
    clock: Box<dyn Clock>,
}

impl Player {
    /// Player at 20/5 WPM and 600Hz that sleeps the current thread while playing.
    pub fn new(output: Box<dyn Output>) -> Self {
        Self {
            timing: TimingProfile::default(),
            frequency: DEFAULT_FREQUENCY,
            output,
            clock: Box::new(SleepClock),
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(SilentOutput::new()))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Applies speeds and frequency together. Nothing changes if any value is rejected.
    pub fn configure(&mut self, settings: &ToneSettings) -> Result<()> {
        let timing = TimingProfile::new(settings.char_wpm, settings.word_wpm)?;
        check_frequency(settings.frequency)?;

        self.timing = timing;
        self.frequency = settings.frequency;
        Ok(())
    }

    pub fn set_speed(&mut self, char_wpm: f64, word_wpm: f64) -> Result<()> {
        self.timing = TimingProfile::new(char_wpm, word_wpm)?;
        Ok(())
    }

    /// Only affects tones synthesized after this call.
    pub fn set_frequency(&mut self, frequency: f64) -> Result<()> {
        check_frequency(frequency)?;
        self.frequency = frequency;
        Ok(())
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn sample_rate(&self) -> u32 {
        self.output.sample_rate()
    }

    pub fn synthesize_tone(&self, duration: f64) -> Vec<i16> {
        tone::synthesize(self.frequency, duration, self.sample_rate())
    }

    /// Plays one character and its trailing character gap.
    /// Characters without a code are skipped. Returns the seconds spent.
    pub fn play_character(&mut self, chr: char) -> f64 {
        let plan = Sequence::character(chr, &self.timing);
        self.play(&plan)
    }

    /// Plays a phrase, case insensitive. Returns the seconds spent.
    pub fn play_text(&mut self, text: &str) -> f64 {
        let plan = Sequence::text(text, &self.timing);
        self.play(&plan)
    }

    /// Plays a plan element by element, waiting for each to finish before the next.
    pub fn play(&mut self, plan: &Sequence) -> f64 {
        debug!(
            elements = plan.elements().len(),
            seconds = plan.duration(),
            "playing sequence"
        );

        for element in plan {
            match *element {
                Element::Tone(duration) => {
                    let samples = self.synthesize_tone(duration);
                    self.output.play(&samples);
                    self.clock.wait(duration);
                }
                Element::Gap(duration) => self.clock.wait(duration),
            }
        }

        plan.duration()
    }

    /// Plays raw samples at the output's sample rate and waits for them to finish.
    pub fn play_samples(&mut self, samples: &[i16]) -> f64 {
        let duration = samples.len() as f64 / self.sample_rate() as f64;
        self.output.play(samples);
        self.clock.wait(duration);
        duration
    }

    pub fn play_error_tone(&mut self) -> f64 {
        let samples = tone::error_tone(self.sample_rate());
        self.play_samples(&samples)
    }

    /// Waits without playing anything.
    pub fn pause(&mut self, seconds: f64) {
        self.clock.wait(seconds);
    }
}

fn check_frequency(frequency: f64) -> Result<()> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(Error::invalid(format!(
            "tone frequency must be a positive number of Hz, got {frequency}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingClock(Arc<Mutex<Vec<f64>>>);

    impl Clock for RecordingClock {
        fn wait(&mut self, seconds: f64) {
            self.0.lock().push(seconds);
        }
    }

    #[derive(Clone, Default)]
    struct RecordingOutput(Arc<Mutex<Vec<Vec<i16>>>>);

    impl Output for RecordingOutput {
        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn play(&mut self, samples: &[i16]) {
            self.0.lock().push(samples.to_vec());
        }
    }

    fn player() -> (Player, RecordingClock, RecordingOutput) {
        let clock = RecordingClock::default();
        let output = RecordingOutput::default();
        let player =
            Player::new(Box::new(output.clone())).with_clock(Box::new(clock.clone()));
        (player, clock, output)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_character_timing() {
        let (mut player, clock, output) = player();
        player.set_speed(20.0, 5.0).unwrap();
        let t = *player.timing();

        let spent = player.play_character('A');
        assert_eq!(*clock.0.lock(), vec![t.dit, t.element_gap, t.dah, t.char_gap]);
        assert!(close(spent, t.dit + t.element_gap + t.dah + t.char_gap));

        let tones = output.0.lock();
        assert_eq!(tones.len(), 2);
        assert_eq!(tones[0].len(), 2646);
        assert_eq!(tones[1].len(), 7938);
    }

    #[test]
    fn test_sos_has_no_trailing_word_gap() {
        let (mut player, clock, _) = player();
        let t = *player.timing();

        let s = 3.0 * t.dit + 2.0 * t.element_gap + t.char_gap;
        let o = 3.0 * t.dah + 2.0 * t.element_gap + t.char_gap;
        let spent = player.play_text("SOS");

        assert!(close(spent, 2.0 * s + o));
        assert!(close(clock.0.lock().iter().sum::<f64>(), 2.0 * s + o));
    }

    #[test]
    fn test_space_adds_word_minus_char_gap() {
        let (mut player, clock, _) = player();
        player.set_speed(25.0, 10.0).unwrap();
        let t = *player.timing();

        let one = player.play_text("SOS");
        let two = player.play_text("SOS SOS");
        assert!(close(two - 2.0 * one, t.word_gap - t.char_gap));
        assert!(close(clock.0.lock().iter().sum::<f64>(), one + two));
    }

    #[test]
    fn test_unmapped_character_is_skipped() {
        let (mut player, clock, output) = player();
        assert_eq!(player.play_character('#'), 0.0);
        assert!(clock.0.lock().is_empty());
        assert!(output.0.lock().is_empty());
    }

    #[test]
    fn test_frequency_applies_to_next_tone() {
        let (mut player, _, output) = player();
        player.play_character('T');
        player.set_frequency(900.0).unwrap();
        player.play_character('T');

        let tones = output.0.lock();
        assert_eq!(tones[0].len(), tones[1].len());
        assert_ne!(tones[0], tones[1]);
        assert_eq!(tones[1], tone::synthesize(900.0, player.timing().dah, SAMPLE_RATE));
    }

    #[test]
    fn test_configure_is_all_or_nothing() {
        let (mut player, _, _) = player();
        let before = *player.timing();

        let bad = ToneSettings {
            char_wpm: 30.0,
            word_wpm: 10.0,
            frequency: -1.0,
        };
        assert!(matches!(
            player.configure(&bad),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(*player.timing(), before);
        assert_eq!(player.frequency(), DEFAULT_FREQUENCY);

        let good = ToneSettings {
            char_wpm: 30.0,
            word_wpm: 10.0,
            frequency: 700.0,
        };
        player.configure(&good).unwrap();
        assert!(close(player.timing().dit, 0.04));
        assert_eq!(player.frequency(), 700.0);
    }

    #[test]
    fn test_error_tone_waits_for_samples() {
        let (mut player, clock, _) = player();
        let spent = player.play_error_tone();
        assert!(close(spent, 0.2));
        assert_eq!(clock.0.lock().len(), 1);
    }
}
