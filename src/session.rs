//! Practice sessions.
//!
//! A [`Session`] owns the selected characters, the round policy and the
//! statistics of one practice run. It moves from `NotStarted` to `Active` on
//! the first round and to `Completed` once the round counter passes the limit
//! or [`Session::stop`] is called.

use std::{fmt, num::NonZeroU32};

use indexmap::IndexSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::ToneSettings,
    error::{Error, Result},
    schedule::{Scheduler, StatSummary},
};

/// How many rounds a session runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundLimit {
    Finite(NonZeroU32),
    /// Only ends when stopped.
    Unbounded,
}

impl RoundLimit {
    /// `0` means unbounded.
    pub fn from_count(rounds: u32) -> Self {
        NonZeroU32::new(rounds).map_or(Self::Unbounded, Self::Finite)
    }

    pub fn is_exceeded_by(&self, round: u32) -> bool {
        match self {
            Self::Finite(limit) => round > limit.get(),
            Self::Unbounded => false,
        }
    }
}

impl fmt::Display for RoundLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(x) => write!(f, "{x}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

pub const PRACTICE_MODES: &[&str] = &["hand-copy", "single-keyboard", "continuous-keyboard"];

/// How the user answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    /// Copy on paper, nothing is typed.
    HandCopy,
    /// Type each character, the next one waits for the answer.
    #[default]
    SingleKeyboard,
    /// Characters keep playing, type as you go.
    ContinuousKeyboard,
}

impl PracticeMode {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "h" | "hand-copy" => Self::HandCopy,
            "s" | "single-keyboard" => Self::SingleKeyboard,
            "c" | "continuous-keyboard" => Self::ContinuousKeyboard,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HandCopy => "hand_copy",
            Self::SingleKeyboard => "single_keyboard",
            Self::ContinuousKeyboard => "continuous_keyboard",
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a session is created from. Fixed for the lifetime of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub characters: Vec<char>,
    pub round_limit: RoundLimit,
    pub round_size: usize,
    pub mode: PracticeMode,
    pub tone: ToneSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Active,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    scheduler: Scheduler,
    state: SessionState,
    /// Incremented before each round, so the first round is 1.
    round: u32,
    rounds_completed: u32,
    current: Vec<char>,
    cursor: usize,
}

impl Session {
    /// Duplicate characters are dropped, keeping the first occurrence.
    pub fn new(mut config: SessionConfig) -> Result<Self> {
        config.characters = config
            .characters
            .iter()
            .copied()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        if config.characters.is_empty() {
            return Err(Error::invalid("at least one character must be selected"));
        }

        if config.round_size == 0 {
            return Err(Error::invalid("round size must be at least one"));
        }

        info!(
            characters = %config.characters.iter().collect::<String>(),
            rounds = %config.round_limit,
            round_size = config.round_size,
            mode = %config.mode,
            "session created"
        );

        Ok(Self {
            scheduler: Scheduler::new(&config.characters),
            config,
            state: SessionState::NotStarted,
            round: 0,
            rounds_completed: 0,
            current: Vec::new(),
            cursor: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn characters(&self) -> &[char] {
        &self.config.characters
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Current value of the round counter.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Rounds whose every character has been presented.
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed + self.round_finished() as u32
    }

    /// The sequence of the round in progress.
    pub fn current_round(&self) -> &[char] {
        &self.current
    }

    /// How many characters of the current round have been presented.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn round_finished(&self) -> bool {
        !self.current.is_empty() && self.cursor >= self.current.len()
    }

    /// Starts the next round and returns its sequence.
    /// Returns `None`, and completes the session, once the round counter passes the limit.
    /// Characters of the previous round that were not presented yet are dropped.
    pub fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Vec<char>> {
        if self.is_completed() {
            return None;
        }

        if self.round_finished() {
            self.rounds_completed += 1;
        }
        self.current.clear();
        self.cursor = 0;

        self.state = SessionState::Active;
        self.round += 1;
        if self.config.round_limit.is_exceeded_by(self.round) {
            info!(rounds = self.rounds_completed, "all rounds completed");
            self.state = SessionState::Completed;
            return None;
        }

        self.current = self.scheduler.generate_round_sequence(
            &self.config.characters,
            self.config.round_size,
            rng,
        );
        debug!(
            round = self.round,
            sequence = %self.current.iter().collect::<String>(),
            "round started"
        );

        Some(self.current.clone())
    }

    /// Presents the next character, starting a new round when the current one is exhausted.
    /// `None` once the session is completed.
    pub fn next_character<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<char> {
        if self.cursor >= self.current.len() {
            self.next_round(rng)?;
        }

        let chr = *self.current.get(self.cursor)?;
        self.cursor += 1;
        Some(chr)
    }

    /// Records the user's answer for a presented character.
    pub fn submit_result(&mut self, chr: char, correct: bool, response_time: f64) -> Result<()> {
        if self.is_completed() {
            return Err(Error::SessionCompleted);
        }

        if !self.config.characters.contains(&chr) {
            return Err(Error::UnknownCharacter(chr));
        }

        debug!(%chr, correct, response_time, "result recorded");
        self.scheduler.record_result(chr, correct, response_time);
        Ok(())
    }

    /// Ends the session now. Recorded statistics are kept.
    pub fn stop(&mut self) {
        if self.is_completed() {
            return;
        }

        self.rounds_completed = self.rounds_completed();
        self.current.clear();
        self.cursor = 0;
        self.state = SessionState::Completed;
        info!(rounds = self.rounds_completed, "session stopped");
    }

    pub fn stats(&self, chr: char) -> StatSummary {
        self.scheduler.char_stats(chr)
    }

    pub fn overall_stats(&self) -> StatSummary {
        self.scheduler.overall_stats()
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn config(chars: &str, rounds: u32, round_size: usize) -> SessionConfig {
        SessionConfig {
            characters: chars.chars().collect(),
            round_limit: RoundLimit::from_count(rounds),
            round_size,
            mode: PracticeMode::SingleKeyboard,
            tone: ToneSettings::default(),
        }
    }

    #[test]
    fn test_rejects_empty_selection() {
        assert!(matches!(
            Session::new(config("", 3, 10)),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Session::new(config("ET", 3, 0)),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_dedupes_characters() {
        let session = Session::new(config("ETETA", 1, 5)).unwrap();
        assert_eq!(session.characters(), &['E', 'T', 'A']);
    }

    #[test]
    fn test_completes_after_last_round() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = Session::new(config("ETAN", 3, 10)).unwrap();
        assert_eq!(session.state(), SessionState::NotStarted);

        for i in 0..30 {
            let chr = session.next_character(&mut rng).unwrap();
            assert_eq!(session.state(), SessionState::Active, "presentation {i}");
            assert_eq!(session.round(), i / 10 + 1);
            session.submit_result(chr, true, 0.4).unwrap();
        }

        assert_eq!(session.rounds_completed(), 3);
        assert_eq!(session.next_character(&mut rng), None);
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.rounds_completed(), 3);
        assert_eq!(session.overall_stats().accuracy, 1.0);
        assert!(matches!(
            session.submit_result('E', true, 0.1),
            Err(Error::SessionCompleted)
        ));
    }

    #[test]
    fn test_next_round_sequences() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = Session::new(config("KM", 2, 4)).unwrap();

        let first = session.next_round(&mut rng).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(session.current_round(), &first[..]);
        assert!(session.next_round(&mut rng).is_some());
        assert!(session.next_round(&mut rng).is_none());
        assert!(session.is_completed());
        // Rounds were handed out but never presented
        assert_eq!(session.rounds_completed(), 0);
    }

    #[test]
    fn test_unbounded_never_completes_on_its_own() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::new(config("E", 0, 1)).unwrap();
        for _ in 0..500 {
            assert!(session.next_character(&mut rng).is_some());
        }

        assert_eq!(session.state(), SessionState::Active);
        session.stop();
        assert!(session.is_completed());
        assert_eq!(session.rounds_completed(), 500);
        assert_eq!(session.next_character(&mut rng), None);
    }

    #[test]
    fn test_stop_mid_round_keeps_stats() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = Session::new(config("ET", 5, 10)).unwrap();
        let chr = session.next_character(&mut rng).unwrap();
        session.submit_result(chr, false, 1.2).unwrap();
        session.stop();

        assert!(session.is_completed());
        assert_eq!(session.rounds_completed(), 0);
        assert_eq!(session.stats(chr).accuracy, 0.0);
        assert_eq!(session.scheduler().stat(chr).unwrap().attempts, 1);
        assert_eq!(session.overall_stats().average_response_time, 1.2);
    }

    #[test]
    fn test_rejects_unknown_character() {
        let mut session = Session::new(config("ET", 1, 1)).unwrap();
        assert!(matches!(
            session.submit_result('Q', true, 0.5),
            Err(Error::UnknownCharacter('Q'))
        ));
    }

    #[test]
    fn test_round_limit() {
        assert_eq!(RoundLimit::from_count(0), RoundLimit::Unbounded);
        assert!(RoundLimit::from_count(3).is_exceeded_by(4));
        assert!(!RoundLimit::from_count(3).is_exceeded_by(3));
        assert!(!RoundLimit::Unbounded.is_exceeded_by(u32::MAX));
        assert_eq!(RoundLimit::from_count(3).to_string(), "3");
    }

    #[test]
    fn test_practice_mode_names() {
        assert_eq!(
            PracticeMode::from_name("hand-copy"),
            Some(PracticeMode::HandCopy)
        );
        assert_eq!(
            PracticeMode::from_name("continuous_keyboard"),
            Some(PracticeMode::ContinuousKeyboard)
        );
        assert_eq!(
            serde_json::to_string(&PracticeMode::SingleKeyboard).unwrap(),
            "\"single_keyboard\""
        );
    }
}
