//! Session history.
//!
//! One [`SessionRecord`] is kept per finished session. The history file is a
//! JSON list of records; anything else is rejected as corrupt.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    schedule::{CharacterStat, StatSummary},
    session::{PracticeMode, Session},
};

pub const DEFAULT_HISTORY_FILE: &str = "morse_session_history.json";
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: String,
    pub characters: Vec<char>,
    pub mode: PracticeMode,
    pub char_wpm: f64,
    pub word_wpm: f64,
    pub frequency: f64,
    pub rounds_completed: u32,
    pub stats: IndexMap<char, CharacterStat>,
}

impl SessionRecord {
    pub fn from_session(session: &Session, date: DateTime<Local>) -> Self {
        let config = session.config();
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            characters: session.characters().to_vec(),
            mode: config.mode,
            char_wpm: config.tone.char_wpm,
            word_wpm: config.tone.word_wpm,
            frequency: config.tone.frequency,
            rounds_completed: session.rounds_completed(),
            stats: session.scheduler().stats().clone(),
        }
    }

    pub fn char_stats(&self, chr: char) -> StatSummary {
        self.stats
            .get(&chr)
            .map(CharacterStat::summary)
            .unwrap_or_default()
    }

    /// Totals over the record's selected characters.
    pub fn overall_stats(&self) -> StatSummary {
        self.characters
            .iter()
            .filter_map(|c| self.stats.get(c))
            .collect()
    }

    pub fn attempts(&self) -> u32 {
        self.characters
            .iter()
            .filter_map(|c| self.stats.get(c))
            .map(|x| x.attempts)
            .sum()
    }

    /// One line description, `2024-05-01 18:30 - ETANIM (single_keyboard)`.
    pub fn title(&self) -> String {
        let mut chars = self.characters.iter().collect::<String>();
        if self.characters.len() > 10 {
            chars = self.characters[..10].iter().collect::<String>() + "...";
        }

        format!("{} - {} ({})", self.date, chars, self.mode)
    }
}

/// A point of the progress-over-time view.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPoint {
    pub date: String,
    /// Percent, `0..=100`.
    pub accuracy: f64,
    pub average_response_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Append the imported records to the existing ones.
    Merge,
    /// Drop the existing records.
    Replace,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<SessionRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&SessionRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: SessionRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Parses a history payload. Fails with [`Error::CorruptData`] unless it is a list of records.
    pub fn parse(payload: &[u8]) -> Result<Vec<SessionRecord>> {
        let value = serde_json::from_slice::<serde_json::Value>(payload)
            .map_err(|e| Error::corrupt(format!("history is not valid JSON: {e}")))?;

        if !value.is_array() {
            return Err(Error::corrupt("history is not a list of sessions"));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::corrupt(format!("malformed session record: {e}")))
    }

    pub fn from_json(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            records: Self::parse(payload)?,
        })
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.records)?)
    }

    /// Imports a payload, returning how many records it held.
    /// On error the history is left as it was.
    pub fn import(&mut self, payload: &[u8], mode: ImportMode) -> Result<usize> {
        let imported = Self::parse(payload)?;
        let count = imported.len();

        match mode {
            ImportMode::Merge => self.records.extend(imported),
            ImportMode::Replace => self.records = imported,
        }

        info!(count, ?mode, "imported session records");
        Ok(count)
    }

    /// Accuracy and response time per session, skipping sessions without attempts.
    pub fn progress(&self) -> Vec<ProgressPoint> {
        self.records
            .iter()
            .filter(|x| x.attempts() > 0)
            .map(|x| {
                let overall = x.overall_stats();
                ProgressPoint {
                    date: x.date.clone(),
                    accuracy: overall.accuracy * 100.0,
                    average_response_time: overall.average_response_time,
                }
            })
            .collect()
    }
}

pub trait HistoryStore {
    fn load(&self) -> Result<History>;
    fn save(&self, history: &History) -> Result<()>;

    /// Like `load`, but an unreadable history is replaced with an empty one.
    fn load_or_default(&self) -> History {
        self.load().unwrap_or_else(|err| {
            warn!("starting with empty history: {err}");
            History::new()
        })
    }
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_path(DEFAULT_HISTORY_FILE)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FileHistoryStore {
    /// A missing file is an empty history.
    fn load(&self) -> Result<History> {
        if !self.path.exists() {
            return Ok(History::new());
        }

        let bytes = fs::read(&self.path)?;
        History::from_json(&bytes)
    }

    fn save(&self, history: &History) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, history.to_json()?)?;
        info!(path = %self.path.display(), records = history.len(), "saved session history");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::tempdir;

    use super::*;
    use crate::{
        config::ToneSettings,
        session::{RoundLimit, SessionConfig},
    };

    fn record(date: &str, stats: &[(char, u32, u32, &[f64])]) -> SessionRecord {
        SessionRecord {
            date: date.into(),
            characters: stats.iter().map(|x| x.0).collect(),
            mode: PracticeMode::SingleKeyboard,
            char_wpm: 20.0,
            word_wpm: 5.0,
            frequency: 600.0,
            rounds_completed: 1,
            stats: stats
                .iter()
                .map(|&(c, attempts, correct, times)| {
                    (
                        c,
                        CharacterStat {
                            attempts,
                            correct,
                            response_times: times.to_vec(),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_record_from_session() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::new(SessionConfig {
            characters: vec!['K', 'M'],
            round_limit: RoundLimit::from_count(1),
            round_size: 2,
            mode: PracticeMode::ContinuousKeyboard,
            tone: ToneSettings {
                char_wpm: 25.0,
                word_wpm: 8.0,
                frequency: 650.0,
            },
        })
        .unwrap();

        while let Some(c) = session.next_character(&mut rng) {
            session.submit_result(c, c == 'K', 0.75).unwrap();
        }

        let date = Local.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
        let record = SessionRecord::from_session(&session, date);
        assert_eq!(record.date, "2024-05-01 18:30");
        assert_eq!(record.characters, vec!['K', 'M']);
        assert_eq!(record.char_wpm, 25.0);
        assert_eq!(record.frequency, 650.0);
        assert_eq!(record.rounds_completed, 1);
        assert_eq!(record.attempts(), 2);
        assert_eq!(record.title(), "2024-05-01 18:30 - KM (continuous_keyboard)");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut history = History::new();
        history.push(record("2024-05-01 18:30", &[('E', 2, 1, &[0.5, 1.25]), ('T', 0, 0, &[])]));
        history.push(record("2024-05-02 09:00", &[('?', 1, 1, &[0.3])]));

        let json = history.to_json().unwrap();
        assert_eq!(History::from_json(&json).unwrap(), history);
    }

    #[test]
    fn test_reads_flat_record_layout() {
        let payload = br#"[{
            "date": "2024-03-09 21:15",
            "characters": ["E", "T"],
            "mode": "hand_copy",
            "char_wpm": 20,
            "word_wpm": 5,
            "frequency": 600,
            "rounds_completed": 3,
            "stats": {
                "E": {"attempts": 4, "correct": 3, "response_times": [0.5, 0.7, 1.1, 0.9]},
                "T": {"attempts": 0, "correct": 0, "response_times": []}
            }
        }]"#;

        let history = History::from_json(payload).unwrap();
        let record = history.get(0).unwrap();
        assert_eq!(record.mode, PracticeMode::HandCopy);
        assert_eq!(record.char_stats('E').accuracy, 0.75);
        assert_eq!(record.overall_stats().accuracy, 0.75);
        assert_eq!(record.char_stats('T'), StatSummary::default());
    }

    #[test]
    fn test_import_rejects_non_list() {
        let mut history = History::new();
        history.push(record("2024-05-01 18:30", &[('E', 1, 1, &[0.5])]));
        let before = history.clone();

        let payloads: [&[u8]; 5] = [
            br#"{"date": "2024-05-01"}"#,
            b"42",
            b"\"sessions\"",
            b"not json",
            br#"[{"date": 1}]"#,
        ];
        for payload in payloads {
            let err = history.import(payload, ImportMode::Replace).unwrap_err();
            assert!(matches!(err, Error::CorruptData(_)), "{err}");
            assert_eq!(history, before);
        }
    }

    #[test]
    fn test_import_merge_and_replace() {
        let mut history = History::new();
        history.push(record("a", &[('E', 1, 1, &[0.5])]));

        let mut other = History::new();
        other.push(record("b", &[('T', 1, 0, &[2.0])]));
        other.push(record("c", &[('A', 1, 0, &[2.0])]));
        let payload = other.to_json().unwrap();

        assert_eq!(history.import(&payload, ImportMode::Merge).unwrap(), 2);
        assert_eq!(history.len(), 3);

        assert_eq!(history.import(&payload, ImportMode::Replace).unwrap(), 2);
        assert_eq!(history, other);
    }

    #[test]
    fn test_progress_skips_empty_sessions() {
        let mut history = History::new();
        history.push(record("a", &[('E', 4, 2, &[1.0, 1.0, 2.0, 2.0])]));
        history.push(record("b", &[('E', 0, 0, &[])]));
        history.push(record("c", &[('E', 1, 1, &[0.5]), ('T', 1, 1, &[1.5])]));

        let progress = history.progress();
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].date, "a");
        assert_eq!(progress[0].accuracy, 50.0);
        assert_eq!(progress[0].average_response_time, 1.5);
        assert_eq!(progress[1].accuracy, 100.0);
        assert_eq!(progress[1].average_response_time, 1.0);
    }

    #[test]
    fn test_title_truncates() {
        let chars = "ABCDEFGHIJKL"
            .chars()
            .map(|c| (c, 0, 0, &[][..]))
            .collect::<Vec<_>>();
        let record = record("d", &chars);
        assert_eq!(record.title(), "d - ABCDEFGHIJ... (single_keyboard)");
    }

    #[test]
    fn test_file_store() {
        let dir = tempdir().unwrap();
        let store = FileHistoryStore::with_path(dir.path().join("history.json"));
        assert!(store.load().unwrap().is_empty());

        let mut history = History::new();
        history.push(record("a", &[('E', 1, 1, &[0.5])]));
        store.save(&history).unwrap();
        assert_eq!(store.load().unwrap(), history);

        fs::write(store.path(), b"{}").unwrap();
        assert!(matches!(store.load(), Err(Error::CorruptData(_))));
        assert!(store.load_or_default().is_empty());
    }
}
