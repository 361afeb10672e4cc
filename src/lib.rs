//! Adaptive Morse code trainer.
//!
//! Characters are played with Farnsworth timing and drawn in rounds weighted
//! towards the ones the user gets wrong or answers slowly.

pub mod audio;
pub mod coding;
pub mod config;
pub mod error;
pub mod history;
pub mod misc;
pub mod schedule;
pub mod session;

pub use error::{Error, Result};
pub use history::{History, SessionRecord};
pub use schedule::{CharacterStat, Scheduler, StatSummary};
pub use session::{PracticeMode, RoundLimit, Session, SessionConfig, SessionState};
