//! Audio utilities.
//! Timing, tone generation, sequencing and playback.

pub mod devices;
pub mod player;
pub mod sequence;
pub mod timing;
pub mod tone;

pub use devices::{output_or_silent, AudioDevice};
pub use player::{Clock, Output, Player, SilentOutput, SleepClock};
pub use sequence::{Element, Sequence};
pub use timing::TimingProfile;
