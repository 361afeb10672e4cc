pub mod morse;

pub use morse::{lookup, Preset, Symbol};
