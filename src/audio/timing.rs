//! Farnsworth timing.
//!
//! Element lengths come from the character speed, while the spacing between
//! characters and words comes from a separate (usually slower) word speed.

use crate::{
    coding::Symbol,
    error::{Error, Result},
};

/// Dit units in the word "PARIS", including the space after it.
const PARIS_UNITS: f64 = 50.0;

/// Length of one dit in seconds at `wpm` words per minute.
pub fn dit_length(wpm: f64) -> f64 {
    60.0 / (wpm * PARIS_UNITS)
}

/// All durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingProfile {
    pub dit: f64,
    pub dah: f64,
    /// Silence between the elements of one character.
    pub element_gap: f64,
    /// Silence after every character.
    pub char_gap: f64,
    /// Silence between words, counted from the end of the last element.
    pub word_gap: f64,
}

impl TimingProfile {
    pub fn new(char_wpm: f64, word_wpm: f64) -> Result<Self> {
        check_speed("character", char_wpm)?;
        check_speed("word", word_wpm)?;
        Ok(Self::compute(char_wpm, word_wpm))
    }

    fn compute(char_wpm: f64, word_wpm: f64) -> Self {
        let dit = dit_length(char_wpm);
        let word_dit = dit_length(word_wpm);

        Self {
            dit,
            dah: 3.0 * dit,
            element_gap: dit,
            char_gap: 3.0 * word_dit,
            word_gap: 7.0 * word_dit,
        }
    }

    pub fn symbol(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::Dit => self.dit,
            Symbol::Dah => self.dah,
        }
    }

    /// Silence a space adds on top of the character gap already played after the previous character.
    pub fn word_space(&self) -> f64 {
        self.word_gap - self.char_gap
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::compute(20.0, 5.0)
    }
}

fn check_speed(name: &str, wpm: f64) -> Result<()> {
    if !wpm.is_finite() || wpm <= 0.0 {
        return Err(Error::invalid(format!(
            "{name} speed must be a positive number of WPM, got {wpm}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_dah_is_three_dits() {
        for wpm in [1.0, 5.0, 13.0, 20.0, 27.5, 50.0, 99.9] {
            let t = TimingProfile::new(wpm, wpm).unwrap();
            assert_eq!(t.dah, 3.0 * t.dit);
            assert_eq!(t.element_gap, t.dit);
        }
    }

    #[test]
    fn test_twenty_wpm() {
        let t = TimingProfile::new(20.0, 20.0).unwrap();
        assert!(close(t.dit, 0.06));
        assert!(close(t.dah, 0.18));
        assert!(close(t.char_gap, 0.18));
        assert!(close(t.word_gap, 0.42));
    }

    #[test]
    fn test_farnsworth_spacing() {
        let t = TimingProfile::new(20.0, 5.0).unwrap();
        assert!(close(t.dit, 0.06));
        assert!(close(t.char_gap, 0.72));
        assert!(close(t.word_gap, 1.68));
        assert!(close(t.word_space(), 0.96));
        assert_eq!(t, TimingProfile::default());
    }

    #[test]
    fn test_rejects_bad_speeds() {
        for (c, w) in [(0.0, 5.0), (20.0, 0.0), (-3.0, 5.0), (f64::NAN, 5.0), (20.0, f64::INFINITY)] {
            assert!(matches!(
                TimingProfile::new(c, w),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }
}
