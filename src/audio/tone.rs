use std::f64::consts::PI;

/// Sample rate used when no output device dictates one.
pub const SAMPLE_RATE: u32 = 44_100;

/// Longest fade in / fade out ramp, in seconds.
const MAX_FADE: f64 = 0.01;

/// A sine wave, optionally limited to a number of samples.
#[derive(Clone, Copy, Debug)]
pub struct Tone {
    i: usize,
    tone: f64,
    sample_rate: f64,
    duration: Option<usize>,
}

/// A tone with linear fade in and fade out ramps so it starts and ends at zero.
#[derive(Clone, Copy, Debug)]
pub struct SmoothTone {
    inner: Tone,
    samples: usize,
    fade: usize,
}

impl Tone {
    pub fn new(tone: f64, sample_rate: u32) -> Self {
        Self {
            i: 0,
            sample_rate: sample_rate as f64,
            tone,
            duration: None,
        }
    }

    pub fn duration(mut self, samples: usize) -> Self {
        self.duration = Some(samples);
        self
    }
}

impl Iterator for Tone {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        match self.duration {
            Some(i) if self.i >= i => return None,
            _ => {}
        }

        let out = (self.i as f64 * self.tone * 2.0 * PI / self.sample_rate).sin();
        self.i += 1;
        Some(out)
    }
}

impl SmoothTone {
    /// `duration` is in seconds. The ramps last `min(10ms, duration / 10)` each.
    pub fn new(tone: f64, sample_rate: u32, duration: f64) -> Self {
        let duration = duration.max(0.0);
        let samples = samples_for(duration, sample_rate);
        let fade = (MAX_FADE.min(duration / 10.0) * sample_rate as f64) as usize;

        Self {
            inner: Tone::new(tone, sample_rate).duration(samples),
            samples,
            fade,
        }
    }

    pub fn len(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }
}

impl Iterator for SmoothTone {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.inner.i;
        let raw = self.inner.next()?;
        Some(raw * fade_gain(i, self.samples, self.fade))
    }
}

/// Number of samples `duration` seconds take up, rounded to the nearest sample.
pub fn samples_for(duration: f64, sample_rate: u32) -> usize {
    (sample_rate as f64 * duration).round() as usize
}

/// Gain of sample `i` in a buffer of `len` samples with `fade` sample ramps at both ends.
/// Ramps run from exactly 0 to exactly 1, so the first and last samples are silent.
fn fade_gain(i: usize, len: usize, fade: usize) -> f64 {
    let ramp = |pos: usize| match fade {
        1 => 0.0,
        _ => pos as f64 / (fade - 1) as f64,
    };

    let mut gain = 1.0_f64;
    if i < fade {
        gain = gain.min(ramp(i));
    }

    let from_end = len - 1 - i;
    if from_end < fade {
        gain = gain.min(ramp(from_end));
    }

    gain
}

/// Converts a sample in `-1.0..=1.0` to signed 16 bit.
pub fn quantize(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f64) as i16
}

/// Synthesizes a faded sine burst of `duration` seconds.
pub fn synthesize(frequency: f64, duration: f64, sample_rate: u32) -> Vec<i16> {
    SmoothTone::new(frequency, sample_rate, duration)
        .map(quantize)
        .collect()
}

/// Short descending 880Hz to 440Hz sweep played after a wrong answer.
pub fn error_tone(sample_rate: u32) -> Vec<i16> {
    const DURATION: f64 = 0.2;
    const FADE: f64 = 0.05;
    const FROM: f64 = 880.0;
    const TO: f64 = 440.0;

    let samples = samples_for(DURATION, sample_rate);
    let fade = (FADE * sample_rate as f64) as usize;
    let mut phase = 0.0_f64;

    (0..samples)
        .map(|i| {
            let freq = FROM + (TO - FROM) * i as f64 / samples as f64;
            let out = phase.sin() * fade_gain(i, samples, fade);
            phase += 2.0 * PI * freq / sample_rate as f64;
            quantize(out)
        })
        .collect()
}
