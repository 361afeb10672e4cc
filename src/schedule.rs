//! Adaptive character scheduling.
//!
//! Every character keeps a running tally of attempts, correct answers and
//! response times. Rounds are drawn with replacement, weighted towards the
//! characters with the highest difficulty score
//! (`error rate + average response time in seconds`).

use indexmap::IndexMap;
use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::SliceRandom,
    Rng,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::misc::mean;

/// Error rate assumed for a character that has not been attempted.
const DEFAULT_ERROR_RATE: f64 = 0.5;
/// Response time assumed for a character without any recorded times.
const DEFAULT_RESPONSE_TIME: f64 = 1.0;
/// Added to every normalized score so mastered characters still show up.
const BASELINE_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterStat {
    pub attempts: u32,
    pub correct: u32,
    /// Seconds, in the order they were recorded.
    pub response_times: Vec<f64>,
}

/// Accuracy in `0..=1` and average response time in seconds.
/// Both are zero when there is no data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatSummary {
    pub accuracy: f64,
    pub average_response_time: f64,
}

impl CharacterStat {
    pub fn record(&mut self, correct: bool, response_time: f64) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }

        let response_time = match response_time.is_finite() {
            true => response_time.max(0.0),
            false => 0.0,
        };
        self.response_times.push(response_time);
    }

    pub fn accuracy(&self) -> Option<f64> {
        (self.attempts > 0).then(|| self.correct as f64 / self.attempts as f64)
    }

    pub fn average_response_time(&self) -> Option<f64> {
        mean(&self.response_times)
    }

    pub fn summary(&self) -> StatSummary {
        StatSummary {
            accuracy: self.accuracy().unwrap_or(0.0),
            average_response_time: self.average_response_time().unwrap_or(0.0),
        }
    }

    /// Higher is weaker. Mixes a unitless rate with seconds on purpose.
    pub fn difficulty(&self) -> f64 {
        let error_rate = self
            .accuracy()
            .map(|x| 1.0 - x)
            .unwrap_or(DEFAULT_ERROR_RATE);
        let response_time = self
            .average_response_time()
            .unwrap_or(DEFAULT_RESPONSE_TIME);

        error_rate + response_time
    }
}

impl<'a> FromIterator<&'a CharacterStat> for StatSummary {
    fn from_iter<T: IntoIterator<Item = &'a CharacterStat>>(iter: T) -> Self {
        let mut attempts = 0;
        let mut correct = 0;
        let mut times = Vec::new();
        for stat in iter {
            attempts += stat.attempts;
            correct += stat.correct;
            times.extend_from_slice(&stat.response_times);
        }

        StatSummary {
            accuracy: match attempts {
                0 => 0.0,
                _ => correct as f64 / attempts as f64,
            },
            average_response_time: mean(&times).unwrap_or(0.0),
        }
    }
}

/// Owns the statistics of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scheduler {
    stats: IndexMap<char, CharacterStat>,
}

impl Scheduler {
    /// Zeroed statistics for every character.
    pub fn new(characters: &[char]) -> Self {
        Self {
            stats: characters
                .iter()
                .map(|&c| (c, CharacterStat::default()))
                .collect(),
        }
    }

    pub fn stats(&self) -> &IndexMap<char, CharacterStat> {
        &self.stats
    }

    pub fn stat(&self, chr: char) -> Option<&CharacterStat> {
        self.stats.get(&chr)
    }

    /// True while none of `characters` has been attempted.
    pub fn is_bootstrapping(&self, characters: &[char]) -> bool {
        !characters
            .iter()
            .any(|c| self.stat(*c).map_or(false, |x| x.attempts > 0))
    }

    /// Sampling probability of each of `characters`, in the same order.
    /// Uniform while bootstrapping, otherwise
    /// `(difficulty / max difficulty + 0.1)` normalized to sum to one.
    pub fn weights(&self, characters: &[char]) -> Vec<f64> {
        if characters.is_empty() {
            return Vec::new();
        }

        if self.is_bootstrapping(characters) {
            return vec![1.0 / characters.len() as f64; characters.len()];
        }

        let fallback = CharacterStat::default();
        let scores = characters
            .iter()
            .map(|c| self.stat(*c).unwrap_or(&fallback).difficulty())
            .collect::<Vec<_>>();

        // Everything answered instantly and correctly scores zero
        let max = scores.iter().copied().fold(0.0, f64::max);
        let weights = scores
            .iter()
            .map(|x| match max > 0.0 {
                true => x / max + BASELINE_WEIGHT,
                false => BASELINE_WEIGHT,
            })
            .collect::<Vec<_>>();

        let total = weights.iter().sum::<f64>();
        weights.into_iter().map(|x| x / total).collect()
    }

    /// Draws `round_size` characters with replacement. The order of the draws is the play order.
    pub fn generate_round_sequence<R: Rng + ?Sized>(
        &self,
        characters: &[char],
        round_size: usize,
        rng: &mut R,
    ) -> Vec<char> {
        if characters.is_empty() {
            return Vec::new();
        }

        if self.is_bootstrapping(characters) {
            debug!(round_size, "drawing uniform round");
            return uniform(characters, round_size, rng);
        }

        let weights = self.weights(characters);
        debug!(?weights, round_size, "drawing weighted round");

        match WeightedIndex::new(&weights) {
            Ok(dist) => (0..round_size)
                .map(|_| characters[dist.sample(rng)])
                .collect(),
            Err(err) => {
                warn!("unusable weights ({err}), drawing uniform round");
                uniform(characters, round_size, rng)
            }
        }
    }

    /// Records one answer. Characters that are not tracked yet start from zero.
    pub fn record_result(&mut self, chr: char, correct: bool, response_time: f64) {
        self.stats
            .entry(chr)
            .or_default()
            .record(correct, response_time);
    }

    pub fn char_stats(&self, chr: char) -> StatSummary {
        self.stat(chr).map(CharacterStat::summary).unwrap_or_default()
    }

    pub fn overall_stats(&self) -> StatSummary {
        self.stats.values().collect()
    }
}

fn uniform<R: Rng + ?Sized>(characters: &[char], round_size: usize, rng: &mut R) -> Vec<char> {
    (0..round_size)
        .filter_map(|_| characters.choose(rng).copied())
        .collect()
}
