use hashbrown::HashMap;

pub trait Similarity {
    fn similarity(&self, other: &Self) -> f64;
}

impl<T: AsRef<str>> Similarity for T {
    fn similarity(&self, other: &Self) -> f64 {
        similarity(self.as_ref(), other.as_ref())
    }
}

/// Dice coefficient over character bigrams, ignoring spaces.
/// 1.0 for equal strings, 0.0 when nothing is shared.
pub fn similarity(str1: &str, str2: &str) -> f64 {
    let a = str1.replace(' ', "").chars().collect::<Vec<_>>();
    let b = str2.replace(' ', "").chars().collect::<Vec<_>>();

    // Check some simple cases
    if a == b {
        return 1.0;
    }

    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut first_bigrams = HashMap::<&[char], i32>::new();
    for bigram in a.windows(2) {
        *first_bigrams.entry(bigram).or_insert(0) += 1;
    }

    let mut intersection_size = 0;
    for bigram in b.windows(2) {
        if let Some(count) = first_bigrams.get_mut(bigram) {
            if *count > 0 {
                *count -= 1;
                intersection_size += 1;
            }
        }
    }

    (2.0 * intersection_size as f64) / (a.len() + b.len() - 2) as f64
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("speakers", "speakers"), 1.0);
        assert_eq!(similarity("a", "speakers"), 0.0);
        assert!("built-in speakers".similarity(&"speakers") > "hdmi output".similarity(&"speakers"));
        assert!(similarity("head phones", "headphones") == 1.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 4.5]), Some(2.5));
    }
}
