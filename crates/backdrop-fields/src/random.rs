//! Pluggable random sources for the field generators.
//!
//! Generators never reach for a global RNG. Callers hand in a
//! [`RandomSource`], which makes a field reproducible from a seed and lets
//! tests pin individual draws.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A stream of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Next sample mapped onto `[low, high)`.
    fn next_range(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_unit()
    }
}

/// Deterministic ChaCha8-backed source. Same seed, same field.
#[derive(Clone, Debug)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    /// Create a source from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Largest `f32` strictly below 1.0.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Returns the same value for every draw.
///
/// The value is clamped into `[0, 1)`, so `FixedSource::new(1.0)` yields the
/// largest representable sample below one.
#[derive(Clone, Copy, Debug)]
pub struct FixedSource {
    value: f32,
}

impl FixedSource {
    pub fn new(value: f32) -> Self {
        Self {
            value: clamp_unit(value),
        }
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f32 {
        self.value
    }
}

/// Cycles through a fixed list of samples.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    /// Create a source that replays `values` in order, wrapping around.
    /// An empty list behaves like a source that always returns zero.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values.into().into_iter().map(clamp_unit).collect();
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, BELOW_ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_source_is_deterministic() {
        let mut a = SeededSource::new(7);
        let mut b = SeededSource::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn test_seeded_source_stays_in_unit_interval() {
        let mut source = SeededSource::new(42);
        for _ in 0..10_000 {
            let v = source.next_unit();
            assert!((0.0..1.0).contains(&v), "sample {v} outside [0, 1)");
        }
    }

    #[test]
    fn test_fixed_source_clamps_one_below_unity() {
        let mut source = FixedSource::new(1.0);
        let v = source.next_unit();
        assert!(v < 1.0);
        assert!(v > 0.999_99);
    }

    #[test]
    fn test_sequence_source_wraps() {
        let mut source = SequenceSource::new(vec![0.1, 0.2]);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.2);
        assert_eq!(source.next_unit(), 0.1);
    }

    #[test]
    fn test_empty_sequence_yields_zero() {
        let mut source = SequenceSource::new(Vec::new());
        assert_eq!(source.next_unit(), 0.0);
    }

    #[test]
    fn test_next_range_maps_interval() {
        let mut source = FixedSource::new(0.5);
        assert_eq!(source.next_range(-5.0, 5.0), 0.0);
    }
}
