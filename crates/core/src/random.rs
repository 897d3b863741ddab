use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Source of uniform samples in `[0, 1)` for score jitter and template choice.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;

    /// Index in `0..len`; `len` must be non-zero.
    fn pick(&self, len: usize) -> usize {
        let index = (self.next_unit() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always yields the same sample. `FixedRandom(0.0)` turns jitter off.
#[derive(Clone, Copy, Debug)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0.clamp(0.0, 0.999_999)
    }
}

/// Cycles through a fixed list of samples.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: AtomicUsize::new(0) }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[index].clamp(0.0, 0.999_999)
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedRandom, RandomSource, SequenceRandom, ThreadRandom};

    #[test]
    fn pick_stays_in_bounds() {
        assert_eq!(FixedRandom(0.0).pick(3), 0);
        assert_eq!(FixedRandom(1.0).pick(3), 2);
        assert_eq!(FixedRandom(0.5).pick(3), 1);
        for _ in 0..100 {
            assert!(ThreadRandom.pick(5) < 5);
        }
    }

    #[test]
    fn sequence_cycles() {
        let source = SequenceRandom::new(vec![0.1, 0.9]);
        assert_eq!(source.pick(2), 0);
        assert_eq!(source.pick(2), 1);
        assert_eq!(source.pick(2), 0);
    }
}
