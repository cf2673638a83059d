//! Deterministic pseudo-random numbers for station placement.
//!
//! A small linear congruential generator. Layouts must come out identical
//! on every run over the same stations, so the recurrence and the default
//! seed are fixed.

pub const DEFAULT_SEED: u64 = 12345;

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233280;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl Default for SeededRandom {
    fn default() -> SeededRandom {
        SeededRandom::new()
    }
}

impl SeededRandom {
    pub fn new() -> Self {
        SeededRandom::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        SeededRandom { state: seed }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        // Reducing first keeps arbitrary injected seeds from overflowing;
        // the result is the same modulo MODULUS.
        self.state = ((self.state % MODULUS) * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Uniform value in `[lo, lo + span)`.
    pub fn span(&mut self, lo: f64, span: f64) -> f64 {
        lo + self.next_f64() * span
    }

    /// Value in `[-width/2, width/2)`.
    pub fn centered(&mut self, width: f64) -> f64 {
        (self.next_f64() - 0.5) * width
    }
}

impl Iterator for SeededRandom {
    type Item = f64;
    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

#[test]
fn test_golden_sequence() {
    let mut r = SeededRandom::new();
    let states = (0..3).map(|_| { r.next_f64(); r.state() }).collect::<Vec<_>>();
    assert_eq!(states, vec![96382, 3239, 82116]);

    let values = SeededRandom::new().take(3).collect::<Vec<_>>();
    assert_eq!(values[0], 96382.0 / 233280.0);
    assert!((values[0] - 0.4131601508916324).abs() < 1e-15);
    assert!((values[1] - 0.01388460219478738).abs() < 1e-15);
    assert!((values[2] - 0.3520061728395062).abs() < 1e-15);
}

#[test]
fn test_reproducible() {
    let a = SeededRandom::new().take(500).collect::<Vec<_>>();
    let b = SeededRandom::with_seed(DEFAULT_SEED).take(500).collect::<Vec<_>>();
    assert_eq!(a, b);
    assert!(a.iter().all(|x| *x >= 0.0 && *x < 1.0));

    let c = SeededRandom::with_seed(1).take(500).collect::<Vec<_>>();
    assert_ne!(a, c);
}

#[test]
fn test_large_seed() {
    let mut big = SeededRandom::with_seed(u64::max_value());
    let mut reduced = SeededRandom::with_seed(u64::max_value() % MODULUS);
    for _ in 0..10 {
        assert_eq!(big.next_f64(), reduced.next_f64());
    }
}
