//! Match decision for like/study swipes.
//!
//! Candidates are static profiles, so "they liked you back" is simulated
//! with a biased coin. The coin is injectable so tests can pin outcomes.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait MatchDecider: Send + Sync {
    /// `true` when the swipe turns into a match.
    fn decide(&self) -> bool;
}

/// Succeeds when a uniform draw in `[0, 1)` exceeds `1 - probability`.
pub struct RandomDecider {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomDecider {
    pub fn from_entropy(probability: f64) -> Self {
        Self::with_rng(probability, StdRng::from_entropy())
    }

    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(probability: f64, rng: StdRng) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl MatchDecider for RandomDecider {
    fn decide(&self) -> bool {
        let draw: f64 = match self.rng.lock() {
            Ok(mut rng) => rng.gen(),
            Err(poisoned) => poisoned.into_inner().gen(),
        };
        draw > 1.0 - self.probability
    }
}

/// Always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecider(pub bool);

impl MatchDecider for FixedDecider {
    fn decide(&self) -> bool {
        self.0
    }
}
