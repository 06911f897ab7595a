//! Random source for the computer's moves
//!
//! One generator is seeded at startup and shared by every worker, so a
//! fixed seed replays the same choices for the same order of passes.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use ttt_domain::SlotChooser;

/// Shared, seedable `SlotChooser`
#[derive(Debug, Clone)]
pub struct RandomChooser {
    rng: Arc<Mutex<StdRng>>,
}

impl RandomChooser {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Fixed seed when configured, entropy otherwise
    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                debug!(seed, "seeding random source");
                Self::from_seed(seed)
            }
            None => Self::from_entropy(),
        }
    }
}

impl SlotChooser for RandomChooser {
    fn choose_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..len)
    }
}
