use std::num::NonZeroUsize;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{IncrementSpec, Result, ScenarioErr};

/// The `increment` field: a single class count or one per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncrementConfig {
    Uniform(usize),
    Explicit(Vec<usize>),
}

/// User facing description of a class-incremental scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioConfig {
    pub increment: IncrementConfig,
    /// Size of the first task, 0 means same as the others.
    #[serde(default)]
    pub initial_increment: usize,
    #[serde(default)]
    pub val_split: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub batch_size: Option<NonZeroUsize>,
}

impl ScenarioConfig {
    /// Parses a JSON scenario config.
    ///
    /// # Errors
    /// Returns `ScenarioErr::Config` if the document is malformed and
    /// `ScenarioErr::InvalidValSplit` if `val_split` is not within `[0, 1]`.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        if !(0.0..=1.0).contains(&config.val_split) {
            return Err(ScenarioErr::InvalidValSplit(config.val_split));
        }

        Ok(config)
    }

    /// Resolves `increment` and `initial_increment` into an `IncrementSpec`.
    ///
    /// An explicit list already sizes the first task, so `initial_increment`
    /// is ignored in that case.
    pub fn increment_spec(&self) -> IncrementSpec {
        match (&self.increment, self.initial_increment) {
            (IncrementConfig::Uniform(increment), 0) => IncrementSpec::Uniform {
                increment: *increment,
            },
            (IncrementConfig::Uniform(increment), initial) => IncrementSpec::UniformWithInitial {
                initial,
                increment: *increment,
            },
            (IncrementConfig::Explicit(increments), initial) => {
                if initial != 0 {
                    log::warn!("ignoring initial_increment={initial}, increments are explicit");
                }
                IncrementSpec::Explicit {
                    increments: increments.clone(),
                }
            }
        }
    }

    #[inline]
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size.unwrap_or(NonZeroUsize::MIN)
    }

    /// A rng seeded from `seed`, or from the OS when there is none.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
