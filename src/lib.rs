pub mod config;
pub mod data;
pub mod error;
pub mod scenario;

pub use config::{IncrementConfig, ScenarioConfig};
pub use data::{
    Batch, DataLoader, InMemoryDataset, LabeledDataset, Sample, Split, Subset, split_train_val,
};
pub use error::{IncrementErr, Result, ScenarioErr};
pub use scenario::{IncrementSpec, TaskPlan, TaskScenario, TaskView, Tasks, compute_plan};

/// An integer identifying a semantic class.
pub type ClassLabel = u32;
