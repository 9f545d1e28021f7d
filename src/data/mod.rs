pub mod dataloader;
pub mod dataset;
pub mod split;

pub use dataloader::{Batch, DataLoader};
pub use dataset::{InMemoryDataset, LabeledDataset, Sample, Split};
pub use split::{Subset, split_train_val};
