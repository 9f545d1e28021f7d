use std::{error::Error, fmt};

use crate::ClassLabel;

/// The crate's result type.
pub type Result<T> = std::result::Result<T, ScenarioErr>;

/// Reasons an increment specification cannot partition a label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrementErr {
    /// The dataset has no labels to partition.
    EmptyClassSet,
    /// The increment of the given task is zero.
    NonPositiveIncrement { task: usize },
    /// `remaining` classes cannot be split evenly in tasks of `increment`.
    IndivisibleIncrement { remaining: usize, increment: usize },
    /// The first task asks for more classes than there are.
    InitialIncrementTooLarge { initial: usize, classes: usize },
    /// The explicit increments do not add up to the number of classes.
    SumMismatch { sum: usize, classes: usize },
    /// The label set has a hole, `missing` is the first absent label.
    NonContiguousClasses { missing: ClassLabel },
    /// `label` is the largest representable label, its task has no exclusive end.
    LabelOverflow { label: ClassLabel },
    /// The explicit increments overflow when summed.
    SumOverflow,
}

impl fmt::Display for IncrementErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncrementErr::EmptyClassSet => write!(f, "there are no classes to split in tasks"),
            IncrementErr::NonPositiveIncrement { task } => {
                write!(f, "the increment of task {task} must be greater than 0")
            }
            IncrementErr::IndivisibleIncrement {
                remaining,
                increment,
            } => write!(
                f,
                "{remaining} classes cannot be split in tasks of {increment} classes"
            ),
            IncrementErr::InitialIncrementTooLarge { initial, classes } => write!(
                f,
                "the initial increment ({initial}) exceeds the number of classes ({classes})"
            ),
            IncrementErr::SumMismatch { sum, classes } => write!(
                f,
                "the increments sum up to {sum} but there are {classes} classes"
            ),
            IncrementErr::NonContiguousClasses { missing } => {
                write!(f, "the class labels are not contiguous, {missing} is missing")
            }
            IncrementErr::LabelOverflow { label } => {
                write!(f, "class label {label} is too large to bound a task")
            }
            IncrementErr::SumOverflow => write!(f, "the increments overflow when summed"),
        }
    }
}

impl Error for IncrementErr {}

/// Failures of scenario construction and data access.
#[derive(Debug)]
pub enum ScenarioErr {
    InvalidIncrement(IncrementErr),
    TaskOutOfBounds { task_id: usize, nb_tasks: usize },
    SampleOutOfBounds { index: usize, len: usize },
    LengthMismatch { xs: usize, ys: usize },
    InvalidValSplit(f64),
    /// A sample's label is outside every task of a reused plan.
    UnplannedClass { label: ClassLabel },
    MissingTestSplit,
    Config(serde_json::Error),
}

impl ScenarioErr {
    /// Whether this error comes from an inconsistent increment specification.
    pub fn is_invalid_increment(&self) -> bool {
        matches!(self, ScenarioErr::InvalidIncrement(_))
    }

    /// Whether this error comes from an out of range task or sample index.
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            ScenarioErr::TaskOutOfBounds { .. } | ScenarioErr::SampleOutOfBounds { .. }
        )
    }
}

impl fmt::Display for ScenarioErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioErr::InvalidIncrement(e) => write!(f, "invalid increment: {e}"),
            ScenarioErr::TaskOutOfBounds { task_id, nb_tasks } => {
                write!(f, "task {task_id} is out of bounds, there are {nb_tasks} tasks")
            }
            ScenarioErr::SampleOutOfBounds { index, len } => {
                write!(f, "sample index {index} is out of bounds for length {len}")
            }
            ScenarioErr::LengthMismatch { xs, ys } => {
                write!(f, "got {xs} features but {ys} labels")
            }
            ScenarioErr::InvalidValSplit(split) => {
                write!(f, "the validation split must be within [0, 1], got {split}")
            }
            ScenarioErr::UnplannedClass { label } => {
                write!(f, "class {label} is not introduced by any task")
            }
            ScenarioErr::MissingTestSplit => write!(f, "the dataset has no test split"),
            ScenarioErr::Config(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl Error for ScenarioErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScenarioErr::InvalidIncrement(e) => Some(e),
            ScenarioErr::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IncrementErr> for ScenarioErr {
    fn from(value: IncrementErr) -> Self {
        Self::InvalidIncrement(value)
    }
}

impl From<serde_json::Error> for ScenarioErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value)
    }
}
