use std::{collections::BTreeSet, ops::Range};

use crate::{ClassLabel, IncrementErr, Result};

/// How many new classes each task introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrementSpec {
    /// Every task has `increment` classes.
    Uniform { increment: usize },
    /// The first task has `initial` classes, every other task `increment`.
    UniformWithInitial { initial: usize, increment: usize },
    /// Task `i` has `increments[i]` classes.
    Explicit { increments: Vec<usize> },
}

impl IncrementSpec {
    /// Resolves the per-task class counts for `classes` distinct classes.
    ///
    /// # Errors
    /// Returns an `IncrementErr` if the counts cannot cover exactly `classes` classes.
    pub fn increments(&self, classes: usize) -> std::result::Result<Vec<usize>, IncrementErr> {
        match *self {
            IncrementSpec::Uniform { increment } => {
                if increment == 0 {
                    return Err(IncrementErr::NonPositiveIncrement { task: 0 });
                }
                uniform(classes, increment)
            }
            IncrementSpec::UniformWithInitial { initial, increment } => {
                if initial == 0 {
                    return Err(IncrementErr::NonPositiveIncrement { task: 0 });
                }
                if increment == 0 {
                    return Err(IncrementErr::NonPositiveIncrement { task: 1 });
                }
                if initial > classes {
                    return Err(IncrementErr::InitialIncrementTooLarge { initial, classes });
                }

                let mut increments = vec![initial];
                increments.extend(uniform(classes - initial, increment)?);
                Ok(increments)
            }
            IncrementSpec::Explicit { ref increments } => {
                if let Some(task) = increments.iter().position(|&s| s == 0) {
                    return Err(IncrementErr::NonPositiveIncrement { task });
                }

                let sum = increments
                    .iter()
                    .try_fold(0usize, |acc, &s| acc.checked_add(s))
                    .ok_or(IncrementErr::SumOverflow)?;
                if sum != classes {
                    return Err(IncrementErr::SumMismatch { sum, classes });
                }
                Ok(increments.clone())
            }
        }
    }
}

fn uniform(remaining: usize, increment: usize) -> std::result::Result<Vec<usize>, IncrementErr> {
    if remaining % increment != 0 {
        return Err(IncrementErr::IndivisibleIncrement {
            remaining,
            increment,
        });
    }

    Ok(vec![increment; remaining / increment])
}

/// The class range of every task, in task order.
///
/// Ranges are contiguous, non-empty and together cover every class of the
/// dataset the plan was computed from exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPlan {
    bounds: Vec<Range<ClassLabel>>,
}

impl TaskPlan {
    #[inline]
    pub fn nb_tasks(&self) -> usize {
        self.bounds.len()
    }

    /// Class range of `task_id`, `None` if there is no such task.
    #[inline]
    pub fn get(&self, task_id: usize) -> Option<Range<ClassLabel>> {
        self.bounds.get(task_id).cloned()
    }

    #[inline]
    pub fn bounds(&self) -> &[Range<ClassLabel>] {
        &self.bounds
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Range<ClassLabel>> + '_ {
        self.bounds.iter().cloned()
    }

    /// Number of classes introduced by each task.
    pub fn increments(&self) -> Vec<usize> {
        self.bounds.iter().map(|r| r.len()).collect()
    }

    /// Every class covered by the plan.
    pub fn classes(&self) -> Range<ClassLabel> {
        match (self.bounds.first(), self.bounds.last()) {
            (Some(first), Some(last)) => first.start..last.end,
            _ => 0..0,
        }
    }

    /// Index of the task that introduces `label`.
    pub fn task_of(&self, label: ClassLabel) -> Option<usize> {
        let task = self.bounds.partition_point(|r| r.end <= label);
        self.bounds
            .get(task)
            .filter(|r| r.contains(&label))
            .map(|_| task)
    }
}

/// Splits `distinct_classes` in tasks according to `spec`.
///
/// The input order and duplicates do not matter, labels are sorted first.
///
/// # Errors
/// Returns `ScenarioErr::InvalidIncrement` if the class set is empty, has a
/// gap, or cannot be covered exactly by `spec`.
pub fn compute_plan<I>(distinct_classes: I, spec: &IncrementSpec) -> Result<TaskPlan>
where
    I: IntoIterator<Item = ClassLabel>,
{
    let classes: BTreeSet<ClassLabel> = distinct_classes.into_iter().collect();

    let (Some(&min_class), Some(&max_class)) = (classes.first(), classes.last()) else {
        return Err(IncrementErr::EmptyClassSet.into());
    };

    if (max_class - min_class) as usize + 1 != classes.len() {
        let missing = classes
            .iter()
            .zip(min_class..)
            .find(|(got, expected)| *got != expected)
            .map_or(max_class, |(_, expected)| expected);
        return Err(IncrementErr::NonContiguousClasses { missing }.into());
    }

    if max_class == ClassLabel::MAX {
        return Err(IncrementErr::LabelOverflow { label: max_class }.into());
    }

    let increments = spec.increments(classes.len())?;
    log::debug!(min_class = min_class, classes = classes.len(); "resolved increments {increments:?}");

    let mut start = min_class;
    let bounds = increments
        .into_iter()
        .map(|size| {
            let end = start + size as ClassLabel;
            let range = start..end;
            start = end;
            range
        })
        .collect();

    Ok(TaskPlan { bounds })
}
