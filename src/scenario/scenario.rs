use std::{iter::FusedIterator, slice, sync::Arc};

use log::{debug, info};

use super::{
    plan::{IncrementSpec, TaskPlan, compute_plan},
    view::{TaskView, select},
};
use crate::{
    ClassLabel, Result, ScenarioErr,
    data::{InMemoryDataset, LabeledDataset, Split},
};

/// A dataset split in an ordered sequence of class-incremental tasks.
///
/// The labels are read once at construction. The wrapped dataset must not
/// change its labels afterwards, views are computed from that snapshot.
#[derive(Debug)]
pub struct TaskScenario<D> {
    dataset: Arc<D>,
    labels: Arc<[ClassLabel]>,
    plan: TaskPlan,
    tasks: Vec<TaskView<D>>,
}

impl<D: LabeledDataset> TaskScenario<D> {
    /// Splits `dataset` in tasks following `spec`.
    ///
    /// # Errors
    /// Returns `ScenarioErr::InvalidIncrement` if `spec` does not fit the
    /// dataset's classes. No scenario is built in that case.
    pub fn new(dataset: D, spec: IncrementSpec) -> Result<Self> {
        Self::from_shared(Arc::new(dataset), spec)
    }

    /// Same as `new`, for a dataset that is already shared.
    pub fn from_shared(dataset: Arc<D>, spec: IncrementSpec) -> Result<Self> {
        let labels: Arc<[ClassLabel]> = dataset.labels()?.into_owned().into();
        let plan = compute_plan(labels.iter().copied(), &spec)?;
        Self::build(dataset, labels, plan)
    }

    /// Splits `dataset` along a plan computed elsewhere, usually on the
    /// train split of the same data.
    ///
    /// Tasks may end up empty when the dataset lacks some of their classes.
    ///
    /// # Errors
    /// Returns `ScenarioErr::UnplannedClass` if a label falls outside every task.
    pub fn from_plan(dataset: Arc<D>, plan: TaskPlan) -> Result<Self> {
        let labels: Arc<[ClassLabel]> = dataset.labels()?.into_owned().into();
        Self::build(dataset, labels, plan)
    }

    fn build(dataset: Arc<D>, labels: Arc<[ClassLabel]>, plan: TaskPlan) -> Result<Self> {
        let mut selected = vec![(Vec::new(), Vec::new()); plan.nb_tasks()];
        for (i, &y) in labels.iter().enumerate() {
            let task = plan
                .task_of(y)
                .ok_or(ScenarioErr::UnplannedClass { label: y })?;
            let (indices, ys) = &mut selected[task];
            indices.push(i);
            ys.push(y);
        }

        let tasks: Vec<_> = plan
            .iter()
            .zip(selected)
            .enumerate()
            .map(|(task_id, (classes, (indices, ys)))| {
                debug!(task_id = task_id, samples = indices.len(); "task classes {classes:?}");
                TaskView::from_parts(Arc::clone(&dataset), classes, indices, ys)
            })
            .collect();

        info!(
            "built scenario: {} task(s) over {} sample(s), classes {:?}",
            tasks.len(),
            labels.len(),
            plan.classes()
        );

        Ok(Self {
            dataset,
            labels,
            plan,
            tasks,
        })
    }

    /// Every class introduced up to and including `task_id`.
    ///
    /// # Errors
    /// Returns `ScenarioErr::TaskOutOfBounds` if there is no such task.
    pub fn seen_classes(&self, task_id: usize) -> Result<TaskView<D>> {
        let last = self.task_range(task_id)?;
        let classes = self.plan.classes().start..last.end;

        let (indices, ys) = select(&self.labels, &classes);
        Ok(TaskView::from_parts(
            Arc::clone(&self.dataset),
            classes,
            indices,
            ys,
        ))
    }
}

impl<X> TaskScenario<InMemoryDataset<X>> {
    /// Splits one split of `dataset` in tasks.
    ///
    /// The plan always comes from the train split's classes, so the train and
    /// test scenarios of a dataset share their task bounds.
    ///
    /// # Errors
    /// Returns `ScenarioErr::InvalidIncrement` if `spec` does not fit the
    /// train classes, `ScenarioErr::MissingTestSplit` if `split` is
    /// `Split::Test` and there is none, and `ScenarioErr::UnplannedClass` if
    /// the test split has a class the train split lacks.
    pub fn with_split(
        dataset: InMemoryDataset<X>,
        spec: IncrementSpec,
        split: Split,
    ) -> Result<Self> {
        let plan = compute_plan(dataset.ys().iter().copied(), &spec)?;
        debug!(split:? = split; "planned {} task(s) from the train split", plan.nb_tasks());

        Self::from_plan(Arc::new(dataset.into_split(split)?), plan)
    }
}

impl<D> TaskScenario<D> {
    #[inline]
    pub fn nb_tasks(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn plan(&self) -> &TaskPlan {
        &self.plan
    }

    #[inline]
    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }

    /// The view of `task_id`, identical to the one yielded by `iter`.
    ///
    /// # Errors
    /// Returns `ScenarioErr::TaskOutOfBounds` if there is no such task.
    pub fn task(&self, task_id: usize) -> Result<TaskView<D>> {
        self.tasks
            .get(task_id)
            .cloned()
            .ok_or(ScenarioErr::TaskOutOfBounds {
                task_id,
                nb_tasks: self.nb_tasks(),
            })
    }

    /// Iterates over the tasks in order. Each call starts from the first task.
    pub fn iter(&self) -> Tasks<'_, D> {
        Tasks {
            inner: self.tasks.iter(),
        }
    }

    fn task_range(&self, task_id: usize) -> Result<std::ops::Range<ClassLabel>> {
        self.plan.get(task_id).ok_or(ScenarioErr::TaskOutOfBounds {
            task_id,
            nb_tasks: self.nb_tasks(),
        })
    }
}

impl<'a, D> IntoIterator for &'a TaskScenario<D> {
    type Item = TaskView<D>;
    type IntoIter = Tasks<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the task views of a scenario.
#[derive(Debug)]
pub struct Tasks<'a, D> {
    inner: slice::Iter<'a, TaskView<D>>,
}

impl<D> Clone for Tasks<'_, D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D> Iterator for Tasks<'_, D> {
    type Item = TaskView<D>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<D> DoubleEndedIterator for Tasks<'_, D> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().cloned()
    }
}

impl<D> ExactSizeIterator for Tasks<'_, D> {}

impl<D> FusedIterator for Tasks<'_, D> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IncrementErr, InMemoryDataset};

    /// Two samples per class, classes `0..10`, labels interleaved.
    fn dataset() -> InMemoryDataset<usize> {
        let ys: Vec<ClassLabel> = (0..20).map(|i| (i % 10) as ClassLabel).collect();
        InMemoryDataset::new((0..20).collect(), ys).unwrap()
    }

    #[test]
    fn scenario_tasks_cover_their_class_range() {
        let scenario = TaskScenario::new(dataset(), IncrementSpec::Uniform { increment: 2 }).unwrap();
        assert_eq!(scenario.nb_tasks(), 5);

        for (task_id, view) in scenario.iter().enumerate() {
            let classes = view.classes();
            assert_eq!(classes, (2 * task_id as ClassLabel)..(2 * task_id as ClassLabel + 2));
            assert_eq!(view.len(), 4);
            assert_eq!(view.ys().iter().min(), Some(&classes.start));
            assert_eq!(view.ys().iter().max(), Some(&(classes.end - 1)));
        }
    }

    #[test]
    fn scenario_views_keep_dataset_order() {
        let scenario = TaskScenario::new(dataset(), IncrementSpec::Uniform { increment: 5 }).unwrap();
        let first = scenario.task(0).unwrap();

        assert_eq!(first.indices(), &[0, 1, 2, 3, 4, 10, 11, 12, 13, 14]);
        assert_eq!(first.ys(), &[0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn indexed_access_matches_iteration() {
        let spec = IncrementSpec::Explicit {
            increments: vec![5, 1, 1, 3],
        };
        let scenario = TaskScenario::new(dataset(), spec).unwrap();

        for (task_id, view) in scenario.iter().enumerate() {
            let indexed = scenario.task(task_id).unwrap();
            assert_eq!(indexed.classes(), view.classes());
            assert_eq!(indexed.indices(), view.indices());
        }

        let err = scenario.task(4).unwrap_err();
        assert!(matches!(
            err,
            ScenarioErr::TaskOutOfBounds {
                task_id: 4,
                nb_tasks: 4
            }
        ));
    }

    #[test]
    fn iterations_are_independent() {
        let scenario = TaskScenario::new(dataset(), IncrementSpec::Uniform { increment: 2 }).unwrap();

        let mut a = scenario.iter();
        let mut b = scenario.iter();
        a.next();
        a.next();

        assert_eq!(b.next().unwrap().classes(), 0..2);
        assert_eq!(a.next().unwrap().classes(), 4..6);
        assert_eq!(a.len(), 2);
        assert_eq!(scenario.iter().count(), 5);
        assert_eq!((&scenario).into_iter().count(), 5);
    }

    #[test]
    fn seen_classes_accumulate_tasks() {
        let spec = IncrementSpec::UniformWithInitial {
            initial: 4,
            increment: 2,
        };
        let scenario = TaskScenario::new(dataset(), spec).unwrap();

        let seen = scenario.seen_classes(0).unwrap();
        assert_eq!(seen.classes(), 0..4);
        assert_eq!(seen.len(), 8);

        let seen = scenario.seen_classes(2).unwrap();
        assert_eq!(seen.classes(), 0..8);
        assert_eq!(seen.len(), 16);

        assert!(scenario.seen_classes(4).unwrap_err().is_index_error());
    }

    #[test]
    fn invalid_spec_fails_construction() {
        let res = TaskScenario::new(dataset(), IncrementSpec::Uniform { increment: 3 });
        assert!(matches!(
            res,
            Err(ScenarioErr::InvalidIncrement(
                IncrementErr::IndivisibleIncrement { .. }
            ))
        ));
    }

    #[test]
    fn empty_dataset_fails_construction() {
        let ds = InMemoryDataset::<usize>::new(vec![], vec![]).unwrap();
        let res = TaskScenario::new(ds, IncrementSpec::Uniform { increment: 1 });
        assert!(matches!(
            res,
            Err(ScenarioErr::InvalidIncrement(IncrementErr::EmptyClassSet))
        ));
    }

    #[test]
    fn test_split_reuses_the_train_plan() {
        let test_ys: Vec<ClassLabel> = vec![9, 0, 4, 5, 1];
        let ds = dataset().with_test(vec![0; 5], test_ys).unwrap();
        let spec = IncrementSpec::UniformWithInitial {
            initial: 4,
            increment: 2,
        };

        let train = TaskScenario::with_split(ds.clone(), spec.clone(), Split::Train).unwrap();
        let test = TaskScenario::with_split(ds, spec, Split::Test).unwrap();

        assert_eq!(train.plan(), test.plan());
        assert_eq!(test.nb_tasks(), 4);
        assert_eq!(test.dataset().len(), 5);

        let ys: Vec<Vec<ClassLabel>> = test.iter().map(|view| view.ys().to_vec()).collect();
        assert_eq!(ys, vec![vec![0, 1], vec![4, 5], vec![], vec![9]]);
        for (train_view, test_view) in train.iter().zip(test.iter()) {
            assert_eq!(train_view.classes(), test_view.classes());
        }
    }

    #[test]
    fn test_split_errors() {
        let spec = IncrementSpec::Uniform { increment: 5 };

        let res = TaskScenario::with_split(dataset(), spec.clone(), Split::Test);
        assert!(matches!(res, Err(ScenarioErr::MissingTestSplit)));

        let ds = dataset().with_test(vec![0, 1], vec![3, 10]).unwrap();
        let res = TaskScenario::with_split(ds, spec, Split::Test);
        assert!(matches!(res, Err(ScenarioErr::UnplannedClass { label: 10 })));
    }

    #[test]
    fn failing_label_reads_abort_construction() {
        struct Unreadable;

        impl LabeledDataset for Unreadable {
            type Feature = ();

            fn len(&self) -> usize {
                3
            }

            fn get(&self, index: usize) -> Result<crate::Sample<'_, ()>> {
                if index == 1 {
                    return Err(ScenarioErr::SampleOutOfBounds { index, len: 3 });
                }
                Ok(crate::Sample {
                    x: &(),
                    y: index as ClassLabel,
                })
            }
        }

        let res = TaskScenario::new(Unreadable, IncrementSpec::Uniform { increment: 1 });
        assert!(matches!(
            res,
            Err(ScenarioErr::SampleOutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn shared_dataset_is_not_copied() {
        let ds = Arc::new(dataset());
        let scenario =
            TaskScenario::from_shared(Arc::clone(&ds), IncrementSpec::Uniform { increment: 5 }).unwrap();

        assert!(Arc::ptr_eq(scenario.dataset(), &ds));
        assert!(Arc::ptr_eq(scenario.task(1).unwrap().dataset(), &ds));
    }
}
