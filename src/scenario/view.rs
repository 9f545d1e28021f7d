use std::{borrow::Cow, ops::Range, sync::Arc};

use crate::{
    ClassLabel, Result, ScenarioErr,
    data::{LabeledDataset, Sample},
};

/// A read-only restriction of a dataset to the samples of a class range.
///
/// Sample order follows the parent dataset. Cloning a view is cheap, the
/// parent and the selected indices are shared.
#[derive(Debug)]
pub struct TaskView<D> {
    dataset: Arc<D>,
    classes: Range<ClassLabel>,
    indices: Arc<[usize]>,
    ys: Arc<[ClassLabel]>,
}

impl<D: LabeledDataset> TaskView<D> {
    /// Selects the samples of `dataset` whose label lies in `classes`.
    ///
    /// # Errors
    /// Propagates a failure to read the dataset's labels.
    pub fn new(dataset: Arc<D>, classes: Range<ClassLabel>) -> Result<Self> {
        let labels = dataset.labels()?;
        let (indices, ys) = select(&labels, &classes);
        drop(labels);

        Ok(Self::from_parts(dataset, classes, indices, ys))
    }
}

impl<D> TaskView<D> {
    pub(crate) fn from_parts(
        dataset: Arc<D>,
        classes: Range<ClassLabel>,
        indices: Vec<usize>,
        ys: Vec<ClassLabel>,
    ) -> Self {
        Self {
            dataset,
            classes,
            indices: indices.into(),
            ys: ys.into(),
        }
    }

    /// The class range this view was built from.
    #[inline]
    pub fn classes(&self) -> Range<ClassLabel> {
        self.classes.clone()
    }

    /// Positions of the selected samples within the parent dataset.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Labels of the selected samples only.
    #[inline]
    pub fn ys(&self) -> &[ClassLabel] {
        &self.ys
    }

    #[inline]
    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }
}

impl<D> Clone for TaskView<D> {
    fn clone(&self) -> Self {
        Self {
            dataset: Arc::clone(&self.dataset),
            classes: self.classes.clone(),
            indices: Arc::clone(&self.indices),
            ys: Arc::clone(&self.ys),
        }
    }
}

impl<D: LabeledDataset> LabeledDataset for TaskView<D> {
    type Feature = D::Feature;

    #[inline]
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn get(&self, index: usize) -> Result<Sample<'_, D::Feature>> {
        let &i = self.indices.get(index).ok_or(ScenarioErr::SampleOutOfBounds {
            index,
            len: self.len(),
        })?;

        self.dataset.get(i)
    }

    #[inline]
    fn labels(&self) -> Result<Cow<'_, [ClassLabel]>> {
        Ok(Cow::Borrowed(&self.ys))
    }
}

/// Positions and labels of the entries of `labels` that fall in `classes`.
pub(crate) fn select(
    labels: &[ClassLabel],
    classes: &Range<ClassLabel>,
) -> (Vec<usize>, Vec<ClassLabel>) {
    labels
        .iter()
        .enumerate()
        .filter(|(_, y)| classes.contains(*y))
        .map(|(i, &y)| (i, y))
        .unzip()
}
