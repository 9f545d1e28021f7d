use std::borrow::Cow;

use rand::{Rng, seq::SliceRandom};

use super::dataset::{LabeledDataset, Sample};
use crate::{ClassLabel, Result, ScenarioErr};

/// A borrowed restriction of a dataset to a list of its sample indices.
#[derive(Debug)]
pub struct Subset<'a, D> {
    parent: &'a D,
    indices: Vec<usize>,
}

impl<'a, D: LabeledDataset> Subset<'a, D> {
    /// Restricts `parent` to `indices`, in the given order.
    ///
    /// # Errors
    /// Returns `ScenarioErr::SampleOutOfBounds` if an index is past the parent's end.
    pub fn new(parent: &'a D, indices: Vec<usize>) -> Result<Self> {
        let len = parent.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(ScenarioErr::SampleOutOfBounds { index, len });
        }

        Ok(Self { parent, indices })
    }

    /// Positions of this subset's samples within the parent.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl<D> Clone for Subset<'_, D> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent,
            indices: self.indices.clone(),
        }
    }
}

impl<D: LabeledDataset> LabeledDataset for Subset<'_, D> {
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

        self.parent.get(i)
    }

    fn labels(&self) -> Result<Cow<'_, [ClassLabel]>> {
        let labels = self.parent.labels()?;
        Ok(Cow::Owned(self.indices.iter().map(|&i| labels[i]).collect()))
    }
}

/// Randomly splits `dataset` into a train and a validation subset.
///
/// The validation subset holds `floor(val_split * len)` samples and the train
/// subset the rest. Every sample lands in exactly one of them.
///
/// # Errors
/// Returns `ScenarioErr::InvalidValSplit` if `val_split` is not within `[0, 1]`.
pub fn split_train_val<'a, D, R>(
    dataset: &'a D,
    val_split: f64,
    rng: &mut R,
) -> Result<(Subset<'a, D>, Subset<'a, D>)>
where
    D: LabeledDataset,
    R: Rng + ?Sized,
{
    if !(0.0..=1.0).contains(&val_split) {
        return Err(ScenarioErr::InvalidValSplit(val_split));
    }

    let len = dataset.len();
    let nb_val = ((val_split * len as f64) as usize).min(len);

    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    let train_indices = indices.split_off(nb_val);

    log::debug!(train = train_indices.len(), val = indices.len(); "split dataset");

    let train = Subset {
        parent: dataset,
        indices: train_indices,
    };
    let val = Subset {
        parent: dataset,
        indices,
    };

    Ok((train, val))
}
