use std::num::NonZeroUsize;

use rand::{Rng, seq::SliceRandom};

use super::dataset::LabeledDataset;
use crate::{ClassLabel, Result};

/// A batch of borrowed features with their labels.
#[derive(Debug)]
pub struct Batch<'a, X> {
    pub xs: Vec<&'a X>,
    pub ys: Vec<ClassLabel>,
}

impl<X> Batch<'_, X> {
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Walks any labeled dataset in batches of at most `batch_size` samples.
#[derive(Debug)]
pub struct DataLoader<'a, D> {
    dataset: &'a D,
    order: Vec<usize>,
    batch_size: NonZeroUsize,
    cursor: usize,
}

impl<'a, D: LabeledDataset> DataLoader<'a, D> {
    /// Creates a loader yielding samples in dataset order.
    pub fn new(dataset: &'a D, batch_size: NonZeroUsize) -> Self {
        let order = (0..dataset.len()).collect();
        Self {
            dataset,
            order,
            batch_size,
            cursor: 0,
        }
    }

    /// Creates a loader yielding samples in an order drawn from `rng`.
    pub fn shuffled<R>(dataset: &'a D, batch_size: NonZeroUsize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut loader = Self::new(dataset, batch_size);
        loader.order.shuffle(rng);
        loader
    }

    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Number of batches in a full pass.
    #[inline]
    pub fn num_batches(&self) -> usize {
        self.order.len().div_ceil(self.batch_size.get())
    }

    /// Rewinds the loader to its first batch, keeping its sample order.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Returns the next batch, or `None` once the pass is exhausted.
    pub fn next_batch(&mut self) -> Option<Result<Batch<'a, D::Feature>>> {
        if self.cursor >= self.order.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size.get()).min(self.order.len());
        let range = self.cursor..end;
        self.cursor = end;

        let dataset = self.dataset;
        let mut xs = Vec::with_capacity(range.len());
        let mut ys = Vec::with_capacity(range.len());

        for &i in &self.order[range] {
            match dataset.get(i) {
                Ok(sample) => {
                    xs.push(sample.x);
                    ys.push(sample.y);
                }
                Err(e) => return Some(Err(e)),
            }
        }

        Some(Ok(Batch { xs, ys }))
    }
}

impl<'a, D: LabeledDataset> Iterator for DataLoader<'a, D> {
    type Item = Result<Batch<'a, D::Feature>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::InMemoryDataset;

    fn dataset() -> InMemoryDataset<f32> {
        InMemoryDataset::new(
            (0..7).map(|i| i as f32).collect(),
            (0..7).map(|i| i + 100).collect(),
        )
        .unwrap()
    }

    #[test]
    fn dataloader_batches_respect_batch_size() {
        let ds = dataset();
        let mut dl = DataLoader::new(&ds, NonZeroUsize::new(3).unwrap());
        assert_eq!(dl.num_batches(), 3);

        let b1 = dl.next_batch().unwrap().unwrap();
        assert_eq!(b1.xs, vec![&0.0, &1.0, &2.0]);
        assert_eq!(b1.ys, vec![100, 101, 102]);

        let b2 = dl.next_batch().unwrap().unwrap();
        assert_eq!(b2.len(), 3);

        let b3 = dl.next_batch().unwrap().unwrap();
        assert_eq!(b3.xs, vec![&6.0]);
        assert_eq!(b3.ys, vec![106]);

        assert!(dl.next_batch().is_none());

        dl.reset();
        let b4 = dl.next_batch().unwrap().unwrap();
        assert_eq!(b4.ys, vec![100, 101, 102]);
    }

    #[test]
    fn shuffled_dataloader_visits_every_sample_once() {
        let ds = dataset();
        let mut rng = StdRng::seed_from_u64(42);
        let dl = DataLoader::shuffled(&ds, NonZeroUsize::new(2).unwrap(), &mut rng);

        let mut seen: Vec<ClassLabel> = dl.flat_map(|b| b.unwrap().ys).collect();
        seen.sort_unstable();
        assert_eq!(seen, (100..107).collect::<Vec<_>>());
    }

    #[test]
    fn empty_dataset_yields_no_batches() {
        let ds = InMemoryDataset::<f32>::new(vec![], vec![]).unwrap();
        let mut dl = DataLoader::new(&ds, NonZeroUsize::new(4).unwrap());
        assert_eq!(dl.num_batches(), 0);
        assert!(dl.next_batch().is_none());
    }
}
