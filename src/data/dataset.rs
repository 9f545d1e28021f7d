use std::borrow::Cow;

use crate::{ClassLabel, Result, ScenarioErr};

/// A single labeled sample, borrowing its feature from the dataset.
#[derive(Debug, PartialEq)]
pub struct Sample<'a, X> {
    pub x: &'a X,
    pub y: ClassLabel,
}

impl<X> Clone for Sample<'_, X> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<X> Copy for Sample<'_, X> {}

/// A finite collection of `(feature, label)` pairs addressable by index.
///
/// Implementors only provide *access* to samples. Batching, shuffling and
/// task filtering are layered on top by the rest of the crate.
pub trait LabeledDataset {
    /// Feature type of every sample.
    type Feature;

    /// Returns the number of samples.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetches the sample at `index`.
    ///
    /// # Errors
    /// Returns `ScenarioErr::SampleOutOfBounds` if `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Sample<'_, Self::Feature>>;

    /// Returns the label of every sample, in sample order.
    ///
    /// # Errors
    /// Propagates the first failing `get`.
    fn labels(&self) -> Result<Cow<'_, [ClassLabel]>> {
        (0..self.len())
            .map(|i| self.get(i).map(|s| s.y))
            .collect::<Result<Vec<_>>>()
            .map(Cow::Owned)
    }
}

/// Which half of a train/test dataset to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Split {
    #[default]
    Train,
    Test,
}

/// A dataset holding its features and labels in memory.
///
/// The samples it exposes are the train split. A test split of the same
/// classes can be attached with `with_test` and taken with `into_split`.
#[derive(Debug, Clone)]
pub struct InMemoryDataset<X> {
    xs: Vec<X>,
    ys: Vec<ClassLabel>,
    test: Option<Box<InMemoryDataset<X>>>,
}

impl<X> InMemoryDataset<X> {
    /// Creates a new dataset from owned buffers.
    ///
    /// # Errors
    /// Returns `ScenarioErr::LengthMismatch` if `xs.len() != ys.len()`.
    pub fn new(xs: Vec<X>, ys: Vec<ClassLabel>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(ScenarioErr::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }

        Ok(Self { xs, ys, test: None })
    }

    /// Attaches a test split, replacing any previous one.
    ///
    /// # Errors
    /// Returns `ScenarioErr::LengthMismatch` if `xs.len() != ys.len()`.
    pub fn with_test(mut self, xs: Vec<X>, ys: Vec<ClassLabel>) -> Result<Self> {
        self.test = Some(Box::new(Self::new(xs, ys)?));
        Ok(self)
    }

    #[inline]
    pub fn test_split(&self) -> Option<&Self> {
        self.test.as_deref()
    }

    /// Keeps only the requested split.
    ///
    /// # Errors
    /// Returns `ScenarioErr::MissingTestSplit` when asking for a test split
    /// that was never attached.
    pub fn into_split(self, split: Split) -> Result<Self> {
        match split {
            Split::Train => Ok(Self {
                test: None,
                ..self
            }),
            Split::Test => self
                .test
                .map(|test| *test)
                .ok_or(ScenarioErr::MissingTestSplit),
        }
    }

    #[inline]
    pub fn xs(&self) -> &[X] {
        &self.xs
    }

    #[inline]
    pub fn ys(&self) -> &[ClassLabel] {
        &self.ys
    }
}

impl<X> LabeledDataset for InMemoryDataset<X> {
    type Feature = X;

    #[inline]
    fn len(&self) -> usize {
        self.xs.len()
    }

    fn get(&self, index: usize) -> Result<Sample<'_, X>> {
        let x = self.xs.get(index).ok_or(ScenarioErr::SampleOutOfBounds {
            index,
            len: self.len(),
        })?;

        Ok(Sample {
            x,
            y: self.ys[index],
        })
    }

    #[inline]
    fn labels(&self) -> Result<Cow<'_, [ClassLabel]>> {
        Ok(Cow::Borrowed(&self.ys))
    }
}
