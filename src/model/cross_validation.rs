//! K-fold cross-validation
//!
//! Rows are optionally shuffled, then cut into `n_splits` consecutive
//! folds; the first `n % n_splits` folds hold one extra row. Each fold is
//! held out once while a fresh classifier trains on the others.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, ClassifierConfig};
use crate::color::Dataset;
use crate::{ClassifierError, Result};

/// K-fold splitter
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: Option<u64>,
}

/// Per-fold accuracies of one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationResult {
    pub scores: Vec<f64>,
}

impl CrossValidationResult {
    /// Mean accuracy across folds
    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            seed: None,
        }
    }

    /// Shuffle rows before assigning folds
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Fix the shuffle; without a seed every split draws a new permutation
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Train/test index pairs, one per fold
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 || n_samples < self.n_splits {
            return Err(ClassifierError::InsufficientSamples {
                samples: n_samples,
                folds: self.n_splits,
            });
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            match self.seed {
                Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
                None => indices.shuffle(&mut rand::thread_rng()),
            }
        }

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let end = start + fold_size + usize::from(i < remainder);

            let test = indices[start..end].to_vec();
            let mut train = Vec::with_capacity(n_samples - test.len());
            train.extend_from_slice(&indices[..start]);
            train.extend_from_slice(&indices[end..]);

            folds.push((train, test));
            start = end;
        }

        Ok(folds)
    }
}

/// Fraction of exact label matches
pub fn accuracy(predicted: &[i32], truth: &[i32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = predicted
        .iter()
        .zip(truth)
        .filter(|(p, t)| p == t)
        .count();
    hits as f64 / truth.len() as f64
}

/// Cross-validate one configuration on `dataset`
pub fn cross_validate(
    config: &ClassifierConfig,
    dataset: &Dataset,
    kfold: &KFold,
) -> Result<CrossValidationResult> {
    let folds = kfold.split(dataset.len())?;
    let mut scores = Vec::with_capacity(folds.len());

    for (train_idx, test_idx) in folds {
        let (x_train, y_train) = select(dataset, &train_idx);
        let (x_test, y_test) = select(dataset, &test_idx);

        let model = Classifier::fit(config, &x_train, &y_train)?;
        let predicted = model.predict(&x_test)?;
        scores.push(accuracy(&predicted, &y_test));
    }

    Ok(CrossValidationResult { scores })
}

fn select(dataset: &Dataset, indices: &[usize]) -> (Vec<[f32; 3]>, Vec<i32>) {
    let features = indices.iter().map(|&i| dataset.features[i]).collect();
    let labels = indices.iter().map(|&i| dataset.labels[i]).collect();
    (features, labels)
}
