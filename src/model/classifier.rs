//! Classifier configurations and OpenCV-backed models
//!
//! [`ClassifierGrid`] enumerates every configuration of the search: the
//! linear C-SVC cost/gamma grid first, then the KNN neighbor sweep. Each
//! configuration is a plain value; [`Classifier::fit`] builds a fresh model
//! from it, so nothing is shared between evaluations.

use opencv::{
    core::{Mat, Ptr, Scalar, CV_32FC1, CV_32SC1},
    ml::{self, KNearest, SVM},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::GridConfig;
use crate::{ClassifierError, Result};

/// Classifier family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    Svm,
    Knn,
}

/// One point of the parameter grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ClassifierConfig {
    /// Linear-kernel C-SVC
    Svm {
        #[serde(rename = "C")]
        c: f64,
        gamma: f64,
    },
    /// K-nearest-neighbor vote
    Knn {
        #[serde(rename = "K")]
        k: usize,
    },
}

impl ClassifierKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClassifierKind::Svm => "svm",
            ClassifierKind::Knn => "knn",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ClassifierConfig {
    pub fn kind(&self) -> ClassifierKind {
        match self {
            ClassifierConfig::Svm { .. } => ClassifierKind::Svm,
            ClassifierConfig::Knn { .. } => ClassifierKind::Knn,
        }
    }
}

impl fmt::Display for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierConfig::Svm { c, gamma } => write!(f, "SVM, C: {:.6}, gamma: {:.6}", c, gamma),
            ClassifierConfig::Knn { k } => write!(f, "KNN, K: {:.6}", *k as f64),
        }
    }
}

/// Ordered sequence of every grid configuration.
///
/// For each cost value all gamma values are visited, then every K.
#[derive(Debug, Clone)]
pub struct ClassifierGrid {
    c: Vec<f64>,
    gamma: Vec<f64>,
    k: Vec<usize>,
    position: usize,
}

impl ClassifierGrid {
    pub fn new(grid: &GridConfig) -> Self {
        Self {
            c: grid.svm_c.values(),
            gamma: grid.svm_gamma.values(),
            k: grid.knn_k.values().collect(),
            position: 0,
        }
    }

    fn svm_len(&self) -> usize {
        self.c.len() * self.gamma.len()
    }

    fn total_len(&self) -> usize {
        self.svm_len() + self.k.len()
    }
}

impl Iterator for ClassifierGrid {
    type Item = ClassifierConfig;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.position;
        if index >= self.total_len() {
            return None;
        }
        self.position += 1;

        let svm_len = self.svm_len();
        if index < svm_len {
            let per_c = self.gamma.len();
            Some(ClassifierConfig::Svm {
                c: self.c[index / per_c],
                gamma: self.gamma[index % per_c],
            })
        } else {
            Some(ClassifierConfig::Knn {
                k: self.k[index - svm_len],
            })
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ClassifierGrid {}

/// Fresh configuration sequence for `grid`
pub fn iterate_classifiers(grid: &GridConfig) -> ClassifierGrid {
    ClassifierGrid::new(grid)
}

/// Trained model
pub enum Classifier {
    Svm(Ptr<SVM>),
    Knn(Ptr<KNearest>),
    /// Training data held a single class
    SingleClass(i32),
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classifier::Svm(_) => f.write_str("Classifier::Svm"),
            Classifier::Knn(_) => f.write_str("Classifier::Knn"),
            Classifier::SingleClass(label) => write!(f, "Classifier::SingleClass({})", label),
        }
    }
}

impl Classifier {
    /// Train a new model for `config` on row-major samples
    pub fn fit(config: &ClassifierConfig, features: &[[f32; 3]], labels: &[i32]) -> Result<Self> {
        if features.is_empty() || features.len() != labels.len() {
            return Err(ClassifierError::data_shape(format!(
                "cannot train on {} samples with {} labels",
                features.len(),
                labels.len()
            )));
        }

        let first = labels[0];
        if labels.iter().all(|&label| label == first) {
            return Ok(Classifier::SingleClass(first));
        }

        let samples = sample_mat(features)?;
        let responses = label_mat(labels)?;

        match *config {
            ClassifierConfig::Svm { c, gamma } => {
                let mut svm = SVM::create().map_err(|e| ClassifierError::opencv("SVM create", e))?;
                svm.set_kernel(ml::SVM_LINEAR)
                    .map_err(|e| ClassifierError::opencv("SVM kernel", e))?;
                svm.set_type(ml::SVM_C_SVC)
                    .map_err(|e| ClassifierError::opencv("SVM type", e))?;
                svm.set_c(c).map_err(|e| ClassifierError::opencv("SVM cost", e))?;
                svm.set_gamma(gamma)
                    .map_err(|e| ClassifierError::opencv("SVM gamma", e))?;
                svm.train(&samples, ml::ROW_SAMPLE, &responses)
                    .map_err(|e| ClassifierError::opencv("SVM train", e))?;
                Ok(Classifier::Svm(svm))
            }
            ClassifierConfig::Knn { k } => {
                let mut knn =
                    KNearest::create().map_err(|e| ClassifierError::opencv("KNN create", e))?;
                knn.set_default_k(k as i32)
                    .map_err(|e| ClassifierError::opencv("KNN neighbor count", e))?;
                knn.set_is_classifier(true)
                    .map_err(|e| ClassifierError::opencv("KNN mode", e))?;
                knn.train(&samples, ml::ROW_SAMPLE, &responses)
                    .map_err(|e| ClassifierError::opencv("KNN train", e))?;
                Ok(Classifier::Knn(knn))
            }
        }
    }

    /// Predict one label per sample row
    pub fn predict(&self, features: &[[f32; 3]]) -> Result<Vec<i32>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        if let Classifier::SingleClass(label) = self {
            return Ok(vec![*label; features.len()]);
        }

        let samples = sample_mat(features)?;
        let mut results = Mat::default();
        match self {
            Classifier::SingleClass(_) => {}
            Classifier::Svm(svm) => {
                svm.predict(&samples, &mut results, 0)
                    .map_err(|e| ClassifierError::opencv("SVM predict", e))?;
            }
            Classifier::Knn(knn) => {
                knn.predict(&samples, &mut results, 0)
                    .map_err(|e| ClassifierError::opencv("KNN predict", e))?;
            }
        }

        let mut predicted = Vec::with_capacity(features.len());
        for row in 0..features.len() as i32 {
            let value = results
                .at_2d::<f32>(row, 0)
                .map_err(|e| ClassifierError::opencv("prediction access", e))?;
            predicted.push(value.round() as i32);
        }
        Ok(predicted)
    }
}

/// N x 3 float Mat, one sample per row
fn sample_mat(features: &[[f32; 3]]) -> Result<Mat> {
    let mut mat =
        Mat::new_rows_cols_with_default(features.len() as i32, 3, CV_32FC1, Scalar::all(0.0))
            .map_err(|e| ClassifierError::opencv("sample matrix allocation", e))?;
    for (row, sample) in features.iter().enumerate() {
        for (col, value) in sample.iter().enumerate() {
            *mat.at_2d_mut::<f32>(row as i32, col as i32)
                .map_err(|e| ClassifierError::opencv("sample matrix access", e))? = *value;
        }
    }
    Ok(mat)
}

/// N x 1 integer Mat of class responses
fn label_mat(labels: &[i32]) -> Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(labels.len() as i32, 1, CV_32SC1, Scalar::all(0.0))
        .map_err(|e| ClassifierError::opencv("label matrix allocation", e))?;
    for (row, label) in labels.iter().enumerate() {
        *mat.at_2d_mut::<i32>(row as i32, 0)
            .map_err(|e| ClassifierError::opencv("label matrix access", e))? = *label;
    }
    Ok(mat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KRange, LogRange};

    fn two_clusters() -> (Vec<[f32; 3]>, Vec<i32>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10 {
            let offset = i as f32;
            features.push([20.0 + offset, 30.0 + offset, 200.0 - offset]);
            labels.push(1);
            features.push([240.0 - offset, 235.0 - offset, 230.0 - offset]);
            labels.push(2);
        }
        (features, labels)
    }

    #[test]
    fn test_grid_order_and_length() {
        let configs: Vec<ClassifierConfig> = iterate_classifiers(&GridConfig::default()).collect();
        assert_eq!(configs.len(), 429);

        let svm_count = configs.iter().filter(|c| c.kind() == ClassifierKind::Svm).count();
        assert_eq!(svm_count, 400);
        assert!(configs[..400].iter().all(|c| c.kind() == ClassifierKind::Svm));
        assert!(configs[400..].iter().all(|c| c.kind() == ClassifierKind::Knn));

        match (configs[0], configs[1], configs[20]) {
            (
                ClassifierConfig::Svm { c: c0, gamma: g0 },
                ClassifierConfig::Svm { c: c1, gamma: g1 },
                ClassifierConfig::Svm { c: c20, gamma: g20 },
            ) => {
                assert!((c0 - 0.01).abs() < 1e-12);
                assert!((g0 - 0.001).abs() < 1e-12);
                assert_eq!(c0, c1);
                assert!(g1 > g0);
                assert!(c20 > c0);
                assert_eq!(g20, g0);
            }
            other => panic!("unexpected grid prefix: {:?}", other),
        }
        assert_eq!(configs[400], ClassifierConfig::Knn { k: 1 });
        assert_eq!(configs[428], ClassifierConfig::Knn { k: 29 });
    }

    #[test]
    fn test_grid_restarts_on_fresh_call() {
        let grid = GridConfig::default();
        let mut first = iterate_classifiers(&grid);
        first.nth(10);
        let second: Vec<_> = iterate_classifiers(&grid).collect();
        assert_eq!(second.len(), 429);
        assert_eq!(first.len(), 418);
    }

    #[test]
    fn test_small_grid() {
        let grid = GridConfig {
            svm_c: LogRange::new(0.0, 1.0, 2),
            svm_gamma: LogRange::new(0.0, 0.0, 1),
            knn_k: KRange { min: 3, max: 4 },
            ..GridConfig::default()
        };
        let configs: Vec<_> = iterate_classifiers(&grid).collect();
        assert_eq!(
            configs,
            vec![
                ClassifierConfig::Svm { c: 1.0, gamma: 1.0 },
                ClassifierConfig::Svm { c: 10.0, gamma: 1.0 },
                ClassifierConfig::Knn { k: 3 },
                ClassifierConfig::Knn { k: 4 },
            ]
        );
    }

    #[test]
    fn test_config_display() {
        let svm = ClassifierConfig::Svm { c: 0.5, gamma: 0.001 };
        assert_eq!(svm.to_string(), "SVM, C: 0.500000, gamma: 0.001000");
        assert_eq!(ClassifierConfig::Knn { k: 3 }.to_string(), "KNN, K: 3.000000");
    }

    #[test]
    fn test_svm_separates_clusters() {
        let (features, labels) = two_clusters();
        let config = ClassifierConfig::Svm { c: 1.0, gamma: 0.1 };
        let model = Classifier::fit(&config, &features, &labels).unwrap();

        let predicted = model
            .predict(&[[25.0, 35.0, 195.0], [238.0, 232.0, 228.0]])
            .unwrap();
        assert_eq!(predicted, vec![1, 2]);
    }

    #[test]
    fn test_knn_separates_clusters() {
        let (features, labels) = two_clusters();
        let model = Classifier::fit(&ClassifierConfig::Knn { k: 3 }, &features, &labels).unwrap();

        let predicted = model.predict(&[[21.0, 31.0, 199.0], [241.0, 236.0, 231.0]]).unwrap();
        assert_eq!(predicted, vec![1, 2]);
    }

    #[test]
    fn test_single_class_training() {
        let features = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let model = Classifier::fit(&ClassifierConfig::Knn { k: 1 }, &features, &[0, 0]).unwrap();
        assert!(matches!(model, Classifier::SingleClass(0)));
        assert_eq!(model.predict(&[[9.0, 9.0, 9.0]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_fit_rejects_misaligned_input() {
        let result = Classifier::fit(&ClassifierConfig::Knn { k: 1 }, &[[1.0, 2.0, 3.0]], &[]);
        assert!(matches!(result, Err(ClassifierError::DataShape(_))));
    }
}
