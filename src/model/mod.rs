//! Classifier search module
//!
//! This module enumerates classifier configurations, scores them with
//! k-fold cross-validation and keeps the best one per problem.

pub mod classifier;
pub mod cross_validation;
pub mod grid_search;
pub mod ensemble;

pub use classifier::{iterate_classifiers, Classifier, ClassifierConfig, ClassifierGrid, ClassifierKind};
pub use cross_validation::{accuracy, cross_validate, CrossValidationResult, KFold};
pub use grid_search::{grid_search, BestParams, SearchReport};
pub use ensemble::{majority, ColorEnsemble, SeedColor};
