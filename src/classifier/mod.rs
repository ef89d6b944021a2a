//! Automatic expense categorisation.
//!
//! This module contains everything related to the text classifier:
//! - The [Classifier] that maps an expense description to a category label
//! - Loading and saving of the fitted model artifact
//! - The offline training routine used by the `train_model` binary

mod model;
mod train;

pub use model::{Classifier, ModelArtifact};
pub use train::{LabeledExample, TrainingConfig, fit_model, read_dataset};

pub(crate) use model::tokenize;

#[cfg(test)]
pub(crate) use model::test_artifact;
