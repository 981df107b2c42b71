//! Offline training: dataset → training file → model artifact.

pub mod corpus;
pub mod dataset;
mod sgd;

use std::io;
use std::path::Path;

use log::info;

use crate::artifact::{self, ArtifactError};
use crate::classifier::{ClassifierError, LinearModel};

pub use corpus::{to_training_line, write_training_file, TrainingCorpus, TrainingLine};
pub use dataset::{DatasetError, DatasetManager, DatasetSpec, LabeledExample};
pub use sgd::{build_dictionary, train};

/// Intermediate training file written before training starts.
pub const DEFAULT_CORPUS_PATH: &str = "train.fasttext.txt";

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Dataset error: {0}")]
    DatasetError(#[from] DatasetError),
    #[error("Artifact error: {0}")]
    ArtifactError(#[from] ArtifactError),
    #[error("Model error: {0}")]
    ModelError(#[from] ClassifierError),
    #[error("Training corpus has no labeled lines")]
    EmptyCorpus,
    #[error("Invalid training parameter: {0}")]
    InvalidParameter(String),
}

/// Hyperparameters of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParams {
    /// Passes over the corpus
    pub epoch: usize,
    /// Initial learning rate, decayed linearly to zero
    pub lr: f32,
    /// Longest word n-gram used as a feature
    pub word_ngrams: usize,
    /// Size of the hidden representation
    pub dim: usize,
    /// Hash buckets shared by all word n-grams
    pub bucket: usize,
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            epoch: 25,
            lr: 1.0,
            word_ngrams: 2,
            dim: 50,
            bucket: 200_000,
            seed: 0,
        }
    }
}

impl TrainingParams {
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.epoch == 0 {
            return Err(TrainError::InvalidParameter("epoch must be at least 1".into()));
        }
        if self.dim == 0 {
            return Err(TrainError::InvalidParameter("dim must be at least 1".into()));
        }
        if self.word_ngrams == 0 {
            return Err(TrainError::InvalidParameter("word_ngrams must be at least 1".into()));
        }
        if self.word_ngrams > 1 && self.bucket == 0 {
            return Err(TrainError::InvalidParameter("word n-grams need at least one bucket".into()));
        }
        if !(self.lr > 0.0 && self.lr.is_finite()) {
            return Err(TrainError::InvalidParameter(format!("lr must be positive, got {}", self.lr)));
        }
        Ok(())
    }
}

/// Runs the whole offline flow: writes the training file, reads it back,
/// trains and saves the artifact.
pub fn train_to_file<C: AsRef<Path>, M: AsRef<Path>>(
    examples: &[LabeledExample],
    corpus_path: C,
    model_path: M,
    params: &TrainingParams,
) -> Result<LinearModel, TrainError> {
    write_training_file(examples, corpus_path.as_ref())?;
    let corpus = TrainingCorpus::from_file(corpus_path.as_ref())?;
    let model = train(&corpus, params)?;
    artifact::save_model(&model, model_path.as_ref())?;
    info!("Model trained and saved as {:?}", model_path.as_ref());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hyperparameters() {
        let params = TrainingParams::default();
        assert_eq!(params.epoch, 25);
        assert_eq!(params.lr, 1.0);
        assert_eq!(params.word_ngrams, 2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_parameters() {
        let bad = [
            TrainingParams { epoch: 0, ..TrainingParams::default() },
            TrainingParams { lr: 0.0, ..TrainingParams::default() },
            TrainingParams { bucket: 0, ..TrainingParams::default() },
            TrainingParams { dim: 0, ..TrainingParams::default() },
        ];
        for params in bad {
            assert!(matches!(params.validate(), Err(TrainError::InvalidParameter(_))));
        }
    }
}
