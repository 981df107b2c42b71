use std::fmt;

/// Represents the different types of errors that can occur while classifying text.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The input text cannot be handed to the model as is
    ValidationError(String),
    /// The model could not produce a prediction for the input
    PredictionError(String),
    /// The model itself is inconsistent (bad shape, no labels)
    ModelError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}
