mod classifier;
mod dictionary;
mod error;
mod model;
mod tokenize;
pub(crate) mod utils;

pub use classifier::Classifier;
pub use dictionary::Dictionary;
pub use error::ClassifierError;
pub use model::LinearModel;
pub use tokenize::EOS;

pub(crate) use tokenize::tokenize_line;

/// Marker that precedes every label inside the model and the training file.
pub const LABEL_PREFIX: &str = "__label__";

/// Removes the [`LABEL_PREFIX`] from a model label, if present.
///
/// ```
/// use commentsense::classifier::strip_label_prefix;
///
/// assert_eq!(strip_label_prefix("__label__positive"), "positive");
/// assert_eq!(strip_label_prefix("neutral"), "neutral");
/// ```
pub fn strip_label_prefix(label: &str) -> &str {
    label.strip_prefix(LABEL_PREFIX).unwrap_or(label)
}

/// Single best label for a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Label without the `__label__` marker
    pub label: String,
    /// Softmax probability of the label. Not used by the aggregation.
    pub probability: f32,
}

/// Anything that can turn one normalized line of text into a label.
///
/// The request pipeline only depends on this trait, so tests can swap the
/// trained model for a fixed mapping.
pub trait LabelClassifier: Send + Sync {
    fn predict_label(&self, text: &str) -> Result<Prediction, ClassifierError>;
}

/// Information about a loaded classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path the model was loaded from, empty for in-memory models
    pub model_path: String,
    /// Labels the model can emit, without prefix
    pub labels: Vec<String>,
    /// Number of known words, including the end-of-sentence token
    pub vocabulary_size: usize,
    /// Number of hash buckets for word n-grams
    pub bucket: usize,
    /// Longest word n-gram the model uses
    pub word_ngrams: usize,
    /// Size of the hidden representation
    pub dim: usize,
}
