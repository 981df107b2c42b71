use std::path::Path;
use std::sync::Arc;

use log::info;

use super::error::ClassifierError;
use super::model::LinearModel;
use super::tokenize::tokenize_line;
use super::{strip_label_prefix, ClassifierInfo, LabelClassifier, Prediction};
use crate::artifact::{self, ArtifactError};

/// A thread-safe sentiment classifier backed by a trained [`LinearModel`].
///
/// # Thread Safety
///
/// The model is immutable after loading and shared through an `Arc`, so a
/// single `Classifier` can serve any number of concurrent requests.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use commentsense::Classifier;
///
/// let classifier = Classifier::load("sentiment_model.bin")?;
/// let prediction = classifier.predict("I love this product!")?;
/// println!("{} ({:.2})", prediction.label, prediction.probability);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    pub model_path: String,
    model: Arc<LinearModel>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Loads and verifies a model artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let model = artifact::load_model(path)?;
        let classifier = Self {
            model_path: path.to_string_lossy().to_string(),
            model: Arc::new(model),
        };
        info!(
            "Loaded model from {} ({} words, labels {:?})",
            classifier.model_path,
            classifier.model.dictionary().nwords(),
            classifier.info().labels
        );
        Ok(classifier)
    }

    /// Wraps a model that is already in memory, e.g. straight out of the trainer.
    pub fn from_model(model: LinearModel) -> Self {
        Self {
            model_path: String::new(),
            model: Arc::new(model),
        }
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn info(&self) -> ClassifierInfo {
        let dictionary = self.model.dictionary();
        ClassifierInfo {
            model_path: self.model_path.clone(),
            labels: dictionary
                .labels()
                .iter()
                .map(|l| strip_label_prefix(l).to_string())
                .collect(),
            vocabulary_size: dictionary.nwords(),
            bucket: dictionary.bucket(),
            word_ngrams: dictionary.word_ngrams(),
            dim: self.model.dim(),
        }
    }

    /// Predicts the most likely label for one line of text.
    ///
    /// The text must not contain a newline; run it through
    /// [`normalize_comment`](crate::normalize_comment) first.
    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        if text.contains('\n') {
            return Err(ClassifierError::ValidationError(
                "Text must be a single line (remove '\\n')".into(),
            ));
        }
        let tokens = tokenize_line(text)?;
        let (raw_label, probability) = self.model.predict_tokens(&tokens)?;
        Ok(Prediction {
            label: strip_label_prefix(raw_label).to_string(),
            probability,
        })
    }
}

impl LabelClassifier for Classifier {
    fn predict_label(&self, text: &str) -> Result<Prediction, ClassifierError> {
        self.predict(text)
    }
}
