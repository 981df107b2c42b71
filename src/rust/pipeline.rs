use std::sync::Arc;

use log::{debug, warn};

use crate::aggregate::SentimentCounts;
use crate::classifier::{ClassifierError, LabelClassifier};
use crate::text::normalize_comment;

/// Normalizes, classifies and tallies a batch of comments.
///
/// Holds the classifier behind an `Arc`, so cloning the analyzer is cheap
/// and every clone shares the same loaded model.
#[derive(Clone)]
pub struct SentimentAnalyzer {
    classifier: Arc<dyn LabelClassifier>,
}

impl SentimentAnalyzer {
    pub fn new(classifier: Arc<dyn LabelClassifier>) -> Self {
        Self { classifier }
    }

    /// Classifies every comment and returns the counts.
    ///
    /// Stops at the first failing comment; there are no partial results.
    pub fn analyze<S: AsRef<str>>(&self, comments: &[S]) -> Result<SentimentCounts, ClassifierError> {
        let mut counts = SentimentCounts::new();
        for comment in comments {
            let clean = normalize_comment(comment.as_ref());
            let prediction = self.classifier.predict_label(&clean)?;
            let bucket = counts.record(&prediction.label);
            debug!("{:?} <- {:?} ({:.3})", bucket, prediction.label, prediction.probability);
        }
        if counts.unrecognized() > 0 {
            warn!(
                "{} of {} comments had a label outside positive/negative/neutral and were counted as neutral",
                counts.unrecognized(),
                comments.len()
            );
        }
        Ok(counts)
    }
}

impl std::fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAnalyzer").finish_non_exhaustive()
    }
}
