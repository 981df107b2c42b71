//! Sentiment counting for short comments.
//!
//! A batch of comments is normalized, classified one by one with a compact
//! linear text classifier, and folded into `positive` / `negative` /
//! `neutral` counts. The same pipeline backs the `POST /sentiment` endpoint.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use commentsense::{Classifier, SentimentAnalyzer};
//! use std::sync::Arc;
//!
//! let classifier = Classifier::load("sentiment_model.bin")?;
//! let analyzer = SentimentAnalyzer::new(Arc::new(classifier));
//!
//! let counts = analyzer.analyze(&[
//!     "I love this product! It is amazing.",
//!     "Worst experience ever.",
//! ])?;
//! println!("{} positive, {} negative", counts.positive, counts.negative);
//! # Ok(())
//! # }
//! ```
//!
//! # Testing with a stub
//!
//! The analyzer only needs a [`LabelClassifier`], so the trained model can be
//! replaced by anything that returns labels:
//!
//! ```
//! use commentsense::{ClassifierError, LabelClassifier, Prediction, SentimentAnalyzer};
//! use std::sync::Arc;
//!
//! struct AlwaysPositive;
//!
//! impl LabelClassifier for AlwaysPositive {
//!     fn predict_label(&self, _text: &str) -> Result<Prediction, ClassifierError> {
//!         Ok(Prediction { label: "positive".into(), probability: 1.0 })
//!     }
//! }
//!
//! let analyzer = SentimentAnalyzer::new(Arc::new(AlwaysPositive));
//! let counts = analyzer.analyze(&["a", "b"]).unwrap();
//! assert_eq!(counts.positive, 2);
//! ```

pub mod aggregate;
pub mod artifact;
pub mod classifier;
pub mod config;
pub mod pipeline;
pub mod service;
mod text;
pub mod trainer;

pub use aggregate::{Bucket, SentimentCounts};
pub use artifact::{load_model, save_model, ArtifactError};
pub use classifier::{Classifier, ClassifierError, ClassifierInfo, LabelClassifier, LinearModel, Prediction};
pub use config::ServerConfig;
pub use pipeline::SentimentAnalyzer;
pub use text::normalize_comment;
pub use trainer::{TrainError, TrainingParams};

/// Initializes `env_logger` with an `info` default, overridable by `RUST_LOG`.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}
