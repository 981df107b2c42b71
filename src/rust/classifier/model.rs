use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::dictionary::Dictionary;
use super::error::ClassifierError;
use super::utils::{argmax, average_rows, softmax};

/// Weights of a supervised linear text classifier.
///
/// The hidden representation of a line is the mean of its feature rows in
/// `input`; label probabilities are the softmax of `output · hidden`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    dictionary: Dictionary,
    input: Array2<f32>,
    output: Array2<f32>,
}

impl LinearModel {
    pub fn new(dictionary: Dictionary, input: Array2<f32>, output: Array2<f32>) -> Result<Self, ClassifierError> {
        let model = Self { dictionary, input, output };
        model.validate()?;
        Ok(model)
    }

    /// Checks that the matrices agree with the dictionary.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.dictionary.nlabels() == 0 {
            return Err(ClassifierError::ModelError("Model has no labels".into()));
        }
        if self.input.nrows() != self.dictionary.input_rows() {
            return Err(ClassifierError::ModelError(format!(
                "Input matrix has {} rows, dictionary expects {}",
                self.input.nrows(),
                self.dictionary.input_rows()
            )));
        }
        if self.output.nrows() != self.dictionary.nlabels() {
            return Err(ClassifierError::ModelError(format!(
                "Output matrix has {} rows for {} labels",
                self.output.nrows(),
                self.dictionary.nlabels()
            )));
        }
        if self.output.ncols() != self.input.ncols() {
            return Err(ClassifierError::ModelError(format!(
                "Dimension mismatch: input {} vs output {}",
                self.input.ncols(),
                self.output.ncols()
            )));
        }
        Ok(())
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub(crate) fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn dim(&self) -> usize {
        self.input.ncols()
    }

    pub(crate) fn hidden(&self, features: &[usize]) -> Array1<f32> {
        average_rows(&self.input, features)
    }

    /// Label probabilities for an already extracted feature list.
    pub fn probabilities(&self, features: &[usize]) -> Result<Array1<f32>, ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::PredictionError("Input has no known features".into()));
        }
        let hidden = self.hidden(features);
        let mut scores = self.output.dot(&hidden);
        softmax(&mut scores);
        Ok(scores)
    }

    /// Returns the raw (still prefixed) best label and its probability.
    pub fn predict_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<(&str, f32), ClassifierError> {
        let features = self.dictionary.features(tokens);
        let probabilities = self.probabilities(&features)?;
        let (best, probability) = argmax(&probabilities)
            .ok_or_else(|| ClassifierError::PredictionError("Model produced no scores".into()))?;
        let label = self
            .dictionary
            .label(best)
            .ok_or_else(|| ClassifierError::ModelError(format!("No label for output row {}", best)))?;
        Ok((label, probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn tiny_model() -> LinearModel {
        let dictionary = Dictionary::new(
            vec!["good".into(), "bad".into(), "</s>".into()],
            vec!["__label__positive".into(), "__label__negative".into()],
            0,
            1,
        );
        let input = array![[1.0_f32, 0.0], [0.0, 1.0], [0.0, 0.0]];
        let output = array![[1.0_f32, -1.0], [-1.0, 1.0]];
        LinearModel::new(dictionary, input, output).unwrap()
    }

    #[test]
    fn test_predicts_highest_scoring_label() -> Result<(), ClassifierError> {
        let model = tiny_model();
        assert_eq!(model.predict_tokens(&["good", "</s>"])?.0, "__label__positive");
        assert_eq!(model.predict_tokens(&["bad", "</s>"])?.0, "__label__negative");
        Ok(())
    }

    #[test]
    fn test_probabilities_are_normalized() -> Result<(), ClassifierError> {
        let model = tiny_model();
        let probs = model.probabilities(&[0, 2])?;
        assert!((probs.sum() - 1.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_no_features_is_an_error() {
        let model = tiny_model();
        assert!(matches!(
            model.predict_tokens(&["unseen"]),
            Err(ClassifierError::PredictionError(_))
        ));
    }

    #[test]
    fn test_shape_validation() {
        let dictionary = Dictionary::new(vec!["a".into()], vec!["__label__x".into()], 4, 2);
        let result = LinearModel::new(dictionary, Array2::zeros((3, 2)), Array2::zeros((1, 2)));
        assert!(matches!(result, Err(ClassifierError::ModelError(_))));
    }
}
