use std::collections::HashMap;

use log::{debug, info};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::corpus::TrainingCorpus;
use super::{TrainError, TrainingParams};
use crate::classifier::utils::{average_rows, softmax};
use crate::classifier::{Dictionary, LinearModel};

/// Frequency-ordered vocabulary. Ties keep first-seen order.
fn ordered_by_count<'a>(tokens: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for token in tokens {
        let next = counts.len();
        counts.entry(token.as_str()).or_insert((0, next)).0 += 1;
    }
    let mut ordered: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ordered.into_iter().map(|(token, _)| token.to_string()).collect()
}

pub fn build_dictionary(corpus: &TrainingCorpus, params: &TrainingParams) -> Dictionary {
    let words = ordered_by_count(corpus.lines.iter().flat_map(|l| l.words.iter()));
    let labels = ordered_by_count(corpus.lines.iter().flat_map(|l| l.labels.iter()));
    Dictionary::new(words, labels, params.bucket, params.word_ngrams)
}

struct Example {
    features: Vec<usize>,
    labels: Vec<usize>,
    tokens: usize,
}

/// Trains a softmax linear classifier on the corpus with plain SGD.
///
/// The learning rate decays linearly from `params.lr` to zero over
/// `params.epoch` passes; gradients reaching the input rows are averaged
/// over the number of features of the line.
pub fn train(corpus: &TrainingCorpus, params: &TrainingParams) -> Result<LinearModel, TrainError> {
    params.validate()?;
    if corpus.is_empty() {
        return Err(TrainError::EmptyCorpus);
    }

    let dictionary = build_dictionary(corpus, params);
    info!(
        "Read {} lines: {} words, {} labels {:?}",
        corpus.len(),
        dictionary.nwords(),
        dictionary.nlabels(),
        dictionary.labels()
    );

    let examples: Vec<Example> = corpus
        .lines
        .iter()
        .map(|line| Example {
            features: dictionary.features(&line.words),
            labels: line.labels.iter().filter_map(|l| dictionary.label_id(l)).collect(),
            tokens: line.words.len(),
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(params.seed);
    let bound = 1.0 / params.dim as f32;
    let mut input = Array2::from_shape_fn((dictionary.input_rows(), params.dim), |_| rng.gen_range(-bound..bound));
    let mut output = Array2::<f32>::zeros((dictionary.nlabels(), params.dim));

    let total_tokens = (corpus.token_count() * params.epoch).max(1) as f64;
    let mut processed = 0usize;

    for epoch in 0..params.epoch {
        let mut loss_sum = 0.0f64;
        let mut seen = 0usize;
        let mut lr = params.lr;

        for example in &examples {
            processed += example.tokens;
            if example.features.is_empty() || example.labels.is_empty() {
                continue;
            }
            lr = params.lr * (1.0 - processed as f64 / total_tokens).max(0.0) as f32;

            let target = if example.labels.len() == 1 {
                example.labels[0]
            } else {
                example.labels[rng.gen_range(0..example.labels.len())]
            };

            let hidden = average_rows(&input, &example.features);
            let mut scores = output.dot(&hidden);
            softmax(&mut scores);
            loss_sum += -f64::from(scores[target].max(1e-5)).ln();
            seen += 1;

            let mut grad = Array1::<f32>::zeros(params.dim);
            for (label, &probability) in scores.iter().enumerate() {
                let truth = if label == target { 1.0 } else { 0.0 };
                let alpha = lr * (truth - probability);
                grad.scaled_add(alpha, &output.row(label));
                output.row_mut(label).scaled_add(alpha, &hidden);
            }

            grad /= example.features.len() as f32;
            for &feature in &example.features {
                input.row_mut(feature).scaled_add(1.0, &grad);
            }
        }

        let avg_loss = if seen > 0 { loss_sum / seen as f64 } else { 0.0 };
        info!(
            "Epoch {}/{}: avg loss {:.6}, lr {:.6}",
            epoch + 1,
            params.epoch,
            avg_loss,
            lr
        );
        debug!("Processed {} of {} tokens", processed, total_tokens);
    }

    Ok(LinearModel::new(dictionary, input, output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(text: &str) -> TrainingCorpus {
        TrainingCorpus::from_reader(text.as_bytes()).unwrap()
    }

    fn small_params() -> TrainingParams {
        TrainingParams {
            dim: 8,
            bucket: 256,
            ..TrainingParams::default()
        }
    }

    #[test]
    fn test_dictionary_is_frequency_ordered() {
        let corpus = corpus("__label__b x y\n__label__a y\n__label__a y z\n");
        let dict = build_dictionary(&corpus, &small_params());
        assert_eq!(dict.labels(), &["__label__a".to_string(), "__label__b".to_string()]);
        // "</s>" and "y" both appear three times; "</s>" came second on line one
        assert_eq!(dict.word_id("y"), Some(0));
        assert_eq!(dict.word_id("</s>"), Some(1));
        assert_eq!(dict.nwords(), 4);
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let result = train(&TrainingCorpus::default(), &small_params());
        assert!(matches!(result, Err(TrainError::EmptyCorpus)));
    }

    #[test]
    fn test_training_is_deterministic_for_a_seed() -> Result<(), TrainError> {
        let corpus = corpus("__label__positive good\n__label__negative bad\n");
        let a = train(&corpus, &small_params())?;
        let b = train(&corpus, &small_params())?;
        let tokens = ["good", "</s>"];
        assert_eq!(a.predict_tokens(&tokens)?, b.predict_tokens(&tokens)?);
        Ok(())
    }

    #[test]
    fn test_learns_separable_labels() -> Result<(), TrainError> {
        let text = "__label__positive love great amazing\n\
                    __label__negative worst awful terrible\n"
            .repeat(10);
        let model = train(&corpus(&text), &small_params())?;

        let (label, probability) = model.predict_tokens(&["love", "amazing", "</s>"])?;
        assert_eq!(label, "__label__positive");
        assert!(probability > 0.5);
        let (label, _) = model.predict_tokens(&["terrible", "worst", "</s>"])?;
        assert_eq!(label, "__label__negative");
        Ok(())
    }
}
