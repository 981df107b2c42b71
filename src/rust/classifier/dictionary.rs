use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::utils::hash_token;

/// Multiplier used to chain token hashes into word n-gram hashes.
const NGRAM_HASH_MULTIPLIER: u64 = 116_049_371;

/// Vocabulary and label set of a model, plus the parameters that map a token
/// sequence onto rows of the input matrix.
///
/// Rows `0..nwords()` belong to known words; rows `nwords()..nwords() + bucket`
/// are shared by hashed word n-grams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    words: Vec<String>,
    labels: Vec<String>,
    bucket: usize,
    word_ngrams: usize,
    #[serde(skip)]
    word_index: HashMap<String, usize>,
}

impl Dictionary {
    pub fn new(words: Vec<String>, labels: Vec<String>, bucket: usize, word_ngrams: usize) -> Self {
        let mut dictionary = Self {
            words,
            labels,
            bucket,
            word_ngrams,
            word_index: HashMap::new(),
        };
        dictionary.rebuild_index();
        dictionary
    }

    /// Restores the lookup table, which is not part of the serialized form.
    pub(crate) fn rebuild_index(&mut self) {
        self.word_index = self
            .words
            .iter()
            .enumerate()
            .map(|(id, word)| (word.clone(), id))
            .collect();
    }

    pub fn nwords(&self) -> usize {
        self.words.len()
    }

    pub fn nlabels(&self) -> usize {
        self.labels.len()
    }

    pub fn bucket(&self) -> usize {
        self.bucket
    }

    pub fn word_ngrams(&self) -> usize {
        self.word_ngrams
    }

    /// Number of rows the input matrix must have.
    pub fn input_rows(&self) -> usize {
        self.words.len() + self.bucket
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn label_id(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn word_id(&self, word: &str) -> Option<usize> {
        self.word_index.get(word).copied()
    }

    /// Maps a token sequence onto input rows: ids of known words followed by
    /// the hashed n-grams of order `2..=word_ngrams`.
    ///
    /// Every token contributes to the n-gram hashes, known or not.
    pub fn features<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<usize> {
        let mut features = Vec::with_capacity(tokens.len() * self.word_ngrams.max(1));
        let mut hashes = Vec::with_capacity(tokens.len());

        for token in tokens {
            let token = token.as_ref();
            if let Some(id) = self.word_id(token) {
                features.push(id);
            }
            hashes.push(u64::from(hash_token(token)));
        }

        if self.bucket == 0 {
            return features;
        }
        let nwords = self.nwords();
        for i in 0..hashes.len() {
            let mut h = hashes[i];
            for j in (i + 1)..hashes.len().min(i + self.word_ngrams) {
                h = h.wrapping_mul(NGRAM_HASH_MULTIPLIER).wrapping_add(hashes[j]);
                features.push(nwords + (h % self.bucket as u64) as usize);
            }
        }
        features
    }
}
