//! The line-oriented training format: `__label__<label> <text>`, one example
//! per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{info, warn};

use super::dataset::LabeledExample;
use super::TrainError;
use crate::classifier::{tokenize_line, LABEL_PREFIX};
use crate::text::normalize_comment;

/// Formats one example as a training line (without the trailing newline).
///
/// The label is lowercased and its inner whitespace collapsed to `_`, so it
/// stays a single token. Returns `None` when nothing is left of the label.
pub fn to_training_line(example: &LabeledExample) -> Option<String> {
    let label = example
        .label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if label.is_empty() {
        return None;
    }
    let text = normalize_comment(&example.text);
    Some(format!("{}{} {}", LABEL_PREFIX, label, text))
}

/// Writes every usable example to `writer` and returns how many were written.
pub fn write_training_lines<W: Write>(examples: &[LabeledExample], mut writer: W) -> io::Result<usize> {
    let mut written = 0;
    for (i, example) in examples.iter().enumerate() {
        match to_training_line(example) {
            Some(line) => {
                writeln!(writer, "{}", line)?;
                written += 1;
            }
            None => warn!("Skipping example {}: empty label", i),
        }
    }
    writer.flush()?;
    Ok(written)
}

pub fn write_training_file<P: AsRef<Path>>(examples: &[LabeledExample], path: P) -> Result<usize, TrainError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let written = write_training_lines(examples, BufWriter::new(file))?;
    info!("Training data file {:?} created ({} lines)", path, written);
    Ok(written)
}

/// One parsed training line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingLine {
    /// Labels with their prefix, as stored in the model
    pub labels: Vec<String>,
    /// Word tokens, ending with the end-of-sentence marker
    pub words: Vec<String>,
}

/// A training file read back into memory.
#[derive(Debug, Clone, Default)]
pub struct TrainingCorpus {
    pub lines: Vec<TrainingLine>,
}

impl TrainingCorpus {
    /// Parses training lines. Tokens starting with `__label__` are labels, the
    /// rest are words. Lines without a label are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TrainError> {
        let mut lines = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let (labels, words): (Vec<String>, Vec<String>) = tokenize_line(&line)?
                .into_iter()
                .partition(|token| token.starts_with(LABEL_PREFIX));
            if labels.is_empty() {
                if !line.trim().is_empty() {
                    warn!("Line {} has no label, skipping", number + 1);
                }
                continue;
            }
            lines.push(TrainingLine { labels, words });
        }
        Ok(Self { lines })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrainError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of word tokens, used to schedule the learning rate.
    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }
}
