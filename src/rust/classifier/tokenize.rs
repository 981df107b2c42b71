use tokenizers::pre_tokenizers::whitespace::WhitespaceSplit;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use super::error::ClassifierError;

/// End-of-sentence marker appended to every line, so that even an empty
/// line carries one feature.
pub const EOS: &str = "</s>";

/// Splits one line of text into whitespace-delimited tokens and appends [`EOS`].
///
/// Label markers are not treated specially here; the training corpus reader
/// separates them from the words afterwards.
pub(crate) fn tokenize_line(text: &str) -> Result<Vec<String>, ClassifierError> {
    let mut pretokenized = PreTokenizedString::from(text);
    WhitespaceSplit
        .pre_tokenize(&mut pretokenized)
        .map_err(|e| ClassifierError::ValidationError(format!("Failed to split text: {}", e)))?;

    let mut tokens: Vec<String> = pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(token, _, _)| token)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    tokens.push(EOS.to_string());
    Ok(tokens)
}
