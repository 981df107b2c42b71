//! On-disk form of a trained model.
//!
//! Layout: 8 magic bytes, the 32-byte SHA-256 digest of the payload, then the
//! bincode-encoded [`LinearModel`].

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::classifier::{ClassifierError, LinearModel};

const MAGIC: &[u8; 8] = b"CSNTMDL1";
const DIGEST_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Not a model artifact (bad magic bytes)")]
    BadMagic,
    #[error("Artifact truncated: {0} bytes")]
    Truncated(usize),
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
    #[error("Encoding error: {0}")]
    EncodingError(#[from] bincode::Error),
    #[error("Invalid model: {0}")]
    InvalidModel(#[from] ClassifierError),
}

fn digest_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Encodes a model into the artifact byte layout.
pub fn encode_model(model: &LinearModel) -> Result<Vec<u8>, ArtifactError> {
    let payload = bincode::serialize(model)?;
    let digest = Sha256::digest(&payload);

    let mut bytes = Vec::with_capacity(MAGIC.len() + DIGEST_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&digest);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Verifies and decodes an artifact produced by [`encode_model`].
pub fn decode_model(bytes: &[u8]) -> Result<LinearModel, ArtifactError> {
    if bytes.len() < MAGIC.len() + DIGEST_LEN {
        return Err(ArtifactError::Truncated(bytes.len()));
    }
    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(ArtifactError::BadMagic);
    }
    let (expected, payload) = rest.split_at(DIGEST_LEN);
    let actual = Sha256::digest(payload);
    if actual.as_slice() != expected {
        return Err(ArtifactError::HashMismatch {
            expected: expected.iter().map(|b| format!("{:02x}", b)).collect(),
            actual: format!("{:x}", actual),
        });
    }

    let mut model: LinearModel = bincode::deserialize(payload)?;
    model.dictionary_mut().rebuild_index();
    model.validate()?;
    Ok(model)
}

pub fn save_model<P: AsRef<Path>>(model: &LinearModel, path: P) -> Result<(), ArtifactError> {
    let path = path.as_ref();
    let bytes = encode_model(model)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    log::info!("Writing {} bytes to {:?}", bytes.len(), path);
    fs::write(path, &bytes)?;
    log::debug!("Artifact digest: {}", digest_hex(&bytes[MAGIC.len() + DIGEST_LEN..]));
    Ok(())
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<LinearModel, ArtifactError> {
    let path = path.as_ref();
    log::info!("Reading model artifact {:?}", path);
    let bytes = fs::read(path)?;
    log::info!("Read {} bytes", bytes.len());
    decode_model(&bytes)
}
