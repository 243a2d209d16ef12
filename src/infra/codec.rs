//! JSON codec for the index aggregate and its changesets.
//!
//! Corrupt JSON is a hard failure here: downstream consumers trust a decoded
//! index, so a parse error must never be collapsed into "not found".

use thiserror::Error;

use crate::domain::index::{BlogIndex, BlogIndexChangeset};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("index json codec failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode_index(index: &BlogIndex) -> Result<String, CodecError> {
    Ok(serde_json::to_string(index)?)
}

pub fn decode_index(json: &str) -> Result<BlogIndex, CodecError> {
    Ok(serde_json::from_str(json)?)
}

pub fn encode_changeset(changeset: &BlogIndexChangeset) -> Result<String, CodecError> {
    Ok(serde_json::to_string(changeset)?)
}

pub fn decode_changeset(json: &str) -> Result<BlogIndexChangeset, CodecError> {
    Ok(serde_json::from_str(json)?)
}
