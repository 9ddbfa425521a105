//! File-backed decoding.
//!
//! The decoder itself works on any `Read`; this module only owns opening and
//! closing the file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::DataSet;
use crate::config::DecoderConfig;
use crate::format::{DecodeError, FormatProfile, decode};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Open `path`, decode it with `profile` and close it again.
pub fn decode_file(
    path: &Path,
    profile: FormatProfile,
    config: &DecoderConfig,
) -> Result<DataSet, SourceError> {
    let file = File::open(path)?;
    debug!("decoding {} as {profile}", path.display());
    let dataset = decode(BufReader::new(file), profile, config)?;
    Ok(dataset)
}
