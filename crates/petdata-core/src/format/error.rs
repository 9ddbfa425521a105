use thiserror::Error;

/// Fatal decode failures.
///
/// A clean end of a payload loop is not an error: probing reads report it as
/// `Ok(None)` and the loop returns what it has collected.
///
/// # Examples
/// ```
/// use petdata_core::DecodeError;
///
/// let err = DecodeError::ShortRead {
///     field: "device_info.serial",
///     needed: 16,
///     actual: 3,
/// };
/// assert!(err.to_string().contains("device_info.serial"));
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("short read in {field}: need {needed} bytes, got {actual}")]
    ShortRead {
        field: &'static str,
        needed: usize,
        actual: usize,
    },
    #[error("I/O error while reading {field}: {source}")]
    Source {
        field: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl DecodeError {
    /// Name of the field that could not be read.
    pub fn field(&self) -> &'static str {
        match self {
            DecodeError::ShortRead { field, .. } | DecodeError::Source { field, .. } => field,
        }
    }
}
