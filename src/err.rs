use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResError>;

#[derive(Debug, Error)]
pub enum ResError {
    // Errors related to deserialization of the container and its payloads.

    #[error("buffer too small for {what} at offset {offset} (need {need} bytes, have {have})")]
    OutOfData {
        what: &'static str,
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error("corrupt resource container at offset {offset}: {message}")]
    CorruptContainer { offset: u64, message: &'static str },

    #[error("unexpected data at the end of {what} resource ({remaining} bytes)")]
    TrailingData { what: &'static str, remaining: usize },

    #[error("unsupported {what} version {version}")]
    UnsupportedVersion { what: &'static str, version: u16 },

    #[error("unhandled resource type {code}")]
    UnsupportedResourceType { code: u16 },

    // Lookup outcomes, caused by a bad key rather than by a bad container.

    #[error("resource {key} not found in container")]
    NotFound { key: String },

    #[error("resource {key} is missing in the reference language, cannot compare")]
    ResourceMissingForCompare { key: String },

    #[error("couldn't parse language code `{value}`, expected `PPP:SS` (hex)")]
    InvalidLangId { value: String },

    #[error("failed to open file {}: {source}", path.display())]
    FailedToOpenFile { path: PathBuf, source: io::Error },
}

impl ResError {
    /// `true` for outcomes that are caused by the lookup key and should be reported
    /// as a clean negative result rather than as a broken container.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            ResError::NotFound { .. } | ResError::ResourceMissingForCompare { .. }
        )
    }
}
