use lognorm::{ErrorKind, LognormError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineRecordError {
    #[error("I/O error while reading log input")]
    Io,
    #[error("invalid UTF-8 in log input")]
    InvalidUtf8,
    #[error("line too long (observed_bytes={observed_bytes}, max_line_bytes={max_line_bytes})")]
    LineTooLong {
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    #[error("normalization failed ({kind:?}): {message}")]
    Normalize { kind: ErrorKind, message: String },
}

impl From<LognormError> for LineRecordError {
    fn from(err: LognormError) -> Self {
        LineRecordError::Normalize {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord<T> {
    pub line_number: usize,
    /// The line as handed to the normalizer, when [`CaptureRaw::Line`] is set.
    ///
    /// [`CaptureRaw::Line`]: crate::CaptureRaw::Line
    pub raw: Option<String>,
    pub outcome: Result<T, LineRecordError>,
}
