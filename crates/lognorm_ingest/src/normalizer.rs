use lognorm::{Context, Engine, LognormError};
use serde_json::Value;

/// Something that turns one log line into normalized fields.
///
/// `Ok(None)` means the line produced nothing and is skipped.
pub trait LineNormalizer {
    fn normalize_line(&mut self, line: &str, strip: bool) -> Result<Option<Value>, LognormError>;
}

impl<E: Engine> LineNormalizer for Context<E> {
    fn normalize_line(&mut self, line: &str, strip: bool) -> Result<Option<Value>, LognormError> {
        self.normalize(line, strip)
    }
}

impl<N: LineNormalizer + ?Sized> LineNormalizer for &mut N {
    fn normalize_line(&mut self, line: &str, strip: bool) -> Result<Option<Value>, LognormError> {
        (**self).normalize_line(line, strip)
    }
}
