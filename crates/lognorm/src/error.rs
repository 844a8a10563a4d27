use std::path::PathBuf;

use thiserror::Error;

/// Status codes returned by the engine. Zero means success.
pub mod status {
    pub const OK: i32 = 0;
    pub const NOMEM: i32 = -1;
    pub const BADCONFIG: i32 = -250;
    pub const BADPARSERSTATE: i32 = -500;
    pub const WRONGPARSER: i32 = -1000;
    pub const RB_LINE_TOO_LONG: i32 = -1001;
    pub const OVER_SIZE_LIMIT: i32 = -1002;
}

/// Flat classification of [`LognormError`].
///
/// `Base`, `Memory`, `Config`, `Parser` and `Rule` form the engine error
/// hierarchy: `Base` is the root and the other four are its direct children.
/// The remaining kinds describe host-side path problems during `load`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Base,
    Memory,
    Config,
    Parser,
    Rule,
    NotFound,
    Os,
    Runtime,
    Value,
}

impl ErrorKind {
    /// True for the root engine error kind and its four subkinds.
    pub fn is_engine_error(self) -> bool {
        matches!(
            self,
            ErrorKind::Base
                | ErrorKind::Memory
                | ErrorKind::Config
                | ErrorKind::Parser
                | ErrorKind::Rule
        )
    }
}

/// Errors raised by a lognorm [`Context`](crate::Context).
#[derive(Debug, Error)]
pub enum LognormError {
    #[error("{0}")]
    Memory(String),
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Parser(String),
    #[error("{0}")]
    Rule(String),
    /// Base engine error: unmapped status codes and empty results.
    #[error("{0}")]
    Engine(String),
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("cannot open directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load rulebase file: {}", path.display())]
    Load {
        path: PathBuf,
        status: i32,
        /// Engine callback text captured while loading, if any.
        message: Option<String>,
    },
    #[error("path is neither a regular file nor a directory: {}", path.display())]
    InvalidPath { path: PathBuf },
    #[error("lognorm context has been destroyed")]
    Destroyed,
}

impl LognormError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LognormError::Memory(_) => ErrorKind::Memory,
            LognormError::Config(_) => ErrorKind::Config,
            LognormError::Parser(_) => ErrorKind::Parser,
            LognormError::Rule(_) => ErrorKind::Rule,
            LognormError::Engine(_) | LognormError::Destroyed => ErrorKind::Base,
            LognormError::NotFound { .. } => ErrorKind::NotFound,
            LognormError::Io { .. } => ErrorKind::Os,
            LognormError::Load { .. } => ErrorKind::Runtime,
            LognormError::InvalidPath { .. } => ErrorKind::Value,
        }
    }

    /// True when the error belongs to the engine hierarchy rooted at `Base`.
    pub fn is_engine_error(&self) -> bool {
        self.kind().is_engine_error()
    }
}

/// Maps a nonzero engine status (or a zero status without a result) onto the
/// engine error hierarchy.
///
/// Only the unmapped branch consults `pending`; when no callback message was
/// captured it falls back to `fallback`.
pub(crate) fn status_error(status: i32, pending: Option<String>, fallback: &str) -> LognormError {
    match status {
        status::NOMEM => LognormError::Memory("out of memory".to_string()),
        status::BADCONFIG => LognormError::Config("invalid rulebase configuration".to_string()),
        status::BADPARSERSTATE => LognormError::Parser("invalid parser state".to_string()),
        status::WRONGPARSER => {
            LognormError::Parser("no matching parser or invalid message".to_string())
        }
        status::RB_LINE_TOO_LONG | status::OVER_SIZE_LIMIT => {
            LognormError::Rule("rulebase line too long or over size limit".to_string())
        }
        _ => LognormError::Engine(pending.unwrap_or_else(|| fallback.to_string())),
    }
}
