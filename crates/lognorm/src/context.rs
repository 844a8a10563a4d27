use std::{fmt, path::Path};

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    builder::ContextBuilder,
    engine::Engine,
    error::{status, status_error},
    rulebase::{self, RulebasePath},
    value, LastError, LognormError,
};

const STRIP_CHARS: &[char] = &['\n', '\r', '\t', ' '];

/// A lognorm context: one engine instance plus its last-error slot.
///
/// Calls are synchronous and take `&mut self`, so a context is used by one
/// caller at a time. Distinct contexts share no state and may live on
/// different threads when the engine is `Send`.
pub struct Context<E: Engine> {
    engine: Option<E>,
    last_error: LastError,
}

impl<E: Engine> Context<E> {
    /// Creates a context with no rules loaded.
    pub fn new() -> Result<Self, LognormError> {
        Self::builder().build()
    }

    pub fn builder() -> ContextBuilder<E> {
        ContextBuilder::new()
    }

    pub(crate) fn create() -> Result<Self, LognormError> {
        let Some(mut engine) = E::create() else {
            return Err(LognormError::Memory(
                "failed to initialize liblognorm context".to_string(),
            ));
        };
        let last_error = LastError::new();
        engine.set_error_callback(last_error.clone());
        debug!("created lognorm context");
        Ok(Self {
            engine: Some(engine),
            last_error,
        })
    }

    /// Releases the engine context. Calling this again is a no-op.
    pub fn destroy(&mut self) {
        if let Some(engine) = self.engine.take() {
            drop(engine);
            debug!("released lognorm context");
        }
        self.last_error.clear();
    }

    pub fn is_destroyed(&self) -> bool {
        self.engine.is_none()
    }

    /// Version string reported by the engine.
    pub fn version(&self) -> String {
        E::version()
    }

    /// The message captured from the engine during the last fallible call, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.message()
    }

    /// Loads a rulebase file, or every regular file in a directory.
    ///
    /// Rules accumulate in the context. Directory entries load in file-name
    /// order; the first failing file aborts the call and files loaded before it
    /// stay loaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LognormError> {
        let path = path.as_ref();
        let target = rulebase::classify(path)?;
        let engine = self.engine.as_mut().ok_or(LognormError::Destroyed)?;

        match target {
            RulebasePath::File(file) => load_file(engine, &self.last_error, &file),
            RulebasePath::Directory(dir) => {
                let files = rulebase::rulebase_files(&dir)?;
                debug!(dir = %dir.display(), files = files.len(), "loading rulebase directory");
                for file in &files {
                    load_file(engine, &self.last_error, file)?;
                }
                Ok(())
            }
        }
    }

    /// Parses `rules` as an in-memory rulebase and adds it to the context.
    pub fn load_from_string(&mut self, rules: &str) -> Result<(), LognormError> {
        let engine = self.engine.as_mut().ok_or(LognormError::Destroyed)?;
        self.last_error.clear();

        if rules.contains('\0') {
            return Err(LognormError::Config(
                "rulebase text contains an interior NUL byte".to_string(),
            ));
        }

        let code = engine.load_samples_from_string(rules);
        if code == status::OK {
            return Ok(());
        }
        warn!(status = code, "failed to load rulebase from string");
        Err(LognormError::Config(self.last_error.message().unwrap_or_else(
            || "failed to load rulebase from string".to_string(),
        )))
    }

    /// Loads a single rulebase file with status codes folded into the engine
    /// error hierarchy. Used for construction-time loading.
    pub(crate) fn load_rulebase(&mut self, path: &Path) -> Result<(), LognormError> {
        if !path.exists() {
            return Err(LognormError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let engine = self.engine.as_mut().ok_or(LognormError::Destroyed)?;
        self.last_error.clear();

        debug!(path = %path.display(), "loading rulebase");
        let code = engine.load_samples(path);
        if code == status::OK {
            return Ok(());
        }
        warn!(path = %path.display(), status = code, "failed to load rulebase");
        Err(status_error(
            code,
            self.last_error.message(),
            &format!("failed to load rulebase {}", path.display()),
        ))
    }

    /// Normalizes one log message.
    ///
    /// Empty input returns `Ok(None)` without calling the engine. With `strip`,
    /// trailing `\n`, `\r`, `\t` and spaces are removed first. A match is
    /// converted into an owned [`Value`] before this returns.
    pub fn normalize(&mut self, log: &str, strip: bool) -> Result<Option<Value>, LognormError> {
        if log.is_empty() {
            return Ok(None);
        }
        let input = if strip {
            log.trim_end_matches(STRIP_CHARS)
        } else {
            log
        };

        let engine = self.engine.as_mut().ok_or(LognormError::Destroyed)?;
        self.last_error.clear();

        trace!(bytes = input.len(), "normalizing message");
        let (code, node) = engine.normalize(input.as_bytes());
        match node {
            Some(node) if code == status::OK => Ok(Some(value::convert(Some(node)))),
            _ => Err(status_error(
                code,
                self.last_error.message(),
                "unknown normalization error",
            )),
        }
    }
}

fn load_file<E: Engine>(
    engine: &mut E,
    last_error: &LastError,
    path: &Path,
) -> Result<(), LognormError> {
    last_error.clear();
    debug!(path = %path.display(), "loading rulebase file");
    let code = engine.load_samples(path);
    if code == status::OK {
        return Ok(());
    }
    let message = last_error.message();
    warn!(path = %path.display(), status = code, "failed to load rulebase file");
    Err(LognormError::Load {
        path: path.to_path_buf(),
        status: code,
        message,
    })
}

impl<E: Engine> Drop for Context<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<E: Engine> fmt::Debug for Context<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("destroyed", &self.is_destroyed())
            .field("last_error", &self.last_error.message())
            .finish()
    }
}
