use std::{fmt, marker::PhantomData, path::PathBuf};

use crate::{engine::Engine, Context, LognormError};

#[derive(Debug, Clone)]
enum RuleSource {
    Rulebase(PathBuf),
    Text(String),
}

/// Builder for [`Context`] with rules loaded at construction time.
///
/// Sources are applied in the order they were added. If any of them fails,
/// the half-built context is released and the error is returned.
pub struct ContextBuilder<E> {
    sources: Vec<RuleSource>,
    _engine: PhantomData<fn() -> E>,
}

impl<E: Engine> Default for ContextBuilder<E> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            _engine: PhantomData,
        }
    }
}

impl<E: Engine> ContextBuilder<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a single rulebase file during [`build`](Self::build).
    ///
    /// A missing path fails with [`LognormError::NotFound`]; engine status
    /// codes map onto the engine error kinds, preferring the engine's own
    /// message for unmapped codes.
    pub fn rulebase(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(RuleSource::Rulebase(path.into()));
        self
    }

    /// Loads in-memory rulebase text during [`build`](Self::build), with the
    /// same semantics as [`Context::load_from_string`].
    pub fn rules_from_string(mut self, rules: impl Into<String>) -> Self {
        self.sources.push(RuleSource::Text(rules.into()));
        self
    }

    pub fn build(self) -> Result<Context<E>, LognormError> {
        let mut context = Context::create()?;
        for source in self.sources {
            match source {
                RuleSource::Rulebase(path) => context.load_rulebase(&path)?,
                RuleSource::Text(rules) => context.load_from_string(&rules)?,
            }
        }
        Ok(context)
    }
}

impl<E> fmt::Debug for ContextBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("sources", &self.sources)
            .finish()
    }
}
