#![cfg_attr(not(feature = "liblognorm"), forbid(unsafe_code))]
//! Safe bindings to the liblognorm log normalization engine.
//!
//! The engine owns all rule matching. This crate manages the engine context,
//! turns engine status codes and error-callback messages into [`LognormError`],
//! and converts each normalized result into an owned [`serde_json::Value`].
//!
//! ## Surfaces
//! - [`Context::new`] creates an empty context; rules are added with
//!   [`Context::load`] (a file, or every regular file in a directory) and
//!   [`Context::load_from_string`]. Rules accumulate.
//! - [`Context::builder`] loads rules at construction time
//!   ([`ContextBuilder::rulebase`], [`ContextBuilder::rules_from_string`]).
//! - [`Context::normalize`] matches one message and returns the parsed fields,
//!   or `None` for empty input.
//! - [`Context::last_error`] exposes the engine's most recent callback message.
//!
//! ## Backends
//! The engine sits behind the [`Engine`] trait. Enable the `liblognorm`
//! feature to link the system liblognorm/libfastjson and use [`Lognorm`]:
//!
//! ```rust,ignore
//! let mut lognorm = lognorm::Lognorm::new()?;
//! lognorm.load_from_string("version=2\nrule=:%-:word% %severity:word% %msg:rest%\n")?;
//! let fields = lognorm.normalize("2024-01-01 ERROR boom\n", true)?;
//! ```

mod builder;
mod context;
mod engine;
mod error;
mod last_error;
mod rulebase;
mod value;

#[cfg(feature = "liblognorm")]
mod ffi;

#[cfg(test)]
mod tests;

pub use builder::ContextBuilder;
pub use context::Context;
pub use engine::{Engine, NodeKind, ValueNode};
pub use error::{status, ErrorKind, LognormError};
pub use last_error::{LastError, LAST_ERROR_CAPACITY};
pub use value::convert;

#[cfg(feature = "liblognorm")]
pub use ffi::{JsonEntries, JsonRef, Liblognorm};

/// A context backed by the system liblognorm.
#[cfg(feature = "liblognorm")]
pub type Lognorm = Context<Liblognorm>;

/// Version string of the linked liblognorm.
#[cfg(feature = "liblognorm")]
pub fn version() -> String {
    Liblognorm::version()
}
