use std::path::Path;

use crate::LastError;

/// Shape tag of an engine-produced value.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NodeKind {
    Null,
    Boolean,
    Double,
    Int,
    String,
    Object,
    Array,
    /// A tag the bridge does not know about; converts to null.
    Unknown,
}

/// Read-only view of one node of an engine-owned value tree.
///
/// Nodes are borrowed from the engine for `'a` and are never freed or mutated
/// through this trait.
pub trait ValueNode<'a>: Copy {
    /// Walks an object from its begin iterator until it compares equal to the
    /// end iterator, yielding `(key, value)` pairs in engine order.
    type Entries: Iterator<Item = (&'a [u8], Option<Self>)>;

    fn kind(self) -> NodeKind;
    fn as_bool(self) -> bool;
    fn as_f64(self) -> f64;
    fn as_i64(self) -> i64;
    fn as_bytes(self) -> &'a [u8];
    fn array_len(self) -> usize;
    fn array_get(self, index: usize) -> Option<Self>;
    fn entries(self) -> Self::Entries;
}

/// One engine runtime instance.
///
/// Dropping the value releases the engine context. Status codes follow
/// [`crate::status`]: zero is success.
pub trait Engine: Sized {
    type Node<'a>: ValueNode<'a>
    where
        Self: 'a;

    /// Allocates a new engine context; `None` signals allocation failure.
    fn create() -> Option<Self>;

    /// Installs the sink the engine reports error messages to.
    fn set_error_callback(&mut self, sink: LastError);

    fn load_samples(&mut self, path: &Path) -> i32;

    fn load_samples_from_string(&mut self, rules: &str) -> i32;

    /// Matches one message. The returned node borrows the engine and is only
    /// valid until the next call.
    fn normalize(&mut self, input: &[u8]) -> (i32, Option<Self::Node<'_>>);

    fn version() -> String;
}
