//! Records of the errors in a "caused by" chain.

use hashbrown::HashSet;
use rustc_hash::FxBuildHasher;
use serde::Serialize;

use crate::{Introspect, fields::FieldSnapshot, thread::ThreadSnapshot};

/// One error of a cause chain, excluding the root error itself.
///
/// Serializes as an object with the keys `class_name`, `message`,
/// `backtraces` and `ivars`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NestedError {
    /// Type name of the cause.
    pub class_name: String,
    /// Message of the cause, if any.
    pub message: Option<String>,
    /// Stack of the cause, as a single current-thread snapshot.
    pub backtraces: Vec<ThreadSnapshot>,
    /// Captured fields of the cause.
    pub ivars: FieldSnapshot,
}

/// Walks the cause chain of an error, visiting each distinct error once.
///
/// Errors are identified by their full trait object pointer. The vtable half
/// tells apart objects sharing an address, such as a struct and a boxed cause
/// stored in its first field.
///
/// The walk stops at the end of the chain, at the first error that was
/// already visited, or after `max_depth` causes.
pub(crate) struct CauseChain<'a> {
    current: Option<&'a dyn Introspect>,
    visited: HashSet<*const (dyn Introspect + 'a), FxBuildHasher>,
    remaining: usize,
}

impl<'a> CauseChain<'a> {
    pub(crate) fn new(root: &'a dyn Introspect, max_depth: usize) -> Self {
        let mut visited = HashSet::with_hasher(FxBuildHasher);
        visited.insert(core::ptr::from_ref(root));
        Self {
            current: Some(root),
            visited,
            remaining: max_depth,
        }
    }
}

impl<'a> Iterator for CauseChain<'a> {
    type Item = &'a dyn Introspect;

    fn next(&mut self) -> Option<Self::Item> {
        let cause = self.current.take()?.cause()?;

        if !self.visited.insert(core::ptr::from_ref(cause)) {
            tracing::warn!(
                error_type = %cause.type_name(),
                "cause chain contains a cycle, stopping traversal"
            );
            return None;
        }
        if self.remaining == 0 {
            tracing::warn!(
                error_type = %cause.type_name(),
                "cause chain exceeds the configured depth, stopping traversal"
            );
            return None;
        }

        self.remaining -= 1;
        self.current = Some(cause);
        Some(cause)
    }
}
