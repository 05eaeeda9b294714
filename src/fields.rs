//! Instance fields of an error, captured for diagnostics.
//!
//! Error types opt in to exposing their internal state by returning
//! [`DeclaredField`]s from [`Introspect::declared_fields`]. Each declared
//! field has a [`FieldKind`] and a deferred reader; only eligible fields are
//! ever read.
//!
//! [`Introspect::declared_fields`]: crate::Introspect::declared_fields

use std::{borrow::Cow, fmt};

use indexmap::IndexMap;

use crate::value::Value;

/// Captured field values of one error, keyed by field name.
pub type FieldSnapshot = IndexMap<String, Value>;

/// Field name prefix injected by bytecode-generating test doubles.
///
/// Fields starting with this prefix are left out of snapshots by default.
pub const PROXY_FIELD_PREFIX: &str = "CGLIB";

/// Prefix of the placeholder value stored for a field that could not be read.
pub const ACCESS_FAILURE_PREFIX: &str = "Exception accessing field: ";

/// Whether a field belongs to an instance or to its type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A per-instance field. Included in snapshots.
    Instance,
    /// A type-level field shared by every instance. Never included.
    Static,
}

/// The reason a declared field could not be read.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldAccessError {
    /// The error type declares the field but does not expose it.
    #[error("field `{field}` is not exposed for diagnostics")]
    NotExposed {
        /// Name of the field.
        field: String,
    },
    /// Reading the field failed.
    #[error("field `{field}` could not be read: {reason}")]
    Unreadable {
        /// Name of the field.
        field: String,
        /// Description of the failure.
        reason: String,
    },
}

type FieldReader<'a> = Box<dyn FnOnce() -> Result<Value, FieldAccessError> + 'a>;

/// A field declared directly by an error type.
///
/// # Examples
///
/// ```
/// use squash_backtrace::fields::{DeclaredField, FieldKind};
///
/// let retries = 3u32;
/// let field = DeclaredField::instance("retries", retries);
/// assert_eq!(field.name(), "retries");
/// assert_eq!(field.kind(), FieldKind::Instance);
/// ```
pub struct DeclaredField<'a> {
    name: Cow<'a, str>,
    kind: FieldKind,
    reader: FieldReader<'a>,
}

impl<'a> DeclaredField<'a> {
    /// Declares a field whose value is produced by `reader` when read.
    pub fn new(
        name: impl Into<Cow<'a, str>>,
        kind: FieldKind,
        reader: impl FnOnce() -> Result<Value, FieldAccessError> + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            reader: Box::new(reader),
        }
    }

    /// Declares an instance field with a known value.
    pub fn instance(name: impl Into<Cow<'a, str>>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(name, FieldKind::Instance, move || Ok(value))
    }

    /// Declares a type-level field with a known value.
    pub fn static_field(name: impl Into<Cow<'a, str>>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(name, FieldKind::Static, move || Ok(value))
    }

    /// Declares an instance field that exists but cannot be exposed.
    pub fn hidden(name: impl Into<Cow<'a, str>>) -> Self {
        let name = name.into();
        let field = name.clone().into_owned();
        Self::new(name, FieldKind::Instance, move || {
            Err(FieldAccessError::NotExposed { field })
        })
    }

    /// The declared name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field is per instance or per type.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Reads the field, consuming the declaration.
    pub fn read(self) -> (Cow<'a, str>, Result<Value, FieldAccessError>) {
        let value = (self.reader)();
        (self.name, value)
    }
}

impl fmt::Debug for DeclaredField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Builds a snapshot from declared fields.
///
/// Static fields and fields whose name starts with one of `excluded_prefixes`
/// are skipped without being read. Read failures become placeholder strings.
pub(crate) fn snapshot_fields<'a>(
    fields: impl IntoIterator<Item = DeclaredField<'a>>,
    excluded_prefixes: &[&str],
) -> FieldSnapshot {
    let mut snapshot = FieldSnapshot::new();
    for field in fields {
        if field.kind == FieldKind::Static {
            continue;
        }
        if excluded_prefixes
            .iter()
            .any(|prefix| field.name.starts_with(prefix))
        {
            continue;
        }

        let (name, value) = field.read();
        let value = value.unwrap_or_else(|error| {
            tracing::debug!(field = %name, %error, "unable to read error field");
            Value::String(format!("{ACCESS_FAILURE_PREFIX}{error}"))
        });
        snapshot.insert(name.into_owned(), value);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_skipped_fields_are_never_read() {
        let reads = Cell::new(0);
        let counted = |value: i32| {
            let reads = &reads;
            move || {
                reads.set(reads.get() + 1);
                Ok(Value::from(value))
            }
        };

        let snapshot = snapshot_fields(
            [
                DeclaredField::new("code", FieldKind::Instance, counted(1)),
                DeclaredField::new("COUNT", FieldKind::Static, counted(2)),
                DeclaredField::new("CGLIB$CALLBACK_0", FieldKind::Instance, counted(3)),
            ],
            &[PROXY_FIELD_PREFIX],
        );

        assert_eq!(reads.get(), 1);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["code"], Value::Integer(1));
    }

    #[test]
    fn test_access_failure_becomes_placeholder() {
        let snapshot = snapshot_fields(
            [
                DeclaredField::hidden("secret"),
                DeclaredField::new("socket", FieldKind::Instance, || {
                    Err(FieldAccessError::Unreadable {
                        field: "socket".into(),
                        reason: "closed".into(),
                    })
                }),
            ],
            &[PROXY_FIELD_PREFIX],
        );

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot["secret"].as_str(),
            Some("Exception accessing field: field `secret` is not exposed for diagnostics")
        );
        assert_eq!(
            snapshot["socket"].as_str(),
            Some("Exception accessing field: field `socket` could not be read: closed")
        );
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let snapshot = snapshot_fields(
            [DeclaredField::instance("cglibMode", true)],
            &[PROXY_FIELD_PREFIX],
        );
        assert_eq!(snapshot["cglibMode"], Value::Bool(true));
    }
}
