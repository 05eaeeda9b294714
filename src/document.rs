//! The complete error record sent to the Squash backend.

use serde::Serialize;

use crate::{
    Introspect, Introspector, fields::FieldSnapshot, nested::NestedError, thread::ThreadSnapshot,
};

/// Everything the crash reporter knows about one error.
///
/// The root error is described by `class_name`, `message`, `backtraces` and
/// `ivars`; its causes follow in `parent_exceptions`, nearest first.
///
/// # Examples
///
/// ```
/// use squash_backtrace::{ErrorDocument, Exception};
///
/// let error = Exception::new("payments::GatewayError", "gateway timed out")
///     .with_field("attempt", 3)
///     .with_cause(Exception::new("std::io::Error", "connection reset"));
///
/// let document = ErrorDocument::from_error(&error);
/// assert_eq!(document.class_name, "payments::GatewayError");
/// assert_eq!(document.parent_exceptions.len(), 1);
///
/// let json = serde_json::to_value(&document).unwrap();
/// assert_eq!(json["ivars"]["attempt"], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorDocument {
    /// Type name of the root error.
    pub class_name: String,
    /// Message of the root error, if any.
    pub message: Option<String>,
    /// Stack of the root error.
    pub backtraces: Vec<ThreadSnapshot>,
    /// Captured fields of the root error.
    pub ivars: FieldSnapshot,
    /// The causes of the root error, nearest first.
    pub parent_exceptions: Vec<NestedError>,
}

impl ErrorDocument {
    /// Describes `error` using the default configuration.
    pub fn from_error(error: &dyn Introspect) -> Self {
        Self::from_error_with(&Introspector::DEFAULT, error)
    }

    /// Describes `error` using `introspector`.
    pub fn from_error_with(introspector: &Introspector, error: &dyn Introspect) -> Self {
        let mut parent_exceptions = Vec::new();
        introspector.collect_cause_chain(&mut parent_exceptions, Some(error));

        Self {
            class_name: error.type_name().into_owned(),
            message: error.message().map(|message| message.into_owned()),
            backtraces: introspector
                .extract_backtraces(Some(error))
                .unwrap_or_default(),
            ivars: introspector.extract_fields(Some(error)).unwrap_or_default(),
            parent_exceptions,
        }
    }
}
