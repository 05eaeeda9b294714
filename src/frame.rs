//! Stack frames, as exposed by errors and as sent to the backend.
//!
//! A [`StackFrame`] is what an error reports about one call on its stack. A
//! [`BacktraceEntry`] is the same frame shaped for the Squash wire format,
//! tagged with [`ORIGIN_TAG`].

use serde::{Serialize, Serializer, ser::SerializeTuple};

/// Marker telling the Squash backend which symbolication convention applies
/// to a frame.
///
/// Every frame carries this literal regardless of the error type.
pub const ORIGIN_TAG: &str = "_JAVA_";

/// Line number reported when a frame has no line information.
pub const UNKNOWN_LINE: i32 = -1;

/// One frame of the call stack recorded by an error.
///
/// Frames are ordered innermost call first.
///
/// # Examples
///
/// ```
/// use squash_backtrace::frame::StackFrame;
///
/// let frame = StackFrame::new("billing::Invoice", "finalize")
///     .with_location("src/invoice.rs", 88);
/// assert_eq!(frame.file_name.as_deref(), Some("src/invoice.rs"));
/// assert_eq!(frame.line_number, 88);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StackFrame {
    /// Source file of the frame, if known.
    pub file_name: Option<String>,
    /// Line within [`file_name`](Self::file_name), or a negative number if
    /// unknown.
    pub line_number: i32,
    /// Name of the called function or method.
    pub method_name: String,
    /// Path of the type or module declaring the method.
    pub declaring_type_name: String,
}

impl StackFrame {
    /// Creates a frame without location information.
    pub fn new(declaring_type_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            file_name: None,
            line_number: UNKNOWN_LINE,
            method_name: method_name.into(),
            declaring_type_name: declaring_type_name.into(),
        }
    }

    /// Sets the source location of the frame.
    #[must_use]
    pub fn with_location(mut self, file_name: impl Into<String>, line_number: i32) -> Self {
        self.file_name = Some(file_name.into());
        self.line_number = line_number;
        self
    }
}

/// A stack frame in the shape the Squash backend expects.
///
/// Serializes as the five element array
/// `[origin_tag, file_name, line_number, method_name, class_name]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceEntry {
    /// Always [`ORIGIN_TAG`].
    pub origin_tag: &'static str,
    /// Source file of the frame, if known.
    pub file_name: Option<String>,
    /// Line number, negative if unknown.
    pub line_number: i32,
    /// Name of the called method.
    pub method_name: String,
    /// Name of the declaring type.
    pub class_name: String,
}

impl From<&StackFrame> for BacktraceEntry {
    fn from(frame: &StackFrame) -> Self {
        Self {
            origin_tag: ORIGIN_TAG,
            file_name: frame.file_name.clone(),
            line_number: frame.line_number,
            method_name: frame.method_name.clone(),
            class_name: frame.declaring_type_name.clone(),
        }
    }
}

impl Serialize for BacktraceEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(5)?;
        tuple.serialize_element(self.origin_tag)?;
        tuple.serialize_element(&self.file_name)?;
        tuple.serialize_element(&self.line_number)?;
        tuple.serialize_element(&self.method_name)?;
        tuple.serialize_element(&self.class_name)?;
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_copies_every_attribute() {
        let frame = StackFrame::new("ledger::Account", "debit").with_location("account.rs", 12);
        let entry = BacktraceEntry::from(&frame);

        assert_eq!(entry.origin_tag, "_JAVA_");
        assert_eq!(entry.file_name.as_deref(), Some("account.rs"));
        assert_eq!(entry.line_number, 12);
        assert_eq!(entry.method_name, "debit");
        assert_eq!(entry.class_name, "ledger::Account");
    }

    #[test]
    fn test_entry_serializes_as_five_tuple() {
        let entry = BacktraceEntry::from(&StackFrame::new("ledger::Account", "credit"));
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"["_JAVA_",null,-1,"credit","ledger::Account"]"#
        );
    }
}
