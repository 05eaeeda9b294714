//! A general purpose error that records its stack when created.

use std::{borrow::Cow, fmt};

use crate::{
    Introspect,
    fields::{DeclaredField, FieldKind},
    frame::StackFrame,
    value::Value,
};

/// Type name given to errors whose concrete type was erased, such as the
/// sources of a [`core::error::Error`] chain.
pub const ERASED_TYPE_NAME: &str = "core::error::Error";

/// An error carrying everything the crash reporter needs.
///
/// With the `capture` feature enabled (the default), [`Exception::new`]
/// records the call stack of the place where it is called, filtered by
/// [`CaptureFilter::DEFAULT`](crate::config::CaptureFilter::DEFAULT).
///
/// # Examples
///
/// ```
/// use squash_backtrace::{Exception, Introspect};
///
/// let error = Exception::new("storage::WriteFailed", "disk full")
///     .with_field("bytes_requested", 4096u32)
///     .with_hidden_field("credentials")
///     .with_cause(Exception::new("std::io::Error", "No space left on device"));
///
/// assert_eq!(error.type_name(), "storage::WriteFailed");
/// assert_eq!(error.to_string(), "disk full");
/// assert!(error.cause().is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Exception {
    type_name: Cow<'static, str>,
    message: Option<String>,
    stack: Vec<StackFrame>,
    fields: Vec<ExposedField>,
    cause: Option<Box<Exception>>,
}

#[derive(Clone, Debug, PartialEq)]
enum ExposedField {
    Visible(String, Value),
    Hidden(String),
}

impl Exception {
    /// Creates an exception with a message, recording the current stack.
    pub fn new(type_name: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::build(type_name.into(), Some(message.into()))
    }

    /// Creates an exception without a message, recording the current stack.
    pub fn without_message(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self::build(type_name.into(), None)
    }

    fn build(type_name: Cow<'static, str>, message: Option<String>) -> Self {
        Self {
            type_name,
            message,
            stack: current_stack(),
            fields: Vec::new(),
            cause: None,
        }
    }

    /// Converts an error and its [`source`](core::error::Error::source)
    /// chain.
    ///
    /// The root keeps the name of `E` and the stack of the conversion site.
    /// Sources are named [`ERASED_TYPE_NAME`] and carry no frames, since
    /// neither their type nor their origin survives type erasure. An
    /// `Exception` found anywhere in the chain is kept as is, together with
    /// its own causes.
    ///
    /// ```
    /// use squash_backtrace::{Exception, Introspect};
    ///
    /// let io = std::io::Error::other("broken pipe");
    /// let error = Exception::from_error(&io);
    ///
    /// assert_eq!(error.type_name(), "std::io::error::Error");
    /// assert_eq!(error.message().as_deref(), Some("broken pipe"));
    /// ```
    pub fn from_error<E: core::error::Error + 'static>(error: &E) -> Self {
        let error: &(dyn core::error::Error + 'static) = error;
        if let Some(exception) = error.downcast_ref::<Self>() {
            return exception.clone();
        }

        Self::new(core::any::type_name::<E>(), error.to_string())
            .with_source_chain(core::iter::successors(error.source(), |e| e.source()))
    }

    /// Sets the cause to a chain of type-erased errors, given outermost
    /// first.
    ///
    /// Errors that are `Exception`s end the chain: they are cloned with their
    /// own causes instead of being erased.
    pub(crate) fn with_source_chain<'a>(
        mut self,
        chain: impl Iterator<Item = &'a (dyn core::error::Error + 'static)>,
    ) -> Self {
        let mut links = Vec::new();
        let mut tail = None;
        for error in chain {
            if let Some(exception) = error.downcast_ref::<Self>() {
                tail = Some(Box::new(exception.clone()));
                break;
            }
            links.push(Self::erased(error));
        }

        self.cause = links.into_iter().rev().fold(tail, |cause, mut link| {
            link.cause = cause;
            Some(Box::new(link))
        });
        self
    }

    fn erased(error: &dyn core::error::Error) -> Self {
        Self {
            type_name: Cow::Borrowed(ERASED_TYPE_NAME),
            message: Some(error.to_string()),
            stack: Vec::new(),
            fields: Vec::new(),
            cause: None,
        }
    }

    /// Replaces the recorded stack.
    #[must_use]
    pub fn with_stack(mut self, frames: Vec<StackFrame>) -> Self {
        self.stack = frames;
        self
    }

    /// Exposes an instance field to crash reports.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .push(ExposedField::Visible(name.into(), value.into()));
        self
    }

    /// Declares a field whose value must not leave the process. Reports
    /// contain a placeholder instead.
    #[must_use]
    pub fn with_hidden_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(ExposedField::Hidden(name.into()));
        self
    }

    /// Sets the error that caused this one.
    #[must_use]
    pub fn with_cause(mut self, cause: Exception) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

#[cfg(feature = "capture")]
fn current_stack() -> Vec<StackFrame> {
    crate::capture::NativeStack::capture(&crate::config::CaptureFilter::DEFAULT).frames
}

#[cfg(not(feature = "capture"))]
fn current_stack() -> Vec<StackFrame> {
    Vec::new()
}

impl Introspect for Exception {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.type_name)
    }

    fn message(&self) -> Option<Cow<'_, str>> {
        self.message.as_deref().map(Cow::Borrowed)
    }

    fn stack_trace(&self) -> &[StackFrame] {
        &self.stack
    }

    fn cause(&self) -> Option<&dyn Introspect> {
        self.cause.as_deref().map(|cause| cause as &dyn Introspect)
    }

    fn declared_fields(&self) -> Vec<DeclaredField<'_>> {
        self.fields
            .iter()
            .map(|field| match field {
                ExposedField::Visible(name, value) => {
                    DeclaredField::new(name.as_str(), FieldKind::Instance, || Ok(value.clone()))
                }
                ExposedField::Hidden(name) => DeclaredField::hidden(name.as_str()),
            })
            .collect()
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str(&self.type_name),
        }
    }
}

impl core::error::Error for Exception {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn core::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("config rejected")]
    struct ConfigError {
        #[source]
        source: ParseError,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("unexpected token at line {line}")]
    struct ParseError {
        line: u32,
    }

    #[test]
    fn test_exception_send_sync() {
        static_assertions::assert_impl_all!(Exception: Send, Sync, Clone);
    }

    #[test]
    fn test_from_error_keeps_source_chain() {
        let error = ConfigError {
            source: ParseError { line: 7 },
        };
        let exception = Exception::from_error(&error);

        assert_eq!(
            exception.type_name(),
            "squash_backtrace::exception::tests::ConfigError"
        );
        assert_eq!(exception.message().as_deref(), Some("config rejected"));

        let cause = exception.cause().unwrap();
        assert_eq!(cause.type_name(), ERASED_TYPE_NAME);
        assert_eq!(
            cause.message().as_deref(),
            Some("unexpected token at line 7")
        );
        assert!(cause.stack_trace().is_empty());
        assert!(cause.cause().is_none());
    }

    #[test]
    fn test_from_error_keeps_exceptions() {
        let inner = Exception::new("app::Inner", "inner").with_field("order_id", 7);
        let outer = Exception::new("app::Outer", "outer").with_cause(inner.clone());

        assert_eq!(Exception::from_error(&outer), outer);

        let wrapped = ConfigSourceError { source: outer.clone() };
        let exception = Exception::from_error(&wrapped);
        assert_eq!(
            exception.type_name(),
            "squash_backtrace::exception::tests::ConfigSourceError"
        );
        assert_eq!(exception.cause.as_deref(), Some(&outer));

        let cause = exception.cause().unwrap().cause().unwrap();
        assert_eq!(cause.type_name(), "app::Inner");
        assert_eq!(cause.declared_fields().len(), 1);
        assert_eq!(cause.stack_trace(), inner.stack_trace());
    }

    #[derive(Debug, thiserror::Error)]
    #[error("settings unavailable")]
    struct ConfigSourceError {
        #[source]
        source: Exception,
    }

    #[test]
    fn test_source_follows_cause() {
        let error = Exception::new("outer", "outer").with_cause(Exception::new("inner", "inner"));
        let source = core::error::Error::source(&error).unwrap();
        assert_eq!(source.to_string(), "inner");
    }

    #[test]
    fn test_display_without_message_uses_type_name() {
        assert_eq!(
            Exception::without_message("app::Interrupted").to_string(),
            "app::Interrupted"
        );
    }

    #[test]
    fn test_with_stack_replaces_frames() {
        let frames = vec![StackFrame::new("app::Job", "run").with_location("job.rs", 3)];
        let error = Exception::new("app::JobFailed", "job failed").with_stack(frames.clone());
        assert_eq!(error.stack_trace(), frames.as_slice());
    }
}
