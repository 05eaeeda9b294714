use std::borrow::Cow;

use crate::{fields::DeclaredField, frame::StackFrame};

/// Capability of an error to describe itself to the crash reporter.
///
/// Implementors expose their type name, message, recorded call stack, the
/// error that caused them, and optionally the fields they want included in
/// reports. Fields are never read behind the error's back: only what
/// [`declared_fields`](Self::declared_fields) hands out ends up in a report.
///
/// Most applications use [`Exception`](crate::Exception), which implements
/// this trait and records its stack when created. Custom error types can
/// implement it directly:
///
/// ```
/// use std::borrow::Cow;
///
/// use squash_backtrace::{Introspect, fields::DeclaredField, frame::StackFrame};
///
/// struct QuotaExceeded {
///     limit: u32,
///     stack: Vec<StackFrame>,
/// }
///
/// impl Introspect for QuotaExceeded {
///     fn message(&self) -> Option<Cow<'_, str>> {
///         Some(format!("quota of {} exceeded", self.limit).into())
///     }
///
///     fn stack_trace(&self) -> &[StackFrame] {
///         &self.stack
///     }
///
///     fn cause(&self) -> Option<&dyn Introspect> {
///         None
///     }
///
///     fn declared_fields(&self) -> Vec<DeclaredField<'_>> {
///         vec![DeclaredField::instance("limit", self.limit)]
///     }
/// }
/// ```
pub trait Introspect {
    /// Fully qualified name of the error's type.
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(core::any::type_name::<Self>())
    }

    /// Human readable message, if the error has one.
    fn message(&self) -> Option<Cow<'_, str>>;

    /// Frames recorded when the error was created, innermost call first.
    fn stack_trace(&self) -> &[StackFrame];

    /// The error that caused this one.
    fn cause(&self) -> Option<&dyn Introspect>;

    /// Fields declared directly by this error's type.
    ///
    /// Inherited or wrapped state is not included; wrapped errors belong in
    /// [`cause`](Self::cause).
    fn declared_fields(&self) -> Vec<DeclaredField<'_>> {
        Vec::new()
    }
}

impl<T: Introspect + ?Sized> Introspect for Box<T> {
    fn type_name(&self) -> Cow<'_, str> {
        (**self).type_name()
    }

    fn message(&self) -> Option<Cow<'_, str>> {
        (**self).message()
    }

    fn stack_trace(&self) -> &[StackFrame] {
        (**self).stack_trace()
    }

    fn cause(&self) -> Option<&dyn Introspect> {
        (**self).cause()
    }

    fn declared_fields(&self) -> Vec<DeclaredField<'_>> {
        (**self).declared_fields()
    }
}
