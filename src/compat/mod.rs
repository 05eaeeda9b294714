//! Conversions from other error handling libraries.
//!
//! # Available Integrations
//!
//! - `anyhow1` - Converts `anyhow` 1.x errors (requires the
//!   `compat-anyhow1` feature flag)
//! - `eyre06` - Converts `eyre` 0.6.x reports (requires the `compat-eyre06`
//!   feature flag)
//!
//! Plain [`core::error::Error`] values need no feature flag; use
//! [`Exception::from_error`].
//!
//! Errors from these libraries are type-erased, so the converted root is named
//! after the library's error type and every cause is named
//! [`ERASED_TYPE_NAME`](crate::exception::ERASED_TYPE_NAME). The root records
//! the stack of the conversion site. [`Exception`]s found in the chain are
//! kept whole, with their type name, fields, stack and causes.

#[cfg(feature = "compat-anyhow1")]
pub mod anyhow1;
#[cfg(feature = "compat-eyre06")]
pub mod eyre06;

use crate::Exception;

/// Converts external error types into [`Exception`]s.
///
/// Implemented for the error types of the supported libraries and for
/// `Result`s carrying them.
pub trait IntoException {
    /// The type produced by the conversion.
    type Output;

    /// Performs the conversion.
    fn into_exception(self) -> Self::Output;
}

impl<T, E: IntoException<Output = Exception>> IntoException for Result<T, E> {
    type Output = Result<T, Exception>;

    #[inline(always)]
    fn into_exception(self) -> Self::Output {
        self.map_err(IntoException::into_exception)
    }
}
