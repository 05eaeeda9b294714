//! Integration with the [`eyre`] 0.6.x error reporting library.
//!
//! ```
//! use squash_backtrace::{ErrorDocument, compat::IntoException};
//!
//! fn load() -> eyre::Result<()> {
//!     let io = std::io::Error::other("permission denied");
//!     Err(eyre::Report::new(io).wrap_err("failed to load settings"))
//! }
//!
//! let error = load().into_exception().unwrap_err();
//! let document = ErrorDocument::from_error(&error);
//!
//! assert_eq!(document.class_name, "eyre::Report");
//! assert_eq!(document.message.as_deref(), Some("failed to load settings"));
//! assert_eq!(document.parent_exceptions[0].message.as_deref(), Some("permission denied"));
//! ```

use super::IntoException;
use crate::Exception;

/// Type name given to converted [`eyre::Report`] roots.
pub const EYRE_TYPE_NAME: &str = "eyre::Report";

impl IntoException for eyre::Report {
    type Output = Exception;

    fn into_exception(self) -> Self::Output {
        let root = self.chain().next();
        if let Some(exception) = root.and_then(|root| root.downcast_ref::<Exception>()) {
            return Exception::clone(exception);
        }
        Exception::new(EYRE_TYPE_NAME, self.to_string()).with_source_chain(self.chain().skip(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Introspect;

    #[test]
    fn test_context_layers_become_causes() {
        let error = eyre::eyre!("disk unplugged")
            .wrap_err("write failed")
            .wrap_err("save aborted");
        let exception = error.into_exception();

        assert_eq!(exception.type_name(), EYRE_TYPE_NAME);
        assert_eq!(exception.message().as_deref(), Some("save aborted"));

        let first = exception.cause().unwrap();
        let second = first.cause().unwrap();
        assert_eq!(first.message().as_deref(), Some("write failed"));
        assert_eq!(second.message().as_deref(), Some("disk unplugged"));
        assert!(second.cause().is_none());
    }

    #[test]
    fn test_wrapped_exception_survives() {
        let original = Exception::new("app::Inner", "inner").with_field("order_id", 7);

        let exception = eyre::Report::new(original.clone()).into_exception();
        assert_eq!(exception, original);

        let exception = eyre::Report::new(original.clone())
            .wrap_err("outer")
            .into_exception();
        assert_eq!(exception.type_name(), EYRE_TYPE_NAME);
        assert_eq!(exception.message().as_deref(), Some("outer"));

        let cause = exception.cause().unwrap();
        assert_eq!(cause.type_name(), "app::Inner");
        assert_eq!(cause.declared_fields().len(), 1);
        assert_eq!(cause.stack_trace(), original.stack_trace());
    }
}
