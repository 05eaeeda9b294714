#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Structured error introspection for the Squash crash-reporting backend.
//!
//! ## Overview
//!
//! This crate turns a runtime error into the data a Squash backend needs to
//! file a crash: the name of the calling thread, the error's call stack, the
//! fields the error chooses to expose, and the chain of errors that caused
//! it. The result is plain data implementing [`serde::Serialize`]; encoding
//! and transport are left to the caller.
//!
//! ## Quick Example
//!
//! ```
//! use squash_backtrace::{ErrorDocument, Exception};
//!
//! let error = Exception::new("checkout::PaymentDeclined", "card declined")
//!     .with_field("order_id", 1042)
//!     .with_cause(Exception::new("gateway::Timeout", "no response after 30s"));
//!
//! let document = ErrorDocument::from_error(&error);
//! let json = serde_json::to_string(&document).unwrap();
//! assert!(json.contains(r#""class_name":"checkout::PaymentDeclined""#));
//! ```
//!
//! ## Core Concepts
//!
//! Errors describe themselves through the [`Introspect`] trait: a type name,
//! an optional message, the frames recorded when the error was created, an
//! optional cause, and the fields it declares. [`Exception`] implements it and
//! records the native stack when created (feature `capture`, enabled by
//! default); custom error types can implement it directly.
//!
//! Three operations read an error:
//!
//! - [`extract_backtraces`] produces one [`ThreadSnapshot`] for the calling
//!   thread holding every frame of the error, each tagged with
//!   [`ORIGIN_TAG`](frame::ORIGIN_TAG).
//! - [`extract_fields`] produces a [`FieldSnapshot`], skipping static fields
//!   and fields injected by test doubles, and turning unreadable fields into
//!   placeholder strings.
//! - [`collect_cause_chain`] appends one [`NestedError`] per cause, nearest
//!   first. Cycles and overly deep chains end the traversal instead of
//!   looping.
//!
//! None of them fail: a missing error yields `None` (or leaves the
//! accumulator untouched), and every other problem is recorded as data.
//!
//! [`ErrorDocument`] bundles all three for a root error.
//!
//! ## Wire Shape
//!
//! | item          | serialized as                                                  |
//! |---------------|----------------------------------------------------------------|
//! | thread        | `[thread_name, is_current, frames]`                            |
//! | frame         | `["_JAVA_", file_name, line_number, method_name, class_name]`  |
//! | fields        | `{ name: value, .. }`                                          |
//! | nested error  | `{ "class_name", "message", "backtraces", "ivars" }`           |
//!
//! ## Configuration
//!
//! Defaults work for most applications. See [`config`] for tuning the
//! traversal depth, excluded field prefixes and stack capture, then run the
//! operations through an [`Introspector`] built from that configuration.

#[cfg(feature = "capture")]
#[cfg_attr(docsrs, doc(cfg(feature = "capture")))]
pub mod capture;
pub mod compat;
pub mod config;
mod document;
pub mod exception;
pub mod fields;
pub mod frame;
mod introspect;
mod introspector;
pub mod nested;
pub mod thread;
pub mod value;

pub use self::{
    document::ErrorDocument,
    exception::Exception,
    fields::FieldSnapshot,
    introspect::Introspect,
    introspector::Introspector,
    nested::NestedError,
    thread::ThreadSnapshot,
    value::Value,
};

/// Captures the stack of `error` as seen from the calling thread, using the
/// default configuration.
///
/// See [`Introspector::extract_backtraces`].
pub fn extract_backtraces(error: Option<&dyn Introspect>) -> Option<Vec<ThreadSnapshot>> {
    Introspector::DEFAULT.extract_backtraces(error)
}

/// Captures the fields `error` declares, using the default configuration.
///
/// See [`Introspector::extract_fields`].
pub fn extract_fields(error: Option<&dyn Introspect>) -> Option<FieldSnapshot> {
    Introspector::DEFAULT.extract_fields(error)
}

/// Appends one [`NestedError`] per cause of `error` to `accumulator`, using
/// the default configuration.
///
/// See [`Introspector::collect_cause_chain`].
pub fn collect_cause_chain(accumulator: &mut Vec<NestedError>, error: Option<&dyn Introspect>) {
    Introspector::DEFAULT.collect_cause_chain(accumulator, error);
}
