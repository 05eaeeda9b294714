//! Settings for extraction and stack capture.
//!
//! Configuration is a plain value: pass it to
//! [`Introspector::new`](crate::Introspector::new). The free functions and
//! [`Exception::new`](crate::Exception::new) use the defaults.
//!
//! # Quick Start
//!
//! ```
//! use squash_backtrace::{Introspector, config::IntrospectorConfig};
//!
//! let introspector = Introspector::new(IntrospectorConfig {
//!     max_cause_depth: 32,
//!     ..IntrospectorConfig::DEFAULT
//! });
//! assert_eq!(introspector.config().max_cause_depth, 32);
//! ```

use crate::fields::PROXY_FIELD_PREFIX;

/// Controls how native stacks are turned into frames.
///
/// Only used when the `capture` feature is enabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaptureFilter {
    /// Crates whose frames are dropped while they appear at the top of the
    /// stack (the capture machinery itself).
    pub skipped_initial_crates: &'static [&'static str],
    /// Maximum number of frames to keep.
    pub max_frame_count: usize,
    /// Whether to keep full file paths instead of shortening well-known
    /// prefixes.
    pub show_full_path: bool,
}

impl CaptureFilter {
    /// Default capture settings.
    pub const DEFAULT: Self = Self {
        skipped_initial_crates: &[
            "backtrace",
            "squash_backtrace",
            "core",
            "std",
            "alloc",
        ],
        max_frame_count: 64,
        show_full_path: false,
    };

    /// Keeps every frame with its full path.
    pub const UNFILTERED: Self = Self {
        skipped_initial_crates: &[],
        max_frame_count: usize::MAX,
        show_full_path: true,
    };
}

impl Default for CaptureFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings shared by every extraction.
///
/// # Examples
///
/// ```
/// use squash_backtrace::config::IntrospectorConfig;
///
/// let config = IntrospectorConfig {
///     max_cause_depth: 16,
///     ..IntrospectorConfig::DEFAULT
/// };
/// assert_eq!(config.excluded_field_prefixes, &["CGLIB"]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntrospectorConfig {
    /// Field names starting with any of these prefixes are left out of field
    /// snapshots.
    pub excluded_field_prefixes: &'static [&'static str],
    /// Maximum number of nested errors collected from one cause chain.
    pub max_cause_depth: usize,
    /// Native stack capture settings.
    pub capture: CaptureFilter,
}

impl IntrospectorConfig {
    /// Default settings.
    pub const DEFAULT: Self = Self {
        excluded_field_prefixes: &[PROXY_FIELD_PREFIX],
        max_cause_depth: 256,
        capture: CaptureFilter::DEFAULT,
    };
}

impl Default for IntrospectorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
