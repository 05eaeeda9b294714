use crate::{
    Introspect,
    config::IntrospectorConfig,
    fields::{FieldSnapshot, snapshot_fields},
    frame::BacktraceEntry,
    nested::{CauseChain, NestedError},
    thread::ThreadSnapshot,
};

/// Extracts crash-report data from errors according to a configuration.
///
/// The free functions [`extract_backtraces`](crate::extract_backtraces),
/// [`extract_fields`](crate::extract_fields) and
/// [`collect_cause_chain`](crate::collect_cause_chain) use
/// [`Introspector::DEFAULT`]. Use an `Introspector` directly to run with an
/// explicit configuration.
///
/// # Examples
///
/// ```
/// use squash_backtrace::{Exception, Introspector, config::IntrospectorConfig};
///
/// let introspector = Introspector::new(IntrospectorConfig {
///     max_cause_depth: 1,
///     ..IntrospectorConfig::DEFAULT
/// });
///
/// let error = Exception::new("app::Outer", "outer")
///     .with_cause(Exception::new("app::Middle", "middle").with_cause(Exception::new("app::Inner", "inner")));
///
/// let mut nested = Vec::new();
/// introspector.collect_cause_chain(&mut nested, Some(&error));
/// assert_eq!(nested.len(), 1);
/// assert_eq!(nested[0].class_name, "app::Middle");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Introspector {
    config: IntrospectorConfig,
}

impl Introspector {
    /// An introspector using [`IntrospectorConfig::DEFAULT`].
    pub const DEFAULT: Self = Self::new(IntrospectorConfig::DEFAULT);

    /// Creates an introspector using `config`.
    pub const fn new(config: IntrospectorConfig) -> Self {
        Self { config }
    }

    /// The configuration this introspector runs with.
    pub fn config(&self) -> &IntrospectorConfig {
        &self.config
    }

    /// Captures the stack of `error` as seen from the calling thread.
    ///
    /// Returns `None` for a missing error. Otherwise returns exactly one
    /// [`ThreadSnapshot`] named after the calling thread, holding every frame
    /// of the error's stack in order. An empty stack yields an empty frame
    /// list, never `None`.
    pub fn extract_backtraces(
        &self,
        error: Option<&dyn Introspect>,
    ) -> Option<Vec<ThreadSnapshot>> {
        let error = error?;
        let frames = error
            .stack_trace()
            .iter()
            .map(BacktraceEntry::from)
            .collect();
        Some(vec![ThreadSnapshot::current(frames)])
    }

    /// Captures the fields `error` declares.
    ///
    /// Returns `None` for a missing error. Static fields and fields whose
    /// name starts with an excluded prefix are skipped; a field that cannot
    /// be read is stored as a placeholder string describing the failure.
    pub fn extract_fields(&self, error: Option<&dyn Introspect>) -> Option<FieldSnapshot> {
        let error = error?;
        Some(snapshot_fields(
            error.declared_fields(),
            self.config.excluded_field_prefixes,
        ))
    }

    /// Appends one [`NestedError`] per cause of `error` to `accumulator`,
    /// nearest cause first.
    ///
    /// `error` itself is not recorded. Entries already in `accumulator` are
    /// kept. Cycles in the cause chain end the traversal at the first repeat,
    /// and at most `max_cause_depth` causes are recorded.
    pub fn collect_cause_chain(
        &self,
        accumulator: &mut Vec<NestedError>,
        error: Option<&dyn Introspect>,
    ) {
        let Some(error) = error else {
            return;
        };

        for cause in CauseChain::new(error, self.config.max_cause_depth) {
            tracing::trace!(error_type = %cause.type_name(), "collecting nested error");
            accumulator.push(self.nested_error(cause));
        }
    }

    fn nested_error(&self, cause: &dyn Introspect) -> NestedError {
        NestedError {
            class_name: cause.type_name().into_owned(),
            message: cause.message().map(|message| message.into_owned()),
            backtraces: self.extract_backtraces(Some(cause)).unwrap_or_default(),
            ivars: self.extract_fields(Some(cause)).unwrap_or_default(),
        }
    }
}
