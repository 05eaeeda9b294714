//! Native stack capture.
//!
//! Walks the current call stack with the [`backtrace`] crate and turns every
//! resolved symbol into a [`StackFrame`]. Demangled symbols are split into
//! declaring path and method name:
//!
//! | symbol                                         | declaring type              | method          |
//! |------------------------------------------------|-----------------------------|-----------------|
//! | `billing::Invoice::finalize`                   | `billing::Invoice`          | `finalize`      |
//! | `<billing::Invoice as core::fmt::Display>::fmt`| `<billing::Invoice as core::fmt::Display>` | `fmt` |
//! | `billing::run::{{closure}}`                    | `billing::run`              | `{{closure}}`   |
//!
//! # Debugging symbols in release builds
//!
//! Frames only carry file names and line numbers when debug information is
//! available. For release builds:
//!
//! ```toml
//! [profile.release]
//! strip = false
//! debug = "line-tables-only"
//! ```

use std::sync::OnceLock;

use backtrace::BytesOrWideString;

use crate::{
    config::CaptureFilter,
    frame::{StackFrame, UNKNOWN_LINE},
};

/// Crates whose frames are dropped when they close out the stack.
const RUNTIME_CRATES: &[&str] = &["std", "core", "alloc"];

/// Frames of the current call stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeStack {
    /// Captured frames, innermost call first.
    pub frames: Vec<StackFrame>,
}

impl NativeStack {
    /// Captures the current stack, applying `filter`.
    ///
    /// # Examples
    ///
    /// ```
    /// use squash_backtrace::{capture::NativeStack, config::CaptureFilter};
    ///
    /// let stack = NativeStack::capture(&CaptureFilter::DEFAULT);
    /// assert!(stack.frames.len() <= CaptureFilter::DEFAULT.max_frame_count);
    /// ```
    pub fn capture(filter: &CaptureFilter) -> Self {
        let mut initial_filtering = !filter.skipped_initial_crates.is_empty();
        let mut frames: Vec<StackFrame> = Vec::new();

        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                // Frames without a symbol name say nothing useful.
                let Some(name) = symbol.name() else {
                    return;
                };
                let demangled = format!("{name:#}");
                let (declaring_type_name, method_name) = split_symbol(&demangled);

                if initial_filtering {
                    if filter
                        .skipped_initial_crates
                        .contains(&crate_name(declaring_type_name))
                    {
                        return;
                    }
                    initial_filtering = false;
                }

                if frames.len() >= filter.max_frame_count {
                    return;
                }

                frames.push(StackFrame {
                    file_name: symbol
                        .filename_raw()
                        .map(|path| display_path(path, filter.show_full_path)),
                    line_number: symbol
                        .lineno()
                        .and_then(|lineno| i32::try_from(lineno).ok())
                        .unwrap_or(UNKNOWN_LINE),
                    method_name: method_name.to_owned(),
                    declaring_type_name: declaring_type_name.to_owned(),
                });
            });

            true
        });

        if !filter.skipped_initial_crates.is_empty() {
            while let Some(last) = frames.last() {
                let crate_name = crate_name(&last.declaring_type_name);
                if crate_name.is_empty() || RUNTIME_CRATES.contains(&crate_name) {
                    frames.pop();
                } else {
                    break;
                }
            }
        }

        Self { frames }
    }
}

/// Splits a demangled symbol at its last top-level `::`.
///
/// Symbols without a path, such as `main` or `_start`, have an empty
/// declaring type.
fn split_symbol(symbol: &str) -> (&str, &str) {
    let mut angle_nesting_level = 0u64;
    let mut curly_nesting_level = 0u64;
    let mut previous = '\0';
    let mut split = None;

    for (i, c) in symbol.char_indices() {
        match c {
            '<' => angle_nesting_level = angle_nesting_level.saturating_add(1),
            // `->` inside `fn(..) -> T` does not close a generic list
            '>' if previous != '-' => angle_nesting_level = angle_nesting_level.saturating_sub(1),
            '{' => curly_nesting_level = curly_nesting_level.saturating_add(1),
            '}' => curly_nesting_level = curly_nesting_level.saturating_sub(1),
            ':' if previous == ':' && angle_nesting_level == 0 && curly_nesting_level == 0 => {
                split = Some(i - 1);
            }
            _ => {}
        }
        previous = c;
    }

    match split {
        Some(i) => (&symbol[..i], &symbol[i + 2..]),
        None => ("", symbol),
    }
}

/// The crate a declaring path belongs to: its first path segment, looking
/// through a leading `<` of qualified paths.
fn crate_name(declaring_type_name: &str) -> &str {
    let path = declaring_type_name.trim_start_matches('<');
    path.split_once("::").map_or(path, |(krate, _)| krate)
}

fn display_path(path: BytesOrWideString<'_>, show_full_path: bool) -> String {
    static REGEXES: OnceLock<[regex::Regex; 2]> = OnceLock::new();

    let raw_path = path.to_str_lossy().into_owned();
    if show_full_path {
        return raw_path;
    }

    let [std_regex, registry_regex] = REGEXES.get_or_init(|| {
        [
            // Matches Rust standard library paths:
            // - /lib/rustlib/src/rust/library/{std|core|alloc}/src/...
            // - /rustc/{40-char-hash}/library/{std|core|alloc}/src/...
            regex::Regex::new(
                r"(?:/lib/rustlib/src/rust|^/rustc/[0-9a-f]{40})/library/(std|core|alloc)/src/.*$",
            )
            .expect("built-in regex pattern for std library paths should be valid"),
            // Matches Cargo registry paths:
            // - /.cargo/registry/src/{index}-{16-char-hash}/{crate}-{version}/src/...
            regex::Regex::new(
                r"/\.cargo/registry/src/[^/]+-[0-9a-f]{16}/([^./]+-[0-9]+\.[^/]*/src/.*)$",
            )
            .expect("built-in regex pattern for cargo registry paths should be valid"),
        ]
    });

    let shortened = std_regex
        .captures(&raw_path)
        .or_else(|| registry_regex.captures(&raw_path))
        .and_then(|captures| captures.get(1))
        .map(|krate| raw_path[krate.start()..].to_owned());

    shortened.unwrap_or(raw_path)
}
