//! Per-thread backtrace snapshots.

use serde::{Serialize, Serializer, ser::SerializeTuple};

use crate::frame::BacktraceEntry;

/// Name reported for threads that were spawned without a name.
pub const UNNAMED_THREAD: &str = "<unnamed>";

/// The stack of one thread at the time an error was captured.
///
/// Serializes as the three element array `[thread_name, is_current, frames]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadSnapshot {
    /// Name of the thread.
    pub thread_name: String,
    /// Whether this is the thread that performed the extraction.
    pub is_current: bool,
    /// Frames, innermost call first.
    pub frames: Vec<BacktraceEntry>,
}

impl ThreadSnapshot {
    /// Creates a snapshot attributed to the calling thread.
    pub fn current(frames: Vec<BacktraceEntry>) -> Self {
        Self {
            thread_name: current_thread_name(),
            is_current: true,
            frames,
        }
    }
}

impl Serialize for ThreadSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.thread_name)?;
        tuple.serialize_element(&self.is_current)?;
        tuple.serialize_element(&self.frames)?;
        tuple.end()
    }
}

fn current_thread_name() -> String {
    std::thread::current()
        .name()
        .unwrap_or(UNNAMED_THREAD)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_thread() {
        let snapshot = std::thread::Builder::new()
            .name("squash-uploader".into())
            .spawn(|| ThreadSnapshot::current(Vec::new()))
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(snapshot.thread_name, "squash-uploader");
        assert!(snapshot.is_current);
    }

    #[test]
    fn test_unnamed_thread() {
        let snapshot = std::thread::spawn(|| ThreadSnapshot::current(Vec::new()))
            .join()
            .unwrap();
        assert_eq!(snapshot.thread_name, UNNAMED_THREAD);
    }

    #[test]
    fn test_serializes_as_triple() {
        let snapshot = ThreadSnapshot {
            thread_name: "main".into(),
            is_current: true,
            frames: Vec::new(),
        };
        assert_eq!(serde_json::to_string(&snapshot).unwrap(), r#"["main",true,[]]"#);
    }
}
