//! Status line sink for non-fatal pipeline events.

/// Receives recoverable warnings raised while the pipeline runs.
///
/// The binary prints them as `[WARN]` lines; tests collect them.
pub trait StatusReporter {
    /// Report a recoverable problem.
    fn warn(&mut self, message: &str);
}

impl StatusReporter for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(message.to_string());
    }
}
