//! Best-effort page-dump sinks.
//!
//! The orchestrator persists the last page each tier saw so a failed or
//! surprising scrape can be inspected afterwards. Dumps are debug
//! artifacts: a write failure is logged and swallowed, and a scraper built
//! without a path gets the no-op sink, so nothing here can affect a
//! request's outcome.

use std::path::PathBuf;

/// A write-or-ignore sink for page content.
pub trait ArtifactSink: Send + Sync {
    /// Persist page HTML; failures must be absorbed by the implementation.
    fn persist(&self, html: &str);
}

/// Sink that writes to a fixed file path, overwriting previous content.
pub struct FileDump {
    path: PathBuf,
}

impl FileDump {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ArtifactSink for FileDump {
    fn persist(&self, html: &str) {
        if let Err(e) = std::fs::write(&self.path, html) {
            tracing::debug!("page dump to {} failed: {e}", self.path.display());
        }
    }
}

/// Sink that drops everything.
pub struct NoDump;

impl ArtifactSink for NoDump {
    fn persist(&self, _html: &str) {}
}

/// Build a sink for an optional configured path.
pub fn sink_for(path: Option<PathBuf>) -> Box<dyn ArtifactSink> {
    match path {
        Some(path) => Box::new(FileDump::new(path)),
        None => Box::new(NoDump),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_dump_writes_content() {
        let path = std::env::temp_dir().join("sentio_dump_test.html");
        let sink = FileDump::new(path.clone());
        sink.persist("<html>dump</html>");

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "<html>dump</html>");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_dump_swallows_write_failure() {
        let sink = FileDump::new(PathBuf::from("/nonexistent-dir/sentio/dump.html"));
        sink.persist("<html></html>");
    }

    #[test]
    fn test_sink_for_none_is_noop() {
        let sink = sink_for(None);
        sink.persist("<html></html>");
    }
}
