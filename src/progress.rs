use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of one progress event, mirrored in the operator-facing log styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One timestamped entry in the analysis narration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressEvent {
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub severity: Severity,
}

/// Ordered, append-only event log scoped to one analysis run.
///
/// Events are appended in strict causal order by the pipeline stage that
/// produced them; the log is cleared wholesale when a new run starts, never
/// merged with a previous run's entries.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProgressLog {
    events: Vec<ProgressEvent>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(?severity, "{text}");
        self.events.push(ProgressEvent {
            timestamp: Utc::now(),
            text,
            severity,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Severity::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Severity::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Severity::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Severity::Error, text);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&ProgressEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True if any event of the given severity mentions `needle`.
    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.events
            .iter()
            .any(|e| e.severity == severity && e.text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_keep_append_order() {
        let mut log = ProgressLog::new();
        log.info("first");
        log.success("second");
        log.warning("third");

        let texts: Vec<&str> = log.events().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(log.last().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut log = ProgressLog::new();
        log.error("boom");
        assert!(!log.is_empty());

        log.clear();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }

    #[test]
    fn test_contains_matches_severity_and_text() {
        let mut log = ProgressLog::new();
        log.warning("No GPS coordinates found in metadata");

        assert!(log.contains(Severity::Warning, "No GPS coordinates"));
        assert!(!log.contains(Severity::Error, "No GPS coordinates"));
        assert!(!log.contains(Severity::Warning, "unsupported format"));
    }

    #[test]
    fn test_timestamps_are_monotonic_enough() {
        let mut log = ProgressLog::new();
        log.info("a");
        log.info("b");
        let events = log.events();
        assert!(events[0].timestamp <= events[1].timestamp);
    }
}
