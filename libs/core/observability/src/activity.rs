//! Activity-log metrics.
//!
//! The log reader and undo engine deliberately no-op in two situations
//! (unknown event values, stale undo guards). These counters make those
//! paths visible instead of silent.

use metrics::counter;

/// Activity log metrics recorder
pub struct ActivityMetrics;

impl ActivityMetrics {
    /// Record one appended log entry.
    pub fn record_entry(event: &str, kind: &str) {
        counter!(
            "activity_log_entries_total",
            "event" => event.to_string(),
            "kind" => kind.to_string()
        )
        .increment(1);
    }

    /// Record a listed entry whose event has no description template.
    pub fn record_render_unknown(event: &str) {
        counter!(
            "activity_log_render_unknown_total",
            "event" => event.to_string()
        )
        .increment(1);

        tracing::debug!(event = event, "No description template for event");
    }

    /// Record a completed undo.
    pub fn record_undo(event: &str) {
        counter!("activity_log_undo_total", "event" => event.to_string()).increment(1);
    }

    /// Record an undo skipped because the target entity was no longer in
    /// the deleted state the event produced.
    pub fn record_undo_stale(event: &str) {
        counter!(
            "activity_log_undo_stale_total",
            "event" => event.to_string()
        )
        .increment(1);

        tracing::debug!(event = event, "Undo skipped: target not in expected state");
    }

    /// Record an undo requested for an event with no registered handler.
    pub fn record_undo_unsupported(event: &str) {
        counter!(
            "activity_log_undo_unsupported_total",
            "event" => event.to_string()
        )
        .increment(1);

        tracing::debug!(event = event, "Undo skipped: no handler for event");
    }
}
