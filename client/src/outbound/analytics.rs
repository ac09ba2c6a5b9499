//! Content view sink that emits structured log events.

use tracing::info;

use crate::domain::ports::{ContentView, ContentViewSink};

/// Writes each content view as an `info` event on the `compass::analytics`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingContentViewSink;

impl ContentViewSink for TracingContentViewSink {
    fn record(&self, view: &ContentView) {
        info!(
            target: "compass::analytics",
            title = %view.title,
            content_type = view.content_type,
            content_id = %view.content_id,
            duration_secs = view.duration_secs,
            "content viewed"
        );
    }
}
