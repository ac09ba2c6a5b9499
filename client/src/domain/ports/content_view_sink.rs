//! Port receiving "content viewed" analytics records.

use std::sync::{Mutex, PoisonError};

use crate::domain::EntityId;

/// How long a user looked at one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentView {
    /// Content title at the time it was viewed.
    pub title: String,
    /// Content type label (`"Goal"`).
    pub content_type: &'static str,
    /// Identifier of the viewed entity.
    pub content_id: EntityId,
    /// Foreground time in whole seconds.
    pub duration_secs: u64,
}

/// Destination for content view records.
#[cfg_attr(test, mockall::automock)]
pub trait ContentViewSink: Send + Sync {
    /// Record one finished view.
    fn record(&self, view: &ContentView);
}

/// Sink that keeps records in memory.
#[derive(Debug, Default)]
pub struct FixtureContentViewSink {
    views: Mutex<Vec<ContentView>>,
}

impl FixtureContentViewSink {
    /// Views recorded so far.
    #[must_use]
    pub fn views(&self) -> Vec<ContentView> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ContentViewSink for FixtureContentViewSink {
    fn record(&self, view: &ContentView) {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view.clone());
    }
}
