//! Driven ports for the client core.
//!
//! Adapters in [`crate::outbound`] implement these traits; the fixtures
//! defined beside each port serve tests and offline runs.

mod macros;
pub(crate) use macros::define_port_error;

mod api_gateway;
mod content_view_sink;
mod flag_store;

#[cfg(test)]
pub use api_gateway::MockApiGateway;
pub use api_gateway::{ApiGateway, ApiMethod, ApiRequest, FetchError, FixtureApiGateway};
#[cfg(test)]
pub use content_view_sink::MockContentViewSink;
pub use content_view_sink::{ContentView, ContentViewSink, FixtureContentViewSink};
#[cfg(test)]
pub use flag_store::MockFlagStore;
pub use flag_store::{FlagStore, FlagStoreError, FixtureFlagStore};
