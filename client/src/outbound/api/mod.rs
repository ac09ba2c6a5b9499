//! Compass REST API adapters.

mod http_gateway;

pub use http_gateway::HttpApiGateway;
