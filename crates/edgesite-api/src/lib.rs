// edgesite-api: Async Rust client for the edge-site control-plane API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ControlPlaneClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
