//! # sheercloud
//!
//! Async client library for the SheerCloud file storage and render-job
//! service.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **One request at a time** - a client performs a single network
//!   operation at once and fails fast if a second one is started
//! - **Event-driven** - transfer progress and completion are broadcast to
//!   subscribers, no polling required
//! - **Lenient by contract** - the service reports failures in response
//!   bodies, and the parsers mirror that instead of inventing stricter
//!   rules
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheercloud::{CloudClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CloudClient::new(Config {
//!         location: "https://cloud.example.com".to_string(),
//!         login: "user".to_string(),
//!         password: "pass".to_string(),
//!         ..Default::default()
//!     })?;
//!
//!     // Watch progress and completion events
//!     let mut events = client.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     client.authorize().await?;
//!     client.upload("scenes/box.txt", b"hello".to_vec()).await?;
//!     let listing = client.list("scenes/").await?;
//!     println!("{} files", listing.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Client facade and request lifecycle engine
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Wire codec: URL construction and response parsing
pub mod protocol;
/// Transport abstraction over HTTP
pub mod transport;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use client::CloudClient;
pub use config::Config;
pub use error::{Error, Result};
pub use protocol::{
    build_url, parse_auth_response, parse_job_poll_response, parse_job_submit_response,
    parse_list_response,
};
pub use transport::{HttpTransport, ProgressFn, Transport, TransportResponse};
pub use types::{CloudFile, Event, JobId, Operation};
