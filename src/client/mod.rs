//! SheerCloud client: the public facade over the request lifecycle engine.
//!
//! The `CloudClient` methods are organized by domain:
//! - [`files`] - authorize, upload, download, list, delete
//! - [`jobs`] - render job submission and polling
//! - [`engine`] - the single-flight request lifecycle engine

mod engine;
mod files;
mod jobs;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::Result;
use crate::protocol;
use crate::transport::{HttpTransport, Transport};
use crate::types::{Event, Operation};
use engine::{Engine, Session};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use url::Url;

/// Asynchronous SheerCloud client (cloneable - shared state is Arc-wrapped).
///
/// One client performs one network operation at a time; starting a second
/// while one is pending fails fast with
/// [`Error::RequestInFlight`](crate::Error::RequestInFlight). Transfer
/// progress and completion are announced on the broadcast channel handed
/// out by [`CloudClient::subscribe`].
#[derive(Clone)]
pub struct CloudClient {
    session: Arc<Session>,
    engine: Arc<Engine>,
    event_tx: broadcast::Sender<Event>,
}

impl std::fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClient").finish_non_exhaustive()
    }
}

impl CloudClient {
    /// Create a client over the default HTTP transport.
    pub fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::with_transport(config, transport)
    }

    /// Create a client over a caller-provided transport.
    ///
    /// The escape hatch for tests and for embedders that tunnel requests
    /// through something other than plain HTTP.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
        let session = Arc::new(Session {
            location: config.location,
            login: config.login,
            password: config.password,
            authorized: AtomicBool::new(false),
        });
        let engine = Arc::new(Engine::new(
            transport,
            Arc::clone(&session),
            event_tx.clone(),
        ));
        Ok(Self {
            session,
            engine,
            event_tx,
        })
    }

    /// Subscribe to progress and completion events.
    ///
    /// For each operation a subscriber sees zero or more
    /// [`Event::TransferProgress`] events followed by exactly one
    /// [`Event::Done`].
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Whether the most recent authorize attempt was accepted.
    ///
    /// A pure read: no network traffic, no state change.
    pub fn authorized(&self) -> bool {
        self.session.authorized.load(Ordering::SeqCst)
    }

    /// Cancel the pending operation, if any.
    ///
    /// The cancelled call resolves to
    /// [`Error::Cancelled`](crate::Error::Cancelled) and the client is
    /// immediately ready for the next operation. The in-flight exchange is
    /// dropped, so a cancelled operation can never deliver a late result.
    pub fn cancel(&self) {
        self.engine.cancel();
    }

    /// Build the URL for `operation` with the session credentials.
    fn url_for(&self, operation: Operation, extra: &[(&str, &str)]) -> Result<Url> {
        protocol::build_url(
            &self.session.location,
            &self.session.login,
            &self.session.password,
            operation,
            extra,
        )
    }
}
