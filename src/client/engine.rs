//! Request lifecycle engine
//!
//! The engine owns the single in-flight request slot. It starts an
//! operation by delegating to the transport, remembers which operation is
//! outstanding, relays transfer progress verbatim, and on completion runs
//! per-operation result extraction before resetting to idle and
//! announcing [`Event::Done`].
//!
//! The idle/pending transition is a check-and-set under one mutex
//! acquisition, so the single-flight invariant holds even when a client is
//! shared across tasks. Resetting the slot lives on a drop guard: one
//! finalization path whether an operation completed, failed or was
//! cancelled.

use crate::error::{Error, Result};
use crate::protocol;
use crate::transport::{ProgressFn, Transport, TransportResponse};
use crate::types::{Event, JobId, Operation};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Account state shared between the engine and the facade.
pub(crate) struct Session {
    pub(crate) location: String,
    pub(crate) login: String,
    pub(crate) password: String,
    /// Written only by a completed authorize; read by `CloudClient::authorized`.
    pub(crate) authorized: AtomicBool,
}

/// What the engine tracks about the outstanding operation.
struct Pending {
    operation: Operation,
    cancel: CancellationToken,
}

/// A fully prepared request, ready to run through the engine.
pub(crate) struct OperationRequest {
    operation: Operation,
    url: Url,
    /// POST payload; upload is the only operation that carries one.
    body: Option<Vec<u8>>,
}

impl OperationRequest {
    pub(crate) fn get(operation: Operation, url: Url) -> Self {
        Self {
            operation,
            url,
            body: None,
        }
    }

    pub(crate) fn post(operation: Operation, url: Url, body: Vec<u8>) -> Self {
        Self {
            operation,
            url,
            body: Some(body),
        }
    }
}

/// Typed result of a completed operation, one variant per dispatch arm.
pub(crate) enum Outcome {
    /// Authorize: whether the credentials were accepted
    Authorized(bool),
    /// Upload/Delete: body discarded, completion itself is the signal
    Acknowledged,
    /// Download/List: the response body, verbatim
    Body(Vec<u8>),
    /// SubmitJob: the id to poll with
    JobSubmitted(JobId),
    /// PollJob: whether the job is done
    JobStatus(bool),
}

pub(crate) struct Engine {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    event_tx: broadcast::Sender<Event>,
    /// The single in-flight slot; `Some` while an operation is pending.
    in_flight: Mutex<Option<Pending>>,
}

/// Clears the in-flight slot when the current operation unwinds, whether
/// it completed, failed or was cancelled.
struct SlotGuard<'a> {
    engine: &'a Engine,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        *self.engine.slot() = None;
    }
}

impl Engine {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            transport,
            session,
            event_tx,
            in_flight: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Pending>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the single-flight slot or fail fast.
    fn begin(&self, operation: Operation) -> Result<(SlotGuard<'_>, CancellationToken)> {
        let mut slot = self.slot();
        if let Some(pending) = slot.as_ref() {
            return Err(Error::RequestInFlight {
                requested: operation,
                outstanding: pending.operation,
            });
        }
        let cancel = CancellationToken::new();
        *slot = Some(Pending {
            operation,
            cancel: cancel.clone(),
        });
        Ok((SlotGuard { engine: self }, cancel))
    }

    /// Cancel the pending operation, if any.
    pub(crate) fn cancel(&self) {
        if let Some(pending) = self.slot().as_ref() {
            pending.cancel.cancel();
        }
    }

    /// Run one operation through its full lifecycle: claim the slot, hand
    /// the request to the transport, extract the typed outcome, reset to
    /// idle and announce completion.
    pub(crate) async fn run(&self, request: OperationRequest) -> Result<Outcome> {
        let OperationRequest {
            operation,
            url,
            body,
        } = request;
        let (guard, cancel) = self.begin(operation)?;
        tracing::debug!(%operation, url = %url, "starting request");

        let progress = self.progress_relay(operation);
        let exchange = async {
            match body {
                Some(payload) => self.transport.post(url, payload, progress).await,
                None => self.transport.get(url, progress).await,
            }
        };
        let TransportResponse { status, body } = tokio::select! {
            _ = cancel.cancelled() => {
                // The exchange future is dropped here, so the cancelled
                // operation can never deliver a late result.
                tracing::debug!(%operation, "request cancelled");
                return Err(Error::Cancelled);
            }
            response = exchange => response?,
        };

        let outcome = self.extract(operation, status, body);
        tracing::debug!(%operation, status, "request completed");
        // Reset to idle first, then announce: a subscriber reacting to
        // `Done` may start the next operation right away.
        drop(guard);
        let _ = self.event_tx.send(Event::Done { operation, status });
        Ok(outcome)
    }

    /// Per-operation result extraction. Statuses outside 2xx are logged,
    /// but the body still goes through the lenient parser: the service
    /// reports failures in the body and callers inspect content.
    fn extract(&self, operation: Operation, status: u16, body: Vec<u8>) -> Outcome {
        if !(200..300).contains(&status) {
            tracing::warn!(%operation, status, "service answered with a non-success status");
        }
        match operation {
            Operation::Authorize => {
                let accepted = protocol::parse_auth_response(&body);
                self.session.authorized.store(accepted, Ordering::SeqCst);
                Outcome::Authorized(accepted)
            }
            Operation::Upload | Operation::Delete => Outcome::Acknowledged,
            // Download and list share one completion path; the list facade
            // parses the buffer afterwards.
            Operation::Download | Operation::List => Outcome::Body(body),
            Operation::SubmitJob => {
                Outcome::JobSubmitted(protocol::parse_job_submit_response(&body))
            }
            Operation::PollJob => Outcome::JobStatus(protocol::parse_job_poll_response(&body)),
        }
    }

    /// Progress relay for upload/download: every transport callback is
    /// re-broadcast unchanged, no aggregation, no throttling.
    fn progress_relay(&self, operation: Operation) -> Option<ProgressFn> {
        if !operation.reports_transfer() {
            return None;
        }
        let event_tx = self.event_tx.clone();
        Some(Box::new(move |bytes, total| {
            let _ = event_tx.send(Event::TransferProgress {
                operation,
                bytes,
                total,
            });
        }))
    }
}
