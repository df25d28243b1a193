//! Core types and events for sheercloud

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a render job.
///
/// Returned by the service when a job is submitted and passed back verbatim
/// when polling for completion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create a JobId from a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token as it travels on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry of a directory listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudFile {
    /// Path of the file relative to the user's cloud root
    pub name: String,
    /// Content hash reported by the service
    pub hash: String,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// The logical operation a request performs against the service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Credential check
    Authorize,
    /// File upload (the only POST operation)
    Upload,
    /// File download
    Download,
    /// Directory listing
    List,
    /// File removal
    Delete,
    /// Render job submission
    SubmitJob,
    /// Render job status poll
    PollJob,
}

impl Operation {
    /// URL path segment of the endpoint serving this operation
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Authorize => "authorize",
            Operation::Upload => "upload",
            Operation::Download => "download",
            Operation::List => "list",
            Operation::Delete => "delete",
            Operation::SubmitJob => "job",
            Operation::PollJob => "progress",
        }
    }

    /// Whether transfer progress events are relayed for this operation
    pub(crate) fn reports_transfer(&self) -> bool {
        matches!(self, Operation::Upload | Operation::Download)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Authorize => "authorize",
            Operation::Upload => "upload",
            Operation::Download => "download",
            Operation::List => "list",
            Operation::Delete => "delete",
            Operation::SubmitJob => "submit_job",
            Operation::PollJob => "poll_job",
        };
        f.write_str(name)
    }
}

/// Events broadcast by the client
///
/// Subscribers receive, for each operation, zero or more
/// [`Event::TransferProgress`] events followed by exactly one
/// [`Event::Done`]. Events of consecutive operations never interleave
/// because the client performs one operation at a time.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Transfer progress for the in-flight upload or download, relayed
    /// verbatim from the transport
    TransferProgress {
        /// Operation the transfer belongs to
        operation: Operation,
        /// Bytes transferred so far
        bytes: u64,
        /// Total bytes, when the transport knows it
        total: Option<u64>,
    },

    /// The in-flight operation completed and the client is idle again
    Done {
        /// Operation that completed
        operation: Operation,
        /// HTTP status the service answered with
        status: u16,
    },
}
