//! Configuration types for the SheerCloud client

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration
///
/// `location`, `login` and `password` identify the account; the remaining
/// fields tune transport behavior and have sensible defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the service, e.g. `https://cloud.example.com`
    pub location: String,

    /// Account login
    pub login: String,

    /// Account password
    pub password: String,

    /// TCP connect timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Overall per-request timeout. `None` by default so multi-megabyte
    /// transfers are not cut off mid-stream.
    #[serde(default)]
    pub request_timeout: Option<Duration>,

    /// Capacity of the broadcast event channel handed out by
    /// [`subscribe`](crate::CloudClient::subscribe)
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_event_channel_capacity() -> usize {
    256
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: String::new(),
            login: String::new(),
            password: String::new(),
            connect_timeout: default_connect_timeout(),
            request_timeout: None,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl Config {
    /// Validate settings that would otherwise fail deep inside a request.
    pub(crate) fn validate(&self) -> Result<()> {
        url::Url::parse(&self.location).map_err(|e| Error::Config {
            message: format!("location is not a valid base URL: {e}"),
            key: Some("location".to_string()),
        })?;
        if self.login.is_empty() {
            return Err(Error::Config {
                message: "login must not be empty".to_string(),
                key: Some("login".to_string()),
            });
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::Config {
                message: "event_channel_capacity must be at least 1".to_string(),
                key: Some("event_channel_capacity".to_string()),
            });
        }
        Ok(())
    }
}
