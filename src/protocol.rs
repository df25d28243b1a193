//! Wire codec for the SheerCloud HTTP protocol
//!
//! URL construction and the plain-text response formats. The parsers are
//! deliberately lenient: the service reports failures in response bodies
//! rather than the status line, so callers inspect content instead of
//! catching structured parse errors.

use crate::error::{Error, Result};
use crate::types::{CloudFile, JobId, Operation};
use chrono::DateTime;
use url::Url;

/// Build the query URL for an operation.
///
/// Query parameter order is fixed: `login`, `password`, then the
/// operation's own parameters. Values are percent-encoded, so credentials
/// or paths containing `&`, `=` or newlines stay unambiguous on the wire.
pub fn build_url(
    location: &str,
    login: &str,
    password: &str,
    op: Operation,
    extra: &[(&str, &str)],
) -> Result<Url> {
    let mut url = Url::parse(location)?;
    url.path_segments_mut()
        .map_err(|()| Error::Config {
            message: "location must be a base URL with a host".to_string(),
            key: Some("location".to_string()),
        })?
        .pop_if_empty()
        .push(op.endpoint());
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("login", login);
        pairs.append_pair("password", password);
        for (key, value) in extra {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Parse the newline-delimited list response into entries.
///
/// Fields come in triples (name, hash, epoch seconds) in server
/// enumeration order, which is preserved in the output. Empty fields are
/// skipped, a trailing partial triple is dropped and a malformed timestamp
/// parses as the epoch; the format has no framing beyond newlines.
pub fn parse_list_response(body: &[u8]) -> Vec<CloudFile> {
    let text = String::from_utf8_lossy(body);
    let fields: Vec<&str> = text.split('\n').filter(|field| !field.is_empty()).collect();
    fields
        .chunks_exact(3)
        .map(|triple| CloudFile {
            name: triple[0].to_string(),
            hash: triple[1].to_string(),
            modified: DateTime::from_timestamp(triple[2].trim().parse().unwrap_or(0), 0)
                .unwrap_or(DateTime::UNIX_EPOCH),
        })
        .collect()
}

/// Extract the job id from a submission response.
///
/// A literal leading `OK:` prefix is stripped; anything else passes
/// through unchanged.
pub fn parse_job_submit_response(body: &[u8]) -> JobId {
    let text = String::from_utf8_lossy(body);
    JobId::new(text.strip_prefix("OK:").unwrap_or(&text))
}

/// Parse a job poll response.
///
/// A job is done only when the response is exactly `OK:DONE`; anything
/// else (including `OK:PROGRESS`) means it is still running.
pub fn parse_job_poll_response(body: &[u8]) -> bool {
    body == b"OK:DONE".as_slice()
}

/// Parse an authorization response.
///
/// Succeeds when the body contains `OK` anywhere: containment, not
/// equality. This looseness is part of the service contract and must not
/// be tightened.
pub fn parse_auth_response(body: &[u8]) -> bool {
    String::from_utf8_lossy(body).contains("OK")
}
