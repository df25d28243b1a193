//! File storage operations: authorize, upload, download, list, delete.

use super::CloudClient;
use super::engine::{OperationRequest, Outcome};
use crate::error::Result;
use crate::protocol;
use crate::types::{CloudFile, Operation};

impl CloudClient {
    /// Check the session credentials against the service.
    ///
    /// Resolves to the new value of [`CloudClient::authorized`]. A rejected
    /// authorize leaves the client unauthorized until a later one succeeds;
    /// nothing is retried automatically.
    pub async fn authorize(&self) -> Result<bool> {
        let url = self.url_for(Operation::Authorize, &[])?;
        match self
            .engine
            .run(OperationRequest::get(Operation::Authorize, url))
            .await?
        {
            Outcome::Authorized(accepted) => Ok(accepted),
            _ => unreachable!("authorize yields an Authorized outcome"),
        }
    }

    /// Store `data` under `path` in the user's cloud root.
    ///
    /// The payload streams out in chunks; each chunk is announced as an
    /// [`Event::TransferProgress`](crate::Event::TransferProgress).
    pub async fn upload(&self, path: &str, data: Vec<u8>) -> Result<()> {
        let url = self.url_for(Operation::Upload, &[("file", path)])?;
        self.engine
            .run(OperationRequest::post(Operation::Upload, url, data))
            .await?;
        Ok(())
    }

    /// Fetch the file stored under `path`.
    ///
    /// The body is returned verbatim, whatever the service answered: for a
    /// missing file the service describes the failure in the body, and
    /// callers distinguish by content (and by the status carried on
    /// [`Event::Done`](crate::Event::Done)).
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(Operation::Download, &[("file", path)])?;
        match self
            .engine
            .run(OperationRequest::get(Operation::Download, url))
            .await?
        {
            Outcome::Body(body) => Ok(body),
            _ => unreachable!("download yields a Body outcome"),
        }
    }

    /// List the files under `prefix`, in server enumeration order.
    pub async fn list(&self, prefix: &str) -> Result<Vec<CloudFile>> {
        let url = self.url_for(Operation::List, &[("file", prefix)])?;
        match self
            .engine
            .run(OperationRequest::get(Operation::List, url))
            .await?
        {
            Outcome::Body(body) => Ok(protocol::parse_list_response(&body)),
            _ => unreachable!("list yields a Body outcome"),
        }
    }

    /// Remove the file stored under `path`.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url_for(Operation::Delete, &[("file", path)])?;
        self.engine
            .run(OperationRequest::get(Operation::Delete, url))
            .await?;
        Ok(())
    }
}
