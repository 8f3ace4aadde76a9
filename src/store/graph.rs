//! Graph drive document store implementation

use crate::error::{Error, Result};
use crate::store::{DocumentStore, FetchOutcome, PutOutcome, VersionToken, VersionedBlob};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, ETAG, IF_MATCH};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Public Graph API endpoint
const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Drive-backed document store using reqwest
///
/// Speaks the Graph drive content protocol: GET/PUT against
/// `/drives/{drive-id}/root:/{path}:/content`. The `ETag` response header is
/// the version token, writes carry it back as an `If-Match` precondition,
/// and a stale precondition comes back as `412 Precondition Failed`, which
/// maps to [`PutOutcome::VersionConflict`].
pub struct GraphDriveStore {
    client: Client,
    token: String,
    base_url: String,
    drive_id: String,
}

impl GraphDriveStore {
    /// Create a new store for one drive.
    ///
    /// All configuration is explicit: `token` is the bearer credential
    /// obtained by the surrounding workflow, `drive_id` the already-resolved
    /// drive. `base_url = None` targets the public Graph endpoint; pass
    /// `Some` for national-cloud hosts or tests.
    pub fn new(token: String, drive_id: String, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Remote(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            drive_id,
        })
    }

    fn content_url(&self, path: &str) -> String {
        let encoded = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/drives/{}/root:/{encoded}:/content",
            self.base_url, self.drive_id
        )
    }
}

#[async_trait]
impl DocumentStore for GraphDriveStore {
    async fn fetch(&self, path: &str) -> Result<FetchOutcome> {
        debug!(path, "fetching document");
        let response = self
            .client
            .get(self.content_url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(path, "document absent");
            return Ok(FetchOutcome::Absent);
        }
        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "GET {path} returned {}",
                response.status()
            )));
        }

        // Without a token the conditional protocol cannot run.
        let version = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(VersionToken::new)
            .ok_or_else(|| Error::Remote(format!("GET {path} response carried no ETag")))?;

        let content = response.bytes().await?.to_vec();
        debug!(path, version = %version, bytes = content.len(), "fetched document");
        Ok(FetchOutcome::Present(VersionedBlob { content, version }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> Result<PutOutcome> {
        debug!(path, conditional = expected.is_some(), "writing document");
        let mut request = self
            .client
            .put(self.content_url(path))
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .body(content.to_vec());

        if let Some(version) = expected {
            request = request.header(IF_MATCH, version.as_str());
        }

        let response = request.send().await?;

        if response.status() == StatusCode::PRECONDITION_FAILED {
            debug!(path, "write rejected: version conflict");
            return Ok(PutOutcome::VersionConflict);
        }
        if !response.status().is_success() {
            return Err(Error::Remote(format!(
                "PUT {path} returned {}",
                response.status()
            )));
        }

        debug!(path, "wrote document");
        Ok(PutOutcome::Stored)
    }
}
