use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::StreamExt;
use labeler_logging::{labeler_debug, labeler_info, labeler_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{DatasetStore, FailureKind, StoreError, StoredDataset, VersionToken};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub user_agent: String,
    pub api_version: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 50 * 1024 * 1024,
            user_agent: "issue-labeler".to_string(),
            api_version: "2022-11-28".to_string(),
        }
    }
}

/// Where a dataset file lives in a repository served by a contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    pub api_base: Url,
    pub owner: String,
    pub repo: String,
    /// Repository-relative file path, `/`-separated.
    pub path: String,
    pub branch: Option<String>,
}

impl RemoteLocation {
    pub fn new(
        api_base: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let api_base = Url::parse(api_base)
            .map_err(|err| StoreError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(Self {
            api_base,
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
            branch: None,
        })
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// `{api_base}/repos/{owner}/{repo}/contents/{path}`, each segment escaped.
    pub fn contents_url(&self) -> Result<Url, StoreError> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot be a base url", self.api_base),
                )
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"]);
            segments.extend(self.path.split('/').filter(|part| !part.is_empty()));
        }
        Ok(url)
    }
}

impl fmt::Display for RemoteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.repo, self.path)?;
        if let Some(branch) = &self.branch {
            write!(f, "@{branch}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("missing credential")]
pub struct MissingCredential;

/// Bearer token for the contents API. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self, MissingCredential> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(MissingCredential);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_env(var: &str) -> Result<Self, MissingCredential> {
        std::env::var(var)
            .map_err(|_| MissingCredential)
            .and_then(Self::new)
    }

    fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    download_url: Option<String>,
}

impl ContentsResponse {
    /// Inline bytes, or `None` when the API left the content out (large files).
    fn inline_content(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match self.encoding.as_deref() {
            Some("base64") if !self.content.is_empty() || self.size == 0 => {
                decode_base64(&self.content).map(Some)
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    content: Option<UpdatedContent>,
}

#[derive(Debug, Deserialize)]
struct UpdatedContent {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Dataset file in a repository, read and written through the contents API.
#[derive(Debug, Clone)]
pub struct GithubContentsStore {
    location: RemoteLocation,
    credential: Credential,
    settings: StoreSettings,
    commit_message: String,
    client: reqwest::Client,
}

impl GithubContentsStore {
    pub fn new(
        location: RemoteLocation,
        credential: Credential,
        settings: StoreSettings,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| StoreError::new(FailureKind::Network, err.to_string()))?;
        let commit_message = format!("Update labels in {}", location.path);
        Ok(Self {
            location,
            credential,
            settings,
            commit_message,
            client,
        })
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    pub fn location(&self) -> &RemoteLocation {
        &self.location
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(self.credential.secret())
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", self.settings.api_version.as_str())
    }

    async fn download(&self, download_url: Option<&str>) -> Result<Vec<u8>, StoreError> {
        let raw = download_url.ok_or_else(|| {
            StoreError::new(
                FailureKind::InvalidResponse,
                "content omitted and no download_url provided",
            )
        })?;
        let url = Url::parse(raw)
            .map_err(|err| StoreError::new(FailureKind::InvalidUrl, err.to_string()))?;
        labeler_debug!("Downloading raw dataset from {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.credential.secret())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = read_capped(response, self.settings.max_bytes).await?;
            return Err(status_error(status, &body));
        }
        read_capped(response, self.settings.max_bytes).await
    }
}

#[async_trait::async_trait]
impl DatasetStore for GithubContentsStore {
    fn describe(&self) -> String {
        self.location.to_string()
    }

    async fn fetch(&self) -> Result<StoredDataset, StoreError> {
        let mut url = self.location.contents_url()?;
        if let Some(branch) = &self.location.branch {
            url.query_pairs_mut().append_pair("ref", branch);
        }
        labeler_info!("Fetching {} from {}", self.location, url);

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = read_capped(response, self.settings.max_bytes).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let contents: ContentsResponse = serde_json::from_slice(&body)
            .map_err(|err| StoreError::new(FailureKind::InvalidResponse, err.to_string()))?;
        let bytes = match contents.inline_content()? {
            Some(bytes) => bytes,
            None => self.download(contents.download_url.as_deref()).await?,
        };

        Ok(StoredDataset {
            bytes,
            version: VersionToken::new(contents.sha),
        })
    }

    async fn write(
        &self,
        bytes: Vec<u8>,
        expected: &VersionToken,
    ) -> Result<Option<VersionToken>, StoreError> {
        let url = self.location.contents_url()?;
        let request = UpdateRequest {
            message: &self.commit_message,
            content: STANDARD.encode(&bytes),
            sha: expected.as_str(),
            branch: self.location.branch.as_deref(),
        };
        let payload = serde_json::to_vec(&request)
            .map_err(|err| StoreError::new(FailureKind::InvalidResponse, err.to_string()))?;
        labeler_info!(
            "Writing {} bytes to {} (base sha {})",
            bytes.len(),
            self.location,
            expected
        );

        let response = self
            .authorized(self.client.put(url))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = read_capped(response, self.settings.max_bytes).await?;
        if !status.is_success() {
            let err = status_error(status, &body);
            if err.kind == FailureKind::Conflict {
                labeler_warn!("Update of {} rejected: {}", self.location, err.message);
            }
            return Err(err);
        }

        match serde_json::from_slice::<UpdateResponse>(&body) {
            Ok(UpdateResponse {
                content: Some(content),
            }) => Ok(Some(VersionToken::new(content.sha))),
            Ok(_) => Ok(None),
            Err(err) => {
                labeler_debug!("Update response without readable sha: {}", err);
                Ok(None)
            }
        }
    }
}

fn decode_base64(content: &str) -> Result<Vec<u8>, StoreError> {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|err| StoreError::new(FailureKind::InvalidResponse, err.to_string()))
}

fn status_error(status: StatusCode, body: &[u8]) -> StoreError {
    let message = serde_json::from_slice::<ApiMessage>(body)
        .map(|api| api.message)
        .unwrap_or_else(|_| status.to_string());
    let kind = match status {
        StatusCode::NOT_FOUND => FailureKind::NotFound,
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => FailureKind::Conflict,
        other => FailureKind::HttpStatus(other.as_u16()),
    };
    StoreError::new(kind, message)
}

async fn read_capped(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, StoreError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(StoreError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(StoreError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        return StoreError::new(FailureKind::Timeout, err.to_string());
    }
    StoreError::new(FailureKind::Network, err.to_string())
}
