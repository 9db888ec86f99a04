use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Cell, Scoreboard},
    error::PayloadError,
    protocol::{
        GetPixelResponse, UpdatePixelRequest, UpdatePixelResponse, UserDetailsResponse,
        GET_PIXEL_PATH, GET_USER_DETAILS_PATH, UPDATE_PIXEL_PATH,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures talking to the pixel backend. All of them are recoverable: the
/// caller keeps its cached state and carries on.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// A write answered with a 2xx other than 200, which the server never
    /// uses for an applied update.
    #[error("{url} answered HTTP {status} without confirming the update")]
    Unacknowledged { url: String, status: u16 },
    #[error("{url} reported success=false")]
    Rejected { url: String },
    #[error("{url} returned an unusable body: {reason}")]
    Malformed { url: String, reason: String },
}

impl BackendError {
    fn from_payload(url: String, err: PayloadError) -> Self {
        match err {
            PayloadError::Rejected => Self::Rejected { url },
            PayloadError::MissingField(_) => Self::Malformed {
                url,
                reason: err.to_string(),
            },
        }
    }
}

#[async_trait]
pub trait PixelBackend: Send + Sync {
    async fn fetch_pixels(&self) -> Result<Vec<Cell>, BackendError>;
    async fn fetch_scoreboard(&self) -> Result<Scoreboard, BackendError>;
    async fn update_pixel(
        &self,
        request: &UpdatePixelRequest,
    ) -> Result<UpdatePixelResponse, BackendError>;
}

pub struct HttpPixelBackend {
    http: Client,
    base_url: String,
}

impl HttpPixelBackend {
    pub fn new(base_url: &Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|err| BackendError::Malformed {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.endpoint(path);
        debug!(%url, "backend GET");
        let response = self
            .http
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::read_json(&url, response).await
    }
}

#[async_trait]
impl PixelBackend for HttpPixelBackend {
    async fn fetch_pixels(&self) -> Result<Vec<Cell>, BackendError> {
        let body: GetPixelResponse = self.get_json(GET_PIXEL_PATH).await?;
        body.into_cells()
            .map_err(|err| BackendError::from_payload(self.endpoint(GET_PIXEL_PATH), err))
    }

    async fn fetch_scoreboard(&self) -> Result<Scoreboard, BackendError> {
        let body: UserDetailsResponse = self.get_json(GET_USER_DETAILS_PATH).await?;
        body.into_scoreboard().map_err(|err| {
            BackendError::from_payload(self.endpoint(GET_USER_DETAILS_PATH), err)
        })
    }

    async fn update_pixel(
        &self,
        request: &UpdatePixelRequest,
    ) -> Result<UpdatePixelResponse, BackendError> {
        let url = self.endpoint(UPDATE_PIXEL_PATH);
        debug!(%url, user = %request.user, pixels = request.pixel_list.len(), "backend POST");
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status.is_success() && status != StatusCode::OK {
            return Err(BackendError::Unacknowledged {
                url,
                status: status.as_u16(),
            });
        }
        Self::read_json(&url, response).await
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
