//! HTTP client for the team service.
//!
//! Endpoints, relative to the configured base URL:
//! - `POST team/initialize`
//! - `GET  team/referral-code`
//! - `GET  team/downline`

use std::fmt;
use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use team_protocol::{ApiResponse, HierarchySnapshot, ReferralData};

use crate::{ApiError, ApiFuture, TeamApi};

/// Default request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

enum Path {
    Initialize,
    ReferralCode,
    Downline,
}

impl Path {
    fn to_uri(&self) -> &'static str {
        match self {
            Self::Initialize => "team/initialize",
            Self::ReferralCode => "team/referral-code",
            Self::Downline => "team/downline",
        }
    }
}

/// [`TeamApi`] over HTTP + JSON.
#[derive(Clone)]
pub struct HttpTeamApi {
    base: Url,
    client: reqwest::Client,
    token: Option<String>,
}

impl fmt::Debug for HttpTeamApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTeamApi")
            .field("base", &self.base)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpTeamApi {
    /// Create a client for the service rooted at `base_url`.
    ///
    /// `token`, when present, is sent as a bearer token on every request.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        // `Url::join` replaces the last path segment unless the base ends in '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { base, client, token })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: Path) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self
            .base
            .join(path.to_uri())
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// GET an enveloped payload. A body that decodes as an envelope is
    /// returned whatever the status, so server rejections keep their message.
    async fn get_envelope<T>(&self, path: Path) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let uri = path.to_uri();
        let response = self.request(Method::GET, path)?.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<ApiResponse<T>>(&body) {
            Ok(envelope) => {
                tracing::debug!(
                    path = uri,
                    status = status.as_u16(),
                    success = envelope.success,
                    "Team service response"
                );
                Ok(envelope)
            }
            Err(e) if status.is_success() => Err(ApiError::Decode(e.to_string())),
            Err(_) => Err(status_error(status, &body)),
        }
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let body: String = String::from_utf8_lossy(body).chars().take(200).collect();
    ApiError::Status { status: status.as_u16(), body }
}

impl TeamApi for HttpTeamApi {
    fn initialize_membership(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let response = self.request(Method::POST, Path::Initialize)?.send().await?;
            let status = response.status();
            let body = response.bytes().await?;

            if !status.is_success() {
                return Err(status_error(status, &body));
            }
            // An empty body or a non-envelope body counts as success.
            if let Ok(envelope) = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body) {
                if !envelope.success {
                    return Err(ApiError::Rejected(
                        envelope.message.unwrap_or_else(|| "membership not initialized".to_string()),
                    ));
                }
            }
            tracing::debug!("Team membership initialized");
            Ok(())
        })
    }

    fn get_my_referral_code(&self) -> ApiFuture<'_, ApiResponse<ReferralData>> {
        Box::pin(self.get_envelope(Path::ReferralCode))
    }

    fn get_downline_structure(&self) -> ApiFuture<'_, ApiResponse<HierarchySnapshot>> {
        Box::pin(self.get_envelope(Path::Downline))
    }
}
