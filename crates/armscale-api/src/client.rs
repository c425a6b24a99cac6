// Hand-crafted async HTTP client for Azure Resource Manager.
//
// Base URL: https://management.azure.com/
// Auth: `Authorization: Bearer <token>` from a client-secret credential.
// Every request carries an explicit `api-version` query parameter; the
// endpoint modules (resources, web, monitor) pin their own versions.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::auth::{ClientSecretCredential, with_trailing_slash};
use crate::lro::PollingConfig;

/// Public-cloud Resource Manager endpoint.
pub const DEFAULT_RESOURCE_MANAGER: &str = "https://management.azure.com/";

// ── Error response shape from ARM ────────────────────────────────────

#[derive(serde::Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: Option<ErrorDetail>,
}

#[derive(serde::Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Resource Manager endpoints armscale consumes.
///
/// Endpoint methods live in `resources`, `web` and `monitor` as inherent
/// impls; this module keeps the transport mechanics: URL construction,
/// bearer auth, and response/error decoding.
pub struct ArmClient {
    http: reqwest::Client,
    base_url: Url,
    scope: String,
    credential: ClientSecretCredential,
    polling: PollingConfig,
}

impl ArmClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Wrap an existing `reqwest::Client`.
    ///
    /// `base_url` is the Resource Manager root, e.g.
    /// [`DEFAULT_RESOURCE_MANAGER`]. The token scope is derived from it.
    pub fn with_client(
        base_url: &str,
        http: reqwest::Client,
        credential: ClientSecretCredential,
        polling: PollingConfig,
    ) -> Result<Self, Error> {
        let base_url = with_trailing_slash(base_url)?;
        let scope = format!("{base_url}.default");
        Ok(Self {
            http,
            base_url,
            scope,
            credential,
            polling,
        })
    }

    /// The Resource Manager root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an ARM resource path (`/subscriptions/...`) onto the base URL
    /// and pin the `api-version`.
    pub(crate) fn url(&self, path: &str, api_version: &str) -> Result<Url, Error> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Attach the bearer token and send.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        use secrecy::ExposeSecret;

        let token = self.credential.token(&self.scope).await?;
        let resp = request
            .bearer_auth(token.token.expose_secret())
            .send()
            .await?;
        Ok(resp)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<T, Error> {
        let url = self.url(path, api_version)?;
        self.get_url(url).await
    }

    /// GET an absolute URL (used for paging links and final re-reads).
    pub(crate) async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.send(self.http.get(url)).await?;
        handle_response(resp).await
    }

    pub(crate) fn put_request<B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> reqwest::RequestBuilder {
        self.http.put(url).json(body)
    }

    pub(crate) fn delete_request(&self, url: Url) -> reqwest::RequestBuilder {
        self.http.delete(url)
    }

    pub(crate) fn get_request(&self, url: Url) -> reqwest::RequestBuilder {
        self.http.get(url)
    }
}

// ── Response handling ────────────────────────────────────────────────

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        decode(body)
    } else {
        Err(parse_error(status, resp).await)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

pub(crate) async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.error)
            .and_then(|d| d.message)
            .unwrap_or_else(|| "bearer token rejected by Resource Manager".into());
        return Error::Authentication { message };
    }

    match serde_json::from_str::<ErrorResponse>(&raw) {
        Ok(ErrorResponse {
            error: Some(detail),
        }) => Error::Arm {
            status: status.as_u16(),
            message: detail.message.unwrap_or_else(|| status.to_string()),
            code: detail.code,
        },
        _ => Error::Arm {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            code: None,
        },
    }
}
