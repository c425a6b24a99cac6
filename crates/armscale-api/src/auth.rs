// Service-principal authentication against the identity platform.
//
// OAuth2 client-credentials grant: POST the client id and secret to
// `{authority}/{tenant}/oauth2/v2.0/token` and receive a bearer token for
// the Resource Manager scope. Tokens are cached until shortly before expiry.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Public-cloud identity authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/";

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_SKEW: TimeDelta = TimeDelta::minutes(5);

/// Assumed lifetime when the response has no usable `expires_in`.
const DEFAULT_LIFETIME: TimeDelta = TimeDelta::hours(1);

/// A bearer token with its absolute expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token can still be used at `now` (with refresh skew).
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - EXPIRY_SKEW > now
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<ExpiresIn>,
}

// v1 endpoints report `expires_in` as a string, v2 as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    fn seconds(&self) -> Option<i64> {
        match self {
            Self::Seconds(s) => Some(*s),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Absolute expiry for a token issued at `now`.
///
/// A missing, unparsable or out-of-range `expires_in` falls back to
/// [`DEFAULT_LIFETIME`].
fn expiry(now: DateTime<Utc>, expires_in: Option<&ExpiresIn>) -> DateTime<Utc> {
    expires_in
        .and_then(ExpiresIn::seconds)
        .and_then(TimeDelta::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(now + DEFAULT_LIFETIME)
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client-secret credential for a service principal.
///
/// Cheap to share by reference; the token cache is behind an async mutex
/// so concurrent callers never request two tokens at once.
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
    authority: Url,
    http: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("authority", &self.authority.as_str())
            .finish_non_exhaustive()
    }
}

impl ClientSecretCredential {
    /// Create a credential. `authority` is the identity host root, e.g.
    /// [`DEFAULT_AUTHORITY`]; a missing trailing slash is added.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
        authority: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let tenant_id = tenant_id.into();
        let client_id = client_id.into();
        if tenant_id.trim().is_empty() {
            return Err(Error::Authentication {
                message: "tenant id is empty".into(),
            });
        }
        if client_id.trim().is_empty() {
            return Err(Error::Authentication {
                message: "client id is empty".into(),
            });
        }

        Ok(Self {
            tenant_id,
            client_id,
            client_secret,
            authority: with_trailing_slash(authority)?,
            http,
            cached: Mutex::new(None),
        })
    }

    /// Return a bearer token for `scope`, reusing the cached one while fresh.
    pub async fn token(&self, scope: &str) -> Result<AccessToken, Error> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.clone());
            }
        }

        let token = self.request_token(scope).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn request_token(&self, scope: &str) -> Result<AccessToken, Error> {
        let url = self
            .authority
            .join(&format!("{}/oauth2/v2.0/token", self.tenant_id))?;
        debug!(%url, client_id = %self.client_id, "requesting access token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", scope),
        ];
        let resp = self.http.post(url).form(&form).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => err
                    .error_description
                    .map_or_else(|| err.error.clone(), |d| format!("{}: {d}", err.error)),
                Err(_) if body.is_empty() => format!("token request failed (HTTP {status})"),
                Err(_) => format!("token request failed (HTTP {status}): {body}"),
            };
            return Err(Error::Authentication { message });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("token response: {e}"),
                body: String::new(),
            })?;

        let expires_at = expiry(Utc::now(), parsed.expires_in.as_ref());
        debug!(%expires_at, "access token acquired");

        Ok(AccessToken {
            token: SecretString::from(parsed.access_token),
            expires_at,
        })
    }
}

/// Parse a base URL and make sure relative joins append rather than replace.
pub(crate) fn with_trailing_slash(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
