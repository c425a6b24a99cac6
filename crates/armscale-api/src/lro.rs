// Long-running operation (LRO) handling.
//
// ARM acknowledges slow PUT/DELETE requests with 201/202 and a monitor URL:
// `Azure-AsyncOperation` (poll for `{ "status": ... }`) or `Location`
// (poll until it stops answering 202). Both are folded into a single
// awaited call so callers never see the intermediate states.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::client::{ArmClient, ErrorDetail, decode, parse_error};

/// How often, and how long, to poll a long-running operation.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Delay between polls when the service sends no `Retry-After`.
    pub interval: Duration,
    /// Upper bound on `Retry-After` values honoured from the service.
    pub max_interval: Duration,
    /// Number of polls before giving up with [`Error::PollingExhausted`].
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            max_attempts: 360,
        }
    }
}

/// The monitor URL handed back for an accepted operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Monitor {
    AsyncOperation(Url),
    Location(Url),
}

impl Monitor {
    /// `Azure-AsyncOperation` wins over `Location` when both are present.
    pub(crate) fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let header_url = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| Url::parse(v).ok())
        };
        header_url("azure-asyncoperation")
            .map(Self::AsyncOperation)
            .or_else(|| header_url("location").map(Self::Location))
    }

    fn url(&self) -> &Url {
        match self {
            Self::AsyncOperation(url) | Self::Location(url) => url,
        }
    }
}

/// Body of an `Azure-AsyncOperation` status resource.
#[derive(serde::Deserialize)]
struct OperationStatus {
    status: String,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

/// `Retry-After` in whole seconds.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn is_accepted(status: StatusCode) -> bool {
    status == StatusCode::CREATED || status == StatusCode::ACCEPTED
}

impl ArmClient {
    /// PUT a resource and wait for it to finish provisioning.
    ///
    /// Synchronous answers are decoded directly. Accepted answers are polled
    /// to completion and the resource is then re-read, so the returned value
    /// always reflects the final state.
    pub(crate) async fn put_resource<T, B>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.url(path, api_version)?;
        debug!("PUT {url}");

        let resp = self.send(self.put_request(url.clone(), body)).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        match Monitor::from_headers(resp.headers()) {
            Some(monitor) if is_accepted(status) => {
                let delay = retry_after(resp.headers());
                self.wait_for(&monitor, delay).await?;
                self.get_url(url).await
            }
            _ => {
                let text = resp.text().await?;
                decode(text)
            }
        }
    }

    /// DELETE a resource and wait for the deletion to finish.
    pub(crate) async fn delete_resource(&self, path: &str, api_version: &str) -> Result<(), Error> {
        let url = self.url(path, api_version)?;
        debug!("DELETE {url}");

        let resp = self.send(self.delete_request(url)).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, resp).await);
        }

        match Monitor::from_headers(resp.headers()) {
            Some(monitor) if is_accepted(status) => {
                let delay = retry_after(resp.headers());
                self.wait_for(&monitor, delay).await
            }
            _ => Ok(()),
        }
    }

    /// Poll a monitor URL until the operation reaches a terminal state.
    pub(crate) async fn wait_for(
        &self,
        monitor: &Monitor,
        first_delay: Option<Duration>,
    ) -> Result<(), Error> {
        let polling = self.polling();
        let clamp = |d: Duration| d.min(polling.max_interval);
        let mut delay = clamp(first_delay.unwrap_or(polling.interval));

        for attempt in 1..=polling.max_attempts {
            tokio::time::sleep(delay).await;
            debug!(attempt, url = %monitor.url(), "polling long-running operation");

            let resp = self.send(self.get_request(monitor.url().clone())).await?;
            let status = resp.status();
            delay = clamp(retry_after(resp.headers()).unwrap_or(polling.interval));

            match monitor {
                Monitor::AsyncOperation(_) => {
                    if !status.is_success() {
                        return Err(parse_error(status, resp).await);
                    }
                    let op: OperationStatus = decode(resp.text().await?)?;
                    match op.status.as_str() {
                        "Succeeded" => return Ok(()),
                        "Failed" | "Canceled" => {
                            let detail = op.error.unwrap_or(ErrorDetail {
                                code: None,
                                message: None,
                            });
                            return Err(Error::OperationFailed {
                                message: detail
                                    .message
                                    .unwrap_or_else(|| "no error detail returned".into()),
                                code: detail.code,
                                state: op.status,
                            });
                        }
                        other => debug!(state = other, "operation still running"),
                    }
                }
                Monitor::Location(_) => {
                    if status == StatusCode::ACCEPTED {
                        continue;
                    }
                    if status.is_success() {
                        return Ok(());
                    }
                    return Err(parse_error(status, resp).await);
                }
            }
        }

        Err(Error::PollingExhausted {
            attempts: polling.max_attempts,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn async_operation_header_preferred_over_location() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Location",
            HeaderValue::from_static("https://arm.example/location"),
        );
        headers.insert(
            "Azure-AsyncOperation",
            HeaderValue::from_static("https://arm.example/operation"),
        );

        let monitor = Monitor::from_headers(&headers).unwrap();
        assert_eq!(
            monitor,
            Monitor::AsyncOperation(Url::parse("https://arm.example/operation").unwrap())
        );
    }

    #[test]
    fn location_only_and_missing() {
        let mut headers = HeaderMap::new();
        assert!(Monitor::from_headers(&headers).is_none());

        headers.insert(
            "Location",
            HeaderValue::from_static("https://arm.example/location"),
        );
        assert!(matches!(
            Monitor::from_headers(&headers),
            Some(Monitor::Location(_))
        ));
    }

    #[test]
    fn retry_after_parses_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("15"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(15)));

        headers.insert(
            "Retry-After",
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }
}
