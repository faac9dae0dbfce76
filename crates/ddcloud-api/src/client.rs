// CloudControl API HTTP client
//
// Wraps `reqwest::Client` with organization-scoped URL construction,
// basic authentication, and response-envelope handling. Endpoint
// families (firewall rules, deployment polling) are inherent methods
// in separate files so this module stays focused on transport mechanics.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

/// CloudControl API version used for all network endpoints.
pub const API_VERSION: &str = "2.4";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Async client for the CloudControl network API.
///
/// Every request carries HTTP basic credentials. Mutating calls return
/// the `{ responseCode, message, info }` envelope; reads return the
/// resource body directly and the envelope only on failure.
pub struct CloudControlClient {
    http: reqwest::Client,
    base_url: Url,
    organization_id: String,
    username: String,
    password: SecretString,
    poll_interval: Duration,
}

impl CloudControlClient {
    /// Create a client for the regional endpoint at `base_url`
    /// (e.g. `https://api-au.dimensiondata.com`).
    pub fn new(
        base_url: Url,
        organization_id: String,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            base_url,
            organization_id,
            username,
            password,
        ))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        organization_id: String,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            organization_id,
            username,
            password,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override how often deployment polling re-reads a resource.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/caas/{version}/{org}/network/{path}`.
    pub(crate) fn network_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!(
            "{base}/caas/{API_VERSION}/{}/network/{path}",
            self.organization_id
        );
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }

    /// Send a GET request and deserialize the body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    /// Send a POST request with a JSON body and return the envelope,
    /// failing if its `responseCode` is not a success code.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<ApiResponse, Error> {
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        let status = resp.status().as_u16();
        let envelope: ApiResponse = self.handle_response(resp).await?;

        trace!(
            response_code = %envelope.response_code,
            request_id = ?envelope.request_id,
            "envelope received"
        );

        if envelope.is_success() {
            Ok(envelope)
        } else {
            Err(envelope_error(status, envelope))
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: format!("credentials for '{}' were rejected", self.username),
            };
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(envelope) = serde_json::from_str::<ApiResponse>(&raw) {
            envelope_error(status.as_u16(), envelope)
        } else {
            Error::Api {
                status: status.as_u16(),
                response_code: format!("HTTP_{}", status.as_u16()),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                operation: None,
                request_id: None,
            }
        }
    }
}

fn envelope_error(status: u16, envelope: ApiResponse) -> Error {
    Error::Api {
        status,
        message: envelope
            .message
            .unwrap_or_else(|| format!("responseCode={}", envelope.response_code)),
        response_code: envelope.response_code,
        operation: envelope.operation,
        request_id: envelope.request_id,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CloudControlClient {
        CloudControlClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            "org-1".into(),
            "user".into(),
            SecretString::from("secret".to_string()),
        )
    }

    #[test]
    fn network_url_is_organization_scoped() {
        let url = client("https://api-au.example.com/")
            .network_url("firewallRule/rule-1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-au.example.com/caas/2.4/org-1/network/firewallRule/rule-1"
        );
    }

    #[test]
    fn poll_interval_override() {
        let c = client("https://api-au.example.com").with_poll_interval(Duration::from_millis(10));
        assert_eq!(c.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn envelope_error_falls_back_to_response_code() {
        let err = envelope_error(
            400,
            ApiResponse {
                response_code: "INVALID_INPUT_DATA".into(),
                ..ApiResponse::default()
            },
        );
        assert_eq!(
            err.to_string(),
            "CloudControl API error (HTTP 400, INVALID_INPUT_DATA): responseCode=INVALID_INPUT_DATA"
        );
    }
}
