// Provisioning controller HTTP client
//
// Wraps `reqwest::Client` with controller URL construction and response
// checking. Endpoint groups (inventory, configlets, provisioning, tasks)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Longest body excerpt carried inside an error.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the provisioning controller.
///
/// Holds the authenticated session (cookie jar inside the `reqwest::Client`)
/// for the lifetime of a run. Every request helper takes the human-readable
/// `operation` it performs so that failures name the step that broke.
pub struct CvpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CvpClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). `base_url` is the
    /// controller root, e.g. `https://cvp.example.net`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Turn a `--cvp` argument into a base URL.
    ///
    /// Accepts a bare host (`cvp01`, `10.0.0.5:8443`) or a full URL.
    /// Bare hosts are reached over HTTPS.
    pub fn base_url_from(host_or_url: &str) -> Result<Url, Error> {
        let trimmed = host_or_url.trim().trim_end_matches('/');
        if trimmed.contains("://") {
            Ok(Url::parse(trimmed)?)
        } else {
            Ok(Url::parse(&format!("https://{trimmed}"))?)
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{path}?{query}`.
    pub(crate) fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the checked response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        operation: &'static str,
    ) -> Result<T, Error> {
        debug!(%url, operation, "GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        parse_response(resp, operation).await
    }

    /// Send a POST request with a JSON body and decode the checked response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        operation: &'static str,
    ) -> Result<T, Error> {
        debug!(%url, operation, "POST");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        parse_response(resp, operation).await
    }
}

/// Check status and the embedded `errorCode`, then decode the body.
///
/// The controller reports some failures as HTTP 200 with an
/// `{"errorCode": ..., "errorMessage": ...}` object, so a 2xx status alone
/// does not mean success.
async fn parse_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    operation: &'static str,
) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: format!("{operation}: session expired or invalid credentials"),
        });
    }

    let body = resp
        .text()
        .await
        .map_err(|source| Error::Transport { operation, source })?;

    if !status.is_success() {
        return Err(Error::Status {
            operation,
            status: status.as_u16(),
            body: preview(&body),
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            operation,
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

    if let Some(code) = value.get("errorCode") {
        let code = match code {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let message = value
            .get("errorMessage")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();
        return Err(Error::Api {
            operation,
            code,
            message,
        });
    }

    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        operation,
        message: e.to_string(),
        body,
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
