//! HTTP client for the monitoring backend.
//!
//! Two layers: [`Transport`] moves raw requests over the wire, [`ApiClient`]
//! validates input, decodes payloads, and folds every failure into
//! [`ApiError`]. The console only sees the [`ProbeApi`] trait.

use async_trait::async_trait;
use reqwest::{Certificate, Client};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::ApiError;
use crate::types::{CheckRequest, ErrorReply, ProbeResult, RecentReply};

pub const CHECK_PATH: &str = "/api/verifier";
/// Path used by the older deployment of the backend.
pub const LEGACY_CHECK_PATH: &str = "/api/check";
pub const RESULTS_PATH: &str = "/api/resultats";
pub const HEALTH_PATH: &str = "/api/etat";

const USER_AGENT: &str = concat!("pingtop/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw request/response exchange. Implementations report transport-level
/// failures as [`ApiError::Network`] and never inspect status codes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Operations the console needs from the backend.
#[async_trait]
pub trait ProbeApi: Send + Sync {
    /// Ask the backend to probe `url` once.
    async fn submit_check(&self, url: &str) -> Result<ProbeResult, ApiError>;
    /// Most recent results, newest first as the backend orders them.
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ProbeResult>, ApiError>;
    /// Delete every stored result.
    async fn clear_all(&self) -> Result<(), ApiError>;
    async fn health(&self) -> Result<(), ApiError>;
}

// ---------- reqwest transport ----------

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
    base: String,
}

impl ReqwestTransport {
    /// `base_url` is the backend root, e.g. `http://127.0.0.1:8080`.
    /// `tls_ca_pem` adds an extra trusted root for self-signed backends.
    pub fn new(base_url: &str, tls_ca_pem: Option<&[u8]>) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("invalid backend URL '{base_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Validation(format!(
                "backend URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(pem) = tls_ca_pem {
            let cert = Certificate::from_pem(pem)
                .map_err(|e| ApiError::Validation(format!("invalid CA certificate: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        let inner = builder
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            inner,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, req), fields(method = ?req.method, path = %req.path))]
    async fn send(&self, req: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base, req.path);
        let mut builder = match req.method {
            Method::Get => self.inner.get(&url),
            Method::Post => self.inner.post(&url),
            Method::Delete => self.inner.delete(&url),
        };
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        debug!("sending request");
        let response = builder.send().await.map_err(network)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network)?;
        debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body })
    }
}

fn network(e: reqwest::Error) -> ApiError {
    warn!(error = %e, "transport failure");
    ApiError::Network(e.to_string())
}

// ---------- API client ----------

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
    check_path: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_check_path(transport, CHECK_PATH)
    }

    pub fn with_check_path(transport: T, check_path: &str) -> Self {
        let check_path = if check_path.starts_with('/') {
            check_path.to_string()
        } else {
            format!("/{check_path}")
        };
        Self {
            transport,
            check_path,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn check_path(&self) -> &str {
        &self.check_path
    }
}

#[async_trait]
impl<T: Transport> ProbeApi for ApiClient<T> {
    async fn submit_check(&self, url: &str) -> Result<ProbeResult, ApiError> {
        let url = validate_target(url)?;
        let mut req = ApiRequest::new(Method::Post, &self.check_path);
        req.body = Some(
            serde_json::to_value(CheckRequest { url })
                .map_err(|e| ApiError::Validation(e.to_string()))?,
        );

        let body = expect_success(self.transport.send(req).await?)?;
        let mut payload = parse_json(&body)?;
        let statut = match payload.get_mut("statut").map(Value::take) {
            Some(v) if !v.is_null() => v,
            _ => return Err(ApiError::InvalidResponse("invalid API response: missing 'statut'".into())),
        };
        ProbeResult::deserialize(statut)
            .map_err(|e| ApiError::InvalidResponse(format!("invalid API response: {e}")))
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ProbeResult>, ApiError> {
        let mut req = ApiRequest::new(Method::Get, RESULTS_PATH);
        req.query.push(("limit".into(), limit.max(1).to_string()));

        let body = expect_success(self.transport.send(req).await?)?;
        let payload = parse_json(&body)?;
        let rows = match RecentReply::deserialize(payload) {
            Ok(reply) => reply.into_rows(),
            Err(e) => {
                debug!(error = %e, "unrecognized results payload, treating as empty");
                return Ok(Vec::new());
            }
        };
        decode_rows(rows)
    }

    async fn clear_all(&self) -> Result<(), ApiError> {
        let req = ApiRequest::new(Method::Delete, RESULTS_PATH);
        expect_success(self.transport.send(req).await?).map(|_| ())
    }

    async fn health(&self) -> Result<(), ApiError> {
        let req = ApiRequest::new(Method::Get, HEALTH_PATH);
        expect_success(self.transport.send(req).await?).map(|_| ())
    }
}

/// Decodes each row on its own. Bad rows are skipped with a warning; a page
/// where every row is bad is an invalid response.
fn decode_rows(rows: Vec<Value>) -> Result<Vec<ProbeResult>, ApiError> {
    let total = rows.len();
    let mut first_err = None;
    let results: Vec<ProbeResult> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match ProbeResult::deserialize(row) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(row = i, error = %e, "skipping undecodable result row");
                first_err.get_or_insert(e);
                None
            }
        })
        .collect();
    match first_err {
        Some(e) if results.is_empty() => Err(ApiError::InvalidResponse(format!(
            "invalid API response: {total} result row(s) unreadable: {e}"
        ))),
        _ => Ok(results),
    }
}

/// Accepts a non-empty `http://` or `https://` URL (scheme case-insensitive)
/// and returns it trimmed.
pub fn validate_target(url: &str) -> Result<&str, ApiError> {
    let url = url.trim();
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    });
    if url.is_empty() || !has_scheme {
        return Err(ApiError::Validation(
            "enter a valid URL starting with http:// or https://".into(),
        ));
    }
    Ok(url)
}

/// Turns a non-2xx response into [`ApiError::Api`]; the message is the body's
/// `error` field, else its `message` field, else `HTTP <status>`.
pub fn expect_success(resp: RawResponse) -> Result<String, ApiError> {
    if resp.is_success() {
        return Ok(resp.body);
    }
    let reply: ErrorReply = serde_json::from_str(&resp.body).unwrap_or_default();
    let message = non_empty(reply.error)
        .or_else(|| non_empty(reply.message))
        .unwrap_or_else(|| format!("HTTP {}", resp.status));
    warn!(status = resp.status, %message, "backend returned an error");
    Err(ApiError::Api {
        status: resp.status,
        message,
    })
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

fn parse_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "unreadable response body");
        ApiError::Network(format!("unreadable response body: {e}"))
    })
}
