//! HTTP client and the shared envelope-unwrapping request helper.
//!
//! Every backend operation is described by a static [`Endpoint`] and sent
//! through [`ApiClient::call`], which owns the success/failure decision for
//! the `{code, msg, data}` envelope. Operation modules only build payloads.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::ApiError;
use crate::config::ClientConfig;

/// Static description of one backend operation.
#[derive(Debug)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    /// Message used when the envelope reports failure with an empty `msg`.
    pub fallback: &'static str,
    /// Map HTTP 413 to [`ApiError::PayloadTooLarge`] before reading the body.
    pub rejects_oversized: bool,
}

/// Request body (or query) attached to an endpoint call.
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Query(Vec<(&'static str, String)>),
    Multipart(Form),
}

impl Payload {
    pub(crate) fn json<T: Serialize>(body: &T) -> Result<Self, ApiError> {
        Ok(Payload::Json(serde_json::to_value(body)?))
    }
}

/// Response wrapper used by every enveloped endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub code: Option<i64>,
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// HTTP client wrapper for the cloud-disk API.
///
/// Holds the base URL and a shared `reqwest::Client`. Cloning is cheap and
/// clones share the connection pool. The client keeps no token: callers
/// pass it to each authenticated operation.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL with no request timeout.
    pub fn new(base_url: &str) -> Self {
        Self::build(base_url, None)
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::build(&config.base_url, config.timeout)
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the API base.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, endpoint: &Endpoint, token: Option<&str>, payload: Payload) -> RequestBuilder {
        let path = match &payload {
            Payload::Query(params) => with_query(endpoint.path, params),
            _ => endpoint.path.to_string(),
        };

        let mut builder = self.client.request(endpoint.method.clone(), self.url(&path));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        match payload {
            Payload::Empty | Payload::Query(_) => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart(form) => builder.multipart(form),
        }
    }

    /// Send one request and unwrap its envelope into `T`.
    ///
    /// `token` is attached as a bearer credential when present. Void
    /// operations use `serde::de::IgnoredAny` for `T`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
        payload: Payload,
    ) -> Result<T, ApiError> {
        log::debug!("{} {}", endpoint.method, endpoint.path);
        let resp = self.request(endpoint, token, payload).send().await?;
        read_envelope(endpoint, resp).await
    }

    /// GET a path whose response is plain JSON rather than an envelope.
    pub(crate) async fn get_plain<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", path);
        let resp = self.client.get(self.url(path)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch raw bytes from an absolute URL (presigned download links).
    ///
    /// Buffers the whole body; use [`ApiClient::download_to`] for files.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let mut bytes = Vec::new();
        self.download_to(url, &mut bytes).await?;
        Ok(bytes)
    }

    /// Stream the body at an absolute URL into `writer` chunk by chunk.
    ///
    /// Returns the number of bytes written. The writer is flushed on success.
    pub async fn download_to<W>(&self, url: &str, writer: &mut W) -> Result<u64, ApiError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }
}

fn with_query(path: &str, params: &[(&'static str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();
    format!("{}?{}", path, query.join("&"))
}

async fn read_envelope<T: DeserializeOwned>(endpoint: &Endpoint, resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if endpoint.rejects_oversized && status == StatusCode::PAYLOAD_TOO_LARGE {
        return Err(ApiError::PayloadTooLarge);
    }

    // An unreadable body is treated like an unparsable one.
    let body = resp.bytes().await.unwrap_or_default();
    let envelope = serde_json::from_slice::<Envelope>(&body).ok();
    settle(endpoint, status, envelope)
}

/// Decide the outcome of a call from its status and (maybe) parsed envelope.
///
/// The non-success status path and the nonzero-code path are independent:
/// neither is assumed to subsume the other.
pub(crate) fn settle<T: DeserializeOwned>(
    endpoint: &Endpoint,
    status: StatusCode,
    envelope: Option<Envelope>,
) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(match envelope {
            Some(Envelope {
                code,
                msg: Some(msg),
                ..
            }) if !msg.is_empty() => ApiError::Api { code, message: msg },
            _ => ApiError::Status(status.as_u16()),
        });
    }

    let envelope = envelope.ok_or(ApiError::Status(status.as_u16()))?;
    if envelope.code != Some(0) {
        let message = match envelope.msg {
            Some(msg) if !msg.is_empty() => msg,
            _ => endpoint.fallback.to_string(),
        };
        return Err(ApiError::Api {
            code: envelope.code,
            message,
        });
    }

    Ok(serde_json::from_value(envelope.data)?)
}
