use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::protocol::{LookupData, LookupRequest, LookupResponse, LOOKUP_PATH};
use tracing::{debug, info, warn};
use url::Url;

pub mod error;

pub use error::{EndpointError, LookupError, LookupErrorKind};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[async_trait]
pub trait LookupService: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<LookupData, LookupError>;
}

pub struct LookupClient {
    http: Client,
    endpoint: Url,
}

impl LookupClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_http_client(Client::new(), server_url)
    }

    pub fn with_http_client(http: Client, server_url: &str) -> Result<Self> {
        let endpoint = resolve_endpoint(server_url)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LookupService for LookupClient {
    async fn lookup(&self, address: &str) -> Result<LookupData, LookupError> {
        let address = normalize_address(address).ok_or(LookupError::EmptyAddress)?;

        info!(endpoint = %self.endpoint, "looking up council district");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&LookupRequest {
                address: address.to_string(),
            })
            .send()
            .await
            .map_err(|err| {
                warn!("lookup request failed: {err}");
                LookupError::transport(err)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            warn!(%status, "failed to read lookup response body: {err}");
            LookupError::transport(err)
        })?;

        interpret_response(status, &body)
    }
}

/// Trimmed address, or `None` when nothing is left to look up.
pub fn normalize_address(address: &str) -> Option<&str> {
    let trimmed = address.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Lookup endpoint for a server base URL. A base path is kept, so
/// `https://host/civic` resolves to `https://host/civic/api/reps/lookup/`.
pub fn resolve_endpoint(server_url: &str) -> Result<Url, EndpointError> {
    let raw = server_url.trim();
    let mut base = Url::parse(raw).map_err(|source| EndpointError::Parse {
        url: raw.to_string(),
        source,
    })?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(EndpointError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: base.scheme().to_string(),
        });
    }

    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(LOOKUP_PATH).map_err(|source| EndpointError::Parse {
        url: raw.to_string(),
        source,
    })
}

/// Classifies a lookup response. The backend answers validation and
/// not-found cases with non-2xx statuses that still carry a JSON envelope,
/// so the envelope decides the outcome whenever it parses.
pub fn interpret_response(status: StatusCode, body: &[u8]) -> Result<LookupData, LookupError> {
    let envelope: LookupResponse = serde_json::from_slice(body).map_err(|err| {
        warn!(%status, "lookup response is not a valid envelope: {err}");
        LookupError::transport(format!(
            "unreadable lookup response (HTTP {status}): {err}"
        ))
    })?;
    debug!(%status, success = envelope.success, "lookup envelope received");
    interpret_envelope(envelope)
}

pub fn interpret_envelope(envelope: LookupResponse) -> Result<LookupData, LookupError> {
    if !envelope.success {
        return Err(LookupError::rejected(envelope.error));
    }

    envelope
        .data
        .ok_or_else(|| LookupError::transport("successful lookup envelope carried no data"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
