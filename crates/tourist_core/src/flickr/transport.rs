use log::debug;
use std::time::Instant;
use thiserror::Error;
use url::Url;

/// Network-level failure before a usable response body was read.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Response of a successful round-trip, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Blocking HTTP GET seam so the client can run against canned responses.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// `reqwest` blocking transport with the library's default timeout.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|err| TransportError(format!("failed to build http client: {err}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let started_at = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| TransportError(err.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|err| TransportError(err.without_url().to_string()))?
            .to_vec();
        debug!(
            "event=http_get module=flickr status_code={} body_bytes={} duration_ms={}",
            status,
            body.len(),
            started_at.elapsed().as_millis()
        );
        Ok(HttpResponse { status, body })
    }
}
