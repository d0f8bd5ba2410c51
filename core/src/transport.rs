//! Blocking transports that execute `HttpRequest` values.
//!
//! # Design
//! `Transport` is the seam between the pure client and the network. The
//! default `UreqTransport` turns off ureq's status-as-error behavior, so
//! 4xx/5xx responses come back as data and the client classifies them.
//! Only transport-level failures surface as `Err` here.

use std::io;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a shared `ureq::Agent` with a global timeout.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let mut response = builder.call().map_err(|e| log_failure(&request, map_error(e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| log_failure(&request, map_error(e)))?;

        tracing::debug!(url = %request.url, status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn log_failure(request: &HttpRequest, err: ApiError) -> ApiError {
    tracing::warn!(url = %request.url, error = %err, "request failed");
    err
}

fn map_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout,
        ureq::Error::Io(io) if io.kind() == io::ErrorKind::TimedOut => ApiError::Timeout,
        ureq::Error::StatusCode(status) => ApiError::Http {
            status,
            body: String::new(),
        },
        other => ApiError::Network(other.to_string()),
    }
}
