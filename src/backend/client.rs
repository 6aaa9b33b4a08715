//! HTTP client for the chat backend.
//!
//! One POST per message, no retries: a failed send is reported to the user
//! and the message is dropped.

use super::types::{ChatRequest, ChatResponse};
use reqwest::{StatusCode, Url};
use std::time::{Duration, Instant};

pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Backend did not answer within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Could not reach backend: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Application(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let parsed = Url::parse(url).map_err(|e| BackendError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Network)?;

        Ok(Self {
            http,
            url: parsed,
            timeout,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send one message and return the backend's reply text.
    pub async fn send(&self, message: &str) -> Result<String, BackendError> {
        let start = Instant::now();
        log::info!(
            "[BACKEND] POST {} ({} chars)",
            self.url,
            message.chars().count()
        );

        let response = self
            .http
            .post(self.url.clone())
            .header("content-type", "application/json")
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        log::info!(
            "[BACKEND] HTTP {} in {}ms ({} bytes)",
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        let result = interpret(status, &body);
        if let Err(e) = &result {
            log::error!("[BACKEND] {}", e);
        }
        result
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Network(e)
        }
    }
}

/// Map a status and body to a reply or an error.
///
/// An `error` field fails the message whatever the status. A non-2xx
/// status without one reports [`UNKNOWN_SERVER_ERROR`].
pub(crate) fn interpret(status: StatusCode, body: &str) -> Result<String, BackendError> {
    let parsed = serde_json::from_str::<ChatResponse>(body);

    match parsed {
        Ok(resp) => {
            if let Some(message) = resp.error_message() {
                return Err(BackendError::Application(message.to_string()));
            }
            if !status.is_success() {
                return Err(BackendError::Status {
                    status: status.as_u16(),
                    message: UNKNOWN_SERVER_ERROR.to_string(),
                });
            }
            resp.reply.ok_or_else(|| {
                BackendError::MalformedResponse("missing `reply` field".to_string())
            })
        }
        Err(_) if !status.is_success() => Err(BackendError::Status {
            status: status.as_u16(),
            message: UNKNOWN_SERVER_ERROR.to_string(),
        }),
        Err(e) => Err(BackendError::MalformedResponse(e.to_string())),
    }
}
