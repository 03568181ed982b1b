//! Delivery transports behind the [`EmailTransport`] trait.
//!
//! The HTTP transport targets a transactional email API; the noop transport
//! backs disabled configurations so the rest of the pipeline never branches
//! on whether email is on.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::info;

use crate::message::EmailMessage;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("email API request failed: {0}")]
    Request(String),

    #[error("email API returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError>;

    fn name(&self) -> &'static str;
}

/// Accepts and drops every message.
#[derive(Default)]
pub struct NoopEmailTransport;

#[async_trait]
impl EmailTransport for NoopEmailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "email sending disabled, dropping message"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Sends through the provider's JSON send endpoint, authenticated per request
/// with the API token header.
pub struct HttpEmailTransport {
    client: reqwest::Client,
    base_url: String,
    api_token: SecretString,
    from_address: String,
}

impl HttpEmailTransport {
    pub fn new(base_url: String, api_token: SecretString, from_address: String) -> Self {
        Self { client: reqwest::Client::new(), base_url, api_token, from_address }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/send", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmailTransport for HttpEmailTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        let payload = serde_json::json!({
            "from": self.from_address,
            "to": message.to,
            "subject": message.subject,
            "text": message.text_body,
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("X-Api-Token", self.api_token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected { status: status.as_u16(), body });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http-api"
    }
}
