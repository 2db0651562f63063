//! Pushbullet delivery.
//!
//! Only the "note" push type is used. Pushes are created with
//! `POST {api_url}/pushes`, authenticated through the `Access-Token` header.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::plog;

/// Which devices a push goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Every device registered under the API key. Pushbullet broadcasts when
    /// no `device_iden` is given.
    #[default]
    AllDevices,
}

/// One note, built once and delivered once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub target: Target,
    pub title: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pushbullet returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// The one capability the dispatcher needs from a notification service.
#[async_trait]
pub trait NoteSender: Send + Sync {
    async fn push_note(
        &self,
        api_key: &str,
        request: &NotificationRequest,
    ) -> Result<(), DeliveryError>;
}

#[derive(Serialize)]
struct NotePush<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_iden: Option<&'a str>,
}

impl<'a> NotePush<'a> {
    fn from_request(request: &'a NotificationRequest) -> Self {
        let device_iden = match request.target {
            Target::AllDevices => None,
        };
        Self {
            kind: "note",
            title: &request.title,
            body: &request.body,
            device_iden,
        }
    }
}

/// Error envelope returned by the Pushbullet API on failure.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Prefer the API's own message; fall back to the raw body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

pub struct PushbulletClient {
    client: reqwest::Client,
    api_url: String,
}

impl PushbulletClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn pushes_url(&self) -> String {
        format!("{}/pushes", self.api_url)
    }
}

#[async_trait]
impl NoteSender for PushbulletClient {
    async fn push_note(
        &self,
        api_key: &str,
        request: &NotificationRequest,
    ) -> Result<(), DeliveryError> {
        let url = self.pushes_url();
        plog!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("Access-Token", api_key)
            .json(&NotePush::from_request(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        plog!("push accepted with HTTP {}", status.as_u16());
        Ok(())
    }
}
