//! Outbound call to the mail provider.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, StatusCode};

use crate::error::ApiError;
use crate::schema::SendResult;

/// Anything that can POST a JSON body to the provider and hand back its
/// [`SendResult`].
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        url: &str,
        json: String,
        bearer_token: &str,
    ) -> Result<SendResult, ApiError>;
}

/// [`MailDispatcher`] backed by `reqwest`, relying on the client's default
/// timeouts.
#[derive(Clone, Debug, Default)]
pub struct HttpDispatcher {
    client: reqwest::Client,
}

impl HttpDispatcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MailDispatcher for HttpDispatcher {
    async fn dispatch(
        &self,
        url: &str,
        json: String,
        bearer_token: &str,
    ) -> Result<SendResult, ApiError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(json);
        if !bearer_token.is_empty() {
            request = request.bearer_auth(bearer_token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("provider answered {status}");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized("Token is not correct".into()));
        }
        // Anything else that failed is reported as an empty result, not an error.
        if !status.is_success() {
            tracing::warn!("provider returned {status}, answering with an empty result");
            return Ok(SendResult::default());
        }

        let body = response.text().await?;
        if body.is_empty() {
            return Ok(SendResult::default());
        }
        let result: Option<SendResult> = serde_json::from_str(&body)?;
        result.ok_or_else(|| ApiError::Internal("provider returned a null send result".into()))
    }
}
