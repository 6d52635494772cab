//! # GigaChat Client Module
//!
//! Client for the GigaChat OAuth, chat-completion, and token-count endpoints.
//! A fresh access credential is minted for every request sequence; the
//! reported expiry is logged but the credential is never cached.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::PublishError;

/// Default OAuth base URL for the token endpoint
const DEFAULT_OAUTH_BASE: &str = "https://ngw.devices.sberbank.ru:9443";

/// Default API base URL for completion and token-count endpoints
const DEFAULT_API_BASE: &str = "https://gigachat.devices.sberbank.ru";

/// Model name used for all requests
const MODEL: &str = "GigaChat";

/// OAuth scope for personal API access
const OAUTH_SCOPE: &str = "GIGACHAT_API_PERS";

/// Short-lived bearer credential from the token endpoint
#[derive(Debug, Clone)]
pub struct AccessCredential {
    /// Opaque bearer string
    pub token: String,
    /// Expiry as reported by the issuing service, epoch milliseconds
    pub expires_at: i64,
}

/// Token and character counts for a text
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenUsage {
    pub tokens: u64,
    pub characters: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_at: Option<i64>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    repetition_penalty: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct TokenCountRequest {
    model: String,
    input: Vec<String>,
}

/// Client for the text enrichment service
pub struct GigaChatClient {
    client: Client,
    /// Authorization secret for the token endpoint; absent when unconfigured
    secret: Option<String>,
    /// Base URL of the OAuth endpoint (overridable for testing)
    oauth_base: String,
    /// Base URL of the completion endpoints (overridable for testing)
    api_base: String,
}

impl GigaChatClient {
    /// Create a new client with the given authorization secret
    pub fn new(secret: Option<String>) -> anyhow::Result<Self> {
        Self::with_base_urls(
            secret,
            DEFAULT_OAUTH_BASE.to_string(),
            DEFAULT_API_BASE.to_string(),
        )
    }

    /// Create a new client with custom base URLs (for testing)
    pub fn with_base_urls(
        secret: Option<String>,
        oauth_base: String,
        api_base: String,
    ) -> anyhow::Result<Self> {
        // The service presents a certificate from a CA outside the default
        // trust store, so certificate verification is disabled.
        let client = Client::builder().danger_accept_invalid_certs(true).build()?;
        Ok(Self {
            client,
            secret,
            oauth_base,
            api_base,
        })
    }

    /// Exchange the authorization secret for a fresh access credential
    pub async fn fetch_token(&self) -> Result<AccessCredential, PublishError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| PublishError::Credential("GIGACHAT_TOKEN is not set".to_string()))?;

        let rq_uid = Uuid::new_v4().to_string();
        info!(rq_uid = %rq_uid, "Requesting GigaChat access token");

        let url = format!("{}/api/v2/oauth", self.oauth_base);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Basic {secret}"))
            .header("RqUID", &rq_uid)
            .form(&[("scope", OAUTH_SCOPE)])
            .send()
            .await
            .map_err(|e| PublishError::Credential(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Token endpoint returned a failure status");
            return Err(PublishError::Credential(format!("HTTP {status}: {body}")));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Credential(format!("failed to parse response: {e}")))?;

        match (body.access_token, body.expires_at) {
            (Some(token), Some(expires_at)) => {
                info!(expires_at, "Access token received");
                Ok(AccessCredential { token, expires_at })
            }
            _ => Err(PublishError::Credential(
                "response is missing access_token or expires_at".to_string(),
            )),
        }
    }

    /// Submit text for completion and return the first choice's content
    pub async fn complete(
        &self,
        credential: &AccessCredential,
        text: &str,
    ) -> Result<String, PublishError> {
        let request = CompletionRequest {
            model: MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: text.to_string(),
            }],
            stream: false,
            repetition_penalty: 1,
        };

        let url = format!("{}/api/v1/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&credential.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| PublishError::Enrichment(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Completion endpoint returned a failure status");
            return Err(PublishError::Enrichment(format!("HTTP {status}: {body}")));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Enrichment(format!("failed to parse response: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                PublishError::Enrichment("response contains no choices".to_string())
            })?;

        info!(chars = content.len(), "Received completion");
        Ok(content)
    }

    /// Count tokens and characters for a text
    pub async fn count_tokens(
        &self,
        credential: &AccessCredential,
        text: &str,
    ) -> Result<TokenUsage, PublishError> {
        let request = TokenCountRequest {
            model: MODEL.to_string(),
            input: vec![text.to_string()],
        };

        let url = format!("{}/api/v1/tokens/count", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&credential.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| PublishError::Enrichment(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Token-count endpoint returned a failure status");
            return Err(PublishError::Enrichment(format!("HTTP {status}: {body}")));
        }

        let body: Vec<TokenUsage> = response
            .json()
            .await
            .map_err(|e| PublishError::Enrichment(format!("failed to parse response: {e}")))?;

        body.into_iter().next().ok_or_else(|| {
            PublishError::Enrichment("response contains no usage entries".to_string())
        })
    }
}
