//! Telegram invite issuer adapter.
//!
//! Implements the `InviteIssuer` trait over the Bot API's
//! `createChatInviteLink` method. `member_limit = 1` plus `expire_date`
//! makes the returned link single-use and time-bounded by construction;
//! nothing needs to be revoked on this side.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::ChatId;
use crate::ports::{InviteError, InviteIssuer, InviteLink, InviteRequest};

/// Default timeout for Bot API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Telegram Bot API configuration.
#[derive(Clone)]
pub struct BotApiConfig {
    /// Bot token (`<id>:<secret>`).
    bot_token: SecretString,

    /// Base URL for the Bot API (default: https://api.telegram.org).
    api_base_url: String,
}

impl BotApiConfig {
    /// Create a new Telegram configuration.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: SecretString::new(bot_token.into()),
            api_base_url: "https://api.telegram.org".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Telegram invite issuer adapter.
pub struct TelegramInviteIssuer {
    config: BotApiConfig,
    http_client: reqwest::Client,
}

impl TelegramInviteIssuer {
    /// Create a new issuer with the given configuration.
    pub fn new(config: BotApiConfig) -> Self {
        // Construction-time fault: a client without the timeout would hang
        // claim requests on a stalled Bot API, so refuse to start instead.
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to construct Bot API HTTP client");
        Self {
            config,
            http_client,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url,
            self.config.bot_token.expose_secret(),
            method
        )
    }
}

#[derive(Debug, Serialize)]
struct CreateInviteLinkParams {
    chat_id: i64,
    member_limit: u32,
    expire_date: i64,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatInviteLink {
    invite_link: String,
}

#[async_trait]
impl InviteIssuer for TelegramInviteIssuer {
    async fn create_invite(
        &self,
        destination: ChatId,
        request: InviteRequest,
    ) -> Result<InviteLink, InviteError> {
        let params = CreateInviteLinkParams {
            chat_id: destination.as_i64(),
            member_limit: request.member_limit,
            expire_date: request.expires_at.timestamp(),
        };

        let response = self
            .http_client
            .post(self.method_url("createChatInviteLink"))
            .json(&params)
            .send()
            .await
            .map_err(|e| InviteError::Transport(e.to_string()))?;

        let body: BotApiResponse<ChatInviteLink> = response
            .json()
            .await
            .map_err(|e| InviteError::MalformedResponse(e.to_string()))?;

        if !body.ok {
            return Err(InviteError::Rejected {
                description: body
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        let link = body.result.ok_or_else(|| {
            InviteError::MalformedResponse("ok response without result".to_string())
        })?;

        tracing::debug!(
            destination = %destination,
            expires_at = %request.expires_at,
            "invite link created"
        );

        Ok(InviteLink {
            url: link.invite_link,
            expires_at: request.expires_at,
        })
    }
}
