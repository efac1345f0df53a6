//! Telegram bot configuration

use serde::Deserialize;

use crate::domain::foundation::ChatId;
use crate::domain::order::TierMap;

use super::error::ValidationError;

/// Telegram bot configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// Gated channel for the standard tier
    pub standard_channel_id: i64,

    /// Gated channel for the premium tier
    pub premium_channel_id: i64,

    /// Invite link lifetime in seconds
    #[serde(default = "default_invite_ttl")]
    pub invite_ttl_secs: u64,
}

impl TelegramConfig {
    /// Build the tier to destination channel mapping
    pub fn tier_map(&self) -> TierMap {
        TierMap::new(
            ChatId::new(self.standard_channel_id),
            ChatId::new(self.premium_channel_id),
        )
    }

    /// Invite lifetime as a chrono duration
    pub fn invite_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.invite_ttl_secs as i64)
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM_BOT_TOKEN"));
        }
        if self.standard_channel_id == 0 || self.premium_channel_id == 0 {
            return Err(ValidationError::InvalidChannelId);
        }
        if self.invite_ttl_secs == 0 || self.invite_ttl_secs > 86_400 {
            return Err(ValidationError::InvalidInviteTtl);
        }
        Ok(())
    }
}

fn default_invite_ttl() -> u64 {
    600
}
