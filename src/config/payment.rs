//! Payment processor configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment processor configuration (Monobank merchant API)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Merchant API token
    pub mono_api_token: String,

    /// Publicly reachable base URL of this service, used to build the
    /// webhook callback URL handed to the processor
    pub webhook_base_url: String,

    /// Where the processor sends the payer after checkout
    pub redirect_url: Option<String>,
}

impl PaymentConfig {
    /// Full webhook callback URL for invoice creation
    pub fn webhook_url(&self) -> String {
        format!(
            "{}/payments/webhook",
            self.webhook_base_url.trim_end_matches('/')
        )
    }

    /// Redirect URL for invoice creation, falling back to the service root
    pub fn redirect_url(&self) -> String {
        self.redirect_url
            .clone()
            .unwrap_or_else(|| self.webhook_base_url.trim_end_matches('/').to_string())
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mono_api_token.is_empty() {
            return Err(ValidationError::MissingRequired("MONO_API_TOKEN"));
        }
        if self.webhook_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("WEBHOOK_BASE_URL"));
        }
        if !self.webhook_base_url.starts_with("http://")
            && !self.webhook_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidWebhookBaseUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PaymentConfig {
        PaymentConfig {
            mono_api_token: "token".to_string(),
            webhook_base_url: "https://gate.example.com".to_string(),
            redirect_url: None,
        }
    }

    #[test]
    fn test_webhook_url_appends_path() {
        assert_eq!(
            valid().webhook_url(),
            "https://gate.example.com/payments/webhook"
        );
    }

    #[test]
    fn test_webhook_url_handles_trailing_slash() {
        let config = PaymentConfig {
            webhook_base_url: "https://gate.example.com/".to_string(),
            ..valid()
        };
        assert_eq!(
            config.webhook_url(),
            "https://gate.example.com/payments/webhook"
        );
    }

    #[test]
    fn test_redirect_url_falls_back_to_base() {
        assert_eq!(valid().redirect_url(), "https://gate.example.com");

        let config = PaymentConfig {
            redirect_url: Some("https://t.me/gate_bot".to_string()),
            ..valid()
        };
        assert_eq!(config.redirect_url(), "https://t.me/gate_bot");
    }

    #[test]
    fn test_validation_missing_token() {
        let config = PaymentConfig {
            mono_api_token: String::new(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = PaymentConfig {
            webhook_base_url: "gate.example.com".to_string(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate().is_ok());
    }
}
