//! Payment processor client adapter.
//!
//! Implements the `PaymentProvider` trait over the merchant invoice API.
//! Invoice creation is a thin pass-through; the processor's webhook delivers
//! the payment outcome separately.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{CreateInvoiceRequest, InvoiceSession, PaymentError, PaymentProvider};

/// Default timeout for processor calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const INVOICE_CREATE_PATH: &str = "/api/merchant/invoice/create";

/// Payment processor configuration.
#[derive(Clone)]
pub struct MonoConfig {
    /// Merchant API token.
    api_token: SecretString,

    /// Base URL for the merchant API (default: https://api.monobank.ua).
    api_base_url: String,
}

impl MonoConfig {
    /// Create a new processor configuration.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::new(api_token.into()),
            api_base_url: "https://api.monobank.ua".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Payment processor adapter.
pub struct MonoPaymentProvider {
    config: MonoConfig,
    http_client: reqwest::Client,
}

impl MonoPaymentProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: MonoConfig) -> Self {
        // Construction-time fault: a client without the timeout would hang
        // invoice creation on a stalled processor, so refuse to start instead.
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to construct merchant API HTTP client");
        Self {
            config,
            http_client,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceCreateBody {
    amount: i64,
    merchant_paym_info: MerchantPaymInfoBody,
    redirect_url: String,
    #[serde(rename = "webHookUrl")]
    web_hook_url: String,
}

#[derive(Debug, Serialize)]
struct MerchantPaymInfoBody {
    reference: String,
    destination: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceCreateResponse {
    page_url: String,
}

#[async_trait]
impl PaymentProvider for MonoPaymentProvider {
    async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<InvoiceSession, PaymentError> {
        let body = InvoiceCreateBody {
            amount: request.amount_minor,
            merchant_paym_info: MerchantPaymInfoBody {
                reference: request.reference.to_string(),
                destination: request.destination_text,
            },
            redirect_url: request.redirect_url,
            web_hook_url: request.webhook_url,
        };

        let response = self
            .http_client
            .post(format!("{}{}", self.config.api_base_url, INVOICE_CREATE_PATH))
            .header("X-Token", self.config.api_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PaymentError::Rejected {
                description: format!("{}: {}", status, text),
            });
        }

        let parsed: InvoiceCreateResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;

        tracing::debug!(reference = %request.reference, "invoice created at processor");

        Ok(InvoiceSession {
            pay_url: parsed.page_url,
        })
    }
}
