//! Webhook payload types for the payment processor.
//!
//! The processor's payload shape varies: fields may sit at the top level or
//! nested under `data`, and the correlation reference may appear as
//! `reference` or inside `merchantPaymInfo` as `reference`/`referenceId`.
//! Parsing normalizes all of that into one [`PaymentNotification`].

use serde::Deserialize;

use crate::domain::foundation::OrderId;
use crate::domain::order::{PaymentNotification, PaymentOutcome};

/// Raw webhook envelope.
#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    data: Option<WebhookBody>,

    #[serde(flatten)]
    top_level: WebhookBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WebhookBody {
    status: Option<String>,
    amount: Option<i64>,
    reference: Option<String>,
    merchant_paym_info: Option<MerchantPaymInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MerchantPaymInfo {
    reference: Option<String>,
    reference_id: Option<String>,
}

impl WebhookBody {
    fn reference(&self) -> Option<String> {
        self.reference
            .clone()
            .or_else(|| {
                self.merchant_paym_info
                    .as_ref()
                    .and_then(|info| info.reference.clone())
            })
            .or_else(|| {
                self.merchant_paym_info
                    .as_ref()
                    .and_then(|info| info.reference_id.clone())
            })
    }
}

/// Parses a webhook body into a notification.
///
/// Returns `Ok(None)` when the payload is valid JSON but carries no usable
/// correlation reference; the caller acknowledges and discards such events.
/// A JSON error is returned as-is so the transport layer can log it (and
/// still acknowledge).
pub fn parse_notification(
    payload: &[u8],
) -> Result<Option<PaymentNotification>, serde_json::Error> {
    let envelope: WebhookPayload = serde_json::from_slice(payload)?;
    let body = envelope.data.unwrap_or(envelope.top_level);

    let Some(reference) = body.reference() else {
        return Ok(None);
    };
    let Ok(reference) = OrderId::new(reference) else {
        return Ok(None);
    };

    Ok(Some(PaymentNotification {
        reference,
        outcome: PaymentOutcome::from_status(body.status.as_deref().unwrap_or("")),
        amount_minor: body.amount,
    }))
}
