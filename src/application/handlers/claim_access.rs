//! ClaimAccessHandler - Command handler for redeeming a paid order.
//!
//! The store's compare-and-set is the load-bearing guarantee here: invite
//! issuance happens for at most one caller per order even when claim
//! attempts race (duplicate taps, client retries, concurrent processes).

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::foundation::{AccessToken, OrderId};
use crate::domain::order::{ClaimError, Order, Tier, TierMap};
use crate::ports::{InviteIssuer, InviteLink, InviteRequest, OrderStore};

/// The claim key: either the raw order id or the access token, depending on
/// deployment variant.
#[derive(Debug, Clone)]
pub enum ClaimIdentifier {
    OrderId(OrderId),
    Token(AccessToken),
}

/// Command to claim access for a paid order.
#[derive(Debug, Clone)]
pub struct ClaimAccessCommand {
    /// The claim key.
    pub identifier: ClaimIdentifier,

    /// Opaque reference to the requesting chat, carried for logging and
    /// reply routing by the front end.
    pub requester_chat_ref: Option<String>,
}

/// Successful claim result.
#[derive(Debug, Clone)]
pub struct AccessGranted {
    pub order_id: OrderId,
    pub amount: i64,
    pub tier: Tier,
    pub invite: InviteLink,
}

/// Handler for the claim protocol.
pub struct ClaimAccessHandler {
    store: Arc<dyn OrderStore>,
    invites: Arc<dyn InviteIssuer>,
    tiers: TierMap,
    invite_ttl: Duration,
}

impl ClaimAccessHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        invites: Arc<dyn InviteIssuer>,
        tiers: TierMap,
        invite_ttl: Duration,
    ) -> Self {
        Self {
            store,
            invites,
            tiers,
            invite_ttl,
        }
    }

    pub async fn handle(&self, cmd: ClaimAccessCommand) -> Result<AccessGranted, ClaimError> {
        // 1. Resolve the identifier to an order.
        let order = self
            .resolve(&cmd.identifier)
            .await?
            .ok_or(ClaimError::UnknownIdentifier)?;

        // 2. Payment confirmation is asynchronous and may lag the user's
        //    request; the caller is told to retry shortly.
        if !order.status.is_paid() {
            tracing::debug!(
                order_id = %order.order_id,
                requester = cmd.requester_chat_ref.as_deref().unwrap_or("-"),
                "claim attempted before payment confirmation"
            );
            return Err(ClaimError::PaymentNotConfirmed);
        }

        // 3. The atomic transition. Status is monotonic, so a failed
        //    compare-and-set on a paid order means it was already claimed.
        if !self.transition(&cmd.identifier).await? {
            return Err(ClaimError::AlreadyClaimed);
        }

        // 4. Map the recorded tariff amount to a destination channel. The
        //    claim is already consumed at this point, so a miss is an
        //    operator fault, not a user error.
        let (tier, destination) = match Tier::from_amount(order.amount) {
            Some(tier) => (tier, self.tiers.destination(tier)),
            None => {
                tracing::error!(
                    order_id = %order.order_id,
                    amount = order.amount,
                    "claim consumed but amount maps to no configured tier"
                );
                return Err(ClaimError::UnknownTier {
                    amount: order.amount,
                });
            }
        };

        // 5. Mint the single-use, time-bounded invite. On failure the order
        //    stays claimed: re-arming it would risk double issuance if the
        //    first request failed transiently rather than finally.
        let request = InviteRequest::single_use(Utc::now() + self.invite_ttl);
        let invite = match self.invites.create_invite(destination, request).await {
            Ok(invite) => invite,
            Err(e) => {
                tracing::error!(
                    order_id = %order.order_id,
                    destination = %destination,
                    error = %e,
                    "lost claim: transition recorded but invite issuance failed, manual remediation required"
                );
                return Err(ClaimError::CredentialIssuanceFailed {
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(
            order_id = %order.order_id,
            amount = order.amount,
            tier = %tier,
            "access granted, single-use invite issued"
        );

        Ok(AccessGranted {
            order_id: order.order_id,
            amount: order.amount,
            tier,
            invite,
        })
    }

    async fn resolve(&self, identifier: &ClaimIdentifier) -> Result<Option<Order>, ClaimError> {
        let order = match identifier {
            ClaimIdentifier::OrderId(id) => self.store.get(id).await?,
            ClaimIdentifier::Token(token) => self.store.get_by_token(token).await?,
        };
        Ok(order)
    }

    async fn transition(&self, identifier: &ClaimIdentifier) -> Result<bool, ClaimError> {
        let transitioned = match identifier {
            ClaimIdentifier::OrderId(id) => self.store.try_claim(id).await?,
            ClaimIdentifier::Token(token) => self.store.try_claim_by_token(token).await?,
        };
        Ok(transitioned)
    }
}
