//! Invite issuer port.
//!
//! The messaging collaborator that mints single-use, time-bounded invite
//! links into gated channels.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::foundation::ChatId;

/// Parameters for a single invite link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteRequest {
    /// Maximum number of members who may join through the link.
    pub member_limit: u32,

    /// Point in time after which the link stops working.
    pub expires_at: DateTime<Utc>,
}

impl InviteRequest {
    /// A single-use invite expiring at the given instant.
    pub fn single_use(expires_at: DateTime<Utc>) -> Self {
        Self {
            member_limit: 1,
            expires_at,
        }
    }
}

/// A minted invite link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteLink {
    /// The joinable URL.
    pub url: String,

    /// When the link expires.
    pub expires_at: DateTime<Utc>,
}

/// Failures while minting an invite.
#[derive(Debug, Error)]
pub enum InviteError {
    /// The messaging API rejected the request.
    #[error("Invite API rejected the request: {description}")]
    Rejected { description: String },

    /// Transport failure reaching the messaging API.
    #[error("Invite API unreachable: {0}")]
    Transport(String),

    /// The API answered with a body that could not be interpreted.
    #[error("Invite API returned an unreadable response: {0}")]
    MalformedResponse(String),
}

/// Port for minting invite links into gated destinations.
#[async_trait]
pub trait InviteIssuer: Send + Sync {
    /// Creates an invite link into `destination` with the given member limit
    /// and expiry. The link is single-use and time-bounded by construction of
    /// the underlying invite mechanism; no revocation bookkeeping happens on
    /// this side.
    async fn create_invite(
        &self,
        destination: ChatId,
        request: InviteRequest,
    ) -> Result<InviteLink, InviteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_use_request_limits_to_one_member() {
        let request = InviteRequest::single_use(Utc::now());
        assert_eq!(request.member_limit, 1);
    }

    #[test]
    fn invite_issuer_is_object_safe() {
        fn _accepts_dyn(_issuer: &dyn InviteIssuer) {}
    }
}
