//! Access tier definitions and destination mapping.
//!
//! Each tariff amount maps to exactly one tier, and each tier maps to one
//! gated destination channel.

use crate::domain::foundation::ChatId;
use serde::{Deserialize, Serialize};

/// Access tier, one per price point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// 950 major units.
    Standard,

    /// 1750 major units.
    Premium,
}

impl Tier {
    /// Resolves a tariff amount to its tier, if the amount is recognized.
    pub fn from_amount(amount: i64) -> Option<Self> {
        match amount {
            950 => Some(Tier::Standard),
            1750 => Some(Tier::Premium),
            _ => None,
        }
    }

    /// Returns the tariff amount for this tier in major currency units.
    pub fn amount(&self) -> i64 {
        match self {
            Tier::Standard => 950,
            Tier::Premium => 1750,
        }
    }

    /// Returns all tiers.
    pub fn all() -> [Tier; 2] {
        [Tier::Standard, Tier::Premium]
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Standard => "Standard",
            Tier::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Mapping from tier to gated destination channel.
///
/// Built from configuration at startup; a missing mapping at claim time is an
/// operator fault, not a user error.
#[derive(Debug, Clone, Copy)]
pub struct TierMap {
    standard: ChatId,
    premium: ChatId,
}

impl TierMap {
    /// Creates a tier map with one destination per tier.
    pub fn new(standard: ChatId, premium: ChatId) -> Self {
        Self { standard, premium }
    }

    /// Returns the destination channel for a tier.
    pub fn destination(&self, tier: Tier) -> ChatId {
        match tier {
            Tier::Standard => self.standard,
            Tier::Premium => self.premium,
        }
    }

    /// Resolves a tariff amount straight to its destination channel.
    pub fn destination_for_amount(&self, amount: i64) -> Option<ChatId> {
        Tier::from_amount(amount).map(|tier| self.destination(tier))
    }
}
