//! Launchpad notifications
//!
//! Events are immutable records emitted by successful mutations. Each carries
//! the affected keys and the resulting quantities for audit consumers.

use serde::{Deserialize, Serialize};
use types::ids::{AccountId, AssetId};
use types::numeric::{Amount, Timestamp};
use uuid::Uuid;

/// Asset accepted into the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistered {
    pub asset_id: AssetId,
    pub registrant: AccountId,
    pub soft_cap: Amount,
    pub hard_cap: Amount,
}

/// Sale round appended to an asset's round list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRoundAdded {
    pub asset_id: AssetId,
    pub round_index: usize,
    pub price_per_unit: Amount,
    pub units_available: Amount,
    pub min_contribution: Amount,
    pub max_contribution: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// Round designated for purchases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRoundActivated {
    pub asset_id: AssetId,
    pub round_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRoundDeactivated {
    pub asset_id: AssetId,
    pub round_index: usize,
}

/// Contribution accepted and units allocated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPurchased {
    pub asset_id: AssetId,
    pub investor: AccountId,
    pub round_index: usize,
    pub value: Amount,
    pub units_granted: Amount,
    pub total_raised: Amount,
    pub round_units_available: Amount,
}

/// Vested units released to an investor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensClaimed {
    pub asset_id: AssetId,
    pub investor: AccountId,
    pub amount: Amount,
    pub total_released: Amount,
    pub total_allocation: Amount,
}

/// Collected value paid out to a registrant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsWithdrawn {
    pub withdrawal_id: Uuid,
    pub asset_id: AssetId,
    pub recipient: AccountId,
    pub amount: Amount,
}

/// Enum wrapper for all launchpad events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchpadEvent {
    AssetRegistered(AssetRegistered),
    SaleRoundAdded(SaleRoundAdded),
    SaleRoundActivated(SaleRoundActivated),
    SaleRoundDeactivated(SaleRoundDeactivated),
    TokenPurchased(TokenPurchased),
    TokensClaimed(TokensClaimed),
    FundsWithdrawn(FundsWithdrawn),
}

impl LaunchpadEvent {
    /// Asset the event concerns.
    pub fn asset_id(&self) -> AssetId {
        match self {
            LaunchpadEvent::AssetRegistered(e) => e.asset_id,
            LaunchpadEvent::SaleRoundAdded(e) => e.asset_id,
            LaunchpadEvent::SaleRoundActivated(e) => e.asset_id,
            LaunchpadEvent::SaleRoundDeactivated(e) => e.asset_id,
            LaunchpadEvent::TokenPurchased(e) => e.asset_id,
            LaunchpadEvent::TokensClaimed(e) => e.asset_id,
            LaunchpadEvent::FundsWithdrawn(e) => e.asset_id,
        }
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            LaunchpadEvent::AssetRegistered(_) => "asset_registered",
            LaunchpadEvent::SaleRoundAdded(_) => "sale_round_added",
            LaunchpadEvent::SaleRoundActivated(_) => "sale_round_activated",
            LaunchpadEvent::SaleRoundDeactivated(_) => "sale_round_deactivated",
            LaunchpadEvent::TokenPurchased(_) => "token_purchased",
            LaunchpadEvent::TokensClaimed(_) => "tokens_claimed",
            LaunchpadEvent::FundsWithdrawn(_) => "funds_withdrawn",
        }
    }
}
