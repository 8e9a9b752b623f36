//! Contribution engine — validates a purchase and computes its effects
//!
//! `plan_purchase` is pure: it reads the asset record, the round ledger and
//! the investor's position, and returns every value the purchase will write.
//! The aggregate commits the plan only once all checks have passed, so a
//! rejected purchase leaves no trace.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. designated round exists, is flagged active, and `now` is in its window
//! 2. `value >= min_contribution`
//! 3. `value <= max_contribution`
//! 4. `total_raised + value <= hard_cap`
//! 5. `floor(value * PRICE_SCALE / price) <= units_available`

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use types::ids::{AccountId, AssetId};
use types::numeric::{units_for_value, Amount, Timestamp};

use crate::errors::LaunchpadError;
use crate::registry::AssetRecord;
use crate::rounds::SaleRoundLedger;

/// An investor's cumulative standing in one asset. All fields only grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorPosition {
    pub amount_contributed: Amount,
    pub units_allocated: Amount,
    pub units_claimed: Amount,
}

/// Positions keyed by (investor, asset), created on first contribution.
#[derive(Debug, Default)]
pub struct PositionBook {
    positions: HashMap<(AccountId, AssetId), InvestorPosition>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, investor: &AccountId, asset_id: &AssetId) -> Option<&InvestorPosition> {
        self.positions.get(&(*investor, *asset_id))
    }

    pub(crate) fn put(&mut self, investor: AccountId, asset_id: AssetId, position: InvestorPosition) {
        self.positions.insert((investor, asset_id), position);
    }

    pub(crate) fn add_claimed(&mut self, investor: &AccountId, asset_id: &AssetId, amount: Amount) {
        if let Some(position) = self.positions.get_mut(&(*investor, *asset_id)) {
            position.units_claimed = position.units_claimed.saturating_add(amount);
        }
    }

    pub(crate) fn sub_claimed(&mut self, investor: &AccountId, asset_id: &AssetId, amount: Amount) {
        if let Some(position) = self.positions.get_mut(&(*investor, *asset_id)) {
            position.units_claimed = position.units_claimed.saturating_sub(amount);
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Everything a validated purchase will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasePlan {
    pub round_index: usize,
    pub units_granted: Amount,
    pub total_raised: Amount,
    pub round_units_available: Amount,
    pub position: InvestorPosition,
}

/// Validate a contribution of `value` at `now` and compute its effects.
pub fn plan_purchase(
    record: &AssetRecord,
    rounds: &SaleRoundLedger,
    position: Option<&InvestorPosition>,
    value: Amount,
    now: Timestamp,
) -> Result<PurchasePlan, LaunchpadError> {
    let (round_index, round) = rounds.eligible_round(&record.asset_id, now)?;

    if value < round.min_contribution {
        return Err(LaunchpadError::ContributionTooLow {
            value,
            min: round.min_contribution,
        });
    }
    if value > round.max_contribution {
        return Err(LaunchpadError::ContributionTooHigh {
            value,
            max: round.max_contribution,
        });
    }

    let hard_cap_exceeded = LaunchpadError::HardCapExceeded {
        total_raised: record.total_raised,
        value,
        hard_cap: record.hard_cap,
    };
    let total_raised = record
        .total_raised
        .checked_add(value)
        .ok_or_else(|| hard_cap_exceeded.clone())?;
    if total_raised > record.hard_cap {
        return Err(hard_cap_exceeded);
    }

    let units_granted = units_for_value(value, round.price_per_unit)?;
    if units_granted > round.units_available {
        return Err(LaunchpadError::InsufficientRoundInventory {
            requested: units_granted,
            available: round.units_available,
        });
    }
    if units_granted == 0 {
        return Err(LaunchpadError::AllocationTooSmall { value });
    }

    let previous = position.cloned().unwrap_or_default();
    let position = InvestorPosition {
        amount_contributed: previous
            .amount_contributed
            .checked_add(value)
            .ok_or(LaunchpadError::ArithmeticOverflow)?,
        units_allocated: previous
            .units_allocated
            .checked_add(units_granted)
            .ok_or(LaunchpadError::ArithmeticOverflow)?,
        units_claimed: previous.units_claimed,
    };

    debug!(
        asset_id = %record.asset_id,
        round_index,
        value,
        units_granted,
        total_raised,
        "Purchase validated"
    );

    Ok(PurchasePlan {
        round_index,
        units_granted,
        total_raised,
        round_units_available: round.units_available - units_granted,
        position,
    })
}
