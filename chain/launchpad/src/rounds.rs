//! Sale round ledger — per-asset, append-only round lists
//!
//! Each asset owns an ordered list of rounds plus a designated-round pointer.
//! Only the designated round is ever consulted for purchases; a round's own
//! `is_active` flag must also be set and the time must fall inside its window.
//! Activating a round does not clear other rounds' flags, so several rounds
//! may carry `is_active = true` while only one is designated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::ids::AssetId;
use types::numeric::{Amount, Timestamp};

use crate::errors::LaunchpadError;

/// Parameters supplied by the registrant when adding a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundParams {
    /// Value per token unit, scaled by `PRICE_SCALE`.
    pub price_per_unit: Amount,
    pub units_available: Amount,
    pub min_contribution: Amount,
    pub max_contribution: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl RoundParams {
    /// Check price, inventory, contribution bounds, and window.
    pub fn validate(&self) -> Result<(), LaunchpadError> {
        if self.price_per_unit == 0 {
            return Err(LaunchpadError::InvalidPrice);
        }
        if self.units_available == 0 {
            return Err(LaunchpadError::InvalidInventory);
        }
        if self.start_time >= self.end_time {
            return Err(LaunchpadError::InvalidTimeRange {
                start_time: self.start_time,
                end_time: self.end_time,
            });
        }
        if self.min_contribution > self.max_contribution {
            return Err(LaunchpadError::InvalidContributionBounds {
                min: self.min_contribution,
                max: self.max_contribution,
            });
        }
        Ok(())
    }
}

/// A time-boxed pricing and inventory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRound {
    pub price_per_unit: Amount,
    pub min_contribution: Amount,
    pub max_contribution: Amount,
    /// Decreases on purchase.
    pub units_available: Amount,
    /// Increases on purchase; `units_available + units_sold` is constant.
    pub units_sold: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub is_active: bool,
}

impl SaleRound {
    /// New inactive round with nothing sold.
    pub fn from_params(params: &RoundParams) -> Self {
        Self {
            price_per_unit: params.price_per_unit,
            min_contribution: params.min_contribution,
            max_contribution: params.max_contribution,
            units_available: params.units_available,
            units_sold: 0,
            start_time: params.start_time,
            end_time: params.end_time,
            is_active: false,
        }
    }

    /// Inventory fixed at creation.
    pub fn total_units(&self) -> Amount {
        self.units_available.saturating_add(self.units_sold)
    }

    /// Whether `now` falls inside `[start_time, end_time]`.
    pub fn in_window(&self, now: Timestamp) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}

/// Rounds belonging to a single asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRounds {
    pub rounds: Vec<SaleRound>,
    /// Designated active round; `None` until the first activation.
    pub designated: Option<usize>,
}

impl AssetRounds {
    fn require_index(&self, index: usize) -> Result<(), LaunchpadError> {
        if index >= self.rounds.len() {
            return Err(LaunchpadError::InvalidRoundIndex {
                index,
                count: self.rounds.len(),
            });
        }
        Ok(())
    }
}

/// Round lists for all assets.
#[derive(Debug, Default)]
pub struct SaleRoundLedger {
    assets: HashMap<AssetId, AssetRounds>,
}

impl SaleRoundLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a round; returns its index.
    pub(crate) fn push(&mut self, asset_id: AssetId, round: SaleRound) -> usize {
        let entry = self.assets.entry(asset_id).or_default();
        entry.rounds.push(round);
        entry.rounds.len() - 1
    }

    /// Fail with `InvalidRoundIndex` if `index` does not name a round of the asset.
    pub fn check_index(&self, asset_id: &AssetId, index: usize) -> Result<(), LaunchpadError> {
        match self.assets.get(asset_id) {
            Some(entry) => entry.require_index(index),
            None => Err(LaunchpadError::InvalidRoundIndex { index, count: 0 }),
        }
    }

    /// Designate `index` and raise its flag. Other rounds keep their flags.
    pub(crate) fn activate(&mut self, asset_id: &AssetId, index: usize) -> Result<(), LaunchpadError> {
        self.check_index(asset_id, index)?;
        if let Some(entry) = self.assets.get_mut(asset_id) {
            entry.rounds[index].is_active = true;
            entry.designated = Some(index);
        }
        Ok(())
    }

    /// Lower the round's flag. The designated pointer is left in place.
    pub(crate) fn deactivate(&mut self, asset_id: &AssetId, index: usize) -> Result<(), LaunchpadError> {
        self.check_index(asset_id, index)?;
        if let Some(entry) = self.assets.get_mut(asset_id) {
            entry.rounds[index].is_active = false;
        }
        Ok(())
    }

    /// The designated round if it exists, is flagged active, and `now` is in
    /// its window.
    pub fn eligible_round(
        &self,
        asset_id: &AssetId,
        now: Timestamp,
    ) -> Result<(usize, &SaleRound), LaunchpadError> {
        let entry = self.assets.get(asset_id).ok_or(LaunchpadError::RoundNotActive)?;
        let index = entry.designated.ok_or(LaunchpadError::RoundNotActive)?;
        let round = entry
            .rounds
            .get(index)
            .ok_or(LaunchpadError::RoundNotActive)?;
        if !round.is_active {
            return Err(LaunchpadError::RoundNotActive);
        }
        if !round.in_window(now) {
            return Err(LaunchpadError::RoundNotInWindow {
                now,
                start_time: round.start_time,
                end_time: round.end_time,
            });
        }
        Ok((index, round))
    }

    /// Move `units` from available to sold. Caller has checked inventory.
    pub(crate) fn record_sale(&mut self, asset_id: &AssetId, index: usize, units: Amount) {
        if let Some(round) = self
            .assets
            .get_mut(asset_id)
            .and_then(|entry| entry.rounds.get_mut(index))
        {
            round.units_available -= units;
            round.units_sold += units;
        }
    }

    /// Unsold inventory across all of the asset's rounds.
    pub fn unsold_units(&self, asset_id: &AssetId) -> Option<Amount> {
        match self.assets.get(asset_id) {
            Some(entry) => entry
                .rounds
                .iter()
                .try_fold(0u128, |acc, r| acc.checked_add(r.units_available)),
            None => Some(0),
        }
    }

    pub fn round(&self, asset_id: &AssetId, index: usize) -> Option<&SaleRound> {
        self.assets.get(asset_id).and_then(|e| e.rounds.get(index))
    }

    pub fn rounds(&self, asset_id: &AssetId) -> &[SaleRound] {
        self.assets
            .get(asset_id)
            .map(|e| e.rounds.as_slice())
            .unwrap_or(&[])
    }

    pub fn designated(&self, asset_id: &AssetId) -> Option<usize> {
        self.assets.get(asset_id).and_then(|e| e.designated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start: Timestamp, end: Timestamp) -> RoundParams {
        RoundParams {
            price_per_unit: types::numeric::PRICE_SCALE,
            units_available: 1_000,
            min_contribution: 1,
            max_contribution: 500,
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(params(0, 10).validate().is_ok());

        let mut p = params(0, 10);
        p.price_per_unit = 0;
        assert_eq!(p.validate(), Err(LaunchpadError::InvalidPrice));

        let mut p = params(0, 10);
        p.units_available = 0;
        assert_eq!(p.validate(), Err(LaunchpadError::InvalidInventory));

        assert_eq!(
            params(10, 10).validate(),
            Err(LaunchpadError::InvalidTimeRange {
                start_time: 10,
                end_time: 10
            })
        );

        let mut p = params(0, 10);
        p.min_contribution = 600;
        assert!(matches!(
            p.validate(),
            Err(LaunchpadError::InvalidContributionBounds { .. })
        ));
    }

    #[test]
    fn test_new_round_is_inactive() {
        let mut ledger = SaleRoundLedger::new();
        let asset = AssetId::new();
        let idx = ledger.push(asset, SaleRound::from_params(&params(0, 10)));
        assert_eq!(idx, 0);
        let round = ledger.round(&asset, 0).unwrap();
        assert!(!round.is_active);
        assert_eq!(round.units_sold, 0);
        assert_eq!(ledger.designated(&asset), None);
    }

    #[test]
    fn test_activation_does_not_clear_other_flags() {
        let mut ledger = SaleRoundLedger::new();
        let asset = AssetId::new();
        ledger.push(asset, SaleRound::from_params(&params(0, 10)));
        ledger.push(asset, SaleRound::from_params(&params(0, 10)));
        ledger.activate(&asset, 0).unwrap();
        ledger.activate(&asset, 1).unwrap();

        assert!(ledger.round(&asset, 0).unwrap().is_active);
        assert!(ledger.round(&asset, 1).unwrap().is_active);
        assert_eq!(ledger.designated(&asset), Some(1));
        let (idx, _) = ledger.eligible_round(&asset, 5).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_deactivate_designated_round_blocks_eligibility() {
        let mut ledger = SaleRoundLedger::new();
        let asset = AssetId::new();
        ledger.push(asset, SaleRound::from_params(&params(0, 10)));
        ledger.activate(&asset, 0).unwrap();
        ledger.deactivate(&asset, 0).unwrap();
        assert_eq!(ledger.designated(&asset), Some(0));
        assert_eq!(
            ledger.eligible_round(&asset, 5).unwrap_err(),
            LaunchpadError::RoundNotActive
        );
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let mut ledger = SaleRoundLedger::new();
        let asset = AssetId::new();
        ledger.push(asset, SaleRound::from_params(&params(100, 200)));
        ledger.activate(&asset, 0).unwrap();
        assert!(ledger.eligible_round(&asset, 100).is_ok());
        assert!(ledger.eligible_round(&asset, 200).is_ok());
        assert!(matches!(
            ledger.eligible_round(&asset, 99),
            Err(LaunchpadError::RoundNotInWindow { .. })
        ));
        assert!(matches!(
            ledger.eligible_round(&asset, 201),
            Err(LaunchpadError::RoundNotInWindow { .. })
        ));
    }

    #[test]
    fn test_invalid_index() {
        let mut ledger = SaleRoundLedger::new();
        let asset = AssetId::new();
        assert_eq!(
            ledger.activate(&asset, 0),
            Err(LaunchpadError::InvalidRoundIndex { index: 0, count: 0 })
        );
        ledger.push(asset, SaleRound::from_params(&params(0, 10)));
        assert_eq!(
            ledger.deactivate(&asset, 3),
            Err(LaunchpadError::InvalidRoundIndex { index: 3, count: 1 })
        );
    }

    #[test]
    fn test_record_sale_conserves_inventory() {
        let mut ledger = SaleRoundLedger::new();
        let asset = AssetId::new();
        ledger.push(asset, SaleRound::from_params(&params(0, 10)));
        ledger.record_sale(&asset, 0, 250);
        let round = ledger.round(&asset, 0).unwrap();
        assert_eq!(round.units_available, 750);
        assert_eq!(round.units_sold, 250);
        assert_eq!(round.total_units(), 1_000);
        assert_eq!(ledger.unsold_units(&asset), Some(750));
    }
}
