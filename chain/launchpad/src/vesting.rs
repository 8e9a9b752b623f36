//! Vesting ledger — one linear schedule per (investor, asset)
//!
//! `vested(t) = base + (total - base) * min(t - start, duration) / duration`
//!
//! `base` is zero for every schedule created by a fresh purchase; it is only
//! non-zero when a repeat purchase is merged under `VestingPolicy::Merge`.
//! Elapsed time saturates at `duration`, so nothing beyond `total` ever vests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::ids::{AccountId, AssetId};
use types::numeric::{mul_div_floor, Amount, Timestamp};

use crate::config::VestingPolicy;
use crate::errors::LaunchpadError;

/// Linear release schedule for an investor's allocation in one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub total_allocation: Amount,
    /// Monotonic, never above `total_allocation`.
    pub released: Amount,
    pub start: Timestamp,
    pub duration: i64,
    /// Units vested at `start`.
    #[serde(default)]
    pub vested_base: Amount,
}

impl VestingSchedule {
    /// Fresh schedule for a single grant.
    pub fn new(total_allocation: Amount, start: Timestamp, duration: i64) -> Self {
        Self {
            total_allocation,
            released: 0,
            start,
            duration,
            vested_base: 0,
        }
    }

    /// Units vested at `now`. Zero before `start`.
    pub fn vested_at(&self, now: Timestamp) -> Result<Amount, LaunchpadError> {
        if now < self.start {
            return Ok(0);
        }
        let elapsed = now.saturating_sub(self.start);
        if self.duration <= 0 || elapsed >= self.duration {
            return Ok(self.total_allocation);
        }
        let linear = self.total_allocation - self.vested_base;
        let vested_linear = mul_div_floor(linear, elapsed as Amount, self.duration as Amount)?;
        Ok(self.vested_base + vested_linear)
    }

    /// Vested but not yet released at `now`.
    pub fn claimable_at(&self, now: Timestamp) -> Result<Amount, LaunchpadError> {
        Ok(self.vested_at(now)?.saturating_sub(self.released))
    }

    pub fn outstanding(&self) -> Amount {
        self.total_allocation - self.released
    }
}

/// Schedule an investor holds after being granted `units` at `now`.
///
/// Under `Replace` the previous schedule is discarded. Under `Merge` the
/// previously vested units become the new base and stay claimable, while
/// the unvested remainder plus the new grant vest linearly from `now`.
pub fn schedule_after_grant(
    existing: Option<&VestingSchedule>,
    units: Amount,
    now: Timestamp,
    duration: i64,
    policy: VestingPolicy,
) -> Result<VestingSchedule, LaunchpadError> {
    match (policy, existing) {
        (VestingPolicy::Merge, Some(prev)) => {
            let vested = prev.vested_at(now)?;
            let total_allocation = prev
                .total_allocation
                .checked_add(units)
                .ok_or(LaunchpadError::ArithmeticOverflow)?;
            Ok(VestingSchedule {
                total_allocation,
                released: prev.released,
                start: now,
                duration,
                vested_base: vested,
            })
        }
        _ => Ok(VestingSchedule::new(units, now, duration)),
    }
}

/// All vesting schedules keyed by (investor, asset).
#[derive(Debug, Default)]
pub struct VestingLedger {
    schedules: HashMap<(AccountId, AssetId), VestingSchedule>,
}

impl VestingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, investor: &AccountId, asset_id: &AssetId) -> Option<&VestingSchedule> {
        self.schedules.get(&(*investor, *asset_id))
    }

    /// Validate a claim and return the amount it would release.
    pub fn plan_claim(
        &self,
        investor: &AccountId,
        asset_id: &AssetId,
        now: Timestamp,
    ) -> Result<Amount, LaunchpadError> {
        let schedule = self
            .get(investor, asset_id)
            .filter(|s| s.total_allocation > 0)
            .ok_or(LaunchpadError::NoSchedule)?;
        if now < schedule.start {
            return Err(LaunchpadError::VestingNotStarted {
                start: schedule.start,
            });
        }
        let claimable = schedule.claimable_at(now)?;
        if claimable == 0 {
            return Err(LaunchpadError::NothingToClaim);
        }
        Ok(claimable)
    }

    /// Install a schedule, replacing any previous one for the pair.
    pub(crate) fn insert(&mut self, investor: AccountId, asset_id: AssetId, schedule: VestingSchedule) {
        self.schedules.insert((investor, asset_id), schedule);
    }

    /// Bump `released` by an amount already checked by `plan_claim`.
    pub(crate) fn release(&mut self, investor: &AccountId, asset_id: &AssetId, amount: Amount) {
        if let Some(schedule) = self.schedules.get_mut(&(*investor, *asset_id)) {
            schedule.released += amount;
        }
    }

    pub(crate) fn unrelease(&mut self, investor: &AccountId, asset_id: &AssetId, amount: Amount) {
        if let Some(schedule) = self.schedules.get_mut(&(*investor, *asset_id)) {
            schedule.released -= amount;
        }
    }

    /// Allocated but unreleased units across every schedule for the asset.
    pub fn outstanding_for_asset(&self, asset_id: &AssetId) -> Option<Amount> {
        self.schedules
            .iter()
            .filter(|((_, asset), _)| asset == asset_id)
            .try_fold(0u128, |acc, (_, s)| acc.checked_add(s.outstanding()))
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
