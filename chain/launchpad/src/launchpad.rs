//! Launchpad — the single aggregate owning every ledger
//!
//! Registration, round management, purchases, vesting claims and treasury
//! payouts all run through `Launchpad`. Each mutating operation:
//! 1. acquires the reentrancy guard
//! 2. validates and computes every write up front
//! 3. commits the writes
//! 4. performs the external transfer, if any, rolling the commit back when
//!    the collaborator refuses
//! 5. emits exactly one event and releases the guard
//!
//! A failed operation leaves every ledger exactly as it found it.

use tracing::{debug, info, warn};
use types::ids::{AccountId, AssetId};
use types::numeric::{Amount, Timestamp};

use crate::config::LaunchpadConfig;
use crate::contribution::{plan_purchase, InvestorPosition, PositionBook};
use crate::custody::{TokenLedger, ValueLedger};
use crate::errors::{ErrorKind, LaunchpadError};
use crate::events::{
    AssetRegistered, FundsWithdrawn, LaunchpadEvent, SaleRoundActivated, SaleRoundAdded,
    SaleRoundDeactivated, TokenPurchased, TokensClaimed,
};
use crate::registry::{AssetRecord, AssetRegistry};
use crate::rounds::{RoundParams, SaleRound, SaleRoundLedger};
use crate::security::{require_registrant, ReentrancyGuard};
use crate::treasury::{Treasury, WithdrawalReceipt};
use crate::vesting::{schedule_after_grant, VestingLedger, VestingSchedule};

/// Token launch ledger core.
///
/// Sale inventory is held by the external token ledger under the `custody`
/// account; the launchpad only tracks obligations against it.
#[derive(Debug)]
pub struct Launchpad {
    /// Account holding sale inventory in the token ledger
    custody: AccountId,
    config: LaunchpadConfig,
    registry: AssetRegistry,
    rounds: SaleRoundLedger,
    positions: PositionBook,
    vesting: VestingLedger,
    treasury: Treasury,
    /// Security: reentrancy guard
    reentrancy_guard: ReentrancyGuard,
    /// Emitted events log (append-only)
    events: Vec<LaunchpadEvent>,
}

impl Launchpad {
    /// Create a launchpad whose inventory sits under `custody`.
    pub fn new(custody: AccountId, config: LaunchpadConfig) -> Result<Self, LaunchpadError> {
        config.validate()?;
        Ok(Self::build(custody, config))
    }

    /// Create a launchpad with the default configuration.
    pub fn with_defaults(custody: AccountId) -> Self {
        Self::build(custody, LaunchpadConfig::default())
    }

    fn build(custody: AccountId, config: LaunchpadConfig) -> Self {
        info!(
            %custody,
            vesting_duration_secs = config.vesting_duration_secs,
            vesting_policy = ?config.vesting_policy,
            strict_backing = config.strict_backing,
            "Launchpad initialized"
        );
        Self {
            custody,
            config,
            registry: AssetRegistry::new(),
            rounds: SaleRoundLedger::new(),
            positions: PositionBook::new(),
            vesting: VestingLedger::new(),
            treasury: Treasury::new(),
            reentrancy_guard: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    pub fn custody(&self) -> &AccountId {
        &self.custody
    }

    pub fn config(&self) -> &LaunchpadConfig {
        &self.config
    }

    // ───────────────────────── Registry ─────────────────────────

    /// Register a fundraising asset. `registrant` becomes the sole authority
    /// over its rounds and treasury bucket.
    pub fn register(
        &mut self,
        asset_id: AssetId,
        registrant: AccountId,
        soft_cap: Amount,
        hard_cap: Amount,
    ) -> Result<AssetRecord, LaunchpadError> {
        self.guarded("register", |lp| {
            let record = lp.registry.register(asset_id, registrant, soft_cap, hard_cap)?;
            info!(%asset_id, %registrant, soft_cap, hard_cap, "Asset registered");
            lp.emit(LaunchpadEvent::AssetRegistered(AssetRegistered {
                asset_id,
                registrant,
                soft_cap,
                hard_cap,
            }));
            Ok(record)
        })
    }

    // ───────────────────────── Rounds ─────────────────────────

    /// Append an inactive round. The round must be fully backed by inventory
    /// already deposited under the custody account.
    pub fn add_round<L: TokenLedger + ?Sized>(
        &mut self,
        ledger: &L,
        asset_id: AssetId,
        caller: AccountId,
        params: RoundParams,
    ) -> Result<usize, LaunchpadError> {
        self.guarded("add_round", |lp| {
            let registrant = lp.registry.require(&asset_id)?.registrant;
            require_registrant(&registrant, &caller)?;
            params.validate()?;
            lp.check_backing(ledger, &asset_id, params.units_available)?;

            let round_index = lp.rounds.push(asset_id, SaleRound::from_params(&params));
            info!(
                %asset_id,
                round_index,
                price_per_unit = params.price_per_unit,
                units_available = params.units_available,
                start_time = params.start_time,
                end_time = params.end_time,
                "Sale round added"
            );
            lp.emit(LaunchpadEvent::SaleRoundAdded(SaleRoundAdded {
                asset_id,
                round_index,
                price_per_unit: params.price_per_unit,
                units_available: params.units_available,
                min_contribution: params.min_contribution,
                max_contribution: params.max_contribution,
                start_time: params.start_time,
                end_time: params.end_time,
            }));
            Ok(round_index)
        })
    }

    /// Designate `round_index` for purchases and flag it active.
    pub fn activate_round(
        &mut self,
        asset_id: AssetId,
        caller: AccountId,
        round_index: usize,
    ) -> Result<(), LaunchpadError> {
        self.guarded("activate_round", |lp| {
            let registrant = lp.registry.require(&asset_id)?.registrant;
            require_registrant(&registrant, &caller)?;
            lp.rounds.activate(&asset_id, round_index)?;
            info!(%asset_id, round_index, "Sale round activated");
            lp.emit(LaunchpadEvent::SaleRoundActivated(SaleRoundActivated {
                asset_id,
                round_index,
            }));
            Ok(())
        })
    }

    /// Clear the round's active flag. The designated pointer is unchanged.
    pub fn deactivate_round(
        &mut self,
        asset_id: AssetId,
        caller: AccountId,
        round_index: usize,
    ) -> Result<(), LaunchpadError> {
        self.guarded("deactivate_round", |lp| {
            let registrant = lp.registry.require(&asset_id)?.registrant;
            require_registrant(&registrant, &caller)?;
            lp.rounds.deactivate(&asset_id, round_index)?;
            info!(%asset_id, round_index, "Sale round deactivated");
            lp.emit(LaunchpadEvent::SaleRoundDeactivated(SaleRoundDeactivated {
                asset_id,
                round_index,
            }));
            Ok(())
        })
    }

    // ───────────────────────── Contributions ─────────────────────────

    /// Contribute `value` to the asset's designated round at `now`.
    ///
    /// Returns the units granted. The investor's vesting schedule for the
    /// asset is replaced or merged according to `VestingPolicy`.
    pub fn purchase(
        &mut self,
        asset_id: AssetId,
        investor: AccountId,
        value: Amount,
        now: Timestamp,
    ) -> Result<Amount, LaunchpadError> {
        self.guarded("purchase", |lp| {
            let record = lp.registry.require(&asset_id)?;
            let plan = plan_purchase(
                record,
                &lp.rounds,
                lp.positions.get(&investor, &asset_id),
                value,
                now,
            )?;
            let schedule = schedule_after_grant(
                lp.vesting.get(&investor, &asset_id),
                plan.units_granted,
                now,
                lp.config.vesting_duration_secs,
                lp.config.vesting_policy,
            )?;
            let (bucket, treasury_total) = lp.treasury.plan_credit(&asset_id, value)?;

            // Commit: nothing below can fail.
            lp.rounds
                .record_sale(&asset_id, plan.round_index, plan.units_granted);
            lp.registry.set_total_raised(&asset_id, plan.total_raised);
            lp.positions.put(investor, asset_id, plan.position);
            lp.treasury.commit_credit(asset_id, bucket, treasury_total);
            lp.vesting.insert(investor, asset_id, schedule);

            info!(
                %asset_id,
                %investor,
                round_index = plan.round_index,
                value,
                units_granted = plan.units_granted,
                total_raised = plan.total_raised,
                "Tokens purchased"
            );
            lp.emit(LaunchpadEvent::TokenPurchased(TokenPurchased {
                asset_id,
                investor,
                round_index: plan.round_index,
                value,
                units_granted: plan.units_granted,
                total_raised: plan.total_raised,
                round_units_available: plan.round_units_available,
            }));
            Ok(plan.units_granted)
        })
    }

    // ───────────────────────── Vesting ─────────────────────────

    /// Release everything vested and unclaimed at `now` to the investor.
    pub fn claim<L: TokenLedger + ?Sized>(
        &mut self,
        ledger: &mut L,
        investor: AccountId,
        asset_id: AssetId,
        now: Timestamp,
    ) -> Result<Amount, LaunchpadError> {
        self.guarded("claim", |lp| {
            let amount = lp.vesting.plan_claim(&investor, &asset_id, now)?;

            lp.vesting.release(&investor, &asset_id, amount);
            lp.positions.add_claimed(&investor, &asset_id, amount);

            if let Err(err) = ledger.transfer(&asset_id, &lp.custody, &investor, amount) {
                lp.vesting.unrelease(&investor, &asset_id, amount);
                lp.positions.sub_claimed(&investor, &asset_id, amount);
                warn!(%asset_id, %investor, amount, error = %err, "Claim payout failed, rolled back");
                return Err(err.into());
            }

            let (total_released, total_allocation) = lp
                .vesting
                .get(&investor, &asset_id)
                .map(|s| (s.released, s.total_allocation))
                .unwrap_or((amount, amount));
            info!(%asset_id, %investor, amount, total_released, "Tokens claimed");
            lp.emit(LaunchpadEvent::TokensClaimed(TokensClaimed {
                asset_id,
                investor,
                amount,
                total_released,
                total_allocation,
            }));
            Ok(amount)
        })
    }

    /// Preview of what `claim` would release at `now`; zero without a schedule.
    pub fn claimable(
        &self,
        investor: &AccountId,
        asset_id: &AssetId,
        now: Timestamp,
    ) -> Result<Amount, LaunchpadError> {
        match self.vesting.get(investor, asset_id) {
            Some(schedule) => schedule.claimable_at(now),
            None => Ok(0),
        }
    }

    // ───────────────────────── Treasury ─────────────────────────

    /// Pay the asset's whole treasury bucket to its registrant.
    pub fn withdraw<V: ValueLedger + ?Sized>(
        &mut self,
        ledger: &mut V,
        asset_id: AssetId,
        caller: AccountId,
    ) -> Result<Amount, LaunchpadError> {
        self.guarded("withdraw", |lp| {
            let registrant = lp.registry.require(&asset_id)?.registrant;
            require_registrant(&registrant, &caller)?;
            let amount = lp.treasury.take(&asset_id)?;

            if let Err(err) = ledger.send(&caller, amount) {
                lp.treasury.restore(asset_id, amount);
                warn!(%asset_id, %caller, amount, error = %err, "Withdrawal payout failed, rolled back");
                return Err(err.into());
            }

            let receipt = lp.treasury.record(asset_id, caller, amount);
            info!(%asset_id, recipient = %caller, amount, "Funds withdrawn");
            lp.emit(LaunchpadEvent::FundsWithdrawn(FundsWithdrawn {
                withdrawal_id: receipt.withdrawal_id,
                asset_id,
                recipient: caller,
                amount,
            }));
            Ok(amount)
        })
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn asset(&self, asset_id: &AssetId) -> Option<&AssetRecord> {
        self.registry.get(asset_id)
    }

    /// Registered assets in registration order.
    pub fn assets(&self) -> impl Iterator<Item = &AssetRecord> {
        self.registry.iter()
    }

    pub fn round(&self, asset_id: &AssetId, round_index: usize) -> Option<&SaleRound> {
        self.rounds.round(asset_id, round_index)
    }

    pub fn rounds(&self, asset_id: &AssetId) -> &[SaleRound] {
        self.rounds.rounds(asset_id)
    }

    pub fn designated_round(&self, asset_id: &AssetId) -> Option<usize> {
        self.rounds.designated(asset_id)
    }

    pub fn position(&self, investor: &AccountId, asset_id: &AssetId) -> Option<&InvestorPosition> {
        self.positions.get(investor, asset_id)
    }

    pub fn vesting_schedule(&self, investor: &AccountId, asset_id: &AssetId) -> Option<&VestingSchedule> {
        self.vesting.get(investor, asset_id)
    }

    /// Informational; `None` for unknown assets.
    pub fn soft_cap_reached(&self, asset_id: &AssetId) -> Option<bool> {
        self.registry.get(asset_id).map(AssetRecord::soft_cap_reached)
    }

    pub fn treasury_balance(&self, asset_id: &AssetId) -> Amount {
        self.treasury.balance(asset_id)
    }

    pub fn treasury_total(&self) -> Amount {
        self.treasury.total()
    }

    pub fn withdrawals(&self) -> &[WithdrawalReceipt] {
        self.treasury.history()
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[LaunchpadEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<LaunchpadEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    /// Run `op` with the reentrancy guard held; the guard is released on
    /// every exit path.
    fn guarded<R>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut Self) -> Result<R, LaunchpadError>,
    ) -> Result<R, LaunchpadError> {
        self.reentrancy_guard.enter(operation)?;
        let result = op(self);
        self.reentrancy_guard.release();
        if let Err(err) = &result {
            log_rejection(operation, err);
        }
        result
    }

    fn emit(&mut self, event: LaunchpadEvent) {
        debug!(event = event.label(), asset_id = %event.asset_id(), "Event emitted");
        self.events.push(event);
    }

    /// Custody must cover the new round plus, under strict backing, every
    /// unit already promised by earlier rounds and vesting schedules.
    fn check_backing<L: TokenLedger + ?Sized>(
        &self,
        ledger: &L,
        asset_id: &AssetId,
        units: Amount,
    ) -> Result<(), LaunchpadError> {
        let available = ledger.balance_of(asset_id, &self.custody);
        let required = if self.config.strict_backing {
            let unsold = self
                .rounds
                .unsold_units(asset_id)
                .ok_or(LaunchpadError::ArithmeticOverflow)?;
            let owed = self
                .vesting
                .outstanding_for_asset(asset_id)
                .ok_or(LaunchpadError::ArithmeticOverflow)?;
            unsold
                .checked_add(owed)
                .and_then(|committed| committed.checked_add(units))
                .ok_or(LaunchpadError::ArithmeticOverflow)?
        } else {
            units
        };
        if available < required {
            return Err(LaunchpadError::InsufficientInventoryBacking {
                required,
                available,
            });
        }
        Ok(())
    }
}

fn log_rejection(operation: &'static str, err: &LaunchpadError) {
    match err.kind() {
        ErrorKind::Unauthorized | ErrorKind::TransferFailure | ErrorKind::Internal => {
            warn!(operation, error = %err, "Operation rejected");
        }
        ErrorKind::LimitExceeded => {
            warn!(operation, error = %err, "Operation exceeded a limit");
        }
        _ => {
            debug!(operation, error = %err, "Operation rejected");
        }
    }
}
