//! Custody collaborators — token and value transfer interfaces
//!
//! The launchpad never holds balances itself. Sale inventory sits in a token
//! ledger under the launchpad's custody account; collected contribution value
//! is paid out through a value ledger. Both are external collaborators.
//!
//! `InMemoryLedger` implements both with checked balance maps so the core can
//! run without a chain.

use std::collections::HashMap;

use tracing::debug;
use types::ids::{AccountId, AssetId};
use types::numeric::Amount;

use crate::errors::TransferError;

/// Fungible asset balances and transfers.
pub trait TokenLedger {
    /// Balance of `asset` held by `holder`.
    fn balance_of(&self, asset: &AssetId, holder: &AccountId) -> Amount;

    /// Move `amount` of `asset` from `from` to `to`.
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError>;
}

/// Payout rail for collected contribution value.
pub trait ValueLedger {
    /// Send `amount` of value to `to`.
    fn send(&mut self, to: &AccountId, amount: Amount) -> Result<(), TransferError>;
}

/// In-memory token and value ledger.
///
/// Token balances are stored as `HashMap<AccountId, HashMap<AssetId, Amount>>`.
/// Value sent out is recorded per recipient.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    /// Token balances: holder -> (asset -> amount)
    balances: HashMap<AccountId, HashMap<AssetId, Amount>>,
    /// Value received via `send`
    value_balances: HashMap<AccountId, Amount>,
    /// When set, every transfer and send is rejected.
    reject_reason: Option<String>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `asset` out of thin air for `holder`.
    pub fn mint(&mut self, asset: AssetId, holder: AccountId, amount: Amount) -> Result<(), TransferError> {
        self.safe_credit(holder, asset, amount)
    }

    /// Value received by `holder` through `send`.
    pub fn value_balance(&self, holder: &AccountId) -> Amount {
        self.value_balances.get(holder).copied().unwrap_or(0)
    }

    /// Reject all subsequent transfers with `reason`, simulating a
    /// frozen or malicious token.
    pub fn fail_transfers(&mut self, reason: impl Into<String>) {
        self.reject_reason = Some(reason.into());
    }

    /// Resume accepting transfers.
    pub fn accept_transfers(&mut self) {
        self.reject_reason = None;
    }

    fn check_accepting(&self) -> Result<(), TransferError> {
        match &self.reject_reason {
            Some(reason) => Err(TransferError::Rejected {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Internal credit with overflow protection.
    fn safe_credit(&mut self, holder: AccountId, asset: AssetId, amount: Amount) -> Result<(), TransferError> {
        let current = self
            .balances
            .entry(holder)
            .or_default()
            .entry(asset)
            .or_insert(0);
        *current = current.checked_add(amount).ok_or(TransferError::Overflow)?;
        Ok(())
    }

    /// Internal debit with underflow protection.
    fn safe_debit(&mut self, holder: &AccountId, asset: &AssetId, amount: Amount) -> Result<(), TransferError> {
        let available = self.balance_of(asset, holder);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        if let Some(current) = self
            .balances
            .get_mut(holder)
            .and_then(|assets| assets.get_mut(asset))
        {
            *current -= amount;
        }
        Ok(())
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, asset: &AssetId, holder: &AccountId) -> Amount {
        self.balances
            .get(holder)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.check_accepting()?;
        // Pre-check the credit so a failed credit cannot strand a debit.
        let to_balance = self.balance_of(asset, to);
        if from != to {
            to_balance.checked_add(amount).ok_or(TransferError::Overflow)?;
        }
        self.safe_debit(from, asset, amount)?;
        self.safe_credit(*to, *asset, amount)?;
        debug!(%asset, %from, %to, amount, "Token transfer applied");
        Ok(())
    }
}

impl ValueLedger for InMemoryLedger {
    fn send(&mut self, to: &AccountId, amount: Amount) -> Result<(), TransferError> {
        self.check_accepting()?;
        let current = self.value_balances.entry(*to).or_insert(0);
        *current = current.checked_add(amount).ok_or(TransferError::Overflow)?;
        debug!(%to, amount, "Value sent");
        Ok(())
    }
}
