//! Treasury — collected contribution value, partitioned per asset
//!
//! Every purchase credits the asset's bucket. Only the asset's registrant may
//! withdraw, and only that asset's bucket; there is no shared pool any
//! caller can drain.
//!
//! Lifecycle of a payout: `take → external send → record` or, when the send
//! fails, `take → restore`.

use std::collections::HashMap;

use types::ids::{AccountId, AssetId};
use types::numeric::Amount;
use uuid::Uuid;

use crate::errors::LaunchpadError;

/// Completed payout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    pub withdrawal_id: Uuid,
    pub asset_id: AssetId,
    pub recipient: AccountId,
    pub amount: Amount,
}

/// Per-asset balances plus the process-wide total.
#[derive(Debug, Default)]
pub struct Treasury {
    balances: HashMap<AssetId, Amount>,
    total: Amount,
    history: Vec<WithdrawalReceipt>,
}

impl Treasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balances after crediting `value`, without applying them.
    pub fn plan_credit(&self, asset_id: &AssetId, value: Amount) -> Result<(Amount, Amount), LaunchpadError> {
        let bucket = self
            .balance(asset_id)
            .checked_add(value)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        let total = self
            .total
            .checked_add(value)
            .ok_or(LaunchpadError::ArithmeticOverflow)?;
        Ok((bucket, total))
    }

    /// Apply balances produced by `plan_credit`.
    pub(crate) fn commit_credit(&mut self, asset_id: AssetId, bucket: Amount, total: Amount) {
        self.balances.insert(asset_id, bucket);
        self.total = total;
    }

    /// Zero the asset's bucket and return what it held.
    pub(crate) fn take(&mut self, asset_id: &AssetId) -> Result<Amount, LaunchpadError> {
        let amount = self.balance(asset_id);
        if amount == 0 {
            return Err(LaunchpadError::NothingToWithdraw);
        }
        self.balances.insert(*asset_id, 0);
        self.total -= amount;
        Ok(amount)
    }

    /// Put back an amount removed by `take` whose payout failed.
    pub(crate) fn restore(&mut self, asset_id: AssetId, amount: Amount) {
        let bucket = self.balances.entry(asset_id).or_insert(0);
        *bucket += amount;
        self.total += amount;
    }

    pub(crate) fn record(&mut self, asset_id: AssetId, recipient: AccountId, amount: Amount) -> WithdrawalReceipt {
        let receipt = WithdrawalReceipt {
            withdrawal_id: Uuid::now_v7(),
            asset_id,
            recipient,
            amount,
        };
        self.history.push(receipt.clone());
        receipt
    }

    pub fn balance(&self, asset_id: &AssetId) -> Amount {
        self.balances.get(asset_id).copied().unwrap_or(0)
    }

    /// Sum of all buckets.
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Completed payouts in order.
    pub fn history(&self) -> &[WithdrawalReceipt] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_take() {
        let mut treasury = Treasury::new();
        let asset = AssetId::new();
        let (bucket, total) = treasury.plan_credit(&asset, 500).unwrap();
        treasury.commit_credit(asset, bucket, total);
        assert_eq!(treasury.balance(&asset), 500);
        assert_eq!(treasury.total(), 500);

        assert_eq!(treasury.take(&asset), Ok(500));
        assert_eq!(treasury.balance(&asset), 0);
        assert_eq!(treasury.total(), 0);
        assert_eq!(treasury.take(&asset), Err(LaunchpadError::NothingToWithdraw));
    }

    #[test]
    fn test_buckets_are_isolated() {
        let mut treasury = Treasury::new();
        let (a, b) = (AssetId::new(), AssetId::new());
        let (bucket, total) = treasury.plan_credit(&a, 300).unwrap();
        treasury.commit_credit(a, bucket, total);
        let (bucket, total) = treasury.plan_credit(&b, 200).unwrap();
        treasury.commit_credit(b, bucket, total);

        assert_eq!(treasury.take(&a), Ok(300));
        assert_eq!(treasury.balance(&b), 200);
        assert_eq!(treasury.total(), 200);
    }

    #[test]
    fn test_restore_after_failed_payout() {
        let mut treasury = Treasury::new();
        let asset = AssetId::new();
        let (bucket, total) = treasury.plan_credit(&asset, 75).unwrap();
        treasury.commit_credit(asset, bucket, total);
        let amount = treasury.take(&asset).unwrap();
        treasury.restore(asset, amount);
        assert_eq!(treasury.balance(&asset), 75);
        assert_eq!(treasury.total(), 75);
        assert!(treasury.history().is_empty());
    }

    #[test]
    fn test_credit_overflow() {
        let mut treasury = Treasury::new();
        let asset = AssetId::new();
        let (bucket, total) = treasury.plan_credit(&asset, Amount::MAX).unwrap();
        treasury.commit_credit(asset, bucket, total);
        assert_eq!(
            treasury.plan_credit(&asset, 1),
            Err(LaunchpadError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_record_keeps_history() {
        let mut treasury = Treasury::new();
        let asset = AssetId::new();
        let recipient = AccountId::new();
        let receipt = treasury.record(asset, recipient, 10);
        assert_eq!(treasury.history(), &[receipt]);
    }
}
