//! Thread-safe handle over a single `Launchpad`
//!
//! One mutex guards the whole aggregate, so every operation submitted through
//! the handle is one serialized transaction.

use std::sync::{Arc, Mutex};

use types::ids::{AccountId, AssetId};
use types::numeric::{Amount, Timestamp};

use crate::errors::LaunchpadError;
use crate::launchpad::Launchpad;

/// Cloneable handle; clones share the same ledger.
#[derive(Debug, Clone)]
pub struct SharedLaunchpad {
    inner: Arc<Mutex<Launchpad>>,
}

impl SharedLaunchpad {
    pub fn new(launchpad: Launchpad) -> Self {
        Self {
            inner: Arc::new(Mutex::new(launchpad)),
        }
    }

    /// Run `op` as one transaction against the ledger.
    pub fn transact<R>(
        &self,
        op: impl FnOnce(&mut Launchpad) -> Result<R, LaunchpadError>,
    ) -> Result<R, LaunchpadError> {
        let mut launchpad = self.inner.lock().map_err(|_| LaunchpadError::LockPoisoned)?;
        op(&mut *launchpad)
    }

    /// Read-only access.
    pub fn read<R>(&self, op: impl FnOnce(&Launchpad) -> R) -> Result<R, LaunchpadError> {
        let launchpad = self.inner.lock().map_err(|_| LaunchpadError::LockPoisoned)?;
        Ok(op(&*launchpad))
    }

    pub fn purchase(
        &self,
        asset_id: AssetId,
        investor: AccountId,
        value: Amount,
        now: Timestamp,
    ) -> Result<Amount, LaunchpadError> {
        self.transact(|lp| lp.purchase(asset_id, investor, value, now))
    }
}
