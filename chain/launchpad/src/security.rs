//! Shared security primitives for launchpad operations
//!
//! Provides the reentrancy latch that brackets every mutating operation and
//! the registrant authority check used by round management and withdrawal.

use tracing::warn;
use types::ids::AccountId;

use crate::errors::LaunchpadError;

/// Reentrancy guard preventing nested calls into protected functions.
///
/// An operation acquires the guard before executing state-changing
/// logic and releases it on completion. Any nested call attempt fails.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `true` if successfully acquired.
    /// Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the guard.
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Acquire, mapping a held latch to `LaunchpadError::Reentrancy`.
    pub fn enter(&mut self, operation: &'static str) -> Result<(), LaunchpadError> {
        if !self.acquire() {
            warn!(operation, "Nested entry rejected by reentrancy guard");
            return Err(LaunchpadError::Reentrancy);
        }
        Ok(())
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail with `Unauthorized` unless `caller` is the asset's registrant.
pub fn require_registrant(registrant: &AccountId, caller: &AccountId) -> Result<(), LaunchpadError> {
    if registrant != caller {
        warn!(%caller, %registrant, "Caller is not the registrant");
        return Err(LaunchpadError::Unauthorized);
    }
    Ok(())
}
