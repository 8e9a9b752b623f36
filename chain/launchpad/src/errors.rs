//! Launchpad error types
//!
//! Every operation fails with a specific variant; `kind()` groups variants
//! into the coarse taxonomy callers use for handling decisions.

use thiserror::Error;
use types::ids::AssetId;
use types::numeric::{Amount, NumericError, Timestamp};

/// Coarse failure category shared by all launchpad operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Unauthorized,
    NotFound,
    AlreadyExists,
    StateIneligible,
    LimitExceeded,
    NothingToClaim,
    NothingToWithdraw,
    TransferFailure,
    /// Arithmetic overflow, reentrancy, poisoned lock
    Internal,
}

/// Failure reported by an external token or value transfer collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Launchpad operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchpadError {
    // --- registry ---
    #[error("Invalid asset: null identity")]
    InvalidAsset,

    #[error("Asset already registered: {asset_id}")]
    AlreadyRegistered { asset_id: AssetId },

    #[error("Invalid cap range: soft cap {soft_cap} must be below hard cap {hard_cap}")]
    InvalidCapRange { soft_cap: Amount, hard_cap: Amount },

    #[error("Asset not found: {asset_id}")]
    AssetNotFound { asset_id: AssetId },

    // --- rounds ---
    #[error("Unauthorized: caller is not the asset registrant")]
    Unauthorized,

    #[error("Invalid price: must be positive")]
    InvalidPrice,

    #[error("Invalid inventory: units available must be positive")]
    InvalidInventory,

    #[error("Invalid time range: start {start_time} must be before end {end_time}")]
    InvalidTimeRange {
        start_time: Timestamp,
        end_time: Timestamp,
    },

    #[error("Invalid contribution bounds: min {min} exceeds max {max}")]
    InvalidContributionBounds { min: Amount, max: Amount },

    #[error("Insufficient inventory backing: required {required}, custody holds {available}")]
    InsufficientInventoryBacking { required: Amount, available: Amount },

    #[error("Invalid round index {index} (asset has {count} rounds)")]
    InvalidRoundIndex { index: usize, count: usize },

    // --- contribution ---
    #[error("No active round for asset")]
    RoundNotActive,

    #[error("Round not in window: now {now}, window [{start_time}, {end_time}]")]
    RoundNotInWindow {
        now: Timestamp,
        start_time: Timestamp,
        end_time: Timestamp,
    },

    #[error("Contribution too low: {value} < minimum {min}")]
    ContributionTooLow { value: Amount, min: Amount },

    #[error("Contribution too high: {value} > maximum {max}")]
    ContributionTooHigh { value: Amount, max: Amount },

    #[error("Hard cap exceeded: raised {total_raised} + {value} > cap {hard_cap}")]
    HardCapExceeded {
        total_raised: Amount,
        value: Amount,
        hard_cap: Amount,
    },

    #[error("Insufficient round inventory: requested {requested}, available {available}")]
    InsufficientRoundInventory { requested: Amount, available: Amount },

    #[error("Contribution of {value} buys zero units")]
    AllocationTooSmall { value: Amount },

    // --- vesting ---
    #[error("No vesting schedule for investor and asset")]
    NoSchedule,

    #[error("Vesting not started: starts at {start}")]
    VestingNotStarted { start: Timestamp },

    #[error("Nothing to claim")]
    NothingToClaim,

    // --- treasury ---
    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    // --- collaborators and internals ---
    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Ledger lock poisoned")]
    LockPoisoned,
}

impl LaunchpadError {
    /// Map the specific failure onto its category.
    pub fn kind(&self) -> ErrorKind {
        use LaunchpadError::*;
        match self {
            InvalidAsset
            | InvalidCapRange { .. }
            | InvalidPrice
            | InvalidInventory
            | InvalidTimeRange { .. }
            | InvalidContributionBounds { .. }
            | AllocationTooSmall { .. }
            | InvalidConfig { .. } => ErrorKind::InvalidInput,
            Unauthorized => ErrorKind::Unauthorized,
            AssetNotFound { .. } | InvalidRoundIndex { .. } | NoSchedule => ErrorKind::NotFound,
            AlreadyRegistered { .. } => ErrorKind::AlreadyExists,
            RoundNotActive | RoundNotInWindow { .. } | VestingNotStarted { .. } => {
                ErrorKind::StateIneligible
            }
            InsufficientInventoryBacking { .. }
            | ContributionTooLow { .. }
            | ContributionTooHigh { .. }
            | HardCapExceeded { .. }
            | InsufficientRoundInventory { .. } => ErrorKind::LimitExceeded,
            NothingToClaim => ErrorKind::NothingToClaim,
            NothingToWithdraw => ErrorKind::NothingToWithdraw,
            TransferFailed(_) => ErrorKind::TransferFailure,
            Reentrancy | ArithmeticOverflow | LockPoisoned => ErrorKind::Internal,
        }
    }
}

impl From<NumericError> for LaunchpadError {
    fn from(_: NumericError) -> Self {
        LaunchpadError::ArithmeticOverflow
    }
}
