//! Token Launchpad Ledger Core
//!
//! Bookkeeping and state transitions for a token launch: asset registration
//! with soft/hard caps, time-boxed sale rounds, capped contributions, linear
//! vesting with claims, and per-asset treasury payouts.
//!
//! # Modules
//! - `config`: Vesting duration, repeat-purchase policy, backing strictness
//! - `errors`: Operation errors and their coarse taxonomy
//! - `events`: Notifications emitted by successful mutations
//! - `security`: Reentrancy guard and registrant authority check
//! - `custody`: Token and value transfer collaborators, in-memory ledger
//! - `registry`: Registered assets and caps
//! - `rounds`: Per-asset sale rounds and the designated round
//! - `contribution`: Purchase validation and investor positions
//! - `vesting`: Linear vesting schedules and claim planning
//! - `treasury`: Collected value per asset
//! - `launchpad`: The aggregate that runs every operation atomically
//! - `shared`: Mutex-backed handle for multi-threaded callers

pub mod config;
pub mod contribution;
pub mod custody;
pub mod errors;
pub mod events;
pub mod launchpad;
pub mod registry;
pub mod rounds;
pub mod security;
pub mod shared;
pub mod treasury;
pub mod vesting;

pub use config::{LaunchpadConfig, VestingPolicy};
pub use errors::{ErrorKind, LaunchpadError, TransferError};
pub use launchpad::Launchpad;
pub use shared::SharedLaunchpad;

/// Ledger ABI version — frozen after release
pub const LEDGER_ABI_VERSION: &str = "1.0.0";
