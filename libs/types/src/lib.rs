//! Types library for the token launchpad
//!
//! Shared identifier and numeric definitions used by the ledger core and by
//! anything that embeds it.
//!
//! # Modules
//! - `ids`: Unique identifiers (AccountId, AssetId)
//! - `numeric`: Fixed-point amounts, price scale, checked floor division

pub mod ids;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
