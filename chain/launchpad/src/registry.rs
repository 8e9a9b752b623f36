//! Asset registry — which assets are on sale, by whom, and their caps

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::ids::{AccountId, AssetId};
use types::numeric::Amount;

use crate::errors::LaunchpadError;

/// A registered fundraising asset.
///
/// Everything except `total_raised` is fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_id: AssetId,
    pub registrant: AccountId,
    pub soft_cap: Amount,
    pub hard_cap: Amount,
    /// Monotonic, never above `hard_cap`.
    pub total_raised: Amount,
}

impl AssetRecord {
    /// Value still accepted before the hard cap is hit.
    pub fn remaining_cap(&self) -> Amount {
        self.hard_cap.saturating_sub(self.total_raised)
    }

    /// Informational only; the soft cap gates nothing.
    pub fn soft_cap_reached(&self) -> bool {
        self.total_raised >= self.soft_cap
    }
}

/// Registered assets, enumerable in registration order.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    records: HashMap<AssetId, AssetRecord>,
    order: Vec<AssetId>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a registration without applying it.
    pub fn check_register(
        &self,
        asset_id: &AssetId,
        soft_cap: Amount,
        hard_cap: Amount,
    ) -> Result<(), LaunchpadError> {
        if asset_id.is_nil() {
            return Err(LaunchpadError::InvalidAsset);
        }
        if self.records.contains_key(asset_id) {
            return Err(LaunchpadError::AlreadyRegistered {
                asset_id: *asset_id,
            });
        }
        if soft_cap >= hard_cap {
            return Err(LaunchpadError::InvalidCapRange { soft_cap, hard_cap });
        }
        Ok(())
    }

    /// Register an asset. Registration is permanent.
    pub fn register(
        &mut self,
        asset_id: AssetId,
        registrant: AccountId,
        soft_cap: Amount,
        hard_cap: Amount,
    ) -> Result<AssetRecord, LaunchpadError> {
        self.check_register(&asset_id, soft_cap, hard_cap)?;
        let record = AssetRecord {
            asset_id,
            registrant,
            soft_cap,
            hard_cap,
            total_raised: 0,
        };
        self.records.insert(asset_id, record.clone());
        self.order.push(asset_id);
        Ok(record)
    }

    pub fn get(&self, asset_id: &AssetId) -> Option<&AssetRecord> {
        self.records.get(asset_id)
    }

    /// Lookup that fails with `AssetNotFound`.
    pub fn require(&self, asset_id: &AssetId) -> Result<&AssetRecord, LaunchpadError> {
        self.records
            .get(asset_id)
            .ok_or(LaunchpadError::AssetNotFound {
                asset_id: *asset_id,
            })
    }

    /// Set the raised total. Only the contribution engine calls this, with a
    /// value it has already checked against the hard cap.
    pub(crate) fn set_total_raised(&mut self, asset_id: &AssetId, total_raised: Amount) {
        if let Some(record) = self.records.get_mut(asset_id) {
            record.total_raised = total_raised;
        }
    }

    /// Asset ids in registration order.
    pub fn asset_ids(&self) -> &[AssetId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
