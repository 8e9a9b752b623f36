//! Launchpad configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::LaunchpadError;

/// How a repeat purchase interacts with an investor's existing schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VestingPolicy {
    /// The new purchase replaces the schedule outright. Units left unvested
    /// or unclaimed under the previous schedule are no longer claimable.
    #[default]
    Replace,
    /// Units already vested under the existing schedule are frozen as its
    /// base and stay claimable. The unvested remainder plus the new grant
    /// vest linearly from the purchase time.
    Merge,
}

/// Configuration for a launchpad instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Linear vesting duration in seconds.
    pub vesting_duration_secs: i64,
    /// Schedule handling for repeat purchases.
    pub vesting_policy: VestingPolicy,
    /// Count outstanding obligations against custody when backing new rounds.
    pub strict_backing: bool,
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            vesting_duration_secs: Duration::days(30).num_seconds(),
            vesting_policy: VestingPolicy::Replace,
            strict_backing: true,
        }
    }
}

impl LaunchpadConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, LaunchpadError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| LaunchpadError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LaunchpadError> {
        if self.vesting_duration_secs <= 0 {
            return Err(LaunchpadError::InvalidConfig {
                reason: format!(
                    "vesting_duration_secs must be positive, got {}",
                    self.vesting_duration_secs
                ),
            });
        }
        Ok(())
    }

    /// Vesting duration as a chrono duration.
    pub fn vesting_duration(&self) -> Duration {
        Duration::seconds(self.vesting_duration_secs)
    }
}
