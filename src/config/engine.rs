//! Engine configuration structures.

use serde::{Deserialize, Serialize};

use crate::core::engine::EnginePolicy;
use crate::core::model::Channel;

/// Store backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing.
    InMemory,
    /// Postgres-backed store.
    Postgres,
}

/// Notifier backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierBackendConfig {
    /// Record deliveries in memory.
    Recording,
    /// Trace-only delivery.
    Log,
}

/// Root engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Crew size assumed when a booking does not specify one.
    pub default_crew_size: u32,
    /// Channels a confirmation request is created on per dispatch.
    pub channels: Vec<Channel>,
    /// Allowed divergence in hours between declared and reconciled totals.
    pub overbooking_tolerance_hours: f64,
    /// Store backend selection.
    pub store: StoreBackendConfig,
    /// Notifier backend selection.
    pub notifier: NotifierBackendConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_crew_size: 2,
            channels: vec![Channel::InApp, Channel::Email],
            overbooking_tolerance_hours: 1.0,
            store: StoreBackendConfig::InMemory,
            notifier: NotifierBackendConfig::Log,
        }
    }
}

impl EngineConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_crew_size == 0 {
            return Err("default_crew_size must be greater than 0".into());
        }
        if self.channels.is_empty() {
            return Err("at least one channel must be configured".into());
        }
        let mut seen = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            if seen.contains(channel) {
                return Err(format!("duplicate channel {channel:?}"));
            }
            seen.push(*channel);
        }
        if !self.overbooking_tolerance_hours.is_finite()
            || self.overbooking_tolerance_hours < 0.0
        {
            return Err("overbooking_tolerance_hours must be non-negative and finite".into());
        }
        Ok(())
    }

    /// Parse engine configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Operating policy for the engine core.
    #[must_use]
    pub fn policy(&self) -> EnginePolicy {
        EnginePolicy {
            channels: self.channels.clone(),
            overbooking_tolerance_hours: self.overbooking_tolerance_hours,
        }
    }
}
