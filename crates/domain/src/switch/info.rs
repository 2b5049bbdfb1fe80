//! Introspection snapshot returned to remote callers.

use serde::Serialize;

use crate::id::SwitchId;

use super::config::SwitchConfig;
use super::mode::{InMode, InitialState, SvcType};

/// Kind of component a snapshot describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Switch,
}

/// Point-in-time view of a switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchInfo {
    pub id: SwitchId,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub name: String,
    pub svc_type: SvcType,
    pub in_mode: InMode,
    #[serde(rename = "initial")]
    pub initial_state: InitialState,
    pub state: bool,
    pub auto_off: bool,
    pub auto_off_delay: f64,
    /// Instantaneous power in watts.
    #[serde(rename = "apower", skip_serializing_if = "Option::is_none")]
    pub power_w: Option<f64>,
    /// Accumulated energy in watt-hours.
    #[serde(rename = "aenergy", skip_serializing_if = "Option::is_none")]
    pub energy_wh: Option<f64>,
}

impl SwitchInfo {
    /// Snapshot without telemetry; attach readings with
    /// [`with_power`](Self::with_power) and [`with_energy`](Self::with_energy).
    #[must_use]
    pub fn new(id: SwitchId, cfg: &SwitchConfig, state: bool) -> Self {
        Self {
            id,
            kind: ComponentType::Switch,
            name: cfg.name.clone(),
            svc_type: cfg.svc_type,
            in_mode: cfg.in_mode,
            initial_state: cfg.initial_state,
            state,
            auto_off: cfg.auto_off,
            auto_off_delay: cfg.auto_off_delay,
            power_w: None,
            energy_wh: None,
        }
    }

    #[must_use]
    pub fn with_power(mut self, power_w: Option<f64>) -> Self {
        self.power_w = power_w;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy_wh: Option<f64>) -> Self {
        self.energy_wh = energy_wh;
        self
    }
}
