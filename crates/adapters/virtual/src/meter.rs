//! Virtual power meter.

use std::cell::Cell;

use minirelay_app::ports::PowerMeter;
use minirelay_domain::error::MeterError;

/// Failures a virtual meter can be told to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PowerMeterError {
    /// The metering chip stopped answering.
    #[error("meter disconnected")]
    Disconnected,
}

/// A simulated metering chip.
///
/// Reads fail with [`MeterError::NotReady`] until a first reading is
/// recorded. Energy accumulates across [`record`](Self::record) calls.
#[derive(Default)]
pub struct VirtualPowerMeter {
    power_w: Cell<Option<f64>>,
    energy_wh: Cell<Option<f64>>,
    fault: Cell<Option<PowerMeterError>>,
}

impl VirtualPowerMeter {
    /// Record `power_w` drawn for `hours`.
    pub fn record(&self, power_w: f64, hours: f64) {
        self.power_w.set(Some(power_w));
        let energy = self.energy_wh.get().unwrap_or(0.0) + power_w * hours;
        self.energy_wh.set(Some(energy));
    }

    /// Make every read fail with `fault`, or clear the fault with `None`.
    pub fn set_fault(&self, fault: Option<PowerMeterError>) {
        self.fault.set(fault);
    }

    fn read(&self, value: Option<f64>) -> Result<f64, MeterError> {
        if let Some(fault) = self.fault.get() {
            return Err(MeterError::Read(Box::new(fault)));
        }
        value.ok_or(MeterError::NotReady)
    }
}

impl PowerMeter for VirtualPowerMeter {
    fn power_w(&self) -> Result<f64, MeterError> {
        self.read(self.power_w.get())
    }

    fn energy_wh(&self) -> Result<f64, MeterError> {
        self.read(self.energy_wh.get())
    }
}
