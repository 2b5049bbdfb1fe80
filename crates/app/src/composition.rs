//! Wires peripherals into switches and lays switches out as
//! accessories.
//!
//! Peripherals are registered through a staged builder: every output first,
//! then the inputs, then the power meters. An input can only be attached to
//! a slot whose output already exists, and the stage types make it
//! impossible to add an output once inputs have started.

use std::collections::BTreeMap;
use std::rc::Rc;

use minirelay_domain::device::DeviceConfig;
use minirelay_domain::error::{CompositionError, MiniRelayError};
use minirelay_domain::id::SwitchId;
use minirelay_domain::layout::{AccessoryPlan, LayoutPlan};

use crate::ports::{ConfigStore, Input, Output, PowerMeter, Timer};
use crate::switch::Switch;

/// Peripherals of the board, keyed by switch slot.
pub struct Peripherals {
    outputs: BTreeMap<SwitchId, Rc<dyn Output>>,
    inputs: BTreeMap<SwitchId, Rc<dyn Input>>,
    power_meters: BTreeMap<SwitchId, Rc<dyn PowerMeter>>,
}

impl Peripherals {
    /// Start registering peripherals, outputs first.
    #[must_use]
    pub fn builder() -> OutputStage {
        OutputStage {
            outputs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn output(&self, slot: SwitchId) -> Option<&Rc<dyn Output>> {
        self.outputs.get(&slot)
    }

    #[must_use]
    pub fn input(&self, slot: SwitchId) -> Option<&Rc<dyn Input>> {
        self.inputs.get(&slot)
    }

    #[must_use]
    pub fn power_meter(&self, slot: SwitchId) -> Option<&Rc<dyn PowerMeter>> {
        self.power_meters.get(&slot)
    }
}

/// First stage: outputs.
pub struct OutputStage {
    outputs: BTreeMap<SwitchId, Rc<dyn Output>>,
}

impl OutputStage {
    /// Create the output of `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::DuplicateSlot`] if the slot already has
    /// an output. `make` is not called in that case.
    pub fn output<O, F>(mut self, slot: SwitchId, make: F) -> Result<Self, CompositionError>
    where
        O: Output + 'static,
        F: FnOnce() -> Rc<O>,
    {
        if self.outputs.contains_key(&slot) {
            return Err(CompositionError::DuplicateSlot {
                slot,
                kind: "output",
            });
        }
        let output: Rc<dyn Output> = make();
        tracing::debug!(%slot, output_id = %output.id(), "output created");
        self.outputs.insert(slot, output);
        Ok(self)
    }

    /// Done with outputs, move on to inputs.
    #[must_use]
    pub fn inputs(self) -> InputStage {
        InputStage {
            outputs: self.outputs,
            inputs: BTreeMap::new(),
        }
    }
}

/// Second stage: inputs.
pub struct InputStage {
    outputs: BTreeMap<SwitchId, Rc<dyn Output>>,
    inputs: BTreeMap<SwitchId, Rc<dyn Input>>,
}

impl InputStage {
    /// Create the input of `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::InputBeforeOutput`] if the slot has no
    /// output yet and [`CompositionError::DuplicateSlot`] if it already has
    /// an input. `make` is not called in either case.
    pub fn input<I, F>(mut self, slot: SwitchId, make: F) -> Result<Self, CompositionError>
    where
        I: Input + 'static,
        F: FnOnce() -> Rc<I>,
    {
        if !self.outputs.contains_key(&slot) {
            return Err(CompositionError::InputBeforeOutput { slot });
        }
        if self.inputs.contains_key(&slot) {
            return Err(CompositionError::DuplicateSlot {
                slot,
                kind: "input",
            });
        }
        let input: Rc<dyn Input> = make();
        tracing::debug!(%slot, input_id = %input.id(), "input created");
        self.inputs.insert(slot, input);
        Ok(self)
    }

    /// Done with inputs, move on to power meters.
    #[must_use]
    pub fn power_meters(self) -> MeterStage {
        MeterStage {
            outputs: self.outputs,
            inputs: self.inputs,
            power_meters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn build(self) -> Peripherals {
        self.power_meters().build()
    }
}

/// Last stage: power meters.
pub struct MeterStage {
    outputs: BTreeMap<SwitchId, Rc<dyn Output>>,
    inputs: BTreeMap<SwitchId, Rc<dyn Input>>,
    power_meters: BTreeMap<SwitchId, Rc<dyn PowerMeter>>,
}

impl MeterStage {
    /// Attach a power meter to `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::MissingOutput`] if the slot has no output
    /// and [`CompositionError::DuplicateSlot`] if it already has a meter.
    pub fn power_meter<P, F>(mut self, slot: SwitchId, make: F) -> Result<Self, CompositionError>
    where
        P: PowerMeter + 'static,
        F: FnOnce() -> Rc<P>,
    {
        if !self.outputs.contains_key(&slot) {
            return Err(CompositionError::MissingOutput { slot });
        }
        if self.power_meters.contains_key(&slot) {
            return Err(CompositionError::DuplicateSlot {
                slot,
                kind: "power meter",
            });
        }
        self.power_meters.insert(slot, make());
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> Peripherals {
        Peripherals {
            outputs: self.outputs,
            inputs: self.inputs,
            power_meters: self.power_meters,
        }
    }
}

/// Switches of the board and their accessory layout.
pub struct Composition {
    // Declared first so switches drop before the peripherals.
    switches: Vec<Switch>,
    layout: LayoutPlan,
    peripherals: Peripherals,
}

/// Create one switch per slot of `device` and plan their accessories.
///
/// Switches are created in slot order but not initialized; call
/// [`Composition::init_all`] once observers are subscribed.
///
/// # Errors
///
/// Returns [`MiniRelayError::InvalidArgument`] if a stored record breaks a
/// config invariant, and [`CompositionError::MissingOutput`] (wrapped in
/// [`MiniRelayError::Composition`]) if a slot has no output.
pub fn compose(
    device: &DeviceConfig,
    peripherals: Peripherals,
    store: Rc<dyn ConfigStore>,
    timer: Rc<dyn Timer>,
) -> Result<Composition, MiniRelayError> {
    device.validate()?;

    let mut switches = Vec::with_capacity(DeviceConfig::SLOTS.len());
    for slot in DeviceConfig::SLOTS {
        let output = peripherals
            .output(slot)
            .ok_or(CompositionError::MissingOutput { slot })?;
        let cfg = device.switch(slot).cloned().unwrap_or_default();

        let mut builder = Switch::builder(slot, cfg, output.clone(), store.clone(), timer.clone());
        if let Some(input) = peripherals.input(slot) {
            builder = builder.input(input.clone());
        }
        if let Some(meter) = peripherals.power_meter(slot) {
            builder = builder.power_meter(meter.clone());
        }
        switches.push(builder.build());
    }

    let configs: Vec<_> = switches.iter().map(|sw| (sw.id(), sw.config())).collect();
    let refs: Vec<_> = configs.iter().map(|(id, cfg)| (*id, cfg)).collect();
    let layout = LayoutPlan::plan(device.legacy_hap_layout, &refs);
    if device.legacy_hap_layout && !layout.legacy {
        tracing::info!("detached input configured, using independent accessories");
    }

    Ok(Composition {
        switches,
        layout,
        peripherals,
    })
}

impl Composition {
    /// All switches, in slot order.
    #[must_use]
    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    #[must_use]
    pub fn switch(&self, id: SwitchId) -> Option<&Switch> {
        self.switches.iter().find(|sw| sw.id() == id)
    }

    /// Apply the startup policy of every switch.
    pub fn init_all(&self) {
        for switch in &self.switches {
            switch.init();
        }
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutPlan {
        &self.layout
    }

    #[must_use]
    pub fn accessories(&self) -> &[AccessoryPlan] {
        &self.layout.accessories
    }

    #[must_use]
    pub fn peripherals(&self) -> &Peripherals {
        &self.peripherals
    }
}
