//! The switch component: one output, an optional input and an optional
//! power meter bound into a single controllable on/off device.
//!
//! The switch is the only writer of its output. Every write goes through
//! one routine that persists the new level, notifies observers and manages
//! the auto-off timer according to [`Transition`]. Input events and timer
//! firings reach the switch through callbacks that hold a `Weak` reference,
//! so dropping the [`Switch`] is enough to make them inert; the drop also
//! cancels the timer and deregisters the input handler.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use minirelay_domain::error::MiniRelayError;
use minirelay_domain::id::{HandlerId, SwitchId, TimerId};
use minirelay_domain::input::InputEvent;
use minirelay_domain::switch::{
    Cause, ConfigPatch, ConfigUpdate, StateChange, SwitchConfig, SwitchInfo, TimerAction,
    Transition,
};

use crate::ports::{ConfigStore, Input, Output, PowerMeter, StateObserver, Timer};

/// Source tag used for writes made by the startup policy.
pub const SOURCE_INIT: &str = "init";
/// Source tag used for writes made by the auto-off timer.
pub const SOURCE_AUTO_OFF: &str = "auto_off";

/// A controllable on/off device.
pub struct Switch {
    inner: Rc<Inner>,
}

struct Inner {
    id: SwitchId,
    cfg: RefCell<SwitchConfig>,
    output: Rc<dyn Output>,
    input: Option<Rc<dyn Input>>,
    power_meter: Option<Rc<dyn PowerMeter>>,
    store: Rc<dyn ConfigStore>,
    timer: Rc<dyn Timer>,
    observers: RefCell<Vec<Rc<dyn StateObserver>>>,
    auto_off: Cell<Option<ArmedTimer>>,
    auto_off_generation: Cell<u64>,
    input_handler: Cell<Option<HandlerId>>,
    initialized: Cell<bool>,
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    id: TimerId,
    generation: u64,
}

/// Collects the collaborators of a [`Switch`].
pub struct SwitchBuilder {
    id: SwitchId,
    cfg: SwitchConfig,
    output: Rc<dyn Output>,
    store: Rc<dyn ConfigStore>,
    timer: Rc<dyn Timer>,
    input: Option<Rc<dyn Input>>,
    power_meter: Option<Rc<dyn PowerMeter>>,
}

impl SwitchBuilder {
    /// Attach the input that drives this switch.
    #[must_use]
    pub fn input(mut self, input: Rc<dyn Input>) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn power_meter(mut self, power_meter: Rc<dyn PowerMeter>) -> Self {
        self.power_meter = Some(power_meter);
        self
    }

    /// Create the switch. The output is left untouched until
    /// [`Switch::init`].
    #[must_use]
    pub fn build(self) -> Switch {
        Switch {
            inner: Rc::new(Inner {
                id: self.id,
                cfg: RefCell::new(self.cfg),
                output: self.output,
                input: self.input,
                power_meter: self.power_meter,
                store: self.store,
                timer: self.timer,
                observers: RefCell::new(Vec::new()),
                auto_off: Cell::new(None),
                auto_off_generation: Cell::new(0),
                input_handler: Cell::new(None),
                initialized: Cell::new(false),
            }),
        }
    }
}

impl Switch {
    /// Start building a switch around its mandatory collaborators.
    #[must_use]
    pub fn builder(
        id: SwitchId,
        cfg: SwitchConfig,
        output: Rc<dyn Output>,
        store: Rc<dyn ConfigStore>,
        timer: Rc<dyn Timer>,
    ) -> SwitchBuilder {
        SwitchBuilder {
            id,
            cfg,
            output,
            store,
            timer,
            input: None,
            power_meter: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SwitchId {
        self.inner.id
    }

    /// Current level; always equal to the output's level.
    #[must_use]
    pub fn state(&self) -> bool {
        self.inner.output.state()
    }

    /// Copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> SwitchConfig {
        self.inner.cfg.borrow().clone()
    }

    /// An auto-off timer is armed.
    #[must_use]
    pub fn auto_off_pending(&self) -> bool {
        self.inner.auto_off.get().is_some()
    }

    /// Apply the startup policy and start listening to the input.
    ///
    /// A disabled switch stays inert: the output is not touched and no
    /// input handler is registered. Only the first call has an effect.
    pub fn init(&self) {
        let inner = &self.inner;
        if inner.initialized.replace(true) {
            tracing::warn!(switch_id = %inner.id, "switch already initialized");
            return;
        }
        let (enable, initial_state, persisted, in_mode) = {
            let cfg = inner.cfg.borrow();
            (cfg.enable, cfg.initial_state, cfg.state, cfg.in_mode)
        };
        if !enable {
            tracing::info!(
                switch_id = %inner.id,
                name = %inner.cfg.borrow().name,
                "switch is disabled"
            );
            return;
        }

        let input_level = inner.input.as_ref().map(|input| input.state());
        if let Some(level) = initial_state.resolve(persisted, in_mode, input_level) {
            inner.apply(level, SOURCE_INIT, Cause::Command);
        }

        {
            let cfg = inner.cfg.borrow();
            tracing::info!(
                switch_id = %inner.id,
                name = %cfg.name,
                svc_type = i64::from(cfg.svc_type),
                state = inner.output.state(),
                "exporting switch"
            );
        }

        if let Some(input) = &inner.input {
            let weak = Rc::downgrade(inner);
            let handler_id = input.add_handler(Box::new(move |event, level| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_input(event, level);
                }
            }));
            inner.input_handler.set(Some(handler_id));
        }
    }

    /// Drive the switch to `on`. `source` records where the command came
    /// from (`"button"`, `"switch"`, a protocol name, …).
    pub fn set_state(&self, on: bool, source: &str) {
        self.inner.apply(on, source, Cause::Command);
    }

    /// Validate and commit a JSON configuration payload.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRelayError::InvalidArgument`] naming the first invalid
    /// field. Nothing is changed in that case.
    pub fn set_config(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ConfigUpdate, MiniRelayError> {
        Ok(self.commit(ConfigPatch::from_value(payload)?))
    }

    /// Like [`set_config`](Self::set_config), from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRelayError::InvalidArgument`] if the text is not a JSON
    /// object or a field is invalid.
    pub fn set_config_str(&self, payload: &str) -> Result<ConfigUpdate, MiniRelayError> {
        Ok(self.commit(ConfigPatch::from_json_str(payload)?))
    }

    fn commit(&self, patch: ConfigPatch) -> ConfigUpdate {
        let (update, snapshot) = {
            let mut cfg = self.inner.cfg.borrow_mut();
            let update = cfg.apply(patch);
            (update, cfg.clone())
        };
        tracing::info!(
            switch_id = %self.inner.id,
            restart_required = update.restart_required,
            "configuration updated"
        );
        self.inner.save(&snapshot);
        update
    }

    /// Snapshot of configuration, state and (best effort) telemetry.
    #[must_use]
    pub fn info(&self) -> SwitchInfo {
        let inner = &self.inner;
        let info = SwitchInfo::new(inner.id, &inner.cfg.borrow(), inner.output.state());
        match &inner.power_meter {
            Some(meter) => info
                .with_power(meter.power_w().ok())
                .with_energy(meter.energy_wh().ok()),
            None => info,
        }
    }

    /// Register an observer for state changes.
    pub fn subscribe(&self, observer: Rc<dyn StateObserver>) {
        self.inner.observers.borrow_mut().push(observer);
    }
}

impl Inner {
    fn handle_input(self: &Rc<Self>, event: InputEvent, level: bool) {
        let in_mode = self.cfg.borrow().in_mode;
        if let Some(action) = in_mode.target(event, level, self.output.state()) {
            self.apply(action.level, action.source, Cause::Command);
        }
    }

    fn apply(self: &Rc<Self>, next: bool, source: &str, cause: Cause) {
        let previous = self.output.state();
        self.output.set_state(next, source);

        let transition = Transition::evaluate(previous, next, &self.cfg.borrow(), cause);
        if transition.persist {
            let snapshot = {
                let mut cfg = self.cfg.borrow_mut();
                cfg.state = next;
                cfg.clone()
            };
            self.save(&snapshot);
        }
        if !transition.changed {
            return;
        }
        tracing::debug!(switch_id = %self.id, state = next, source, "state changed");

        match transition.timer {
            TimerAction::Keep => {}
            TimerAction::Cancel => self.cancel_auto_off(),
            TimerAction::Rearm(delay) => {
                self.cancel_auto_off();
                self.arm_auto_off(delay);
            }
        }

        let change = StateChange {
            switch_id: self.id,
            state: next,
            source: source.to_string(),
        };
        let observers = self.observers.borrow().clone();
        for observer in observers {
            // A re-entrant write already delivered a newer change.
            if self.output.state() != next {
                break;
            }
            observer.state_changed(&change);
        }
    }

    fn save(&self, cfg: &SwitchConfig) {
        if let Err(err) = self.store.save_switch(self.id, cfg) {
            tracing::warn!(switch_id = %self.id, error = %err, "failed to persist configuration");
        }
    }

    fn cancel_auto_off(&self) {
        if let Some(armed) = self.auto_off.take() {
            self.timer.cancel(armed.id);
        }
    }

    fn arm_auto_off(self: &Rc<Self>, delay: Duration) {
        let generation = self.auto_off_generation.get().wrapping_add(1);
        self.auto_off_generation.set(generation);

        let weak = Rc::downgrade(self);
        let id = self.timer.arm(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.auto_off_fired(generation);
                }
            }),
        );
        self.auto_off.set(Some(ArmedTimer { id, generation }));
        tracing::info!(
            switch_id = %self.id,
            delay_secs = delay.as_secs_f64(),
            "auto-off timer armed"
        );
    }

    fn auto_off_fired(self: &Rc<Self>, generation: u64) {
        match self.auto_off.get() {
            Some(armed) if armed.generation == generation => self.auto_off.set(None),
            _ => {
                tracing::warn!(switch_id = %self.id, "ignoring stale auto-off timer");
                return;
            }
        }
        if !self.cfg.borrow().auto_off {
            tracing::debug!(switch_id = %self.id, "auto-off disabled while timer was pending");
            return;
        }
        self.apply(false, SOURCE_AUTO_OFF, Cause::AutoOff);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(armed) = self.auto_off.take() {
            self.timer.cancel(armed.id);
        }
        if let (Some(input), Some(handler_id)) = (&self.input, self.input_handler.take()) {
            input.remove_handler(handler_id);
        }
    }
}
