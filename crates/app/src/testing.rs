//! In-memory fakes for every port, shared by the unit tests of this crate.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use minirelay_domain::device::DeviceConfig;
use minirelay_domain::error::{MeterError, MiniRelayError};
use minirelay_domain::id::{HandlerId, InputId, OutputId, SwitchId, TimerId};
use minirelay_domain::input::InputEvent;
use minirelay_domain::switch::{StateChange, SwitchConfig};

use crate::ports::{
    ConfigStore, Input, InputHandler, Output, PowerMeter, StateObserver, Timer, TimerCallback,
};

// ── Output ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeOutput {
    level: Cell<bool>,
    pub writes: RefCell<Vec<(bool, String)>>,
}

impl FakeOutput {
    pub fn with_level(level: bool) -> Self {
        let out = Self::default();
        out.level.set(level);
        out
    }
}

impl Output for FakeOutput {
    fn id(&self) -> OutputId {
        OutputId::new(1)
    }

    fn set_state(&self, on: bool, source: &str) {
        self.level.set(on);
        self.writes.borrow_mut().push((on, source.to_string()));
    }

    fn state(&self) -> bool {
        self.level.get()
    }
}

// ── Input ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeInput {
    level: Cell<bool>,
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(HandlerId, Rc<RefCell<InputHandler>>)>>,
}

impl FakeInput {
    pub fn with_level(level: bool) -> Self {
        let input = Self::default();
        input.level.set(level);
        input
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Set the level and deliver a `Change` event.
    pub fn change(&self, level: bool) {
        self.level.set(level);
        self.emit(InputEvent::Change);
    }

    pub fn emit(&self, event: InputEvent) {
        let handlers: Vec<_> = self.handlers.borrow().iter().map(|(_, h)| h.clone()).collect();
        let level = self.level.get();
        for handler in handlers {
            (handler.borrow_mut())(event, level);
        }
    }
}

impl Input for FakeInput {
    fn id(&self) -> InputId {
        InputId::new(1)
    }

    fn add_handler(&self, handler: InputHandler) -> HandlerId {
        let id = HandlerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.handlers
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    fn remove_handler(&self, id: HandlerId) {
        self.handlers.borrow_mut().retain(|(h, _)| *h != id);
    }

    fn state(&self) -> bool {
        self.level.get()
    }
}

// ── Power meter ────────────────────────────────────────────────────

pub struct FakeMeter {
    pub power: Option<f64>,
    pub energy: Option<f64>,
}

impl PowerMeter for FakeMeter {
    fn power_w(&self) -> Result<f64, MeterError> {
        self.power.ok_or(MeterError::NotReady)
    }

    fn energy_wh(&self) -> Result<f64, MeterError> {
        self.energy.ok_or(MeterError::NotReady)
    }
}

// ── Config store ───────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeStore {
    pub tree: RefCell<DeviceConfig>,
    pub saves: Cell<usize>,
    pub fail: Cell<bool>,
}

impl ConfigStore for FakeStore {
    fn load(&self) -> Result<DeviceConfig, MiniRelayError> {
        Ok(self.tree.borrow().clone())
    }

    fn save_switch(&self, id: SwitchId, cfg: &SwitchConfig) -> Result<(), MiniRelayError> {
        if self.fail.get() {
            return Err(MiniRelayError::Storage("disk full".into()));
        }
        if let Some(slot) = self.tree.borrow_mut().switch_mut(id) {
            *slot = cfg.clone();
        }
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// ── Timer ──────────────────────────────────────────────────────────

/// Timer driven by hand: nothing fires until the test says so.
#[derive(Default)]
pub struct ManualTimer {
    next_id: Cell<u64>,
    pending: RefCell<BTreeMap<TimerId, (Duration, TimerCallback)>>,
    pub cancelled: Cell<usize>,
    /// Keep cancelled callbacks around so a late firing can be simulated.
    pub keep_cancelled: Cell<bool>,
    stale: RefCell<Vec<TimerCallback>>,
}

impl ManualTimer {
    pub fn armed(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.pending.borrow().values().map(|(d, _)| *d).collect()
    }

    /// Fire every pending timer, oldest first.
    pub fn fire_all(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for (_, (_, callback)) in pending {
            callback();
        }
    }

    /// Run callbacks that were cancelled while `keep_cancelled` was set.
    pub fn fire_cancelled(&self) {
        let stale = std::mem::take(&mut *self.stale.borrow_mut());
        for callback in stale {
            callback();
        }
    }
}

impl Timer for ManualTimer {
    fn arm(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.pending.borrow_mut().insert(id, (delay, callback));
        id
    }

    fn cancel(&self, id: TimerId) {
        let removed = self.pending.borrow_mut().remove(&id);
        if let Some((_, callback)) = removed {
            self.cancelled.set(self.cancelled.get() + 1);
            if self.keep_cancelled.get() {
                self.stale.borrow_mut().push(callback);
            }
        }
    }
}

// ── Observer ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingObserver {
    pub changes: RefCell<Vec<StateChange>>,
}

impl StateObserver for RecordingObserver {
    fn state_changed(&self, change: &StateChange) {
        self.changes.borrow_mut().push(change.clone());
    }
}
