//! Virtual input pin.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use minirelay_app::ports::{Input, InputHandler};
use minirelay_domain::id::{HandlerId, InputId};
use minirelay_domain::input::InputEvent;

type SharedHandler = Rc<RefCell<InputHandler>>;

/// A simulated digital input.
///
/// The pin reports the *logical* level: with `inverted` set, a low raw
/// level reads as `true`. Setting the same logical level twice produces a
/// single `Change` event.
pub struct VirtualInput {
    id: InputId,
    pin: u8,
    inverted: bool,
    level: Cell<bool>,
    next_handler: Cell<u64>,
    handlers: RefCell<Vec<(HandlerId, SharedHandler)>>,
}

impl VirtualInput {
    /// Create an input whose raw level starts low.
    #[must_use]
    pub fn new(id: InputId, pin: u8, inverted: bool) -> Self {
        Self {
            id,
            pin,
            inverted,
            level: Cell::new(inverted),
            next_handler: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Drive the raw pin level.
    pub fn set_raw_level(&self, raw: bool) {
        self.set_level(raw != self.inverted);
    }

    /// Drive the logical level.
    pub fn set_level(&self, level: bool) {
        if self.level.replace(level) == level {
            return;
        }
        tracing::debug!(input_id = %self.id, pin = self.pin, level, "input changed");
        self.dispatch(InputEvent::Change);
    }

    /// Deliver a gesture event (`Single`, `Double`, `Long`) at the current
    /// level.
    pub fn gesture(&self, event: InputEvent) {
        self.dispatch(event);
    }

    fn dispatch(&self, event: InputEvent) {
        let handlers: Vec<SharedHandler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        let level = self.level.get();
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => handler(event, level),
                Err(_) => tracing::warn!(input_id = %self.id, "re-entrant input event dropped"),
            }
        }
    }
}

impl Input for VirtualInput {
    fn id(&self) -> InputId {
        self.id
    }

    fn add_handler(&self, handler: InputHandler) -> HandlerId {
        let id = HandlerId::new(self.next_handler.get());
        self.next_handler.set(id.get() + 1);
        self.handlers
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    fn remove_handler(&self, id: HandlerId) {
        self.handlers.borrow_mut().retain(|(handler_id, _)| *handler_id != id);
    }

    fn state(&self) -> bool {
        self.level.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(input: &VirtualInput) -> (HandlerId, Rc<RefCell<Vec<(InputEvent, bool)>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = input.add_handler(Box::new(move |event, level| {
            sink.borrow_mut().push((event, level));
        }));
        (id, seen)
    }

    #[test]
    fn should_start_low() {
        let input = VirtualInput::new(InputId::new(0), 5, false);
        assert!(!input.state());
    }

    #[test]
    fn should_report_inverted_level() {
        let input = VirtualInput::new(InputId::new(0), 5, true);
        assert!(input.state());
        input.set_raw_level(true);
        assert!(!input.state());
    }

    #[test]
    fn should_emit_change_only_when_level_changes() {
        let input = VirtualInput::new(InputId::new(0), 5, false);
        let (_, seen) = recorder(&input);

        input.set_level(true);
        input.set_level(true);
        input.set_level(false);

        assert_eq!(
            *seen.borrow(),
            vec![(InputEvent::Change, true), (InputEvent::Change, false)]
        );
    }

    #[test]
    fn should_deliver_gestures_with_current_level() {
        let input = VirtualInput::new(InputId::new(0), 5, false);
        let (_, seen) = recorder(&input);
        input.set_level(true);
        input.gesture(InputEvent::Long);
        assert_eq!(seen.borrow().last(), Some(&(InputEvent::Long, true)));
    }

    #[test]
    fn should_stop_delivering_after_removal() {
        let input = VirtualInput::new(InputId::new(0), 5, false);
        let (id, seen) = recorder(&input);
        let (_, other) = recorder(&input);

        input.remove_handler(id);
        input.set_level(true);

        assert!(seen.borrow().is_empty());
        assert_eq!(other.borrow().len(), 1);
    }

    #[test]
    fn should_hand_out_distinct_handler_ids() {
        let input = VirtualInput::new(InputId::new(0), 5, false);
        let (a, _) = recorder(&input);
        let (b, _) = recorder(&input);
        assert_ne!(a, b);
    }
}
