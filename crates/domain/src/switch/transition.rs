//! Rules applied to every write of a switch's output level.

use std::time::Duration;

use super::config::SwitchConfig;

/// What triggered a state write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// Input event, remote command, or startup policy.
    Command,
    /// The auto-off timer fired.
    AutoOff,
}

/// What to do with the auto-off timer after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Leave any armed timer alone.
    Keep,
    /// Cancel any armed timer.
    Cancel,
    /// Cancel any armed timer, then arm a new one.
    Rearm(Duration),
}

/// Side effects of writing `next` to an output currently at `previous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The observable level changed; observers must be notified.
    pub changed: bool,
    /// The persisted level differs from `next` and must be saved.
    pub persist: bool,
    pub timer: TimerAction,
}

impl Transition {
    #[must_use]
    pub fn evaluate(previous: bool, next: bool, cfg: &SwitchConfig, cause: Cause) -> Self {
        let changed = previous != next;
        let timer = if !changed {
            TimerAction::Keep
        } else if cfg.auto_off && cause != Cause::AutoOff {
            // Unrepresentable delays never reach a validated record.
            cfg.auto_off_duration().map_or(TimerAction::Cancel, TimerAction::Rearm)
        } else {
            TimerAction::Cancel
        };
        Self {
            changed,
            persist: cfg.state != next,
            timer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(state: bool, auto_off: Option<f64>) -> SwitchConfig {
        let mut builder = SwitchConfig::builder().state(state);
        if let Some(delay) = auto_off {
            builder = builder.auto_off(delay);
        }
        builder.build().unwrap()
    }

    #[test]
    fn should_be_a_no_op_when_level_is_unchanged() {
        let t = Transition::evaluate(true, true, &cfg(true, Some(5.0)), Cause::Command);
        assert_eq!(
            t,
            Transition {
                changed: false,
                persist: false,
                timer: TimerAction::Keep,
            }
        );
    }

    #[test]
    fn should_persist_when_stored_level_is_stale_even_without_change() {
        let t = Transition::evaluate(true, true, &cfg(false, None), Cause::Command);
        assert!(!t.changed);
        assert!(t.persist);
    }

    #[test]
    fn should_rearm_when_auto_off_enabled() {
        let t = Transition::evaluate(false, true, &cfg(false, Some(2.0)), Cause::Command);
        assert!(t.changed);
        assert!(t.persist);
        assert_eq!(t.timer, TimerAction::Rearm(Duration::from_secs(2)));
    }

    #[test]
    fn should_rearm_on_any_genuine_transition() {
        let t = Transition::evaluate(true, false, &cfg(true, Some(2.0)), Cause::Command);
        assert_eq!(t.timer, TimerAction::Rearm(Duration::from_secs(2)));
    }

    #[test]
    fn should_only_cancel_when_caused_by_auto_off() {
        let t = Transition::evaluate(true, false, &cfg(true, Some(2.0)), Cause::AutoOff);
        assert_eq!(t.timer, TimerAction::Cancel);
    }

    #[test]
    fn should_never_arm_a_zero_timer_for_an_unrepresentable_delay() {
        let mut record = cfg(false, Some(2.0));
        record.auto_off_delay = -30.0;
        let t = Transition::evaluate(false, true, &record, Cause::Command);
        assert_eq!(t.timer, TimerAction::Cancel);
    }

    #[test]
    fn should_cancel_when_auto_off_disabled() {
        let t = Transition::evaluate(false, true, &cfg(false, None), Cause::Command);
        assert_eq!(t.timer, TimerAction::Cancel);
    }
}
