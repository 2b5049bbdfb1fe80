//! Closed enums for the integer-encoded switch settings.
//!
//! On the wire and in the persisted configuration these stay plain integers;
//! they are decoded here and anything out of range is rejected.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::input::InputEvent;

/// How the switch is exposed to the accessory layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SvcType {
    /// Not exposed at all.
    None,
    #[default]
    Switch,
    Outlet,
    Lock,
}

impl TryFrom<i64> for SvcType {
    type Error = ValidationError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            -1 => Ok(Self::None),
            0 => Ok(Self::Switch),
            1 => Ok(Self::Outlet),
            2 => Ok(Self::Lock),
            _ => Err(ValidationError::SvcType),
        }
    }
}

impl From<SvcType> for i64 {
    fn from(value: SvcType) -> Self {
        match value {
            SvcType::None => -1,
            SvcType::Switch => 0,
            SvcType::Outlet => 1,
            SvcType::Lock => 2,
        }
    }
}

/// How input level changes translate into output changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum InMode {
    /// A push button: every press (rising edge) toggles the output.
    #[default]
    Momentary,
    /// A rocker switch: the output follows the input level.
    Toggle,
    /// Every level change toggles the output.
    Edge,
    /// The input is not connected to the output.
    Detached,
}

impl InMode {
    /// Level the output should move to for an input event, or `None` if the
    /// event has no effect in this mode.
    ///
    /// `current` is the output's level before the event.
    #[must_use]
    pub fn target(self, event: InputEvent, level: bool, current: bool) -> Option<InputAction> {
        if event != InputEvent::Change {
            return None;
        }
        match self {
            Self::Momentary if level => Some(InputAction::button(!current)),
            Self::Momentary | Self::Detached => None,
            Self::Toggle => Some(InputAction {
                level,
                source: "switch",
            }),
            Self::Edge => Some(InputAction::button(!current)),
        }
    }

    #[must_use]
    pub fn is_detached(self) -> bool {
        self == Self::Detached
    }
}

/// An output write requested by an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputAction {
    pub level: bool,
    pub source: &'static str,
}

impl InputAction {
    fn button(level: bool) -> Self {
        Self {
            level,
            source: "button",
        }
    }
}

impl TryFrom<i64> for InMode {
    type Error = ValidationError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Momentary),
            1 => Ok(Self::Toggle),
            2 => Ok(Self::Edge),
            3 => Ok(Self::Detached),
            _ => Err(ValidationError::InMode),
        }
    }
}

impl From<InMode> for i64 {
    fn from(value: InMode) -> Self {
        match value {
            InMode::Momentary => 0,
            InMode::Toggle => 1,
            InMode::Edge => 2,
            InMode::Detached => 3,
        }
    }
}

/// Startup level policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum InitialState {
    #[default]
    Off,
    On,
    /// Restore the last persisted level.
    Last,
    /// Follow the input level (toggle mode only).
    Input,
}

impl InitialState {
    /// Resolve the startup level.
    ///
    /// `input_level` is the attached input's current level, if any. Returns
    /// `None` when the output should be left untouched.
    #[must_use]
    pub fn resolve(
        self,
        persisted: bool,
        in_mode: InMode,
        input_level: Option<bool>,
    ) -> Option<bool> {
        match self {
            Self::Off => Some(false),
            Self::On => Some(true),
            Self::Last => Some(persisted),
            Self::Input => match (in_mode, input_level) {
                (InMode::Toggle, Some(level)) => Some(level),
                _ => None,
            },
        }
    }
}

impl TryFrom<i64> for InitialState {
    type Error = ValidationError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            2 => Ok(Self::Last),
            3 => Ok(Self::Input),
            _ => Err(ValidationError::InitialState),
        }
    }
}

impl From<InitialState> for i64 {
    fn from(value: InitialState) -> Self {
        match value {
            InitialState::Off => 0,
            InitialState::On => 1,
            InitialState::Last => 2,
            InitialState::Input => 3,
        }
    }
}
