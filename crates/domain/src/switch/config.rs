//! Persisted per-switch configuration record.

use serde::{Deserialize, Serialize};

use crate::error::{MAX_NAME_LEN, ValidationError};

use super::mode::{InMode, InitialState, SvcType};

/// Configuration of one switch, as persisted in the device config tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    pub name: String,
    pub svc_type: SvcType,
    pub in_mode: InMode,
    pub initial_state: InitialState,
    pub auto_off: bool,
    /// Seconds.
    pub auto_off_delay: f64,
    /// Last-known output level.
    pub state: bool,
    pub enable: bool,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            svc_type: SvcType::default(),
            in_mode: InMode::default(),
            initial_state: InitialState::default(),
            auto_off: false,
            auto_off_delay: 0.0,
            state: false,
            enable: true,
        }
    }
}

impl SwitchConfig {
    /// Create a builder for constructing a [`SwitchConfig`].
    #[must_use]
    pub fn builder() -> SwitchConfigBuilder {
        SwitchConfigBuilder::default()
    }

    /// Check the invariants a persisted record must hold.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NameTooLong`] or
    /// [`ValidationError::AutoOffDelay`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_delay(self.auto_off_delay)?;
        Ok(())
    }

    /// Auto-off delay as a [`Duration`](std::time::Duration), or `None` if
    /// the record holds a delay no timer can represent.
    #[must_use]
    pub fn auto_off_duration(&self) -> Option<std::time::Duration> {
        std::time::Duration::try_from_secs_f64(self.auto_off_delay).ok()
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { len });
    }
    Ok(())
}

/// A delay is valid when it is a representable, non-negative duration.
pub(crate) fn validate_delay(delay: f64) -> Result<(), ValidationError> {
    std::time::Duration::try_from_secs_f64(delay)
        .map(|_| ())
        .map_err(|_| ValidationError::AutoOffDelay)
}

/// Step-by-step builder for [`SwitchConfig`].
#[derive(Debug, Default)]
pub struct SwitchConfigBuilder {
    inner: SwitchConfig,
}

impl SwitchConfigBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    #[must_use]
    pub fn svc_type(mut self, svc_type: SvcType) -> Self {
        self.inner.svc_type = svc_type;
        self
    }

    #[must_use]
    pub fn in_mode(mut self, in_mode: InMode) -> Self {
        self.inner.in_mode = in_mode;
        self
    }

    #[must_use]
    pub fn initial_state(mut self, initial_state: InitialState) -> Self {
        self.inner.initial_state = initial_state;
        self
    }

    #[must_use]
    pub fn auto_off(mut self, delay_secs: f64) -> Self {
        self.inner.auto_off = true;
        self.inner.auto_off_delay = delay_secs;
        self
    }

    #[must_use]
    pub fn state(mut self, state: bool) -> Self {
        self.inner.state = state;
        self
    }

    #[must_use]
    pub fn enable(mut self, enable: bool) -> Self {
        self.inner.enable = enable;
        self
    }

    /// Consume the builder, validate, and return a [`SwitchConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is too long or the delay is
    /// negative.
    pub fn build(self) -> Result<SwitchConfig, ValidationError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
