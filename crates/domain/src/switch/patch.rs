//! Remote configuration updates.
//!
//! A payload is parsed and fully validated into a [`ConfigPatch`] before
//! anything is committed, so a rejected update never leaves a half-applied
//! record behind.

use serde_json::{Map, Value};

use crate::error::ValidationError;

use super::config::{SwitchConfig, validate_delay, validate_name};
use super::mode::{InMode, InitialState, SvcType};

/// A validated set of field changes. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub name: Option<String>,
    pub svc_type: Option<SvcType>,
    pub in_mode: Option<InMode>,
    pub initial_state: Option<InitialState>,
    pub auto_off: Option<bool>,
    pub auto_off_delay: Option<f64>,
}

/// Outcome of committing a [`ConfigPatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct ConfigUpdate {
    /// The change cannot be applied to the running process.
    pub restart_required: bool,
}

impl ConfigPatch {
    /// Parse a JSON text payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Malformed`] when the text is not a JSON
    /// object, or the error of the first invalid field.
    pub fn from_json_str(payload: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(payload).map_err(|_| ValidationError::Malformed)?;
        Self::from_value(&value)
    }

    /// Parse an already-decoded JSON payload. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the error of the first invalid field, checked in the order
    /// `name`, `svc_type`, `in_mode`, `initial_state`, `auto_off`,
    /// `auto_off_delay`.
    pub fn from_value(payload: &Value) -> Result<Self, ValidationError> {
        let obj = payload.as_object().ok_or(ValidationError::Malformed)?;

        let name = match obj.get("name") {
            None => None,
            Some(Value::String(name)) => {
                validate_name(name)?;
                Some(name.clone())
            }
            Some(_) => return Err(ValidationError::WrongType { field: "name" }),
        };
        let svc_type = int_field(obj, "svc_type")?
            .map(SvcType::try_from)
            .transpose()?;
        let in_mode = int_field(obj, "in_mode")?.map(InMode::try_from).transpose()?;
        let initial_state = int_field(obj, "initial_state")?
            .map(InitialState::try_from)
            .transpose()?;
        let auto_off = match obj.get("auto_off") {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::Number(n)) => Some(n.as_i64().ok_or(ValidationError::AutoOff)? != 0),
            Some(_) => return Err(ValidationError::AutoOff),
        };
        let auto_off_delay = match obj.get("auto_off_delay") {
            None => None,
            Some(Value::Number(n)) => {
                let delay = n.as_f64().ok_or(ValidationError::AutoOffDelay)?;
                validate_delay(delay)?;
                Some(delay)
            }
            Some(_) => {
                return Err(ValidationError::WrongType {
                    field: "auto_off_delay",
                });
            }
        };

        Ok(Self {
            name,
            svc_type,
            in_mode,
            initial_state,
            auto_off,
            auto_off_delay,
        })
    }
}

fn int_field(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    match obj.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or(ValidationError::WrongType { field }),
    }
}

impl SwitchConfig {
    /// Commit a validated patch field by field.
    ///
    /// A restart is required when the name or the service type changes, or
    /// when the input mode moves to or from [`InMode::Detached`].
    pub fn apply(&mut self, patch: ConfigPatch) -> ConfigUpdate {
        let mut update = ConfigUpdate::default();
        if let Some(name) = patch.name
            && name != self.name
        {
            self.name = name;
            update.restart_required = true;
        }
        if let Some(svc_type) = patch.svc_type
            && svc_type != self.svc_type
        {
            self.svc_type = svc_type;
            update.restart_required = true;
        }
        if let Some(in_mode) = patch.in_mode
            && in_mode != self.in_mode
        {
            if in_mode.is_detached() || self.in_mode.is_detached() {
                update.restart_required = true;
            }
            self.in_mode = in_mode;
        }
        if let Some(initial_state) = patch.initial_state {
            self.initial_state = initial_state;
        }
        if let Some(auto_off) = patch.auto_off {
            self.auto_off = auto_off;
        }
        if let Some(delay) = patch.auto_off_delay {
            self.auto_off_delay = delay;
        }
        update
    }
}
