//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MiniRelayError`] via `#[from]`.

use crate::id::SwitchId;

/// Maximum length of a switch name, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// A remote configuration payload was rejected.
///
/// Every variant names the offending field; values are never clamped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid config (expected a JSON object)")]
    Malformed,

    #[error("invalid name (too long, max 64)")]
    NameTooLong { len: usize },

    #[error("invalid svc_type")]
    SvcType,

    #[error("invalid in_mode")]
    InMode,

    #[error("invalid initial_state")]
    InitialState,

    #[error("invalid auto_off")]
    AutoOff,

    #[error("invalid auto_off_delay")]
    AutoOffDelay,

    /// A field carried a JSON value of the wrong type.
    #[error("invalid {field} (wrong type)")]
    WrongType { field: &'static str },
}

impl ValidationError {
    /// Name of the configuration field this error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Malformed => "config",
            Self::NameTooLong { .. } => "name",
            Self::SvcType => "svc_type",
            Self::InMode => "in_mode",
            Self::InitialState => "initial_state",
            Self::AutoOff => "auto_off",
            Self::AutoOffDelay => "auto_off_delay",
            Self::WrongType { field } => *field,
        }
    }
}

/// Peripheral wiring was attempted in an order the hardware does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    /// An input was created for a slot whose output does not exist yet.
    #[error("input for slot {slot} created before its output")]
    InputBeforeOutput { slot: SwitchId },

    /// The same slot was registered twice.
    #[error("{kind} already registered for slot {slot}")]
    DuplicateSlot { slot: SwitchId, kind: &'static str },

    /// A switch references a slot without an output.
    #[error("no output for slot {slot}")]
    MissingOutput { slot: SwitchId },
}

/// A power meter query could not be answered.
#[derive(Debug, thiserror::Error)]
pub enum MeterError {
    /// The meter has not produced a reading yet.
    #[error("power meter not ready")]
    NotReady,

    /// The underlying device failed.
    #[error("power meter read failed")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Top-level error type for minirelay.
#[derive(Debug, thiserror::Error)]
pub enum MiniRelayError {
    /// Malformed or out-of-range configuration field.
    #[error("invalid argument")]
    InvalidArgument(#[from] ValidationError),

    /// Peripheral wiring error.
    #[error("composition error")]
    Composition(#[from] CompositionError),

    /// Persistence backend failure.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_field_for_each_variant() {
        assert_eq!(ValidationError::NameTooLong { len: 65 }.field(), "name");
        assert_eq!(ValidationError::SvcType.field(), "svc_type");
        assert_eq!(ValidationError::InMode.field(), "in_mode");
        assert_eq!(ValidationError::InitialState.field(), "initial_state");
        assert_eq!(ValidationError::AutoOffDelay.field(), "auto_off_delay");
        assert_eq!(
            ValidationError::WrongType { field: "auto_off" }.field(),
            "auto_off"
        );
    }

    #[test]
    fn should_mention_field_in_message() {
        let err = ValidationError::NameTooLong { len: 65 };
        assert_eq!(err.to_string(), "invalid name (too long, max 64)");
        assert_eq!(ValidationError::InMode.to_string(), "invalid in_mode");
    }

    #[test]
    fn should_convert_validation_error_into_invalid_argument() {
        let err: MiniRelayError = ValidationError::SvcType.into();
        assert!(matches!(
            err,
            MiniRelayError::InvalidArgument(ValidationError::SvcType)
        ));
    }

    #[test]
    fn should_convert_composition_error() {
        let err: MiniRelayError = CompositionError::InputBeforeOutput {
            slot: SwitchId::new(1),
        }
        .into();
        assert!(matches!(err, MiniRelayError::Composition(_)));
    }

    #[test]
    fn should_display_composition_error_with_slot() {
        let err = CompositionError::InputBeforeOutput {
            slot: SwitchId::new(2),
        };
        assert_eq!(err.to_string(), "input for slot 2 created before its output");
    }
}
