//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
#[derive(Error, Debug)]
pub enum ArgError {
    // ─────────────────────────────────────────────────────────────
    // Scan errors (ARG-010): recovered during the scan, never
    // surfaced from a binding operation
    // ─────────────────────────────────────────────────────────────
    #[error("ARG-010: Declaration source '{type_name}' unavailable: {reason}")]
    SourceUnavailable { type_name: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Name errors (ARG-020 to ARG-021)
    // ─────────────────────────────────────────────────────────────
    #[error("ARG-021: Name '{name}' is declared by more than one slot")]
    AmbiguousName { name: String, slots: Vec<String> },

    // ─────────────────────────────────────────────────────────────
    // Token errors (ARG-030 to ARG-031)
    // ─────────────────────────────────────────────────────────────
    #[error("ARG-030: Unrecognized token '{token}'")]
    UnrecognizedToken { token: String },

    #[error("ARG-031: Parameter '{name}' has no value")]
    MissingValue { name: String },

    // ─────────────────────────────────────────────────────────────
    // Conversion errors (ARG-040)
    // ─────────────────────────────────────────────────────────────
    #[error("ARG-040: Cannot convert '{value}' to {expected} for slot '{slot}'")]
    InvalidConversion {
        slot: String,
        value: String,
        expected: String,
    },
}

impl FixSuggestion for ArgError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ArgError::SourceUnavailable { .. } => {
                Some("Check the source's load function - failing sources are skipped by the scan")
            }
            ArgError::AmbiguousName { .. } => {
                Some("Rename one of the conflicting declarations - names must resolve to a single slot")
            }
            ArgError::UnrecognizedToken { .. } => {
                Some("Check the parameter name and that it starts with a recognized delimiter")
            }
            ArgError::MissingValue { .. } => {
                Some("Supply a value after the parameter name, or join them with '='")
            }
            ArgError::InvalidConversion { .. } => {
                Some("Check the value against the slot's declared kind (text, integer, float, boolean)")
            }
        }
    }
}
