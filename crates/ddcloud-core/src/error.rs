// ── Core error types ──
//
// Local validation failures name the offending field, value and rule.
// Errors from the remote client are passed through untouched.

use std::num::ParseIntError;

use thiserror::Error;

use crate::schema::FieldKey;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation errors ────────────────────────────────────────────
    #[error("Invalid {field} '{value}' for firewall rule '{rule}' (must be 'any' or a port number)")]
    InvalidPort {
        field: FieldKey,
        value: String,
        rule: String,
        #[source]
        source: ParseIntError,
    },

    #[error(
        "Invalid {field} '{value}' for firewall rule '{rule}' (invalid network, must be BaseAddress/PrefixSize)"
    )]
    InvalidNetwork {
        field: FieldKey,
        value: String,
        rule: String,
    },

    #[error("{first} and {second} cannot both be set on firewall rule '{rule}'")]
    ConflictingFields {
        first: FieldKey,
        second: FieldKey,
        rule: String,
    },

    #[error("Invalid {field} for firewall rule '{rule}': {reason}")]
    Validation {
        field: FieldKey,
        rule: String,
        reason: String,
    },

    // ── State errors ─────────────────────────────────────────────────
    #[error("Firewall rule '{rule}' has no ID in state")]
    MissingId { rule: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── API errors (passed through) ──────────────────────────────────
    #[error(transparent)]
    Api(#[from] ddcloud_api::Error),
}

impl CoreError {
    /// Returns `true` for errors raised before any remote call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPort { .. }
                | Self::InvalidNetwork { .. }
                | Self::ConflictingFields { .. }
                | Self::Validation { .. }
        )
    }
}
