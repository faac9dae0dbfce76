//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, API and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ddcloud_api::Error as ApiError;
use ddcloud_config::ConfigError;
use ddcloud_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to CloudControl")]
    #[diagnostic(
        code(ddcloud::connection_failed),
        help("Check the endpoint or region of the active profile, or pass --endpoint.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS error: {message}")]
    #[diagnostic(
        code(ddcloud::tls_error),
        help("Configure ca_cert in your profile, or use --insecure (-k) against lab endpoints.")
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ddcloud::auth_failed),
        help("Verify the username, and the password in DDCLOUD_PASSWORD, the keyring or the profile.")
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(ddcloud::no_credentials),
        help("Pass --username and set DDCLOUD_PASSWORD, or add them to the profile.")
    )]
    NoCredentials { profile: String },

    // ── Rule declaration ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(ddcloud::invalid_rule), help("Fix the rule file and try again."))]
    InvalidRule { message: String },

    #[error("Changing {fields} requires replacing firewall rule '{rule}'")]
    #[diagnostic(
        code(ddcloud::replacement_required),
        help("Only `enabled` can change in place. Delete the rule and create it again.")
    )]
    ReplacementRequired { rule: String, fields: String },

    #[error("State file {path} already tracks firewall rule '{rule}' ({id})")]
    #[diagnostic(
        code(ddcloud::state_in_use),
        help("Delete the rule first, or pass a different --state file.")
    )]
    StateInUse { rule: String, id: String, path: String },

    #[error("Firewall rule '{rule}' has no ID in its state file")]
    #[diagnostic(
        code(ddcloud::missing_id),
        help("The rule was deleted remotely or never created. Run: ddcloud rule create")
    )]
    MissingId { rule: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{resource} not found")]
    #[diagnostic(code(ddcloud::not_found))]
    NotFound { resource: String },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(ddcloud::api_error), help("Request ID: {request_id}"))]
    ApiError {
        code: String,
        message: String,
        request_id: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(ddcloud::timeout),
        help("The operation may still complete remotely. Run: ddcloud rule read")
    )]
    Timeout { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ddcloud::profile_not_found),
        help("Add it to {path}, or pass --endpoint/--region and --organization.")
    )]
    ProfileNotFound { name: String, path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ddcloud::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(ddcloud::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("Could not access {path}")]
    #[diagnostic(code(ddcloud::io))]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid rule file: {0}")]
    #[diagnostic(code(ddcloud::toml), help("Check the TOML file contents and try again."))]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(ddcloud::json), help("Check the state file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(ddcloud::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::MissingId { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::InvalidRule { .. }
            | Self::ReplacementRequired { .. }
            | Self::StateInUse { .. }
            | Self::Validation { .. }
            | Self::Toml(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error mapping ────────────────────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Authentication { message } => Self::AuthFailed { message },
            ApiError::Transport(e) => Self::ConnectionFailed { source: e.into() },
            ApiError::Tls(message) => Self::TlsError { message },
            ApiError::Timeout { .. } => Self::Timeout { message },
            ApiError::ResourceNotFound { resource_type, id } => Self::NotFound {
                resource: format!("{resource_type} '{id}'"),
            },
            ApiError::Api {
                response_code,
                message,
                request_id,
                ..
            } => Self::ApiError {
                code: response_code,
                message,
                request_id: request_id.unwrap_or_else(|| "-".into()),
            },
            ApiError::DeployFailed { .. }
            | ApiError::UnexpectedResponse { .. }
            | ApiError::Deserialization { .. }
            | ApiError::InvalidUrl(_) => Self::ApiError {
                code: "unexpected".into(),
                message,
                request_id: "-".into(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_validation() {
            return Self::InvalidRule {
                message: err.to_string(),
            };
        }
        match err {
            CoreError::MissingId { rule } => Self::MissingId { rule },
            CoreError::Api(e) => e.into(),
            other => Self::Validation {
                field: "configuration".into(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ddcloud_api::ResourceType;
    use ddcloud_core::FieldKey;

    use super::*;

    #[test]
    fn validation_errors_are_usage_errors() {
        let err: CliError = CoreError::InvalidNetwork {
            field: FieldKey::SourceNetwork,
            value: "10.0.0.0".into(),
            rule: "web".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("source_network"));
    }

    #[test]
    fn api_errors_pass_through_core() {
        let err: CliError = CoreError::Api(ApiError::Timeout {
            resource_type: ResourceType::FirewallRule,
            id: "rule-1".into(),
            action: "deploy",
            timeout_secs: 1800,
        })
        .into();
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
        assert!(err.to_string().contains("rule-1"));
    }

    #[test]
    fn auth_errors() {
        let err: CliError = ApiError::Authentication {
            message: "rejected".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
