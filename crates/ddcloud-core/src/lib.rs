// ddcloud-core: Firewall rule resource adapter between the host and ddcloud-api.

pub mod config;
pub mod convert;
pub mod data;
pub mod error;
pub mod firewall_rule;
pub mod lock;
pub mod model;
pub mod provider;
pub mod schema;
pub mod scope;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ProviderConfig, TlsVerification};
pub use data::{FieldValue, FirewallRuleFields, ResourceData};
pub use error::CoreError;
pub use firewall_rule::{CREATE_TIMEOUT, DELETE_TIMEOUT};
pub use lock::{DomainLockGuard, DomainLocks};
pub use provider::{CloudControlProvider, FirewallRuleApi, ProviderState};
pub use schema::{FIREWALL_RULE_SCHEMA, FieldKey, FieldSchema, FieldType, field_schema};

pub use model::{FirewallAction, Placement, PlacementPosition, ScopeMatch, ScopeSide};
