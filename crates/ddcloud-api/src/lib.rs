// ddcloud-api: Async Rust client for the CloudControl network API
//
// Covers the firewall-rule endpoints of a network domain and the
// deployment-status polling that follows every asynchronous operation.

pub mod client;
pub mod deploy;
pub mod error;
pub mod firewall;
pub mod models;
pub mod transport;

pub use client::CloudControlClient;
pub use error::Error;
pub use models::{
    ApiResponse, FIREWALL_RULE_ACTION_ACCEPT, FIREWALL_RULE_ACTION_DROP, FirewallRule,
    FirewallRuleConfiguration, FirewallRuleIpAddress, FirewallRulePlacement, FirewallRulePort,
    FirewallRuleScope, MATCH_ANY_ADDRESS, Resource, ResourceType,
};
pub use transport::{TlsMode, TransportConfig};
