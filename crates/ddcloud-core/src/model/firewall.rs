// ── Firewall domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use ddcloud_api::{FIREWALL_RULE_ACTION_ACCEPT, FIREWALL_RULE_ACTION_DROP};

/// What a rule does with matching traffic.
///
/// Declared actions are normalized through a fixed synonym table;
/// anything outside it is kept verbatim and left for the API to judge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirewallAction {
    Accept,
    Drop,
    Other(String),
}

impl FirewallAction {
    /// Case-insensitive: `accept`, `accept_decisively`, `allow` accept;
    /// `drop`, `deny` drop.
    pub fn normalize(action: &str) -> Self {
        match action.to_ascii_lowercase().as_str() {
            "accept" | "accept_decisively" | "allow" => Self::Accept,
            "drop" | "deny" => Self::Drop,
            _ => Self::Other(action.to_owned()),
        }
    }

    /// The value sent in the `action` field of a request.
    pub fn as_api_str(&self) -> &str {
        match self {
            Self::Accept => FIREWALL_RULE_ACTION_ACCEPT,
            Self::Drop => FIREWALL_RULE_ACTION_DROP,
            Self::Other(action) => action,
        }
    }
}

impl fmt::Display for FirewallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Where in the domain's ACL a new rule is inserted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlacementPosition {
    First,
    Last,
    Before,
    After,
}

impl PlacementPosition {
    /// `BEFORE` and `AFTER` are relative to another named rule.
    pub fn is_relative(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }
}

/// A resolved placement. `relative_to` is present exactly when the
/// position is relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: PlacementPosition,
    pub relative_to: Option<String>,
}

/// Which end of the traffic a scope applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScopeSide {
    Source,
    Destination,
}

/// One of the four mutually exclusive ways the API matches a source or
/// destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeMatch {
    /// Any address, any port.
    Any,
    /// Any address on a single port.
    AnyAddressWithPort(u16),
    /// A single host address, optionally on a single port.
    Address { address: String, port: Option<u16> },
    /// A network (base address + prefix size), optionally on a single port.
    Network {
        base_address: String,
        prefix_size: u8,
        port: Option<u16>,
    },
}

impl ScopeMatch {
    pub fn port(&self) -> Option<u16> {
        match self {
            Self::Any => None,
            Self::AnyAddressWithPort(port) => Some(*port),
            Self::Address { port, .. } | Self::Network { port, .. } => *port,
        }
    }
}

impl fmt::Display for ScopeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any address, any port"),
            Self::AnyAddressWithPort(port) => write!(f, "any address, port {port}"),
            Self::Address { address, port } => match port {
                Some(port) => write!(f, "{address}, port {port}"),
                None => write!(f, "{address}, any port"),
            },
            Self::Network {
                base_address,
                prefix_size,
                port,
            } => match port {
                Some(port) => write!(f, "{base_address}/{prefix_size}, port {port}"),
                None => write!(f, "{base_address}/{prefix_size}, any port"),
            },
        }
    }
}
