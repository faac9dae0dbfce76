// Wire types for the CloudControl network API.
//
// Field names follow the API's camelCase JSON. Requests skip absent
// optionals so the API applies its own defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire value for a rule that accepts matching traffic.
pub const FIREWALL_RULE_ACTION_ACCEPT: &str = "ACCEPT_DECISIVELY";

/// Wire value for a rule that drops matching traffic.
pub const FIREWALL_RULE_ACTION_DROP: &str = "DROP";

/// Address value meaning "any address".
pub const MATCH_ANY_ADDRESS: &str = "ANY";

/// Resource state reported once a resource is fully deployed.
pub(crate) const STATE_NORMAL: &str = "NORMAL";

// ── Response envelope ───────────────────────────────────────────────

/// The `{ operation, responseCode, message, info, requestId }` envelope
/// returned by every mutating call and by failed reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub operation: Option<String>,
    pub response_code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub info: Vec<NameValuePair>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameValuePair {
    pub name: String,
    pub value: String,
}

impl ApiResponse {
    /// Look up a value from the `info` list by name.
    pub fn info_value(&self, name: &str) -> Option<&str> {
        self.info
            .iter()
            .find(|pair| pair.name == name)
            .map(|pair| pair.value.as_str())
    }

    /// `OK` and `IN_PROGRESS` are the only success codes.
    pub fn is_success(&self) -> bool {
        matches!(self.response_code.as_str(), "OK" | "IN_PROGRESS")
    }
}

// ── Firewall rules ──────────────────────────────────────────────────

/// Request body for `createFirewallRule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleConfiguration {
    pub network_domain_id: String,
    pub name: String,
    pub action: String,
    pub ip_version: String,
    pub protocol: String,
    pub source: FirewallRuleScope,
    pub destination: FirewallRuleScope,
    pub enabled: bool,
    pub placement: FirewallRulePlacement,
}

/// Where in the domain's ACL a new rule is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRulePlacement {
    pub position: String,
    #[serde(
        rename = "relativeToRule",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relative_to_rule_name: Option<String>,
}

/// Source or destination matching criteria.
///
/// An absent `port` matches any port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleScope {
    #[serde(rename = "ip", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<FirewallRuleIpAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<FirewallRulePort>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleIpAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_size: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRulePort {
    pub begin: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u16>,
}

impl FirewallRuleScope {
    /// Any address, any port.
    pub fn any() -> Self {
        Self {
            address: Some(FirewallRuleIpAddress {
                address: MATCH_ANY_ADDRESS.into(),
                prefix_size: None,
            }),
            port: None,
        }
    }

    /// Any address, optionally restricted to a single port.
    pub fn any_address(port: Option<u16>) -> Self {
        Self {
            port: port.map(FirewallRulePort::single),
            ..Self::any()
        }
    }

    /// A single host address, optionally restricted to a single port.
    pub fn address(address: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            address: Some(FirewallRuleIpAddress {
                address: address.into(),
                prefix_size: None,
            }),
            port: port.map(FirewallRulePort::single),
        }
    }

    /// A network (base address + prefix size), optionally restricted to a single port.
    pub fn network(base_address: impl Into<String>, prefix_size: u8, port: Option<u16>) -> Self {
        Self {
            address: Some(FirewallRuleIpAddress {
                address: base_address.into(),
                prefix_size: Some(prefix_size),
            }),
            port: port.map(FirewallRulePort::single),
        }
    }
}

impl FirewallRulePort {
    pub fn single(port: u16) -> Self {
        Self {
            begin: port,
            end: None,
        }
    }
}

/// A firewall rule as reported by `GET firewallRule/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    pub id: String,
    pub name: String,
    pub action: String,
    #[serde(default)]
    pub ip_version: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub source: FirewallRuleScope,
    #[serde(default)]
    pub destination: FirewallRuleScope,
    pub enabled: bool,
    pub state: String,
    pub network_domain_id: String,
    #[serde(default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub datacenter_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditFirewallRule<'a> {
    pub id: &'a str,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteFirewallRule<'a> {
    pub id: &'a str,
}

// ── Deployable resources ────────────────────────────────────────────

/// Kinds of resource whose deployment can be awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    FirewallRule,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirewallRule => f.write_str("firewall rule"),
        }
    }
}

/// A resource observed while polling for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    FirewallRule(FirewallRule),
}

impl Resource {
    pub fn id(&self) -> &str {
        match self {
            Self::FirewallRule(rule) => &rule.id,
        }
    }

    pub fn state(&self) -> &str {
        match self {
            Self::FirewallRule(rule) => &rule.state,
        }
    }

    /// Deployed and not mid-change.
    pub fn is_deployed(&self) -> bool {
        self.state() == STATE_NORMAL
    }

    /// Any `FAILED_*` state is terminal.
    pub fn is_failed(&self) -> bool {
        self.state().starts_with("FAILED")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn configuration_serializes_to_api_shape() {
        let config = FirewallRuleConfiguration {
            network_domain_id: "nd-1".into(),
            name: "web".into(),
            action: FIREWALL_RULE_ACTION_ACCEPT.into(),
            ip_version: "IPV4".into(),
            protocol: "TCP".into(),
            source: FirewallRuleScope::address("192.168.1.1", Some(8080)),
            destination: FirewallRuleScope::network("10.0.0.0", 24, None),
            enabled: true,
            placement: FirewallRulePlacement {
                position: "FIRST".into(),
                relative_to_rule_name: None,
            },
        };

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "networkDomainId": "nd-1",
                "name": "web",
                "action": "ACCEPT_DECISIVELY",
                "ipVersion": "IPV4",
                "protocol": "TCP",
                "source": { "ip": { "address": "192.168.1.1" }, "port": { "begin": 8080 } },
                "destination": { "ip": { "address": "10.0.0.0", "prefixSize": 24 } },
                "enabled": true,
                "placement": { "position": "FIRST" }
            })
        );
    }

    #[test]
    fn relative_placement_uses_relative_to_rule_key() {
        let placement = FirewallRulePlacement {
            position: "AFTER".into(),
            relative_to_rule_name: Some("base".into()),
        };
        assert_eq!(
            serde_json::to_value(&placement).unwrap(),
            json!({ "position": "AFTER", "relativeToRule": "base" })
        );
    }

    #[test]
    fn any_address_with_port_keeps_any_marker() {
        let scope = FirewallRuleScope::any_address(Some(443));
        assert_eq!(
            serde_json::to_value(&scope).unwrap(),
            json!({ "ip": { "address": "ANY" }, "port": { "begin": 443 } })
        );
    }

    #[test]
    fn envelope_info_lookup() {
        let response: ApiResponse = serde_json::from_value(json!({
            "operation": "CREATE_FIREWALL_RULE",
            "responseCode": "IN_PROGRESS",
            "message": "Request to create Firewall Rule 'web' has been accepted.",
            "info": [{ "name": "firewallRuleId", "value": "rule-1" }],
            "requestId": "req-1"
        }))
        .unwrap();

        assert!(response.is_success());
        assert_eq!(response.info_value("firewallRuleId"), Some("rule-1"));
        assert_eq!(response.info_value("missing"), None);
    }

    #[test]
    fn failed_states_are_terminal() {
        let rule: FirewallRule = serde_json::from_value(json!({
            "id": "rule-1",
            "name": "web",
            "action": "DROP",
            "enabled": true,
            "state": "FAILED_ADD",
            "networkDomainId": "nd-1"
        }))
        .unwrap();
        let resource = Resource::FirewallRule(rule);

        assert!(resource.is_failed());
        assert!(!resource.is_deployed());
        assert_eq!(resource.id(), "rule-1");
    }
}
