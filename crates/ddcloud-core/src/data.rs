// ── Resource field snapshots ──
//
// `FirewallRuleFields` is one snapshot of the declared fields.
// `ResourceData` is what the host hands to each lifecycle call: the
// stored ID, the desired snapshot, and the previous snapshot (if any)
// so `has_change` can tell what moved.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::schema::{FieldKey, field_schema};

/// The declared fields of a firewall rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleFields {
    #[serde(rename = "networkdomain")]
    pub network_domain: String,
    pub name: String,
    pub action: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_placement")]
    pub placement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_relative_to: Option<String>,
    pub ip_version: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_placement() -> String {
    "first".into()
}

fn string(value: &str) -> FieldValue<'_> {
    FieldValue::String(Some(value))
}

/// A field's value, borrowed from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    String(Option<&'a str>),
    Bool(bool),
}

impl FirewallRuleFields {
    /// Minimal rule with every optional field at its default.
    pub fn new(
        network_domain: impl Into<String>,
        name: impl Into<String>,
        action: impl Into<String>,
        ip_version: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            network_domain: network_domain.into(),
            name: name.into(),
            action: action.into(),
            enabled: default_enabled(),
            placement: default_placement(),
            placement_relative_to: None,
            ip_version: ip_version.into(),
            protocol: protocol.into(),
            source_address: None,
            source_network: None,
            source_port: None,
            destination_address: None,
            destination_network: None,
            destination_port: None,
        }
    }

    /// Read a field by key.
    pub fn value(&self, key: FieldKey) -> FieldValue<'_> {
        match key {
            FieldKey::NetworkDomain => string(&self.network_domain),
            FieldKey::Name => string(&self.name),
            FieldKey::Action => string(&self.action),
            FieldKey::Enabled => FieldValue::Bool(self.enabled),
            FieldKey::Placement => string(&self.placement),
            FieldKey::PlacementRelativeTo => FieldValue::String(self.placement_relative_to.as_deref()),
            FieldKey::IpVersion => string(&self.ip_version),
            FieldKey::Protocol => string(&self.protocol),
            FieldKey::SourceAddress => FieldValue::String(self.source_address.as_deref()),
            FieldKey::SourceNetwork => FieldValue::String(self.source_network.as_deref()),
            FieldKey::SourcePort => FieldValue::String(self.source_port.as_deref()),
            FieldKey::DestinationAddress => FieldValue::String(self.destination_address.as_deref()),
            FieldKey::DestinationNetwork => FieldValue::String(self.destination_network.as_deref()),
            FieldKey::DestinationPort => FieldValue::String(self.destination_port.as_deref()),
        }
    }

    /// An optional string field, treating an empty string as unset.
    pub fn optional_str(&self, key: FieldKey) -> Option<&str> {
        match self.value(key) {
            FieldValue::String(value) => value.filter(|v| !v.is_empty()),
            FieldValue::Bool(_) => None,
        }
    }
}

/// Host-managed state for one firewall rule instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    fields: FirewallRuleFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prior: Option<FirewallRuleFields>,
}

impl ResourceData {
    /// A resource that does not exist yet.
    pub fn new(fields: FirewallRuleFields) -> Self {
        Self {
            id: None,
            fields,
            prior: None,
        }
    }

    /// An existing resource whose stored fields were `prior` and whose
    /// declaration is now `fields`.
    pub fn existing(id: impl Into<String>, prior: FirewallRuleFields, fields: FirewallRuleFields) -> Self {
        Self {
            id: Some(id.into()),
            fields,
            prior: Some(prior),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Forget the remote identity; the host will plan a fresh create.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn fields(&self) -> &FirewallRuleFields {
        &self.fields
    }

    pub fn prior(&self) -> Option<&FirewallRuleFields> {
        self.prior.as_ref()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.fields.enabled = enabled;
    }

    /// Whether a field differs from the previous snapshot. Everything
    /// counts as changed when there is no previous snapshot.
    pub fn has_change(&self, key: FieldKey) -> bool {
        self.prior
            .as_ref()
            .is_none_or(|prior| prior.value(key) != self.fields.value(key))
    }

    pub fn changed_fields(&self) -> Vec<FieldKey> {
        FieldKey::iter().filter(|key| self.has_change(*key)).collect()
    }

    /// Changed fields that cannot be applied in place.
    pub fn replacement_fields(&self) -> Vec<FieldKey> {
        FieldKey::iter()
            .filter(|key| field_schema(*key).force_new && self.has_change(*key))
            .collect()
    }

    /// Promote the current snapshot to the stored one once it has been applied.
    pub fn commit(&mut self) {
        self.prior = Some(self.fields.clone());
    }
}
