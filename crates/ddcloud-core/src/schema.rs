// ── Declarative field schema ──
//
// The host reads this table to know which fields a firewall rule has,
// which are required, which force a replacement when changed, and
// which pairs may not be set together.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Every field a firewall rule resource declares.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    #[strum(serialize = "networkdomain")]
    #[serde(rename = "networkdomain")]
    NetworkDomain,
    Name,
    Action,
    Enabled,
    Placement,
    #[strum(serialize = "placement_relative_to")]
    #[serde(rename = "placement_relative_to")]
    PlacementRelativeTo,
    IpVersion,
    Protocol,
    SourceAddress,
    SourceNetwork,
    SourcePort,
    DestinationAddress,
    DestinationNetwork,
    DestinationPort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    String(&'static str),
}

/// Declaration of a single field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSchema {
    pub key: FieldKey,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(skip_serializing_if = "no_conflicts")]
    pub conflicts_with: &'static [FieldKey],
    pub description: &'static str,
}

impl FieldSchema {
    const fn string(key: FieldKey, description: &'static str) -> Self {
        Self {
            key,
            field_type: FieldType::String,
            required: false,
            force_new: true,
            default: None,
            conflicts_with: &[],
            description,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    const fn conflicts_with(mut self, keys: &'static [FieldKey]) -> Self {
        self.conflicts_with = keys;
        self
    }

    pub fn optional(&self) -> bool {
        !self.required
    }
}

fn no_conflicts(keys: &&'static [FieldKey]) -> bool {
    keys.is_empty()
}

/// Firewall rule schema, in declaration order.
pub static FIREWALL_RULE_SCHEMA: [FieldSchema; 14] = [
    FieldSchema::string(
        FieldKey::NetworkDomain,
        "The Id of the network domain to which the firewall rule applies",
    )
    .required(),
    FieldSchema::string(FieldKey::Name, "A name for the firewall rule").required(),
    FieldSchema::string(FieldKey::Action, "The action performed by the firewall rule").required(),
    FieldSchema {
        key: FieldKey::Enabled,
        field_type: FieldType::Bool,
        required: false,
        force_new: false,
        default: Some(DefaultValue::Bool(true)),
        conflicts_with: &[],
        description: "Is the firewall rule enabled",
    },
    FieldSchema::string(
        FieldKey::Placement,
        "Where in the firewall ACL this particular rule will be created",
    )
    .default_value(DefaultValue::String("first")),
    FieldSchema::string(
        FieldKey::PlacementRelativeTo,
        "When placement is 'before' or 'after', specifies the name of the firewall rule to which the placement instruction refers",
    ),
    FieldSchema::string(
        FieldKey::IpVersion,
        "The IP version to which the firewall rule applies",
    )
    .required(),
    FieldSchema::string(FieldKey::Protocol, "The protocol to which the rule applies").required(),
    FieldSchema::string(
        FieldKey::SourceAddress,
        "The source IP address to be matched by the rule",
    )
    .conflicts_with(&[FieldKey::SourceNetwork]),
    FieldSchema::string(
        FieldKey::SourceNetwork,
        "The source IP network to be matched by the rule",
    )
    .conflicts_with(&[FieldKey::SourceAddress]),
    FieldSchema::string(
        FieldKey::SourcePort,
        "The source port to be matched by the rule",
    ),
    FieldSchema::string(
        FieldKey::DestinationAddress,
        "The destination IP address to be matched by the rule",
    )
    .conflicts_with(&[FieldKey::DestinationNetwork]),
    FieldSchema::string(
        FieldKey::DestinationNetwork,
        "The destination IP network to be matched by the rule",
    )
    .conflicts_with(&[FieldKey::DestinationAddress]),
    FieldSchema::string(
        FieldKey::DestinationPort,
        "The destination port to be matched by the rule",
    ),
];

/// Look up the declaration of a field.
pub fn field_schema(key: FieldKey) -> &'static FieldSchema {
    // The table holds exactly one entry per key, in enum order.
    &FIREWALL_RULE_SCHEMA[key as usize]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn schema_is_indexed_by_key() {
        for key in FieldKey::iter() {
            assert_eq!(field_schema(key).key, key);
        }
        assert_eq!(FieldKey::iter().count(), FIREWALL_RULE_SCHEMA.len());
    }

    #[test]
    fn field_names_match_declared_keys() {
        assert_eq!(FieldKey::NetworkDomain.to_string(), "networkdomain");
        assert_eq!(FieldKey::PlacementRelativeTo.as_ref(), "placement_relative_to");
        assert_eq!(FieldKey::IpVersion.to_string(), "ip_version");
        assert_eq!(
            "destination_network".parse::<FieldKey>().unwrap(),
            FieldKey::DestinationNetwork
        );
    }

    #[test]
    fn only_enabled_updates_in_place() {
        let in_place: Vec<FieldKey> = FIREWALL_RULE_SCHEMA
            .iter()
            .filter(|f| !f.force_new)
            .map(|f| f.key)
            .collect();
        assert_eq!(in_place, vec![FieldKey::Enabled]);
    }

    #[test]
    fn conflicts_are_symmetric() {
        for field in &FIREWALL_RULE_SCHEMA {
            for other in field.conflicts_with {
                assert!(
                    field_schema(*other).conflicts_with.contains(&field.key),
                    "{} conflicts with {other} but not the reverse",
                    field.key
                );
            }
        }
    }

    #[test]
    fn required_fields() {
        let required: Vec<&str> = FIREWALL_RULE_SCHEMA
            .iter()
            .filter(|f| f.required)
            .map(|f| f.key.into())
            .collect();
        assert_eq!(
            required,
            vec!["networkdomain", "name", "action", "ip_version", "protocol"]
        );
    }

    #[test]
    fn schema_serializes_defaults_and_conflicts() {
        let json = serde_json::to_value(field_schema(FieldKey::SourceAddress)).unwrap();
        assert_eq!(json["conflicts_with"], serde_json::json!(["source_network"]));
        assert_eq!(json["type"], "string");

        let json = serde_json::to_value(field_schema(FieldKey::Enabled)).unwrap();
        assert_eq!(json["default"], serde_json::json!(true));
        assert!(json.get("conflicts_with").is_none());
    }
}
