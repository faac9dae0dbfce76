// ── Declared fields → API request ──
//
// Builds a fresh `FirewallRuleConfiguration` from the current field
// snapshot. Nothing here is persisted; create calls this every time.

use ddcloud_api::{FirewallRuleConfiguration, FirewallRulePlacement, FirewallRuleScope};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::data::FirewallRuleFields;
use crate::error::CoreError;
use crate::model::{FirewallAction, Placement, PlacementPosition, ScopeMatch, ScopeSide};
use crate::schema::{FieldKey, field_schema};
use crate::scope::resolve_scope;

impl From<ScopeMatch> for FirewallRuleScope {
    fn from(scope: ScopeMatch) -> Self {
        match scope {
            ScopeMatch::Any => Self::any(),
            ScopeMatch::AnyAddressWithPort(port) => Self::any_address(Some(port)),
            ScopeMatch::Address { address, port } => Self::address(address, port),
            ScopeMatch::Network {
                base_address,
                prefix_size,
                port,
            } => Self::network(base_address, prefix_size, port),
        }
    }
}

impl From<Placement> for FirewallRulePlacement {
    fn from(placement: Placement) -> Self {
        Self {
            position: placement.position.to_string(),
            relative_to_rule_name: placement.relative_to,
        }
    }
}

/// Reject snapshots where two fields declared as conflicting are both set.
pub fn validate_conflicts(fields: &FirewallRuleFields) -> Result<(), CoreError> {
    for key in FieldKey::iter() {
        if fields.optional_str(key).is_none() {
            continue;
        }
        if let Some(other) = field_schema(key)
            .conflicts_with
            .iter()
            .find(|other| fields.optional_str(**other).is_some())
        {
            return Err(CoreError::ConflictingFields {
                first: key,
                second: *other,
                rule: fields.name.clone(),
            });
        }
    }
    Ok(())
}

/// Parse `placement` / `placement_relative_to`.
///
/// `BEFORE` and `AFTER` need the name of another rule; for `FIRST` and
/// `LAST` a relative name is ignored.
pub fn resolve_placement(fields: &FirewallRuleFields) -> Result<Placement, CoreError> {
    let position: PlacementPosition =
        fields
            .placement
            .parse()
            .map_err(|_| CoreError::Validation {
                field: FieldKey::Placement,
                rule: fields.name.clone(),
                reason: format!(
                    "'{}' is not one of first, last, before, after",
                    fields.placement
                ),
            })?;

    let relative_to = fields.optional_str(FieldKey::PlacementRelativeTo);
    if position.is_relative() {
        let Some(relative_to) = relative_to else {
            return Err(CoreError::Validation {
                field: FieldKey::PlacementRelativeTo,
                rule: fields.name.clone(),
                reason: format!("required when placement is '{position}'"),
            });
        };
        return Ok(Placement {
            position,
            relative_to: Some(relative_to.to_owned()),
        });
    }

    if let Some(relative_to) = relative_to {
        warn!(
            rule = %fields.name,
            %position,
            relative_to,
            "placement_relative_to is ignored for this placement"
        );
    }
    Ok(Placement {
        position,
        relative_to: None,
    })
}

/// Build the create request for a rule.
pub fn to_configuration(
    fields: &FirewallRuleFields,
) -> Result<FirewallRuleConfiguration, CoreError> {
    validate_conflicts(fields)?;

    let action = FirewallAction::normalize(&fields.action);
    if let FirewallAction::Other(raw) = &action {
        debug!(rule = %fields.name, action = %raw, "action not in synonym table, sending as-is");
    }

    let source = resolve_scope(ScopeSide::Source, fields)?;
    let destination = resolve_scope(ScopeSide::Destination, fields)?;
    let placement = resolve_placement(fields)?;

    Ok(FirewallRuleConfiguration {
        network_domain_id: fields.network_domain.clone(),
        name: fields.name.clone(),
        action: action.as_api_str().to_owned(),
        ip_version: fields.ip_version.to_ascii_uppercase(),
        protocol: fields.protocol.to_ascii_uppercase(),
        source: source.into(),
        destination: destination.into(),
        enabled: fields.enabled,
        placement: placement.into(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fields() -> FirewallRuleFields {
        FirewallRuleFields::new("nd-1", "web", "allow", "ipv4", "tcp")
    }

    #[test]
    fn end_to_end_configuration() {
        let mut f = fields();
        f.source_address = Some("192.168.1.1".into());
        f.source_port = Some("8080".into());
        f.destination_network = Some("10.0.0.0/24".into());
        f.destination_port = Some("any".into());

        let config = to_configuration(&f).unwrap();
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
    fn unset_scopes_match_any() {
        let config = to_configuration(&fields()).unwrap();
        assert_eq!(config.source, FirewallRuleScope::any());
        assert_eq!(config.destination, FirewallRuleScope::any());
    }

    #[test]
    fn unknown_action_is_sent_verbatim() {
        let mut f = fields();
        f.action = "Reject".into();
        assert_eq!(to_configuration(&f).unwrap().action, "Reject");
    }

    #[test]
    fn conflicting_fields_are_rejected_before_scope_resolution() {
        let mut f = fields();
        f.destination_address = Some("10.0.0.5".into());
        // Would also fail CIDR parsing; the conflict is reported first.
        f.destination_network = Some("bogus".into());

        let err = to_configuration(&f).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ConflictingFields {
                first: FieldKey::DestinationAddress,
                second: FieldKey::DestinationNetwork,
                ..
            }
        ));
    }

    #[test]
    fn empty_strings_do_not_conflict() {
        let mut f = fields();
        f.source_address = Some("10.0.0.5".into());
        f.source_network = Some(String::new());
        assert!(validate_conflicts(&f).is_ok());
    }

    #[test]
    fn relative_placement_requires_rule_name() {
        let mut f = fields();
        f.placement = "before".into();

        let err = resolve_placement(&f).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation { field: FieldKey::PlacementRelativeTo, .. }
        ));

        f.placement_relative_to = Some("base".into());
        let placement = resolve_placement(&f).unwrap();
        assert_eq!(placement.position, PlacementPosition::Before);
        assert_eq!(placement.relative_to.as_deref(), Some("base"));
    }

    #[test]
    fn relative_name_dropped_for_absolute_placement() {
        let mut f = fields();
        f.placement = "LAST".into();
        f.placement_relative_to = Some("base".into());

        let config = to_configuration(&f).unwrap();
        assert_eq!(config.placement.position, "LAST");
        assert_eq!(config.placement.relative_to_rule_name, None);
    }

    #[test]
    fn unknown_placement_is_rejected() {
        let mut f = fields();
        f.placement = "middle".into();
        assert!(to_configuration(&f).unwrap_err().is_validation());
    }
}
