// ── Scope resolution ──
//
// Turns the address / network / port fields of one side of a rule into
// exactly one `ScopeMatch`. Priority: address, then network, then
// port-only, then match-any.

use std::num::ParseIntError;

use tracing::debug;

use crate::data::FirewallRuleFields;
use crate::error::CoreError;
use crate::model::{ScopeMatch, ScopeSide};
use crate::schema::FieldKey;

/// Port value meaning "no port constraint".
pub const MATCH_ANY_PORT: &str = "any";

impl ScopeSide {
    pub fn address_key(self) -> FieldKey {
        match self {
            Self::Source => FieldKey::SourceAddress,
            Self::Destination => FieldKey::DestinationAddress,
        }
    }

    pub fn network_key(self) -> FieldKey {
        match self {
            Self::Source => FieldKey::SourceNetwork,
            Self::Destination => FieldKey::DestinationNetwork,
        }
    }

    pub fn port_key(self) -> FieldKey {
        match self {
            Self::Source => FieldKey::SourcePort,
            Self::Destination => FieldKey::DestinationPort,
        }
    }
}

/// Parse a declared port. Absent, empty and `any` mean no constraint.
pub fn parse_port(port: Option<&str>) -> Result<Option<u16>, ParseIntError> {
    match port {
        None | Some("" | MATCH_ANY_PORT) => Ok(None),
        Some(port) => port.parse().map(Some),
    }
}

/// Split `BaseAddress/PrefixSize`. Exactly one `/` and a numeric prefix.
pub fn parse_network_and_prefix(network: &str) -> Option<(&str, u8)> {
    let (base_address, prefix_size) = network.split_once('/')?;
    if prefix_size.contains('/') {
        return None;
    }
    let prefix_size = prefix_size.parse().ok()?;
    Some((base_address, prefix_size))
}

/// Resolve one side of a rule into its matching mode.
pub fn resolve_scope(side: ScopeSide, fields: &FirewallRuleFields) -> Result<ScopeMatch, CoreError> {
    let port_value = fields.optional_str(side.port_key());
    let port = parse_port(port_value).map_err(|source| CoreError::InvalidPort {
        field: side.port_key(),
        value: port_value.unwrap_or_default().to_owned(),
        rule: fields.name.clone(),
        source,
    })?;

    if let Some(address) = fields.optional_str(side.address_key()) {
        debug!(rule = %fields.name, %side, address, "rule will match address");
        return Ok(ScopeMatch::Address {
            address: address.to_owned(),
            port,
        });
    }

    if let Some(network) = fields.optional_str(side.network_key()) {
        debug!(rule = %fields.name, %side, network, "rule will match network");
        let (base_address, prefix_size) =
            parse_network_and_prefix(network).ok_or_else(|| CoreError::InvalidNetwork {
                field: side.network_key(),
                value: network.to_owned(),
                rule: fields.name.clone(),
            })?;
        return Ok(ScopeMatch::Network {
            base_address: base_address.to_owned(),
            prefix_size,
            port,
        });
    }

    if let Some(port) = port {
        debug!(rule = %fields.name, %side, port, "rule will match any address on port");
        return Ok(ScopeMatch::AnyAddressWithPort(port));
    }

    debug!(rule = %fields.name, %side, "rule will match any address and port");
    Ok(ScopeMatch::Any)
}
