// ── Firewall rule lifecycle ──
//
// The four entry points the host calls. Each takes the host-managed
// `ResourceData` and the shared `ProviderState`. Mutating calls hold the
// network domain lock from the remote call until the function returns,
// deployment polling included.

use std::time::Duration;

use tracing::{info, warn};

use crate::convert::to_configuration;
use crate::data::ResourceData;
use crate::error::CoreError;
use crate::provider::{FirewallRuleApi, ProviderState};
use crate::schema::FieldKey;

/// How long create waits for the new rule to deploy.
pub const CREATE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// How long delete waits for the rule to disappear.
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

fn require_id(data: &ResourceData) -> Result<String, CoreError> {
    data.id()
        .map(String::from)
        .ok_or_else(|| CoreError::MissingId {
            rule: data.fields().name.clone(),
        })
}

/// Create the rule and wait for it to deploy. Returns the new rule ID,
/// which is also stored on `data` before waiting.
pub async fn create<C: FirewallRuleApi>(
    data: &mut ResourceData,
    provider: &ProviderState<C>,
) -> Result<String, CoreError> {
    let configuration = to_configuration(data.fields())?;

    info!(
        name = %configuration.name,
        network_domain = %configuration.network_domain_id,
        action = %configuration.action,
        "creating firewall rule"
    );

    let _lock = provider
        .domain_lock(
            &configuration.network_domain_id,
            format!("create(name = '{}')", configuration.name),
        )
        .await;

    let id = provider
        .client()
        .create_firewall_rule(&configuration)
        .await?;
    data.set_id(&id);

    info!(id, name = %configuration.name, "firewall rule created, waiting for deployment");
    provider.client().wait_for_deploy(&id, CREATE_TIMEOUT).await?;

    data.commit();
    Ok(id)
}

/// Refresh `enabled` from the remote rule. A rule that no longer exists
/// clears the stored ID so the host plans a fresh create.
pub async fn read<C: FirewallRuleApi>(
    data: &mut ResourceData,
    provider: &ProviderState<C>,
) -> Result<(), CoreError> {
    let id = require_id(data)?;

    match provider.client().get_firewall_rule(&id).await? {
        Some(rule) => {
            info!(id, enabled = rule.enabled, "read firewall rule");
            data.set_enabled(rule.enabled);
        }
        None => {
            warn!(
                id,
                name = %data.fields().name,
                "firewall rule not found, removing from state"
            );
            data.clear_id();
        }
    }
    Ok(())
}

/// Apply an in-place change. Only `enabled` can change without
/// replacing the rule.
pub async fn update<C: FirewallRuleApi>(
    data: &mut ResourceData,
    provider: &ProviderState<C>,
) -> Result<(), CoreError> {
    let id = require_id(data)?;

    let replacements = data.replacement_fields();
    if !replacements.is_empty() {
        warn!(
            id,
            fields = ?replacements,
            "changes to these fields require replacement and are not applied in place"
        );
    }

    if !data.has_change(FieldKey::Enabled) {
        info!(id, "no in-place changes for firewall rule");
        return Ok(());
    }

    let enabled = data.fields().enabled;
    info!(id, enabled, "updating firewall rule");

    let _lock = provider
        .domain_lock(
            &data.fields().network_domain,
            format!("update(id = '{id}', name = '{}')", data.fields().name),
        )
        .await;
    provider.client().edit_firewall_rule(&id, enabled).await?;

    data.commit();
    Ok(())
}

/// Delete the rule and wait until it is gone.
pub async fn delete<C: FirewallRuleApi>(
    data: &mut ResourceData,
    provider: &ProviderState<C>,
) -> Result<(), CoreError> {
    let id = require_id(data)?;
    let network_domain = data.fields().network_domain.clone();

    info!(id, network_domain, "deleting firewall rule");

    let _lock = provider
        .domain_lock(
            &network_domain,
            format!("delete(id = '{id}', name = '{}')", data.fields().name),
        )
        .await;
    provider.client().delete_firewall_rule(&id).await?;
    provider.client().wait_for_delete(&id, DELETE_TIMEOUT).await?;

    info!(id, "firewall rule deleted");
    data.clear_id();
    Ok(())
}
