//! Firewall rule command handlers.
//!
//! Each mutating command loads the rule declaration and/or the state file,
//! runs the matching lifecycle operation, and writes the state back.

use std::path::Path;

use ddcloud_api::FirewallRuleConfiguration;
use ddcloud_core::convert::to_configuration;
use ddcloud_core::{CloudControlProvider, ResourceData, firewall_rule};

use crate::cli::{GlobalOpts, LifecycleCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Detail views ────────────────────────────────────────────────────

fn state_detail(data: &ResourceData) -> String {
    let f = data.fields();
    [
        format!("ID:             {}", data.id().unwrap_or("-")),
        format!("Name:           {}", f.name),
        format!("Network Domain: {}", f.network_domain),
        format!("Action:         {}", f.action),
        format!("Enabled:        {}", f.enabled),
        format!("Protocol:       {} / {}", f.ip_version, f.protocol),
    ]
    .join("\n")
}

fn state_id(data: &ResourceData) -> String {
    data.id().unwrap_or_default().to_owned()
}

fn scope_detail(scope: &ddcloud_api::FirewallRuleScope) -> String {
    let address = scope.address.as_ref().map_or_else(
        || "-".to_owned(),
        |ip| match ip.prefix_size {
            Some(prefix) => format!("{}/{prefix}", ip.address),
            None => ip.address.clone(),
        },
    );
    let port = scope
        .port
        .map_or_else(|| "any".to_owned(), |port| port.begin.to_string());
    format!("{address} port {port}")
}

fn configuration_detail(c: &FirewallRuleConfiguration) -> String {
    let placement = match &c.placement.relative_to_rule_name {
        Some(relative) => format!("{} {relative}", c.placement.position),
        None => c.placement.position.clone(),
    };
    [
        format!("Name:           {}", c.name),
        format!("Network Domain: {}", c.network_domain_id),
        format!("Action:         {}", c.action),
        format!("Enabled:        {}", c.enabled),
        format!("Protocol:       {} / {}", c.ip_version, c.protocol),
        format!("Source:         {}", scope_detail(&c.source)),
        format!("Destination:    {}", scope_detail(&c.destination)),
        format!("Placement:      {placement}"),
    ]
    .join("\n")
}

fn print_state(data: &ResourceData, global: &GlobalOpts) -> Result<(), CliError> {
    let rendered = output::render_single(&global.output, data, state_detail, state_id)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Offline ─────────────────────────────────────────────────────────

/// `rule validate`: build the request without contacting the API.
pub fn validate(file: &Path, global: &GlobalOpts) -> Result<(), CliError> {
    let fields = util::load_rule(file)?;
    let configuration = to_configuration(&fields)?;
    let rendered = output::render_single(
        &global.output,
        &configuration,
        configuration_detail,
        |c| c.name.clone(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Lifecycle ───────────────────────────────────────────────────────

pub async fn handle(
    cmd: LifecycleCommand,
    provider: &CloudControlProvider,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        LifecycleCommand::Create { file, state } => {
            // Never overwrite the ID of a rule that may still exist remotely.
            if let Ok(existing) = util::load_state(&state) {
                if let Some(id) = existing.id() {
                    return Err(CliError::StateInUse {
                        rule: existing.fields().name.clone(),
                        id: id.to_owned(),
                        path: state.display().to_string(),
                    });
                }
            }

            let mut data = ResourceData::new(util::load_rule(&file)?);
            let result = firewall_rule::create(&mut data, provider).await;
            // Keep the ID of a rule that was created but failed to deploy.
            if data.id().is_some() {
                util::save_state(&state, &data)?;
            }
            result?;
            print_state(&data, global)
        }

        LifecycleCommand::Read { state } => {
            let mut data = util::load_state(&state)?;
            firewall_rule::read(&mut data, provider).await?;
            util::save_state(&state, &data)?;
            print_state(&data, global)
        }

        LifecycleCommand::Update { file, state } => {
            let stored = util::load_state(&state)?;
            let id = stored.id().ok_or_else(|| CliError::MissingId {
                rule: stored.fields().name.clone(),
            })?;
            let mut data =
                ResourceData::existing(id, stored.fields().clone(), util::load_rule(&file)?);

            let replacements = data.replacement_fields();
            if !replacements.is_empty() {
                return Err(CliError::ReplacementRequired {
                    rule: data.fields().name.clone(),
                    fields: replacements
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }

            firewall_rule::update(&mut data, provider).await?;
            util::save_state(&state, &data)?;
            print_state(&data, global)
        }

        LifecycleCommand::Delete { state } => {
            let mut data = util::load_state(&state)?;
            firewall_rule::delete(&mut data, provider).await?;
            util::save_state(&state, &data)?;
            print_state(&data, global)
        }
    }
}
