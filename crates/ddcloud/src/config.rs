//! Translation from profiles + global flags into a `ProviderConfig`.
//!
//! This is the single boundary where CLI config crosses into core types.

use secrecy::SecretString;

use ddcloud_config::{
    ConfigError, Profile, config_path, profile_to_provider_config, select_profile,
};
use ddcloud_core::ProviderConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `ProviderConfig` from the config file, profile, and flags.
pub fn build_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let cfg = ddcloud_config::load_config()?;

    let (profile_name, profile) = match select_profile(&cfg, global.profile.as_deref()) {
        Ok((name, profile)) => (name.to_owned(), overlay_flags(profile, global)),
        // An explicitly requested profile must exist.
        Err(ConfigError::UnknownProfile { profile }) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile,
                path: config_path().display().to_string(),
            });
        }
        // No profile: build from flags / env alone.
        Err(ConfigError::UnknownProfile { profile }) => {
            (profile, overlay_flags(&Profile::default(), global))
        }
        Err(e) => return Err(e.into()),
    };

    let password = global.password.clone().map(SecretString::from);
    Ok(profile_to_provider_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        password,
    )?)
}

/// Overlay global flags on a profile (flag > env > profile > defaults).
fn overlay_flags(profile: &Profile, global: &GlobalOpts) -> Profile {
    Profile {
        endpoint: global.endpoint.clone().or_else(|| profile.endpoint.clone()),
        region: global.region.clone().or_else(|| profile.region.clone()),
        organization_id: global
            .organization
            .clone()
            .unwrap_or_else(|| profile.organization_id.clone()),
        username: global.username.clone().or_else(|| profile.username.clone()),
        password: profile.password.clone(),
        ca_cert: profile.ca_cert.clone(),
        insecure: if global.insecure {
            Some(true)
        } else {
            profile.insecure
        },
        timeout: global.timeout.or(profile.timeout),
        poll_interval: global.poll_interval.or(profile.poll_interval),
    }
}
