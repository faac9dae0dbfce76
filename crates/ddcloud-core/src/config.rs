// ── Runtime connection configuration ──
//
// Describes *how* to reach the CloudControl API. Carries credentials and
// transport tuning but never touches disk; `ddcloud-config` resolves
// profiles and hands a `ProviderConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use ddcloud_api::{CloudControlClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Everything needed to talk to one CloudControl organization.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Regional API endpoint (e.g., `https://api-au.dimensiondata.com`).
    pub endpoint: Url,
    /// Organization that owns the network domains.
    pub organization_id: String,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How often deployment polling re-reads a resource.
    pub poll_interval: Duration,
}

impl ProviderConfig {
    pub fn new(
        endpoint: Url,
        organization_id: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            endpoint,
            organization_id: organization_id.into(),
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(5),
        }
    }

    /// Build the API client this configuration describes.
    pub fn build_client(&self) -> Result<CloudControlClient, CoreError> {
        if self.organization_id.is_empty() {
            return Err(CoreError::Config {
                message: "organization ID must not be empty".into(),
            });
        }

        let transport = TransportConfig {
            tls: self.tls.clone().into(),
            timeout: self.timeout,
        };
        let client = CloudControlClient::new(
            self.endpoint.clone(),
            self.organization_id.clone(),
            self.username.clone(),
            self.password.clone(),
            &transport,
        )?;
        Ok(client.with_poll_interval(self.poll_interval))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig::new(
            "https://api-au.dimensiondata.com".parse().unwrap(),
            "org-1",
            "user",
            SecretString::from("secret".to_owned()),
        )
    }

    #[test]
    fn builds_client_for_organization() {
        let client = config().build_client().unwrap();
        assert_eq!(client.organization_id(), "org-1");
        assert_eq!(client.base_url().as_str(), "https://api-au.dimensiondata.com/");
    }

    #[test]
    fn empty_organization_is_rejected() {
        let mut config = config();
        config.organization_id = String::new();
        assert!(matches!(config.build_client(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn tls_maps_to_transport_mode() {
        assert!(matches!(
            TlsMode::from(TlsVerification::DangerAcceptInvalid),
            TlsMode::DangerAcceptInvalid
        ));
        assert!(matches!(TlsMode::from(TlsVerification::default()), TlsMode::System));
    }
}
