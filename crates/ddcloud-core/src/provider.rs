// ── Provider handle ──
//
// `ProviderState` is passed into every lifecycle call. It owns the API
// client and the domain-lock registry; there is no global state.

use std::future::Future;
use std::time::Duration;

use ddcloud_api::{
    CloudControlClient, Error as ApiError, FirewallRule, FirewallRuleConfiguration, Resource,
    ResourceType,
};

use crate::config::ProviderConfig;
use crate::error::CoreError;
use crate::lock::{DomainLockGuard, DomainLocks};

/// The remote operations a firewall rule needs.
///
/// Implemented by [`CloudControlClient`]; tests substitute an in-memory
/// double.
pub trait FirewallRuleApi: Send + Sync {
    fn create_firewall_rule(
        &self,
        configuration: &FirewallRuleConfiguration,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    fn get_firewall_rule(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<FirewallRule>, ApiError>> + Send;

    fn edit_firewall_rule(
        &self,
        id: &str,
        enabled: bool,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn delete_firewall_rule(&self, id: &str)
    -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Block until the rule is deployed or `timeout` elapses.
    fn wait_for_deploy(
        &self,
        id: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<FirewallRule, ApiError>> + Send;

    /// Block until the rule is gone or `timeout` elapses.
    fn wait_for_delete(
        &self,
        id: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl FirewallRuleApi for CloudControlClient {
    async fn create_firewall_rule(
        &self,
        configuration: &FirewallRuleConfiguration,
    ) -> Result<String, ApiError> {
        CloudControlClient::create_firewall_rule(self, configuration).await
    }

    async fn get_firewall_rule(&self, id: &str) -> Result<Option<FirewallRule>, ApiError> {
        CloudControlClient::get_firewall_rule(self, id).await
    }

    async fn edit_firewall_rule(&self, id: &str, enabled: bool) -> Result<(), ApiError> {
        CloudControlClient::edit_firewall_rule(self, id, enabled).await
    }

    async fn delete_firewall_rule(&self, id: &str) -> Result<(), ApiError> {
        CloudControlClient::delete_firewall_rule(self, id).await
    }

    async fn wait_for_deploy(&self, id: &str, timeout: Duration) -> Result<FirewallRule, ApiError> {
        let Resource::FirewallRule(rule) =
            CloudControlClient::wait_for_deploy(self, ResourceType::FirewallRule, id, timeout)
                .await?;
        Ok(rule)
    }

    async fn wait_for_delete(&self, id: &str, timeout: Duration) -> Result<(), ApiError> {
        CloudControlClient::wait_for_delete(self, ResourceType::FirewallRule, id, timeout).await
    }
}

/// Provider handle backed by the real API client.
pub type CloudControlProvider = ProviderState<CloudControlClient>;

/// Client plus lock registry, shared by every resource instance.
pub struct ProviderState<C = CloudControlClient> {
    client: C,
    domain_locks: DomainLocks,
}

impl<C: FirewallRuleApi> ProviderState<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            domain_locks: DomainLocks::new(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn domain_locks(&self) -> &DomainLocks {
        &self.domain_locks
    }

    /// Exclusive access to a network domain for the lifetime of the guard.
    pub async fn domain_lock(
        &self,
        network_domain: &str,
        owner: impl Into<String>,
    ) -> DomainLockGuard {
        self.domain_locks.lock(network_domain, owner).await
    }
}

impl ProviderState<CloudControlClient> {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.build_client()?))
    }
}
