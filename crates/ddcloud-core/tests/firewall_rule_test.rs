#![allow(clippy::unwrap_used)]
// Lifecycle tests for the firewall rule resource against an in-memory API.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;

use ddcloud_api::{
    Error as ApiError, FirewallRule, FirewallRuleConfiguration, FirewallRuleScope, ResourceType,
};
use ddcloud_core::firewall_rule::{self, CREATE_TIMEOUT, DELETE_TIMEOUT};
use ddcloud_core::{
    CoreError, FieldKey, FirewallRuleApi, FirewallRuleFields, ProviderState, ResourceData,
};

// ── In-memory API ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Create(FirewallRuleConfiguration),
    Get(String),
    Edit(String, bool),
    Delete(String),
    WaitForDeploy(String, Duration),
    WaitForDelete(String, Duration),
}

#[derive(Default)]
struct MockApi {
    rules: Mutex<HashMap<String, FirewallRule>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    create_delay: Duration,
    reject_create: bool,
    fail_deploy: bool,
}

impl MockApi {
    fn with_rule(self, id: &str, enabled: bool) -> Self {
        self.rules
            .lock()
            .unwrap()
            .insert(id.into(), remote_rule(id, enabled));
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn remote_rule(id: &str, enabled: bool) -> FirewallRule {
    FirewallRule {
        id: id.into(),
        name: "web".into(),
        action: "ACCEPT_DECISIVELY".into(),
        ip_version: "IPV4".into(),
        protocol: "TCP".into(),
        source: FirewallRuleScope::any(),
        destination: FirewallRuleScope::any(),
        enabled,
        state: "NORMAL".into(),
        network_domain_id: "nd-1".into(),
        rule_type: None,
        datacenter_id: None,
    }
}

impl FirewallRuleApi for MockApi {
    async fn create_firewall_rule(
        &self,
        configuration: &FirewallRuleConfiguration,
    ) -> Result<String, ApiError> {
        self.record(Call::Create(configuration.clone()));

        if self.reject_create {
            return Err(ApiError::Api {
                status: 400,
                response_code: "NAME_NOT_UNIQUE".into(),
                message: "A firewall rule named 'web' already exists".into(),
                operation: Some("CREATE_FIREWALL_RULE".into()),
                request_id: None,
            });
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.create_delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let id = format!("rule-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut rule = remote_rule(&id, configuration.enabled);
        rule.name.clone_from(&configuration.name);
        rule.network_domain_id.clone_from(&configuration.network_domain_id);
        self.rules.lock().unwrap().insert(id.clone(), rule);
        Ok(id)
    }

    async fn get_firewall_rule(&self, id: &str) -> Result<Option<FirewallRule>, ApiError> {
        self.record(Call::Get(id.into()));
        Ok(self.rules.lock().unwrap().get(id).cloned())
    }

    async fn edit_firewall_rule(&self, id: &str, enabled: bool) -> Result<(), ApiError> {
        self.record(Call::Edit(id.into(), enabled));
        if let Some(rule) = self.rules.lock().unwrap().get_mut(id) {
            rule.enabled = enabled;
        }
        Ok(())
    }

    async fn delete_firewall_rule(&self, id: &str) -> Result<(), ApiError> {
        self.record(Call::Delete(id.into()));
        self.rules.lock().unwrap().remove(id);
        Ok(())
    }

    async fn wait_for_deploy(&self, id: &str, timeout: Duration) -> Result<FirewallRule, ApiError> {
        self.record(Call::WaitForDeploy(id.into(), timeout));
        if self.fail_deploy {
            return Err(ApiError::Timeout {
                resource_type: ResourceType::FirewallRule,
                id: id.into(),
                action: "deploy",
                timeout_secs: timeout.as_secs(),
            });
        }
        Ok(self.rules.lock().unwrap()[id].clone())
    }

    async fn wait_for_delete(&self, id: &str, timeout: Duration) -> Result<(), ApiError> {
        self.record(Call::WaitForDelete(id.into(), timeout));
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn fields(network_domain: &str) -> FirewallRuleFields {
    FirewallRuleFields::new(network_domain, "web", "accept", "ipv4", "tcp")
}

fn stored(id: &str) -> ResourceData {
    ResourceData::existing(id, fields("nd-1"), fields("nd-1"))
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_submits_configuration_and_waits_for_deploy() {
    let provider = ProviderState::new(MockApi::default());
    let mut f = fields("nd-1");
    f.source_address = Some("192.168.1.1".into());
    f.source_port = Some("8080".into());
    f.destination_network = Some("10.0.0.0/24".into());
    f.destination_port = Some("any".into());
    let mut data = ResourceData::new(f);

    let id = firewall_rule::create(&mut data, &provider).await.unwrap();

    assert_eq!(id, "rule-1");
    assert_eq!(data.id(), Some("rule-1"));
    assert!(data.changed_fields().is_empty());

    let calls = provider.client().calls();
    assert_eq!(calls.len(), 2);
    let Call::Create(config) = &calls[0] else {
        panic!("expected create, got {:?}", calls[0]);
    };
    assert_eq!(config.action, "ACCEPT_DECISIVELY");
    assert_eq!(config.source, FirewallRuleScope::address("192.168.1.1", Some(8080)));
    assert_eq!(config.destination, FirewallRuleScope::network("10.0.0.0", 24, None));
    assert_eq!(calls[1], Call::WaitForDeploy("rule-1".into(), CREATE_TIMEOUT));
}

#[tokio::test]
async fn create_rejects_bad_port_without_remote_call() {
    let provider = ProviderState::new(MockApi::default());
    let mut f = fields("nd-1");
    f.destination_port = Some("https".into());
    let mut data = ResourceData::new(f);

    let err = firewall_rule::create(&mut data, &provider).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::InvalidPort { field: FieldKey::DestinationPort, .. }
    ));
    assert!(provider.client().calls().is_empty());
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn create_rejects_bad_network_without_remote_call() {
    let provider = ProviderState::new(MockApi::default());
    let mut f = fields("nd-1");
    f.source_network = Some("10.0.0.0".into());
    let mut data = ResourceData::new(f);

    let err = firewall_rule::create(&mut data, &provider).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::InvalidNetwork { field: FieldKey::SourceNetwork, .. }
    ));
    assert!(provider.client().calls().is_empty());
}

#[tokio::test]
async fn create_passes_api_errors_through() {
    let provider = ProviderState::new(MockApi {
        reject_create: true,
        ..MockApi::default()
    });
    let mut data = ResourceData::new(fields("nd-1"));

    let err = firewall_rule::create(&mut data, &provider).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Api(ApiError::Api { ref response_code, .. }) if response_code == "NAME_NOT_UNIQUE"
    ));
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn create_keeps_id_when_deploy_times_out() {
    let provider = ProviderState::new(MockApi {
        fail_deploy: true,
        ..MockApi::default()
    });
    let mut data = ResourceData::new(fields("nd-1"));

    let err = firewall_rule::create(&mut data, &provider).await.unwrap_err();

    assert!(matches!(err, CoreError::Api(ApiError::Timeout { .. })));
    assert_eq!(data.id(), Some("rule-1"));
}

// ── Domain locking ──────────────────────────────────────────────────

#[tokio::test]
async fn creates_in_same_domain_are_serialized() {
    let provider = ProviderState::new(MockApi {
        create_delay: Duration::from_millis(20),
        ..MockApi::default()
    });
    let mut first = ResourceData::new(fields("nd-1"));
    let mut second = ResourceData::new(fields("nd-1"));

    let (a, b) = tokio::join!(
        firewall_rule::create(&mut first, &provider),
        firewall_rule::create(&mut second, &provider),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(provider.client().max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn creates_in_different_domains_run_concurrently() {
    let provider = ProviderState::new(MockApi {
        create_delay: Duration::from_millis(20),
        ..MockApi::default()
    });
    let mut first = ResourceData::new(fields("nd-1"));
    let mut second = ResourceData::new(fields("nd-2"));

    let (a, b) = tokio::join!(
        firewall_rule::create(&mut first, &provider),
        firewall_rule::create(&mut second, &provider),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(provider.client().max_in_flight.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn lock_is_released_after_failure() {
    let provider = ProviderState::new(MockApi {
        reject_create: true,
        ..MockApi::default()
    });
    let mut data = ResourceData::new(fields("nd-1"));
    firewall_rule::create(&mut data, &provider).await.unwrap_err();

    let relock =
        tokio::time::timeout(Duration::from_millis(50), provider.domain_lock("nd-1", "test")).await;
    assert!(relock.is_ok());
}

// ── Read ────────────────────────────────────────────────────────────

#[tokio::test]
async fn read_copies_remote_enabled_flag() {
    let provider = ProviderState::new(MockApi::default().with_rule("rule-1", false));
    let mut data = stored("rule-1");

    firewall_rule::read(&mut data, &provider).await.unwrap();

    assert!(!data.fields().enabled);
    assert_eq!(data.id(), Some("rule-1"));
}

#[tokio::test]
async fn read_of_missing_rule_clears_id_without_error() {
    let provider = ProviderState::new(MockApi::default());
    let mut data = stored("rule-gone");

    firewall_rule::read(&mut data, &provider).await.unwrap();

    assert_eq!(data.id(), None);
    assert_eq!(provider.client().calls(), vec![Call::Get("rule-gone".into())]);
}

#[tokio::test]
async fn read_without_id_is_an_error() {
    let provider = ProviderState::new(MockApi::default());
    let mut data = ResourceData::new(fields("nd-1"));

    let err = firewall_rule::read(&mut data, &provider).await.unwrap_err();
    assert!(matches!(err, CoreError::MissingId { .. }));
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_without_enabled_change_makes_no_remote_call() {
    let provider = ProviderState::new(MockApi::default().with_rule("rule-1", true));
    let mut data = stored("rule-1");

    firewall_rule::update(&mut data, &provider).await.unwrap();

    assert!(provider.client().calls().is_empty());
}

#[tokio::test]
async fn update_ignores_force_new_changes() {
    let provider = ProviderState::new(MockApi::default().with_rule("rule-1", true));
    let mut desired = fields("nd-1");
    desired.protocol = "udp".into();
    let mut data = ResourceData::existing("rule-1", fields("nd-1"), desired);

    firewall_rule::update(&mut data, &provider).await.unwrap();

    assert!(provider.client().calls().is_empty());
}

#[tokio::test]
async fn update_edits_enabled_flag() {
    let provider = ProviderState::new(MockApi::default().with_rule("rule-1", true));
    let mut desired = fields("nd-1");
    desired.enabled = false;
    let mut data = ResourceData::existing("rule-1", fields("nd-1"), desired);

    firewall_rule::update(&mut data, &provider).await.unwrap();

    assert_eq!(
        provider.client().calls(),
        vec![Call::Edit("rule-1".into(), false)]
    );
    assert!(!data.has_change(FieldKey::Enabled));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_waits_then_clears_id() {
    let provider = ProviderState::new(MockApi::default().with_rule("rule-1", true));
    let mut data = stored("rule-1");

    firewall_rule::delete(&mut data, &provider).await.unwrap();

    assert_eq!(
        provider.client().calls(),
        vec![
            Call::Delete("rule-1".into()),
            Call::WaitForDelete("rule-1".into(), DELETE_TIMEOUT),
        ]
    );
    assert_eq!(data.id(), None);
}
