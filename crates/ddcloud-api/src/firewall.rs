// Firewall rule endpoints
//
// All four live under `/caas/{version}/{org}/network/`. Create, edit and
// delete are POSTs that answer with the response envelope; the rule ID
// of a newly created rule comes back in `info` as `firewallRuleId`.

use tracing::debug;

use crate::client::CloudControlClient;
use crate::error::Error;
use crate::models::{
    DeleteFirewallRule, EditFirewallRule, FirewallRule, FirewallRuleConfiguration,
};

const FIREWALL_RULE_ID_INFO: &str = "firewallRuleId";

impl CloudControlClient {
    /// Create a firewall rule, returning its ID.
    ///
    /// `POST network/createFirewallRule`
    pub async fn create_firewall_rule(
        &self,
        configuration: &FirewallRuleConfiguration,
    ) -> Result<String, Error> {
        let url = self.network_url("createFirewallRule")?;
        debug!(
            name = %configuration.name,
            network_domain = %configuration.network_domain_id,
            "creating firewall rule"
        );

        let response = self.post(url, configuration).await?;
        response
            .info_value(FIREWALL_RULE_ID_INFO)
            .map(String::from)
            .ok_or_else(|| Error::UnexpectedResponse {
                operation: "createFirewallRule".into(),
                message: format!("response did not include '{FIREWALL_RULE_ID_INFO}'"),
            })
    }

    /// Fetch a firewall rule by ID. A rule the API does not know is `None`.
    ///
    /// `GET network/firewallRule/{id}`
    pub async fn get_firewall_rule(&self, id: &str) -> Result<Option<FirewallRule>, Error> {
        let url = self.network_url(&format!("firewallRule/{id}"))?;

        match self.get(url).await {
            Ok(rule) => Ok(Some(rule)),
            Err(e) if e.is_not_found() => {
                debug!(id, "firewall rule not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Enable or disable a firewall rule.
    ///
    /// `POST network/editFirewallRule` with `{"id": "...", "enabled": bool}`
    pub async fn edit_firewall_rule(&self, id: &str, enabled: bool) -> Result<(), Error> {
        let url = self.network_url("editFirewallRule")?;
        debug!(id, enabled, "editing firewall rule");
        self.post(url, &EditFirewallRule { id, enabled }).await?;
        Ok(())
    }

    /// Delete a firewall rule.
    ///
    /// `POST network/deleteFirewallRule` with `{"id": "..."}`
    pub async fn delete_firewall_rule(&self, id: &str) -> Result<(), Error> {
        let url = self.network_url("deleteFirewallRule")?;
        debug!(id, "deleting firewall rule");
        self.post(url, &DeleteFirewallRule { id }).await?;
        Ok(())
    }
}
