// Deployment polling
//
// Every mutating call is asynchronous on the remote side: the API
// accepts the request and the resource moves through PENDING_* states
// until it settles. These helpers re-read the resource until it settles,
// fails, disappears, or the caller's timeout runs out.

use std::time::Duration;

use tracing::{debug, info};

use crate::client::CloudControlClient;
use crate::error::Error;
use crate::models::{Resource, ResourceType};

impl CloudControlClient {
    /// Fetch any deployable resource by type and ID.
    pub async fn get_resource(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<Option<Resource>, Error> {
        match resource_type {
            ResourceType::FirewallRule => Ok(self
                .get_firewall_rule(id)
                .await?
                .map(Resource::FirewallRule)),
        }
    }

    /// Poll until the resource reaches the `NORMAL` state.
    pub async fn wait_for_deploy(
        &self,
        resource_type: ResourceType,
        id: &str,
        timeout: Duration,
    ) -> Result<Resource, Error> {
        tokio::time::timeout(timeout, self.poll_until_deployed(resource_type, id))
            .await
            .map_err(|_| Error::Timeout {
                resource_type,
                id: id.to_owned(),
                action: "deploy",
                timeout_secs: timeout.as_secs(),
            })?
    }

    /// Poll until the resource no longer exists.
    pub async fn wait_for_delete(
        &self,
        resource_type: ResourceType,
        id: &str,
        timeout: Duration,
    ) -> Result<(), Error> {
        tokio::time::timeout(timeout, self.poll_until_deleted(resource_type, id))
            .await
            .map_err(|_| Error::Timeout {
                resource_type,
                id: id.to_owned(),
                action: "delete",
                timeout_secs: timeout.as_secs(),
            })?
    }

    async fn poll_until_deployed(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<Resource, Error> {
        loop {
            let Some(resource) = self.get_resource(resource_type, id).await? else {
                return Err(Error::ResourceNotFound {
                    resource_type,
                    id: id.to_owned(),
                });
            };

            if resource.is_deployed() {
                info!(%resource_type, id, "deployed");
                return Ok(resource);
            }
            if resource.is_failed() {
                return Err(Error::DeployFailed {
                    resource_type,
                    id: id.to_owned(),
                    state: resource.state().to_owned(),
                });
            }

            debug!(%resource_type, id, state = resource.state(), "waiting for deployment");
            tokio::time::sleep(self.poll_interval()).await;
        }
    }

    async fn poll_until_deleted(&self, resource_type: ResourceType, id: &str) -> Result<(), Error> {
        loop {
            let Some(resource) = self.get_resource(resource_type, id).await? else {
                info!(%resource_type, id, "deleted");
                return Ok(());
            };

            if resource.is_failed() {
                return Err(Error::DeployFailed {
                    resource_type,
                    id: id.to_owned(),
                    state: resource.state().to_owned(),
                });
            }

            debug!(%resource_type, id, state = resource.state(), "waiting for deletion");
            tokio::time::sleep(self.poll_interval()).await;
        }
    }
}
