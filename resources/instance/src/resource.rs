//! The engine-facing instance resource handler.

use std::collections::HashMap;
use std::time::Duration;

use strato_client::{state, ApiClient, ResourceKind};
use strato_reconcile::PollConfig;
use tracing::{debug, info};

use crate::error::InstanceError;
use crate::lifecycle::{await_goal, LifecycleGoal};
use crate::reader::{read_instance, ObservedInstance};
use crate::spec::InstanceSpec;
use crate::translate::translate;

/// Wall-clock budgets for lifecycle operations.
///
/// The handler is cheap to construct, so the engine overrides budgets per
/// invocation by building a handler with custom values.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Budget for create to reach the "created" state.
    pub create: Duration,

    /// Budget for delete to reach the "deleted" state.
    pub delete: Duration,

    /// Sleep between state polls.
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(5 * 60),
            delete: Duration::from_secs(3 * 60),
            poll_interval: strato_reconcile::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Handler for one instance resource.
///
/// Stateless between calls: every operation resumes entirely from the
/// service's observable state, so the engine may retry any failed
/// operation wholesale.
#[derive(Debug, Clone)]
pub struct InstanceResource {
    client: ApiClient,
    timeouts: Timeouts,
}

impl InstanceResource {
    /// Build a handler around an explicit client handle.
    pub fn new(client: ApiClient) -> Self {
        Self::with_timeouts(client, Timeouts::default())
    }

    /// Build a handler with custom operation budgets.
    pub fn with_timeouts(client: ApiClient, timeouts: Timeouts) -> Self {
        Self { client, timeouts }
    }

    /// Create the instance and wait until it is fully provisioned.
    ///
    /// Desired metadata is stored right after the creation trigger,
    /// before polling begins. A metadata failure fails the operation even
    /// though the instance now exists; the engine reconciles on the next
    /// read.
    pub async fn create(&self, spec: &InstanceSpec) -> Result<ObservedInstance, InstanceError> {
        let request = translate(spec)?;

        let created = self
            .client
            .create_instance(&request)
            .await
            .map_err(|err| InstanceError::remote("creating instance", &spec.name, err))?;

        // The service can return a blank identifier on an internal fault.
        if created.uuid.is_empty() {
            return Err(InstanceError::BlankIdentifier);
        }
        let id = created.uuid;
        info!(%id, name = %spec.name, "instance creation issued");

        for (key, value) in &spec.metadata {
            self.client
                .set_metadata(ResourceKind::Instance, &id, key, value)
                .await
                .map_err(|err| InstanceError::remote("storing instance metadata", &id, err))?;
        }

        await_goal(
            &self.client,
            &id,
            LifecycleGoal::Created,
            self.poll_config(self.timeouts.create),
        )
        .await?;

        read_instance(&self.client, &id).await
    }

    /// Fetch the full observed state of an existing instance.
    pub async fn read(&self, id: &str) -> Result<ObservedInstance, InstanceError> {
        read_instance(&self.client, id).await
    }

    /// Delete the instance and wait until it is gone.
    ///
    /// An instance that is already absent counts as deleted.
    pub async fn delete(&self, id: &str) -> Result<(), InstanceError> {
        self.client
            .delete_instance(id)
            .await
            .map_err(|err| InstanceError::remote("deleting instance", id, err))?;

        await_goal(
            &self.client,
            id,
            LifecycleGoal::Deleted,
            self.poll_config(self.timeouts.delete),
        )
        .await?;

        info!(id, "instance deleted");
        Ok(())
    }

    /// Cheap existence probe, used by the engine for drift detection.
    ///
    /// Absent records and records in the "deleted" state both read as
    /// non-existent; the service retains deleted instances queryable by
    /// identifier. Side-effect-free and safe to call arbitrarily often.
    pub async fn exists(&self, id: &str) -> Result<bool, InstanceError> {
        match self.client.get_instance(id).await {
            Ok(instance) => Ok(instance.state != state::DELETED),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(InstanceError::remote(
                "checking instance existence",
                id,
                err,
            )),
        }
    }

    /// Push metadata changes in place.
    ///
    /// Metadata is the only attribute updatable without replacement; the
    /// handler never issues any other mutating call. Only added or
    /// changed keys are written. Keys removed from the desired mapping
    /// stay in place remotely, as the API has no metadata delete.
    pub async fn update_metadata(
        &self,
        id: &str,
        desired: &HashMap<String, String>,
    ) -> Result<(), InstanceError> {
        let current = self
            .client
            .get_metadata(ResourceKind::Instance, id)
            .await
            .map_err(|err| InstanceError::remote("fetching instance metadata", id, err))?;

        for (key, value) in desired {
            if current.get(key) == Some(value) {
                continue;
            }
            debug!(id, key = %key, "updating metadata key");
            self.client
                .set_metadata(ResourceKind::Instance, id, key, value)
                .await
                .map_err(|err| InstanceError::remote("storing instance metadata", id, err))?;
        }

        Ok(())
    }

    fn poll_config(&self, budget: Duration) -> PollConfig {
        PollConfig {
            interval: self.timeouts.poll_interval,
            budget,
        }
    }
}
