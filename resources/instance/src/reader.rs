//! Read-back of full remote instance state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strato_client::{ApiClient, DiskSpec, InterfaceSummary, ResourceKind, VideoSpec};
use tracing::debug;

use crate::error::InstanceError;

/// Full observed state of an instance, as reported back to the engine.
///
/// The projection is deterministic for a given remote state, so repeated
/// reads never show spurious drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedInstance {
    /// Authoritative identifier assigned by the service.
    pub id: String,
    pub name: String,
    pub cpus: u32,
    pub memory_mib: u64,

    /// Node hosting the instance.
    pub node: String,
    pub console_port: Option<u16>,
    pub vdi_port: Option<u16>,

    pub state: String,
    pub power_state: String,

    pub disks: Vec<DiskSpec>,
    pub video: VideoSpec,
    pub ssh_key: Option<String>,
    pub user_data: Option<String>,

    /// Network attachments in the service's authoritative order.
    pub attachments: Vec<ObservedAttachment>,

    pub metadata: HashMap<String, String>,
}

/// One observed network attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedAttachment {
    /// Interface identifier.
    pub id: String,
    pub network: String,
    pub ipv4: Option<String>,
    pub mac: Option<String>,
    pub model: Option<String>,
    pub state: String,
}

/// Interface identifiers in the service's authoritative order.
///
/// The bulk listing does not guarantee arrival order; the order field is
/// the only source of truth. Downstream consumers address attachments
/// positionally, so getting this wrong silently rewires them.
fn ordered_interface_ids(mut summaries: Vec<InterfaceSummary>) -> Vec<String> {
    summaries.sort_by_key(|summary| summary.order);
    summaries.into_iter().map(|summary| summary.uuid).collect()
}

/// Fetch and project the full remote state of an instance.
///
/// Any individual fetch failure aborts the whole read; partial state is
/// never returned.
pub(crate) async fn read_instance(
    client: &ApiClient,
    id: &str,
) -> Result<ObservedInstance, InstanceError> {
    let instance = match client.get_instance(id).await {
        Ok(instance) => instance,
        Err(err) if err.is_not_found() => {
            return Err(InstanceError::NotFound { id: id.to_string() })
        }
        Err(err) => return Err(InstanceError::remote("fetching instance", id, err)),
    };

    let summaries = client
        .get_instance_interfaces(id)
        .await
        .map_err(|err| InstanceError::remote("listing instance interfaces", id, err))?;

    // The listing carries identity and position only; expand each entry.
    let mut attachments = Vec::with_capacity(summaries.len());
    for interface_id in ordered_interface_ids(summaries) {
        let interface = client
            .get_interface(&interface_id)
            .await
            .map_err(|err| InstanceError::remote("fetching interface", &interface_id, err))?;
        attachments.push(ObservedAttachment {
            id: interface.uuid,
            network: interface.network_uuid,
            ipv4: interface.ipv4,
            mac: interface.mac,
            model: interface.model,
            state: interface.state,
        });
    }

    let metadata = client
        .get_metadata(ResourceKind::Instance, id)
        .await
        .map_err(|err| InstanceError::remote("fetching instance metadata", id, err))?;

    debug!(id, attachments = attachments.len(), "assembled observed state");

    Ok(ObservedInstance {
        id: instance.uuid,
        name: instance.name,
        cpus: instance.cpus,
        memory_mib: instance.memory_mib,
        node: instance.node,
        console_port: instance.console_port,
        vdi_port: instance.vdi_port,
        state: instance.state,
        power_state: instance.power_state,
        disks: instance.disks,
        video: instance.video,
        ssh_key: instance.ssh_key,
        user_data: instance.user_data,
        attachments,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_ids_follow_remote_order_not_arrival_order() {
        let summaries = vec![
            InterfaceSummary {
                uuid: "if-c".to_string(),
                order: 3,
            },
            InterfaceSummary {
                uuid: "if-a".to_string(),
                order: 1,
            },
            InterfaceSummary {
                uuid: "if-b".to_string(),
                order: 2,
            },
        ];

        assert_eq!(ordered_interface_ids(summaries), ["if-a", "if-b", "if-c"]);
    }

    #[test]
    fn empty_listing_yields_no_attachments() {
        assert!(ordered_interface_ids(vec![]).is_empty());
    }
}
