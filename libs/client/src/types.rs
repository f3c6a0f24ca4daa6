//! Wire types for the Strato orchestration API.

use serde::{Deserialize, Serialize};

/// Lifecycle states with defined meaning.
///
/// The state set is open: the service reports additional in-between values
/// ("initializing", "deleting", ...) that callers treat as transient.
pub mod state {
    /// Instance is fully provisioned.
    pub const CREATED: &str = "created";

    /// Instance has been torn down. Records in this state remain
    /// queryable by identifier.
    pub const DELETED: &str = "deleted";

    /// Provisioning or teardown failed permanently.
    pub const ERROR: &str = "error";
}

/// Resource kinds that carry a metadata store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Instance,
    Network,
}

impl ResourceKind {
    /// URL path segment for the kind's collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Instance => "instances",
            ResourceKind::Network => "networks",
        }
    }
}

/// Request body for instance creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateInstanceRequest {
    pub name: String,
    pub cpus: u32,
    /// Memory in MiB.
    pub memory_mib: u64,
    /// Requested network attachments, in attachment order.
    pub networks: Vec<NetworkSpec>,
    /// Virtual disks, in attachment order.
    pub disks: Vec<DiskSpec>,
    pub video: VideoSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

/// One requested network attachment.
///
/// Fields left empty are assigned by the service and observed back on read.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSpec {
    pub network_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// One virtual disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSpec {
    /// Size in GB.
    pub size_gb: u32,

    /// Base image reference (URL or shortcut), if the disk is seeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Bus the disk is attached to, e.g. "virtio" or "ide".
    pub bus: String,

    /// Disk type, e.g. "disk" or "cdrom".
    #[serde(rename = "type")]
    pub kind: String,
}

/// Video card configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSpec {
    pub model: String,

    /// Video memory in KB.
    pub memory_kb: u32,
}

/// An instance record as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Instance {
    /// Authoritative identifier, assigned at creation.
    pub uuid: String,
    pub name: String,
    pub cpus: u32,
    pub memory_mib: u64,

    /// Node currently hosting the instance.
    #[serde(default)]
    pub node: String,

    #[serde(default)]
    pub console_port: Option<u16>,
    #[serde(default)]
    pub vdi_port: Option<u16>,

    /// Lifecycle state. See [`state`] for the terminal values.
    pub state: String,
    #[serde(default)]
    pub power_state: String,

    #[serde(default)]
    pub disks: Vec<DiskSpec>,
    pub video: VideoSpec,

    #[serde(default)]
    pub ssh_key: Option<String>,
    #[serde(default)]
    pub user_data: Option<String>,
}

/// Interface attachment summary from the bulk listing.
///
/// Carries identity and position only; expand each entry with
/// `get_interface` for the full record.
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceSummary {
    pub uuid: String,

    /// Authoritative position of this attachment on the instance.
    pub order: u32,
}

/// Full record for a network interface.
#[derive(Debug, Clone, Deserialize)]
pub struct Interface {
    pub uuid: String,
    pub network_uuid: String,
    #[serde(default)]
    pub ipv4: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub state: String,
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_deserialization() {
        let json = r#"{
            "uuid": "0ac8ab9c-8a5d-4c93-9f2c-2b5f0bb0a8f2",
            "name": "web-0",
            "cpus": 2,
            "memory_mib": 2048,
            "node": "node-a",
            "console_port": 5900,
            "vdi_port": 5901,
            "state": "created",
            "power_state": "on",
            "disks": [
                {"size_gb": 20, "base": "ubuntu:24.04", "bus": "virtio", "type": "disk"}
            ],
            "video": {"model": "cirrus", "memory_kb": 16384}
        }"#;

        let instance: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.uuid, "0ac8ab9c-8a5d-4c93-9f2c-2b5f0bb0a8f2");
        assert_eq!(instance.state, state::CREATED);
        assert_eq!(instance.disks.len(), 1);
        assert_eq!(instance.disks[0].kind, "disk");
        assert_eq!(instance.video.memory_kb, 16384);
        assert_eq!(instance.ssh_key, None);
    }

    #[test]
    fn test_create_request_omits_unassigned_fields() {
        let request = CreateInstanceRequest {
            name: "web-0".to_string(),
            cpus: 1,
            memory_mib: 1024,
            networks: vec![NetworkSpec {
                network_uuid: "net-1".to_string(),
                ipv4: None,
                mac: None,
                model: None,
            }],
            disks: vec![],
            video: VideoSpec {
                model: "cirrus".to_string(),
                memory_kb: 16384,
            },
            ssh_key: None,
            user_data: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("ipv4"));
        assert!(!json.contains("mac"));
        assert!(!json.contains("ssh_key"));
        assert!(json.contains("\"network_uuid\":\"net-1\""));
    }

    #[test]
    fn test_interface_summary_deserialization() {
        let json = r#"[{"uuid": "if-a", "order": 1}, {"uuid": "if-b", "order": 0}]"#;
        let summaries: Vec<InterfaceSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].order, 0);
    }
}
