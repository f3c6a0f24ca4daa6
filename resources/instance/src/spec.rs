//! Desired instance state, as supplied by the declarative engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Desired attributes for one instance.
///
/// Everything except `metadata` is replacement-triggering: on any other
/// change the engine destroys and recreates the instance rather than
/// mutating it in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Instance name. Immutable for the instance's lifetime.
    pub name: String,

    pub cpus: u32,

    /// Memory in MiB.
    pub memory_mib: u64,

    /// Virtual disks, in attachment order.
    #[serde(default)]
    pub disks: Vec<DiskSpec>,

    /// Video card configuration. The engine supplies this as a list; at
    /// most one entry is valid and translation rejects extras.
    #[serde(default)]
    pub video: Vec<VideoSpec>,

    /// Network attachments, in attachment order.
    #[serde(default)]
    pub networks: Vec<NetworkAttachment>,

    /// SSH key embedded into the instance via config drive.
    #[serde(default)]
    pub ssh_key: Option<String>,

    /// Base64-encoded user data passed via config drive.
    #[serde(default)]
    pub user_data: Option<String>,

    /// Metadata key/value pairs. The only attribute updatable in place.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Desired virtual disk. Immutable once the instance exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskSpec {
    /// Size in GB.
    pub size_gb: u32,

    /// Base image reference (URL or shortcut), if the disk is seeded.
    #[serde(default)]
    pub base: Option<String>,

    pub bus: String,
    pub kind: String,
}

/// Desired video card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSpec {
    pub model: String,

    /// Video memory in KB.
    pub memory_kb: u32,
}

/// Desired network attachment.
///
/// Optional fields left empty are assigned by the service and observed
/// back on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// Identifier of the network to attach to.
    pub network: String,

    #[serde(default)]
    pub ipv4: Option<String>,

    #[serde(default)]
    pub mac: Option<String>,

    /// NIC model presented to the guest.
    #[serde(default)]
    pub model: Option<String>,
}
