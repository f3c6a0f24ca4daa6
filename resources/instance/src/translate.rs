//! Translation from desired state into the service's creation request.

use std::net::Ipv4Addr;

use strato_client::{CreateInstanceRequest, NetworkSpec};

use crate::error::ValidationError;
use crate::spec::InstanceSpec;

/// Video card defaults applied when the desired state has no entry.
const DEFAULT_VIDEO_MODEL: &str = "cirrus";
const DEFAULT_VIDEO_MEMORY_KB: u32 = 16384;

/// Convert desired state into a creation request.
///
/// Pure and synchronous. Every validation failure surfaces here, before
/// any remote call is attempted. Disk and network order is preserved.
pub fn translate(spec: &InstanceSpec) -> Result<CreateInstanceRequest, ValidationError> {
    let video = match spec.video.as_slice() {
        [] => strato_client::VideoSpec {
            model: DEFAULT_VIDEO_MODEL.to_string(),
            memory_kb: DEFAULT_VIDEO_MEMORY_KB,
        },
        [video] => strato_client::VideoSpec {
            model: video.model.clone(),
            memory_kb: video.memory_kb,
        },
        _ => return Err(ValidationError::TooManyVideoCards),
    };

    let mut networks = Vec::with_capacity(spec.networks.len());
    for attachment in &spec.networks {
        if let Some(ipv4) = &attachment.ipv4 {
            if !valid_ipv4(ipv4) {
                return Err(ValidationError::InvalidIpv4(ipv4.clone()));
            }
        }
        if let Some(mac) = &attachment.mac {
            if !valid_mac(mac) {
                return Err(ValidationError::InvalidMac(mac.clone()));
            }
        }
        networks.push(NetworkSpec {
            network_uuid: attachment.network.clone(),
            ipv4: attachment.ipv4.clone(),
            mac: attachment.mac.clone(),
            model: attachment.model.clone(),
        });
    }

    let disks = spec
        .disks
        .iter()
        .map(|disk| strato_client::DiskSpec {
            size_gb: disk.size_gb,
            base: disk.base.clone(),
            bus: disk.bus.clone(),
            kind: disk.kind.clone(),
        })
        .collect();

    Ok(CreateInstanceRequest {
        name: spec.name.clone(),
        cpus: spec.cpus,
        memory_mib: spec.memory_mib,
        networks,
        disks,
        video,
        ssh_key: spec.ssh_key.clone(),
        user_data: spec.user_data.clone(),
    })
}

/// Dotted-quad IPv4 syntax check.
fn valid_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

/// Six colon-separated hex octets.
fn valid_mac(value: &str) -> bool {
    let octets: Vec<&str> = value.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()))
}
