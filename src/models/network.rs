//! Discovered VPC networks and the overlaps between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discovered virtual network address block.
///
/// `address_block` is kept as reported by the provider; it is only parsed
/// when overlaps are computed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkRecord {
    /// Owning account ID.
    pub account_id: String,
    /// Owning account display name.
    pub account_name: String,
    /// Region the network lives in.
    pub region: String,
    /// VPC ID, unique within (account_id, region).
    pub network_id: String,
    /// IPv4 CIDR block.
    pub address_block: String,
    /// Provider-created default VPC.
    #[serde(default)]
    pub is_default: bool,
}

impl NetworkRecord {
    pub fn new(
        account_id: &str,
        account_name: &str,
        region: &str,
        network_id: &str,
        address_block: &str,
    ) -> NetworkRecord {
        NetworkRecord {
            account_id: account_id.to_string(),
            account_name: account_name.to_string(),
            region: region.to_string(),
            network_id: network_id.to_string(),
            address_block: address_block.to_string(),
            is_default: false,
        }
    }
}

impl fmt::Display for NetworkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} in '{}' ({}) {}",
            self.network_id, self.address_block, self.account_name, self.account_id, self.region
        )
    }
}

/// A conflict between two networks, labeled by their input order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OverlapRecord {
    pub first: NetworkRecord,
    pub second: NetworkRecord,
}

impl fmt::Display for OverlapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.first, self.second)
    }
}
