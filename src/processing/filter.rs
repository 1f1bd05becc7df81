//! Filters applied to discovered networks before overlap detection.
//!
//! Every filter keeps the relative order of the remaining records, so the
//! overlap report order is unaffected by filtering.

use crate::models::{Ipv4, NetworkRecord};
use crate::BoxError;

/// Drop provider default VPCs when `skip_default` is set.
///
/// Default VPCs share 172.31.0.0/16 in every region of every account, so
/// leaving them in floods the report.
pub fn filter_default_networks(
    mut networks: Vec<NetworkRecord>,
    skip_default: bool,
) -> Vec<NetworkRecord> {
    if !skip_default {
        return networks;
    }

    let original_count = networks.len();
    networks.retain(|n| {
        if n.is_default {
            log::debug!("Skipping default VPC {n}");
        }
        !n.is_default
    });

    let filtered_count = original_count - networks.len();
    if filtered_count > 0 {
        log::info!("Filtered out {filtered_count} default VPCs");
    }
    networks
}

/// Drop networks whose block equals one of the excluded CIDRs.
///
/// Records with an unparsable block are kept so the overlap check can
/// report them.
///
/// # Errors
/// If an excluded CIDR does not parse or has host bits set, since it could
/// never match a VPC block.
pub fn filter_excluded_cidrs(
    mut networks: Vec<NetworkRecord>,
    excluded_cidrs: &[&str],
) -> Result<Vec<NetworkRecord>, BoxError> {
    if excluded_cidrs.is_empty() {
        return Ok(networks);
    }

    let excluded = excluded_cidrs
        .iter()
        .map(|s| Ipv4::new_strict(s).map_err(|e| format!("Invalid excluded CIDR '{s}': {e}")))
        .collect::<Result<Vec<Ipv4>, _>>()?;

    let original_count = networks.len();
    networks.retain(|n| {
        let should_exclude = Ipv4::new(&n.address_block)
            .map(|cidr| excluded.contains(&cidr))
            .unwrap_or(false);
        if should_exclude {
            log::debug!("Excluding VPC {n} (CIDR matches exclusion list)");
        }
        !should_exclude
    });

    let filtered_count = original_count - networks.len();
    if filtered_count > 0 {
        log::info!(
            "Filtered out {} VPCs with excluded CIDRs: {:?}",
            filtered_count,
            excluded_cidrs
        );
    }

    Ok(networks)
}
