//! Overlapping VPC CIDR detection.
//!
//! Compares every pair of discovered networks and reports the pairs whose
//! address blocks share at least one address.

use crate::models::{Ipv4, NetworkRecord, OverlapRecord};
use itertools::Itertools;
use thiserror::Error;

/// Error returned by [`detect_overlaps`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverlapError {
    #[error(
        "malformed address block '{address_block}' for network {network_id} \
         (account {account_id}, region {region}, input #{index}): {reason}"
    )]
    MalformedAddressBlock {
        index: usize,
        account_id: String,
        region: String,
        network_id: String,
        address_block: String,
        reason: String,
    },
}

fn parse_block(index: usize, network: &NetworkRecord) -> Result<Ipv4, OverlapError> {
    Ipv4::new_strict(&network.address_block).map_err(|e| OverlapError::MalformedAddressBlock {
        index,
        account_id: network.account_id.clone(),
        region: network.region.clone(),
        network_id: network.network_id.clone(),
        address_block: network.address_block.clone(),
        reason: e.to_string(),
    })
}

/// Find every pair of networks with overlapping address blocks.
///
/// Pairs are visited as `(i, j)` with `i < j`, outer index ascending, so the
/// result order only depends on the input order. The network at the lower
/// index is reported as `first`. Pairs sharing a `network_id` are never
/// reported, whatever their blocks.
///
/// # Errors
/// Any unparsable address block fails the whole call, no partial result.
pub fn detect_overlaps(networks: &[NetworkRecord]) -> Result<Vec<OverlapRecord>, OverlapError> {
    let blocks = networks
        .iter()
        .enumerate()
        .map(|(i, n)| parse_block(i, n))
        .collect::<Result<Vec<Ipv4>, _>>()?;

    let overlaps: Vec<OverlapRecord> = networks
        .iter()
        .zip(blocks.iter())
        .tuple_combinations::<(_, _)>()
        .filter(|((a, _), (b, _))| a.network_id != b.network_id)
        .filter(|((_, a_cidr), (_, b_cidr))| a_cidr.overlaps(b_cidr))
        .map(|((a, _), (b, _))| OverlapRecord {
            first: a.clone(),
            second: b.clone(),
        })
        .collect();

    log::debug!(
        "detect_overlaps: {} networks, {} overlaps",
        networks.len(),
        overlaps.len()
    );

    Ok(overlaps)
}

/// Log overlapping VPC conflicts as warnings.
pub fn log_overlaps(overlaps: &[OverlapRecord]) {
    if overlaps.is_empty() {
        log::info!("No overlapping VPC CIDRs found.");
        return;
    }

    log::warn!("Found {} overlapping VPC CIDR pair(s):", overlaps.len());

    for overlap in overlaps {
        let kind = match (
            Ipv4::new(&overlap.first.address_block),
            Ipv4::new(&overlap.second.address_block),
        ) {
            (Ok(a), Ok(b)) if a == b => "identical",
            (Ok(a), Ok(b)) if a.contains(&b) || b.contains(&a) => "nested",
            _ => "partial",
        };
        log::warn!("  [{kind}] {} <-> {}", overlap.first, overlap.second);
    }
}
