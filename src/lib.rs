//! Check the VPCs of an AWS Organization for address overlaps.
//!
//! Accounts are enumerated through AWS Organizations, a role is assumed in
//! each one, VPC blocks are listed per region, and every pair of blocks is
//! compared. See [`processing::detect_overlaps`] for the comparison itself.

pub mod aws;
pub mod commands;
pub mod config;
pub mod models;
pub mod output;
pub mod processing;

use models::{NetworkRecord, OverlapRecord};

/// Error type used outside the overlap check.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Filter `networks` and compute the overlaps among what remains.
///
/// # Arguments
/// * `networks` - Collected networks, in report order
/// * `skip_default` - Leave provider default VPCs out
/// * `excluded_cidrs` - Leave VPCs with exactly these CIDRs out
pub fn compute_overlaps(
    networks: Vec<NetworkRecord>,
    skip_default: bool,
    excluded_cidrs: &[&str],
) -> Result<Vec<OverlapRecord>, BoxError> {
    let networks = processing::filter_default_networks(networks, skip_default);
    let networks = processing::filter_excluded_cidrs(networks, excluded_cidrs)?;
    log::info!("Comparing {} VPC blocks", networks.len());

    let overlaps = processing::detect_overlaps(&networks).map_err(|e| {
        log::error!("{e}");
        e
    })?;
    processing::log_overlaps(&overlaps);
    Ok(overlaps)
}
