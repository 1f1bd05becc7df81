//! Subcommand execution.
//!
//! Each command writes its report to `out` only after all data was
//! gathered, so a failure never leaves a partial report behind.

use crate::aws::{list_accounts, list_regions, load_networks, AwsCli, Session};
use crate::compute_overlaps;
use crate::config::{Cli, Commands};
use crate::output::render;
use crate::BoxError;
use std::io::Write;

/// Run the parsed command line against `cli`, writing the report to `out`.
pub async fn run<C: AwsCli + ?Sized, W: Write>(
    aws: &C,
    cli: &Cli,
    out: &mut W,
) -> Result<(), BoxError> {
    let session = Session::new(cli.profile.clone(), Some(cli.region.clone()));
    log::debug!("session={session:?}");

    match &cli.command {
        Commands::FetchAccounts => {
            let accounts = list_accounts(aws, &session).await?;
            render(out, cli.format, &accounts)
        }
        Commands::FetchRegions => {
            let regions = list_regions(aws, &session).await?;
            render(out, cli.format, &regions)
        }
        Commands::FetchVpcs(collect) => {
            let networks = load_networks(
                aws,
                &session,
                &collect.collect_options(),
                &collect.cache_mode()?,
            )
            .await?;
            render(out, cli.format, &networks)
        }
        Commands::ComputeOverlaps {
            collect,
            skip_default_vpcs,
            exclude_cidrs,
        } => {
            let networks = load_networks(
                aws,
                &session,
                &collect.collect_options(),
                &collect.cache_mode()?,
            )
            .await?;
            let excluded: Vec<&str> = exclude_cidrs.iter().map(String::as_str).collect();
            let overlaps = compute_overlaps(networks, *skip_default_vpcs, &excluded)?;
            render(out, cli.format, &overlaps)
        }
    }
}
