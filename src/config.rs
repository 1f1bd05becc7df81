//! Command line, environment and logging configuration.

use crate::aws::{CacheMode, CollectOptions};
use crate::output::OutputFormat;
use crate::BoxError;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

/// Pause between paginated requests.
pub const SLEEP_MSEC: u64 = 100;
/// Items requested per page of a list command.
pub const PAGE_SIZE: usize = 50;
pub const DEFAULT_ROLE_NAME: &str = "Admin";
pub const DEFAULT_SESSION_NAME: &str = "AssumeRoleSession1";
pub const DEFAULT_MAX_CONCURRENT_REGIONS: usize = 4;
/// Region used for organization-wide calls.
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Parser, Debug)]
#[command(
    name = "vpc-overlap",
    version,
    about = "Check the VPCs of an AWS Organization for address overlaps"
)]
pub struct Cli {
    /// Use a given AWS profile.
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Region for organization, STS and region listing calls.
    #[arg(long, global = true, default_value = DEFAULT_REGION, env = "VPC_OVERLAP_REGION")]
    pub region: String,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Csv, env = "VPC_OVERLAP_FORMAT")]
    pub format: OutputFormat,

    /// log4rs configuration file.
    #[arg(long, global = true, default_value = "log4rs.yml", env = "VPC_OVERLAP_LOG_CONFIG")]
    pub log_config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve list of accounts in AWS Organizations.
    FetchAccounts,
    /// Retrieve list of regions from EC2 service.
    FetchRegions,
    /// Retrieve VPCs for accounts.
    FetchVpcs(CollectArgs),
    /// Compute and display VPC network overlaps.
    ComputeOverlaps {
        #[command(flatten)]
        collect: CollectArgs,

        /// Leave provider default VPCs out of the comparison.
        #[arg(long, env = "VPC_OVERLAP_SKIP_DEFAULT_VPCS")]
        skip_default_vpcs: bool,

        /// Leave VPCs with exactly this CIDR out of the comparison, repeatable.
        #[arg(long = "exclude-cidr", value_name = "CIDR")]
        exclude_cidrs: Vec<String>,
    },
}

/// Options shared by the commands that enumerate VPCs.
#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// Role assumed in every member account.
    #[arg(long, default_value = DEFAULT_ROLE_NAME, env = "VPC_OVERLAP_ROLE_NAME")]
    pub role_name: String,

    /// Session name used when assuming the role.
    #[arg(long, default_value = DEFAULT_SESSION_NAME, env = "VPC_OVERLAP_SESSION_NAME")]
    pub session_name: String,

    /// Also report secondary CIDR blocks associated with each VPC.
    #[arg(long, env = "VPC_OVERLAP_ALL_CIDR_BLOCKS")]
    pub all_cidr_blocks: bool,

    /// Region queries in flight per account.
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_REGIONS, env = "VPC_OVERLAP_MAX_CONCURRENT_REGIONS")]
    pub max_concurrent_regions: usize,

    /// Use today's cache file, creating it when missing.
    #[arg(long, env = "VPC_OVERLAP_CACHE")]
    pub cache: bool,

    /// Read VPCs from this cache file instead of AWS.
    #[arg(long, value_name = "FILE", conflicts_with = "cache", env = "VPC_OVERLAP_CACHE_FILE")]
    pub cache_file: Option<String>,

    /// Time zone used to date the cache file.
    #[arg(long, default_value = "UTC", env = "VPC_OVERLAP_TIMEZONE")]
    pub timezone: String,
}

impl CollectArgs {
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            role_name: self.role_name.clone(),
            session_name: self.session_name.clone(),
            all_cidr_blocks: self.all_cidr_blocks,
            max_concurrent_regions: self.max_concurrent_regions,
        }
    }

    pub fn cache_mode(&self) -> Result<CacheMode, BoxError> {
        if let Some(file) = &self.cache_file {
            return Ok(CacheMode::File(file.clone()));
        }
        if self.cache {
            let tz: Tz = self
                .timezone
                .parse()
                .map_err(|e| format!("Invalid time zone '{}': {e}", self.timezone))?;
            return Ok(CacheMode::Daily(tz));
        }
        Ok(CacheMode::Off)
    }
}

/// Initialize log4rs from `log_config`, or log warnings to stderr when the
/// file is missing.
pub fn init_logging(log_config: &str) -> Result<(), BoxError> {
    if Path::new(log_config).exists() {
        log4rs::init_file(log_config, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {log_config}: {e}"))?;
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .map_err(|e| format!("Error building default log config: {e}"))?;
    log4rs::init_config(config).map_err(|e| format!("Error initializing log4rs: {e}"))?;
    Ok(())
}
