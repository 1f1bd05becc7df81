//! AWS Organizations, STS and EC2 interaction.
//!
//! This module handles all AWS-related operations:
//! - [`cli`] - Command execution for the AWS CLI
//! - [`session`] - Explicit credential handles and role assumption
//! - [`organizations`] - Account listing
//! - [`ec2`] - Region and VPC listing
//! - [`collect`] - Fan-out over accounts and regions
//! - [`cache`] - Caching of collected VPC data

mod cache;
mod cli;
mod collect;
mod ec2;
mod organizations;
mod session;

// Re-export public types and functions
pub use cache::{default_cache_file, load_networks, read_vpc_cache, write_vpc_cache, CacheMode, VpcCache};
pub use cli::{fetch_paginated, AwsCli, ProcessRunner};
pub use collect::{collect_networks, CollectOptions};
pub use ec2::{list_regions, list_vpcs};
pub use organizations::list_accounts;
pub use session::{assume_role, role_arn, Credentials, Session};
