//! Domain models for the VPC overlap report.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] - IPv4 network with CIDR notation support
//! - [`NetworkRecord`] and [`OverlapRecord`] - discovered VPCs and their conflicts
//! - [`Account`] and [`Region`] - organization enumeration results

mod account;
mod ipv4;
mod network;

// Re-export public types
pub use account::{Account, Region};
pub use ipv4::{get_cidr_mask, Ipv4, MAX_LENGTH};
pub use network::{NetworkRecord, OverlapRecord};
