//! Network data processing logic.
//!
//! This module contains business logic for processing discovered networks:
//! - [`filter`] - Pre-detection filtering of default and excluded VPCs
//! - [`overlap`] - Pairwise overlap detection

mod filter;
mod overlap;

// Re-export public functions
pub use filter::{filter_default_networks, filter_excluded_cidrs};
pub use overlap::{detect_overlaps, log_overlaps, OverlapError};
