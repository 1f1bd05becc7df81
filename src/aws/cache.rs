//! Cache management for collected VPC data.
//!
//! Provides caching functionality to avoid re-enumerating the whole
//! organization on every run.

use super::cli::AwsCli;
use super::collect::{collect_networks, CollectOptions};
use super::session::Session;
use crate::models::NetworkRecord;
use crate::BoxError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk form of the cache file.
#[derive(Serialize, Deserialize, Debug)]
pub struct VpcCache {
    pub created: DateTime<Utc>,
    pub networks: Vec<NetworkRecord>,
}

/// Where collected networks come from.
#[derive(Debug, Clone)]
pub enum CacheMode {
    /// Always enumerate, never touch the disk.
    Off,
    /// Use today's dated cache file, creating it when missing.
    Daily(Tz),
    /// Read this file, which must exist.
    File(String),
}

/// Dated cache file name, e.g. `vpc_cache_2026-10-17.json`.
pub fn default_cache_file(tz: Tz) -> String {
    let now = Utc::now().with_timezone(&tz);
    format!("vpc_cache_{}.json", now.format("%Y-%m-%d"))
}

/// Read networks from a cache file.
pub fn read_vpc_cache(cache_file: &str) -> Result<Vec<NetworkRecord>, BoxError> {
    let json = std::fs::read_to_string(cache_file)
        .map_err(|e| format!("Error reading cache file {cache_file}: {e}"))?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let cache: VpcCache = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing cache JSON {cache_file}: path={} error={}",
            e.path(),
            e
        )
    })?;

    log::info!(
        "Read {} networks from cache file {cache_file} created {}",
        cache.networks.len(),
        cache.created
    );
    Ok(cache.networks)
}

/// Write networks to a cache file.
pub fn write_vpc_cache(cache_file: &str, networks: &[NetworkRecord]) -> Result<(), BoxError> {
    let cache = VpcCache {
        created: Utc::now(),
        networks: networks.to_vec(),
    };
    let json =
        serde_json::to_string_pretty(&cache).map_err(|e| format!("Error serializing JSON: {e}"))?;
    log::warn!("Writing data to cache file: {cache_file}");
    std::fs::write(cache_file, json)
        .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;
    Ok(())
}

/// Load networks from the cache, or collect them from AWS.
///
/// # Returns
/// * `Ok(Vec<NetworkRecord>)` - Networks from cache or AWS
/// * `Err` - If an explicit cache file doesn't exist, or collection fails
pub async fn load_networks<C: AwsCli + ?Sized>(
    cli: &C,
    session: &Session,
    options: &CollectOptions,
    mode: &CacheMode,
) -> Result<Vec<NetworkRecord>, BoxError> {
    match mode {
        CacheMode::Off => collect_networks(cli, session, options).await,
        CacheMode::File(file) => {
            if !Path::new(file).exists() {
                return Err(format!("Cache file does not exist: {file}").into());
            }
            log::info!("Using provided cache file: {file}");
            read_vpc_cache(file)
        }
        CacheMode::Daily(tz) => {
            let cache_file = default_cache_file(*tz);
            if Path::new(&cache_file).exists() {
                return read_vpc_cache(&cache_file);
            }
            log::warn!("Cache file not found: {cache_file}");
            let networks = collect_networks(cli, session, options).await?;
            write_vpc_cache(&cache_file, &networks)?;
            Ok(networks)
        }
    }
}
