//! Output formatting for report data.
//!
//! This module handles formatting and outputting accounts, regions, VPCs and
//! overlaps:
//! - [`csv`] - CSV output formatting
//! - [`terminal`] - Aligned terminal tables with colors

mod csv;
mod terminal;

pub use csv::{escape_csv_field, write_csv};
pub use terminal::{format_field, write_table};

use crate::models::{Account, NetworkRecord, OverlapRecord, Region};
use crate::BoxError;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

/// Output format selected on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Table,
}

/// A record that renders as one row of named columns.
pub trait Tabular {
    /// Column names, in row order.
    fn header() -> &'static [&'static str];
    /// Field values, same length as [`Tabular::header`].
    fn fields(&self) -> Vec<String>;
}

impl Tabular for Account {
    fn header() -> &'static [&'static str] {
        &["AccountId", "AccountName"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

impl Tabular for Region {
    fn header() -> &'static [&'static str] {
        &["RegionName"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

impl Tabular for NetworkRecord {
    fn header() -> &'static [&'static str] {
        &["VpcId", "CidrBlock", "AccountId", "AccountName", "Region"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.network_id.clone(),
            self.address_block.clone(),
            self.account_id.clone(),
            self.account_name.clone(),
            self.region.clone(),
        ]
    }
}

impl Tabular for OverlapRecord {
    fn header() -> &'static [&'static str] {
        &[
            "FirstVpcAccountId",
            "FirstVpcAccountName",
            "FirstVpcRegion",
            "FirstVpcId",
            "FirstVpcCidr",
            "SecondVpcAccountId",
            "SecondVpcAccountName",
            "SecondVpcRegion",
            "SecondVpcId",
            "SecondVpcCidr",
        ]
    }

    fn fields(&self) -> Vec<String> {
        [&self.first, &self.second]
            .iter()
            .flat_map(|n| {
                [
                    n.account_id.clone(),
                    n.account_name.clone(),
                    n.region.clone(),
                    n.network_id.clone(),
                    n.address_block.clone(),
                ]
            })
            .collect()
    }
}

/// Render `rows` in the requested format.
pub fn render<W, T>(out: &mut W, format: OutputFormat, rows: &[T]) -> Result<(), BoxError>
where
    W: Write,
    T: Tabular + Serialize,
{
    match format {
        OutputFormat::Csv => write_csv(out, rows)?,
        OutputFormat::Table => write_table(out, rows)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json() {
        let rows = vec![NetworkRecord::new("1", "a", "us-east-1", "vpc-1", "10.0.0.0/16")];
        let mut out = Vec::new();
        render(&mut out, OutputFormat::Json, &rows).unwrap();
        let parsed: Vec<NetworkRecord> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_fields_match_header() {
        let n = NetworkRecord::new("1", "a", "r", "v", "10.0.0.0/8");
        let o = OverlapRecord {
            first: n.clone(),
            second: n.clone(),
        };
        assert_eq!(o.fields().len(), OverlapRecord::header().len());
        assert_eq!(n.fields().len(), NetworkRecord::header().len());
    }
}
