//! EC2 region and VPC listing.

use super::cli::{fetch_paginated, AwsCli};
use super::session::Session;
use crate::models::{Account, NetworkRecord, Region};
use crate::BoxError;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct DescribeRegions {
    regions: Vec<Region>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct CidrBlockState {
    state: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct CidrBlockAssociation {
    cidr_block: String,
    cidr_block_state: Option<CidrBlockState>,
}

/// The parts of a `describe-vpcs` entry we report on.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Vpc {
    vpc_id: String,
    cidr_block: String,
    #[serde(default)]
    is_default: bool,
    #[serde(default)]
    cidr_block_association_set: Vec<CidrBlockAssociation>,
}

impl Vpc {
    /// Primary block first, then secondary blocks when `all_blocks` is set.
    fn into_records(self, account: &Account, region: &Region, all_blocks: bool) -> Vec<NetworkRecord> {
        let record = |cidr: &str| NetworkRecord {
            is_default: self.is_default,
            ..NetworkRecord::new(&account.id, &account.name, &region.name, &self.vpc_id, cidr)
        };

        let mut records = vec![record(&self.cidr_block)];
        if all_blocks {
            records.extend(
                self.cidr_block_association_set
                    .iter()
                    .filter(|a| a.cidr_block != self.cidr_block)
                    .filter(|a| {
                        a.cidr_block_state
                            .as_ref()
                            .map_or(true, |s| s.state == "associated")
                    })
                    .map(|a| record(&a.cidr_block)),
            );
        }
        records
    }
}

/// List regions enabled for the session's account.
pub async fn list_regions<C: AwsCli + ?Sized>(
    cli: &C,
    session: &Session,
) -> Result<Vec<Region>, BoxError> {
    let output = cli
        .run(session, "aws ec2 describe-regions --output json")
        .await?;

    let mut deserializer = serde_json::Deserializer::from_str(&output);
    let response: DescribeRegions = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing describe-regions: path={} error={}", e.path(), e))?;

    log::info!("Found {} regions", response.regions.len());
    Ok(response.regions)
}

/// List VPC address blocks of `account` in `region`.
///
/// `session` must carry credentials for `account`.
pub async fn list_vpcs<C: AwsCli + ?Sized>(
    cli: &C,
    session: &Session,
    account: &Account,
    region: &Region,
    all_blocks: bool,
) -> Result<Vec<NetworkRecord>, BoxError> {
    let base_cmd = format!("aws ec2 describe-vpcs --region {}", region.name);
    let vpcs: Vec<Vpc> = fetch_paginated(cli, session, &base_cmd, "Vpcs")
        .await
        .map_err(|e| format!("Listing VPCs of {} in {}: {e}", account.id, region.name))?;

    let records: Vec<NetworkRecord> = vpcs
        .into_iter()
        .flat_map(|vpc| vpc.into_records(account, region, all_blocks))
        .collect();

    log::debug!(
        "account {} ({}) region {}: {} VPC blocks",
        account.id,
        account.name,
        region.name,
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::cli::fake::FakeCli;

    const DESCRIBE_VPCS_JSON: &str = r#"{
        "Vpcs": [
            {
                "CidrBlock": "172.31.0.0/16",
                "DhcpOptionsId": "dopt-1",
                "State": "available",
                "VpcId": "vpc-default",
                "OwnerId": "111111111111",
                "InstanceTenancy": "default",
                "CidrBlockAssociationSet": [
                    {"AssociationId": "a-1", "CidrBlock": "172.31.0.0/16", "CidrBlockState": {"State": "associated"}}
                ],
                "IsDefault": true
            },
            {
                "CidrBlock": "10.0.0.0/16",
                "VpcId": "vpc-app",
                "CidrBlockAssociationSet": [
                    {"AssociationId": "a-2", "CidrBlock": "10.0.0.0/16", "CidrBlockState": {"State": "associated"}},
                    {"AssociationId": "a-3", "CidrBlock": "100.64.0.0/16", "CidrBlockState": {"State": "associated"}},
                    {"AssociationId": "a-4", "CidrBlock": "10.9.0.0/16", "CidrBlockState": {"State": "disassociated"}}
                ],
                "IsDefault": false
            }
        ]
    }"#;

    fn account() -> Account {
        Account {
            id: "111111111111".to_string(),
            name: "root".to_string(),
            status: Some("ACTIVE".to_string()),
        }
    }

    fn region() -> Region {
        Region {
            name: "eu-west-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_regions() {
        let cli = FakeCli::new().with(
            "aws ec2 describe-regions --output json",
            r#"{"Regions": [
                {"Endpoint": "ec2.eu-west-1.amazonaws.com", "RegionName": "eu-west-1", "OptInStatus": "opt-in-not-required"},
                {"Endpoint": "ec2.us-east-1.amazonaws.com", "RegionName": "us-east-1", "OptInStatus": "opt-in-not-required"}
            ]}"#,
        );
        let regions = list_regions(&cli, &Session::default()).await.unwrap();
        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["eu-west-1", "us-east-1"]);
    }

    #[tokio::test]
    async fn test_list_vpcs_primary_blocks() {
        let cli = FakeCli::new().with(
            "aws ec2 describe-vpcs --region eu-west-1 --max-items 50 --output json",
            DESCRIBE_VPCS_JSON,
        );
        let records = list_vpcs(&cli, &Session::default(), &account(), &region(), false)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].network_id, "vpc-default");
        assert!(records[0].is_default);
        assert_eq!(records[1].address_block, "10.0.0.0/16");
        assert_eq!(records[1].account_name, "root");
        assert_eq!(records[1].region, "eu-west-1");
    }

    #[tokio::test]
    async fn test_list_vpcs_all_blocks() {
        let cli = FakeCli::new().with(
            "aws ec2 describe-vpcs --region eu-west-1 --max-items 50 --output json",
            DESCRIBE_VPCS_JSON,
        );
        let records = list_vpcs(&cli, &Session::default(), &account(), &region(), true)
            .await
            .unwrap();
        let blocks: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.network_id.as_str(), r.address_block.as_str()))
            .collect();
        assert_eq!(
            blocks,
            vec![
                ("vpc-default", "172.31.0.0/16"),
                ("vpc-app", "10.0.0.0/16"),
                ("vpc-app", "100.64.0.0/16"),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_vpcs_error_names_account() {
        let cli = FakeCli::new();
        let err = list_vpcs(&cli, &Session::default(), &account(), &region(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("111111111111 in eu-west-1"));
    }
}
