//! Fan-out over organization accounts and regions.
//!
//! Produces the flat, ordered list of networks the overlap check consumes.

use super::cli::AwsCli;
use super::ec2::{list_regions, list_vpcs};
use super::organizations::list_accounts;
use super::session::{assume_role, Session};
use crate::config;
use crate::models::NetworkRecord;
use crate::BoxError;
use futures::stream::{self, StreamExt, TryStreamExt};

/// How networks are collected from each account.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Role assumed in every member account.
    pub role_name: String,
    /// STS session name for the assumed role.
    pub session_name: String,
    /// Also report secondary CIDR associations.
    pub all_cidr_blocks: bool,
    /// Region queries in flight per account.
    pub max_concurrent_regions: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            role_name: config::DEFAULT_ROLE_NAME.to_string(),
            session_name: config::DEFAULT_SESSION_NAME.to_string(),
            all_cidr_blocks: false,
            max_concurrent_regions: config::DEFAULT_MAX_CONCURRENT_REGIONS,
        }
    }
}

/// Collect VPC blocks of every active account in every region.
///
/// Regions are listed once with the base session. Records are ordered by
/// account listing order, then region listing order, then VPC order,
/// independent of which region query finishes first.
///
/// # Errors
/// Any failed call aborts the collection, no partial list is returned.
pub async fn collect_networks<C: AwsCli + ?Sized>(
    cli: &C,
    session: &Session,
    options: &CollectOptions,
) -> Result<Vec<NetworkRecord>, BoxError> {
    let accounts = list_accounts(cli, session).await?;
    let regions = list_regions(cli, session).await?;
    let mut networks: Vec<NetworkRecord> = Vec::new();

    for account in &accounts {
        if !account.is_active() {
            log::warn!(
                "Skipping account {} ({}) with status {:?}",
                account.id,
                account.name,
                account.status
            );
            continue;
        }

        log::info!("Processing account {} ({})", account.id, account.name);
        let account_session = assume_role(
            cli,
            session,
            &account.id,
            &options.role_name,
            &options.session_name,
        )
        .await
        .map_err(|e| format!("Assuming role in account {}: {e}", account.id))?;

        let per_region: Vec<Vec<NetworkRecord>> = stream::iter(regions.iter())
            .map(|region| {
                list_vpcs(
                    cli,
                    &account_session,
                    account,
                    region,
                    options.all_cidr_blocks,
                )
            })
            .buffered(options.max_concurrent_regions.max(1))
            .try_collect()
            .await?;

        networks.extend(per_region.into_iter().flatten());
    }

    log::info!(
        "Collected {} VPC blocks from {} accounts x {} regions",
        networks.len(),
        accounts.len(),
        regions.len()
    );
    Ok(networks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::cli::fake::FakeCli;

    fn assume_role_json(key: &str) -> String {
        format!(
            r#"{{"Credentials": {{"AccessKeyId": "{key}", "SecretAccessKey": "s", "SessionToken": "t"}}}}"#
        )
    }

    fn fake_org() -> FakeCli {
        FakeCli::new()
            .with(
                "aws organizations list-accounts --max-items 50 --output json",
                r#"{"Accounts": [
                    {"Id": "111111111111", "Name": "shared", "Status": "ACTIVE"},
                    {"Id": "333333333333", "Name": "closed", "Status": "SUSPENDED"},
                    {"Id": "222222222222", "Name": "prod", "Status": "ACTIVE"}
                ]}"#,
            )
            .with(
                "aws ec2 describe-regions --output json",
                r#"{"Regions": [{"RegionName": "us-east-1"}, {"RegionName": "eu-west-1"}]}"#,
            )
            .with(
                "aws sts assume-role --role-arn arn:aws:iam::111111111111:role/Admin --role-session-name AssumeRoleSession1 --output json",
                &assume_role_json("KEY1"),
            )
            .with(
                "aws sts assume-role --role-arn arn:aws:iam::222222222222:role/Admin --role-session-name AssumeRoleSession1 --output json",
                &assume_role_json("KEY2"),
            )
            .with(
                "aws ec2 describe-vpcs --region us-east-1 --max-items 50 --output json",
                r#"{"Vpcs": [{"VpcId": "vpc-use1", "CidrBlock": "10.0.0.0/16"}]}"#,
            )
            .with(
                "aws ec2 describe-vpcs --region eu-west-1 --max-items 50 --output json",
                r#"{"Vpcs": [{"VpcId": "vpc-euw1", "CidrBlock": "10.1.0.0/16"}]}"#,
            )
    }

    #[tokio::test]
    async fn test_collect_networks_order() {
        let cli = fake_org();
        let base = Session::new(Some("org-root".to_string()), None);
        let networks = collect_networks(&cli, &base, &CollectOptions::default())
            .await
            .unwrap();

        let keys: Vec<(&str, &str, &str)> = networks
            .iter()
            .map(|n| {
                (
                    n.account_id.as_str(),
                    n.region.as_str(),
                    n.network_id.as_str(),
                )
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                ("111111111111", "us-east-1", "vpc-use1"),
                ("111111111111", "eu-west-1", "vpc-euw1"),
                ("222222222222", "us-east-1", "vpc-use1"),
                ("222222222222", "eu-west-1", "vpc-euw1"),
            ]
        );
        assert_eq!(networks[2].account_name, "prod");
    }

    #[tokio::test]
    async fn test_collect_networks_uses_assumed_sessions() {
        let cli = fake_org();
        let base = Session::new(Some("org-root".to_string()), None);
        collect_networks(&cli, &base, &CollectOptions::default())
            .await
            .unwrap();

        for (session, cmd) in cli.calls() {
            if cmd.starts_with("aws ec2 describe-vpcs") {
                assert!(session.profile.is_none(), "{cmd}");
                assert!(session.credentials.is_some(), "{cmd}");
            } else {
                assert_eq!(session, base, "{cmd}");
            }
        }
        // the suspended account is never assumed
        assert!(!cli
            .calls()
            .iter()
            .any(|(_, cmd)| cmd.contains("333333333333")));
    }

    #[tokio::test]
    async fn test_collect_networks_assume_role_failure() {
        let cli = FakeCli::new()
            .with(
                "aws organizations list-accounts --max-items 50 --output json",
                r#"{"Accounts": [{"Id": "444444444444", "Name": "locked", "Status": "ACTIVE"}]}"#,
            )
            .with(
                "aws ec2 describe-regions --output json",
                r#"{"Regions": [{"RegionName": "us-east-1"}]}"#,
            );
        let err = collect_networks(&cli, &Session::default(), &CollectOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("444444444444"));
    }
}
