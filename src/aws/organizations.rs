//! AWS Organizations account listing.

use super::cli::{fetch_paginated, AwsCli};
use super::session::Session;
use crate::models::Account;
use crate::BoxError;

/// List every account of the organization visible to `session`.
pub async fn list_accounts<C: AwsCli + ?Sized>(
    cli: &C,
    session: &Session,
) -> Result<Vec<Account>, BoxError> {
    let accounts: Vec<Account> =
        fetch_paginated(cli, session, "aws organizations list-accounts", "Accounts").await?;
    log::info!("Found {} accounts in organization", accounts.len());
    Ok(accounts)
}
