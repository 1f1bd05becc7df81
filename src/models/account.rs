//! Organization accounts and regions.

use serde::{Deserialize, Serialize};

/// An account in the organization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// ACTIVE, SUSPENDED or PENDING_CLOSURE.
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "ACTIVE")
    }
}

/// A region enabled for the account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Region {
    #[serde(rename = "RegionName")]
    pub name: String,
}
