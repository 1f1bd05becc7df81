//! Explicit AWS session handles.
//!
//! A [`Session`] is passed to every AWS call and rendered into the `aws`
//! child process environment. Assuming a role produces a new session, the
//! base session is never mutated.

use super::cli::AwsCli;
use crate::BoxError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Temporary credentials returned by `sts assume-role`.
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &"***")
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssumeRoleResponse {
    credentials: Credentials,
}

/// Credential and region context for one `aws` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Named profile from the AWS config files.
    pub profile: Option<String>,
    /// Default region for commands that do not pass `--region`.
    pub region: Option<String>,
    /// Assumed-role credentials, take precedence over the profile.
    pub credentials: Option<Credentials>,
}

impl Session {
    pub fn new(profile: Option<String>, region: Option<String>) -> Session {
        Session {
            profile,
            region,
            credentials: None,
        }
    }

    /// A session using `credentials` in place of the profile.
    pub fn with_credentials(&self, credentials: Credentials) -> Session {
        Session {
            profile: None,
            region: self.region.clone(),
            credentials: Some(credentials),
        }
    }

    /// Environment for the `aws` child process.
    ///
    /// `None` values must be removed from the inherited environment.
    pub fn env(&self) -> Vec<(&'static str, Option<String>)> {
        let mut env = vec![("AWS_PAGER", Some(String::new()))];
        if let Some(region) = &self.region {
            env.push(("AWS_DEFAULT_REGION", Some(region.clone())));
        }
        match &self.credentials {
            Some(c) => {
                env.push(("AWS_PROFILE", None));
                env.push(("AWS_ACCESS_KEY_ID", Some(c.access_key_id.clone())));
                env.push(("AWS_SECRET_ACCESS_KEY", Some(c.secret_access_key.clone())));
                env.push(("AWS_SESSION_TOKEN", Some(c.session_token.clone())));
            }
            None => {
                if let Some(profile) = &self.profile {
                    env.push(("AWS_PROFILE", Some(profile.clone())));
                }
            }
        }
        env
    }
}

/// IAM role ARN for `role_name` in `account_id`.
pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{role_name}")
}

/// Assume `role_name` in `account_id` using the `base` session.
///
/// # Returns
/// * `Ok(Session)` - A session carrying the temporary credentials
/// * `Err` - If the STS call fails or returns unexpected JSON
pub async fn assume_role<C: AwsCli + ?Sized>(
    cli: &C,
    base: &Session,
    account_id: &str,
    role_name: &str,
    session_name: &str,
) -> Result<Session, BoxError> {
    let arn = role_arn(account_id, role_name);
    log::debug!("assume_role({arn})");

    let cmd = format!(
        "aws sts assume-role --role-arn {arn} --role-session-name {session_name} --output json"
    );
    let output = cli.run(base, &cmd).await?;

    let mut deserializer = serde_json::Deserializer::from_str(&output);
    let response: AssumeRoleResponse = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| {
            format!(
                "Error parsing assume-role response for {arn}: path={} error={}",
                e.path(),
                e
            )
        })?;

    if let Some(expiration) = response.credentials.expiration {
        log::debug!("Assumed {arn}, credentials expire {expiration}");
    }

    Ok(base.with_credentials(response.credentials))
}
