//! AWS CLI command execution.
//!
//! Provides the [`AwsCli`] seam for running `aws` commands under a
//! [`Session`], the process-backed [`ProcessRunner`], and a paginator for
//! list commands that return a `NextToken`.

use super::session::Session;
use crate::config;
use crate::BoxError;
use async_trait::async_trait;
use colored::Colorize;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tokio::process::Command;

/// Largest stdout accepted from a single command.
const MAX_OUTPUT_BYTES: usize = 5_000_000;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Runs `aws` command lines under a session.
#[async_trait]
pub trait AwsCli: Send + Sync {
    /// Run `cmd` and return its stdout.
    async fn run(&self, session: &Session, cmd: &str) -> Result<String, BoxError>;
}

/// Runs commands as child processes.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

#[async_trait]
impl AwsCli for ProcessRunner {
    /// The command string is split on spaces, with quoted substrings preserved.
    ///
    /// # Returns
    /// * `Ok(String)` - The stdout output on success
    /// * `Err` - If the command fails or produces too much output
    async fn run(&self, session: &Session, cmd: &str) -> Result<String, BoxError> {
        log::debug!("run({cmd})", cmd = cmd.on_blue());

        let cmds: Vec<&str> = split_and_strip(cmd);
        log::trace!("split cmds={:?}", cmds);
        let (program, args) = cmds
            .split_first()
            .ok_or_else(|| format!("Empty command: '{cmd}'"))?;

        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);
        for (key, value) in session.env() {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }

        let output = command.output().await.map_err(|e| {
            log::error!("Command execution failed: {}", e);
            format!("Failed to execute command '{program}': {e}")
        })?;

        if output.status.success() {
            log::debug!("Success cmd: {cmd}");
            log::debug!("Success output.stdout.len(): {}", output.stdout.len());

            if output.stdout.len() > MAX_OUTPUT_BYTES {
                return Err(format!(
                    "Response too large: {} bytes for command: {:?}",
                    output.stdout.len(),
                    cmds
                )
                .into());
            }
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::trace!(
                "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
                code = output.status.code(),
                status = output.status,
                stderr = stderr.red()
            );
            log::warn!(
                "{failed} to run {cmd}",
                failed = "failed".on_red(),
                cmd = cmd.on_blue()
            );
            return Err(format!("ERROR running '{cmd}': {}", stderr.trim()).into());
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;

        Ok(stdout)
    }
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Run a paginated list command and collect the items under `list_key`.
///
/// Pages are requested with `--max-items` and followed through `NextToken`
/// until the response carries none.
///
/// # Errors
/// If a command fails, a page does not parse, or a token repeats.
pub async fn fetch_paginated<T, C>(
    cli: &C,
    session: &Session,
    base_cmd: &str,
    list_key: &str,
) -> Result<Vec<T>, BoxError>
where
    T: DeserializeOwned,
    C: AwsCli + ?Sized,
{
    let mut items: Vec<T> = Vec::new();
    let mut next_token: Option<String> = None;
    let mut count_pages_returned = 0;

    loop {
        let starting_token = next_token
            .as_ref()
            .map(|t| format!(" --starting-token {t}"))
            .unwrap_or_default();
        let cmd = format!(
            "{base_cmd} --max-items {}{starting_token} --output json",
            config::PAGE_SIZE
        );
        let output = cli.run(session, &cmd).await?;

        let mut page: serde_json::Value = serde_json::from_str(&output)
            .map_err(|e| format!("Error parsing JSON page {count_pages_returned}: {e}"))?;

        let page_items = page
            .get_mut(list_key)
            .map(serde_json::Value::take)
            .ok_or_else(|| {
                format!("Missing '{list_key}' in page {count_pages_returned} of '{base_cmd}'")
            })?;
        let page_items: Vec<T> = serde_path_to_error::deserialize(page_items).map_err(|e| {
            log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
            format!(
                "Error parsing JSON page {}: path={}.{} error={}",
                count_pages_returned,
                list_key,
                e.path(),
                e
            )
        })?;
        let count = page_items.len();
        items.extend(page_items);

        let token_new = page
            .get("NextToken")
            .and_then(|t| t.as_str())
            .map(str::to_string);

        log::info!(
            "got page#{count_pages_returned:2} {list_key}=+{count:3} => {total:3} next_token={has_next}",
            total = items.len(),
            has_next = token_new.is_some(),
        );
        count_pages_returned += 1;

        match token_new {
            None => break,
            Some(token) => {
                if next_token.as_ref() == Some(&token) {
                    return Err("Next token not unique - possible infinite loop".into());
                }
                next_token = Some(token);
            }
        }

        // Rate limiting pause
        tokio::time::sleep(std::time::Duration::from_millis(config::SLEEP_MSEC)).await;
    }

    Ok(items)
}
