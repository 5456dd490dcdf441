//! Command-line transport
//!
//! Drives the engine through its CLI binary. Structured listings use
//! `--format '{{json .}}'` and decode line-wise; a decode failure is
//! reported distinctly from a nonzero exit.

use crate::error::EngineError;
use crate::naming;
use crate::EngineResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::process::Command;

/// One line of `stack ls` output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliStackRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Services")]
    pub services: String,
}

/// Command-line transport to the orchestration daemon
#[async_trait]
pub trait CliTransport: Send + Sync {
    /// True when the CLI can reach the daemon
    async fn ping(&self) -> EngineResult<bool>;
    /// Deploy the spec at `compose_path`, returning the resolved slug name
    async fn deploy(&self, compose_path: &Path, name: Option<&str>) -> EngineResult<String>;
    /// Remove the named stack
    async fn remove(&self, name: &str) -> EngineResult<()>;
    /// All stacks known to the engine
    async fn list_stacks(&self) -> EngineResult<Vec<CliStackRecord>>;
    /// Reclaim unused engine resources
    async fn prune(&self) -> EngineResult<()>;
}

/// `docker` binary transport
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }

    async fn run(&self, args: &[&str]) -> EngineResult<String> {
        tracing::debug!(?args, "running engine CLI");
        let output = Command::new(&self.binary).args(args).output().await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(EngineError::ExitStatus {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }

    async fn run_formatted<T: DeserializeOwned>(&self, args: &[&str]) -> EngineResult<Vec<T>> {
        let mut args = args.to_vec();
        args.extend(["--format", "{{json .}}"]);
        let stdout = self.run(&args).await?;
        parse_json_lines(&stdout)
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CliTransport for DockerCli {
    async fn ping(&self) -> EngineResult<bool> {
        Ok(self.run(&["version"]).await.is_ok())
    }

    async fn deploy(&self, compose_path: &Path, name: Option<&str>) -> EngineResult<String> {
        let name = match name {
            Some(name) => name.to_string(),
            None => naming::random_name(),
        };
        let slug = naming::slugify(&name);

        let path = compose_path.display().to_string();
        self.run(&["stack", "deploy", "--compose-file", &path, &slug])
            .await?;
        tracing::info!(stack = %slug, "stack deployed");
        Ok(slug)
    }

    async fn remove(&self, name: &str) -> EngineResult<()> {
        let slug = naming::slugify(name);
        self.run(&["stack", "rm", &slug]).await?;
        tracing::info!(stack = %slug, "stack removed");
        Ok(())
    }

    async fn list_stacks(&self) -> EngineResult<Vec<CliStackRecord>> {
        self.run_formatted(&["stack", "ls"]).await
    }

    async fn prune(&self) -> EngineResult<()> {
        self.run(&["system", "prune", "-f"]).await?;
        Ok(())
    }
}

/// Decode one JSON document per non-empty line
fn parse_json_lines<T: DeserializeOwned>(stdout: &str) -> EngineResult<Vec<T>> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(EngineError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_record_per_line() {
        let stdout = concat!(
            "{\"Name\":\"amber-jetty\",\"Services\":\"2\"}\n",
            "\n",
            "{\"Name\":\"bold-cedar\",\"Services\":\"1\"}\n",
        );
        let records: Vec<CliStackRecord> = parse_json_lines(stdout).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "amber-jetty");
        assert_eq!(records[1].services, "1");
    }

    #[test]
    fn empty_output_is_an_empty_listing() {
        let records: Vec<CliStackRecord> = parse_json_lines("").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_output_is_a_decode_error_not_an_exit_error() {
        let err = parse_json_lines::<CliStackRecord>("not json at all").unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }
}
