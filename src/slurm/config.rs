use std::collections::HashMap;
use std::process::Command;

use color_eyre::eyre::{bail, Context};
use color_eyre::Result;
use tracing::debug;

use crate::utilities::split_first;

#[derive(Clone, Default, Debug, PartialEq, Eq)]
/// Per partition configuration
pub struct PartitionConfig {
    /// Accounts allowed to submit to the partition; empty if any account may
    pub accounts: Vec<String>,
}

/// Cluster configuration as reported by `scontrol`
#[derive(Default, Debug)]
pub struct SlurmConfig {
    pub partitions: HashMap<String, PartitionConfig>,
}

impl SlurmConfig {
    /// Calls `scontrol show partition` and collects relevant per-partition configuration.
    /// The nodes associated with each partition are not collected, as this information is
    /// also collected when querying `sinfo` via `Node::collect()`
    pub fn collect(exe: &str) -> Result<SlurmConfig> {
        debug!(exe, "querying partition configuration");
        let output = Command::new(exe)
            .args(["show", "partition", "--oneline"])
            .output()
            .wrap_err_with(|| format!("failed to execute `{} show partition`", exe))?;

        if !output.status.success() {
            bail!(
                "`{} show partition` failed with {}: {}",
                exe,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Self::parse(&output.stdout)
    }

    /// Parses the output of `scontrol show partition --oneline`
    pub fn parse(output: &[u8]) -> Result<SlurmConfig> {
        let mut partitions = HashMap::new();

        for line in output.split(|&c| c == b'\n') {
            let mut values = HashMap::<&[u8], &[u8]>::new();

            for value in line.split(|&c| c.is_ascii_whitespace()) {
                if let Some((key, value)) = split_first(value, b'=') {
                    values.insert(key.trim_ascii(), value);
                }
            }

            if let Some(partition) = values.get(b"PartitionName".as_slice()) {
                let config = PartitionConfig {
                    accounts: values
                        .get(b"AllowAccounts".as_slice())
                        .map(|value| Self::parse_accounts(value))
                        .transpose()?
                        .unwrap_or_default(),
                };

                partitions.insert(
                    String::from_utf8(partition.to_vec()).wrap_err("invalid partition name")?,
                    config,
                );
            }
        }

        Ok(SlurmConfig { partitions })
    }

    /// Parses a comma separated list of accounts; `ALL` indicates no restrictions
    fn parse_accounts(value: &[u8]) -> Result<Vec<String>> {
        let value = std::str::from_utf8(value.trim_ascii()).wrap_err("invalid AllowAccounts")?;
        if value == "ALL" {
            return Ok(Vec::new());
        }

        Ok(value
            .split(',')
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect())
    }
}
