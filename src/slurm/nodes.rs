use std::fmt;
use std::process::Command;

use color_eyre::eyre::{bail, Context};
use color_eyre::Result;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::misc::format_string;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionName {
    /// Name of a partition
    pub label: String,
    /// Indicates the default partition; the flag is not part of the name
    pub default: bool,
}

impl PartitionName {
    /// Trims the trailing '*' indicating that a partition is the default partition
    pub fn from_str<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: &str = Deserialize::deserialize(deserializer)?;

        Ok(Self {
            label: value.trim_end_matches('*').to_string(),
            default: value.ends_with('*'),
        })
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.default {
            write!(f, "{}*", self.label)
        } else {
            fmt::Display::fmt(&self.label, f)
        }
    }
}

/// A node as listed by `sinfo -N`; nodes in multiple partitions are listed once per partition
#[derive(Clone, Debug, Deserialize)]
pub struct Node {
    #[serde(rename = "NODELIST")]
    pub name: String,
    #[serde(rename = "PARTITION", deserialize_with = "PartitionName::from_str")]
    pub partition: PartitionName,
    #[serde(rename = "CPUS")]
    pub cpus: usize,

    #[serde(skip_deserializing)]
    pub gpus: usize,
    #[serde(rename = "GRES")]
    gres: String,
}

impl Node {
    pub fn collect(exe: &str) -> Result<Vec<Node>> {
        debug!(exe, "querying nodes");
        let output = Command::new(exe)
            .args(["-N", "--Format", &sinfo_format()])
            .output()
            .wrap_err_with(|| format!("failed to execute {:?}", exe))?;

        if !output.status.success() {
            bail!(
                "{:?} failed with {}: {}",
                exe,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Self::parse(std::io::Cursor::new(output.stdout))
    }

    /// Parses `|` delimited `sinfo` output into a vector of `Node`
    pub(crate) fn parse<R>(reader: R) -> Result<Vec<Node>>
    where
        R: std::io::Read,
    {
        let mut nodes = Vec::new();
        for node in csv::ReaderBuilder::new()
            .delimiter(b'|')
            .from_reader(reader)
            .deserialize::<Node>()
        {
            let mut node = node.wrap_err("error while parsing sinfo output")?;
            node.gpus = parse_gpus(&node.gres).wrap_err("parsing GRES")?;

            nodes.push(node);
        }

        Ok(nodes)
    }
}

/// Generates parameter for the `--Format` command-line option for `sinfo`
fn sinfo_format() -> String {
    format_string(["CPUs", "Gres", "NodeList", "Partition"].iter())
}

/// Sums the GPUs listed in a GRES string, e.g. `gpu:a100:4(S:0-1),gpu:2(S:0)`
fn parse_gpus(gres: &str) -> Result<usize> {
    let mut gpus = 0;
    for value in gres.split(',') {
        if value.starts_with("gpu:") {
            // The socket suffix may itself contain ':'
            let (value, _) = value.split_once('(').unwrap_or((value, ""));
            let value = value.rsplit(':').next().unwrap_or(value);

            gpus += value
                .parse::<usize>()
                .wrap_err_with(|| format!("parsing GRES: {:?}", value))?;
        }
    }

    Ok(gpus)
}
