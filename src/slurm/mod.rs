mod config;
mod misc;
mod nodes;

use std::collections::HashMap;

pub use config::{PartitionConfig, SlurmConfig};
pub use nodes::{Node, PartitionName};

use color_eyre::Result;
use tracing::{debug, warn};

use crate::partitions::PartitionInfo;
use misc::unique_values;

/// Partition inventory of the local Slurm cluster
pub struct Slurm {}

impl Slurm {
    /// Queries `sinfo` and `scontrol` for the partitions of the cluster
    pub fn collect(sinfo: &str, scontrol: &str) -> Result<Vec<PartitionInfo>> {
        let nodes = Node::collect(sinfo)?;
        let config = SlurmConfig::collect(scontrol)?;

        let partitions = Slurm::partitions(&nodes, &config);
        debug!(
            nodes = nodes.len(),
            partitions = partitions.len(),
            "collected Slurm inventory"
        );

        Ok(partitions)
    }

    /// Summarizes nodes per partition, in the order partitions are first listed
    pub fn partitions(nodes: &[Node], config: &SlurmConfig) -> Vec<PartitionInfo> {
        let mut order: Vec<&str> = Vec::new();
        let mut members: HashMap<&str, Vec<&Node>> = HashMap::new();
        for node in nodes {
            let label = node.partition.label.as_str();
            members
                .entry(label)
                .or_insert_with(|| {
                    order.push(label);
                    Vec::new()
                })
                .push(node);
        }

        order
            .into_iter()
            .map(|label| {
                let nodes = &members[label];
                let accounts = match config.partitions.get(label) {
                    Some(partition) => partition.accounts.clone(),
                    None => {
                        warn!(partition = label, "partition not reported by scontrol");
                        Vec::new()
                    }
                };

                PartitionInfo {
                    partition_name: label.to_string(),
                    node_count: Some(unique_values(nodes.iter().map(|v| &v.name)) as i64),
                    max_cpus_per_node: nodes.iter().map(|v| v.cpus as i64).max(),
                    max_gpus_per_node: nodes.iter().map(|v| v.gpus as i64).max(),
                    accounts,
                }
            })
            .collect()
    }
}
