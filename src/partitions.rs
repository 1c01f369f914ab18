use serde::{Deserialize, Serialize};

/// Default maximum run time of a derived queue, in minutes
pub const DEFAULT_MAX_RUN_TIME: i64 = 60;
/// Maximum memory of a derived queue; 0 indicates unknown/unbounded
pub const DEFAULT_MAX_MEMORY: i64 = 0;

/// A schedulable partition of a compute cluster, as reported by an inventory
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartitionInfo {
    pub partition_name: String,
    #[serde(default)]
    pub node_count: Option<i64>,
    #[serde(default)]
    pub max_cpus_per_node: Option<i64>,
    #[serde(default)]
    pub max_gpus_per_node: Option<i64>,
    /// Accounts permitted to use the partition; empty if unrestricted
    #[serde(default, deserialize_with = "nullable_list")]
    pub accounts: Vec<String>,
}

/// A scheduler-facing queue derived 1:1 from a [`PartitionInfo`]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchQueue {
    pub queue_name: String,
    pub max_nodes: i64,
    pub cpu_per_node: i64,
    pub max_processors: i64,
    /// Maximum run time in minutes
    pub max_run_time: i64,
    pub max_memory: i64,
}

impl From<&PartitionInfo> for BatchQueue {
    fn from(partition: &PartitionInfo) -> Self {
        let nodes = partition.node_count.unwrap_or(0);
        let cpus = partition.max_cpus_per_node.unwrap_or(0);

        Self {
            queue_name: partition.partition_name.clone(),
            max_nodes: nodes,
            cpu_per_node: cpus,
            max_processors: nodes.saturating_mul(cpus),
            max_run_time: DEFAULT_MAX_RUN_TIME,
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }
}

/// Converts partitions into batch queues, preserving order. A missing list
/// yields no queues; names and counts are not validated.
pub fn map_partitions_to_batch_queues(partitions: Option<&[PartitionInfo]>) -> Vec<BatchQueue> {
    partitions
        .unwrap_or_default()
        .iter()
        .map(BatchQueue::from)
        .collect()
}

/// Accepts `null` in place of a list
pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(name: &str, nodes: i64, cpus: i64) -> PartitionInfo {
        PartitionInfo {
            partition_name: name.to_string(),
            node_count: Some(nodes),
            max_cpus_per_node: Some(cpus),
            max_gpus_per_node: Some(0),
            accounts: Vec::new(),
        }
    }

    #[test]
    fn test_single_partition() {
        let partitions = vec![PartitionInfo {
            accounts: vec!["myaccount".to_string()],
            ..partition("normal", 10, 24)
        }];

        let queues = map_partitions_to_batch_queues(Some(&partitions));
        assert_eq!(
            queues,
            vec![BatchQueue {
                queue_name: "normal".to_string(),
                max_nodes: 10,
                cpu_per_node: 24,
                max_processors: 240,
                max_run_time: 60,
                max_memory: 0,
            }]
        );
    }

    #[test]
    fn test_order_preserved() {
        let partitions = vec![partition("small", 2, 8), partition("gpu", 4, 16)];

        let queues = map_partitions_to_batch_queues(Some(&partitions));
        let names = queues.iter().map(|v| v.queue_name.as_str()).collect::<Vec<_>>();
        let processors = queues.iter().map(|v| v.max_processors).collect::<Vec<_>>();

        assert_eq!(names, ["small", "gpu"]);
        assert_eq!(processors, [16, 64]);
    }

    #[test]
    fn test_missing_partitions() {
        assert_eq!(map_partitions_to_batch_queues(None), Vec::new());
        assert_eq!(map_partitions_to_batch_queues(Some(&[])), Vec::new());
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let partitions = vec![
            PartitionInfo {
                partition_name: "empty".to_string(),
                ..Default::default()
            },
            PartitionInfo {
                partition_name: "nodes-only".to_string(),
                node_count: Some(5),
                ..Default::default()
            },
        ];

        let queues = map_partitions_to_batch_queues(Some(&partitions));
        assert_eq!(queues[0].max_nodes, 0);
        assert_eq!(queues[0].cpu_per_node, 0);
        assert_eq!(queues[0].max_processors, 0);
        assert_eq!(queues[1].max_nodes, 5);
        assert_eq!(queues[1].max_processors, 0);
    }

    #[test]
    fn test_duplicates_and_negative_counts_pass_through() {
        let partitions = vec![partition("dup", 1, 2), partition("dup", -3, 4)];

        let queues = map_partitions_to_batch_queues(Some(&partitions));
        assert_eq!(queues.len(), 2);
        assert_eq!(queues[0].queue_name, queues[1].queue_name);
        assert_eq!(queues[1].max_nodes, -3);
        assert_eq!(queues[1].max_processors, -12);
    }

    #[test]
    fn test_processors_saturate() {
        let partitions = vec![partition("huge", i64::MAX, 2)];
        let queues = map_partitions_to_batch_queues(Some(&partitions));
        assert_eq!(queues[0].max_processors, i64::MAX);
    }

    #[test]
    fn test_deserialize_inventory_json() {
        let json = r#"[
            {"partitionName": "normal", "nodeCount": 10, "maxCpusPerNode": 24,
             "maxGpusPerNode": 0, "accounts": ["myaccount"]},
            {"partitionName": "sparse", "nodeCount": null, "accounts": null}
        ]"#;

        let partitions: Vec<PartitionInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(partitions[0], {
            let mut v = partition("normal", 10, 24);
            v.accounts.push("myaccount".to_string());
            v
        });
        assert_eq!(partitions[1].node_count, None);
        assert!(partitions[1].accounts.is_empty());
    }
}
