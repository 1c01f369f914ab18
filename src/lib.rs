/// Application.
pub mod app;
/// Command-line arguments
pub mod args;
/// Merging of owned and shared credentials
pub mod credentials;
/// Loading of upstream JSON feeds
pub mod feeds;
/// Derivation of batch queues from partitions
pub mod partitions;
/// CSV and JSON reports
pub mod report;
/// Querying of Slurm partitions
pub mod slurm;
mod utilities;
