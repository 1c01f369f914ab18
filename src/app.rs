use std::io::Write;

use color_eyre::eyre::bail;
use color_eyre::Result;
use tracing::{debug, info, warn};

use crate::args::{Args, Command, CredentialsArgs, QueuesArgs, View};
use crate::credentials::{count_non_inherited, distinct_by_token, merge_credential_access};
use crate::feeds;
use crate::partitions::map_partitions_to_batch_queues;
use crate::report;
use crate::slurm::Slurm;

#[derive(Debug)]
pub struct App {
    /// Command-line args
    pub args: Args,
}

impl App {
    /// Constructs a new instance of [`App`].
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Runs the selected command, writing the report to `writer`
    pub fn run<W: Write>(&self, writer: W) -> Result<()> {
        match &self.args.command {
            Some(Command::Queues(args)) => Self::queues(args, writer),
            Some(Command::Credentials(args)) => Self::credentials(args, writer),
            None => bail!("no command given; see --help for usage"),
        }
    }

    fn queues<W: Write>(args: &QueuesArgs, writer: W) -> Result<()> {
        let partitions = match &args.partitions {
            Some(path) => feeds::load_partitions(path)?,
            None => Some(Slurm::collect(&args.sinfo, &args.scontrol)?),
        };

        if partitions.is_none() {
            warn!("partition inventory is absent");
        }

        let queues = map_partitions_to_batch_queues(partitions.as_deref());
        info!(queues = queues.len(), "derived batch queues");

        report::write_queues(writer, &queues, args.format)
    }

    fn credentials<W: Write>(args: &CredentialsArgs, writer: W) -> Result<()> {
        if args.owned == "-" && args.access.as_deref() == Some("-") {
            bail!("--owned and --access cannot both be read from stdin");
        }

        let owned = feeds::load_owned_credentials(&args.owned)?;
        let access = feeds::load_access_credentials(args.access.as_deref())?;

        let excluded = count_non_inherited(access.as_deref());
        if excluded > 0 {
            debug!(excluded, "ignored access-control items not tagged as inherited");
        }

        let merged = merge_credential_access(&owned, access.as_deref(), &args.user);
        info!(
            owned = merged.owned_credentials.len(),
            inherited = merged.inherited_credentials.len(),
            "merged credentials"
        );

        let credentials = match args.view {
            View::All => &merged.credentials,
            View::Owned => &merged.owned_credentials,
            View::Inherited => &merged.inherited_credentials,
        };

        if args.distinct {
            let distinct = distinct_by_token(credentials);
            if distinct.len() < credentials.len() {
                warn!(
                    duplicates = credentials.len() - distinct.len(),
                    "removed credentials with repeated tokens"
                );
            }

            report::write_credentials(writer, &distinct, args.format)
        } else {
            report::write_credentials(writer, credentials, args.format)
        }
    }
}
