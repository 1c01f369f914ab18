use std::str::FromStr;

use argh::FromArgs;
use tracing::Level;

use crate::report::Format;

/// Batch queue and credential views for science gateways
#[derive(FromArgs, Debug)]
pub struct Args {
    /// maximum level of messages logged to stderr (error, warn, info, debug, trace)
    #[argh(option, default = "Level::WARN")]
    pub log_level: Level,

    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand)]
pub enum Command {
    Queues(QueuesArgs),
    Credentials(CredentialsArgs),
}

/// Derive batch queues from the partitions of a compute resource
#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand, name = "queues")]
pub struct QueuesArgs {
    /// partition inventory as JSON, or `-` for stdin; Slurm is queried if not set
    #[argh(option)]
    pub partitions: Option<String>,

    /// location of `sinfo` executable
    #[argh(option, default = "\"sinfo\".to_string()")]
    pub sinfo: String,

    /// location of `scontrol` executable
    #[argh(option, default = "\"scontrol\".to_string()")]
    pub scontrol: String,

    /// output format (csv or json)
    #[argh(option, default = "Format::Csv")]
    pub format: Format,
}

/// Which credentials of a merged view to report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    All,
    Owned,
    Inherited,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(View::All),
            "owned" => Ok(View::Owned),
            "inherited" => Ok(View::Inherited),
            _ => Err(format!(
                "unknown view {:?}; expected all, owned or inherited",
                s
            )),
        }
    }
}

/// Merge owned and shared credentials into one view
#[derive(FromArgs, Debug, PartialEq)]
#[argh(subcommand, name = "credentials")]
pub struct CredentialsArgs {
    /// credentials owned by the user as JSON, or `-` for stdin
    #[argh(option)]
    pub owned: String,

    /// access-control feed as JSON; treated as absent if not set
    #[argh(option)]
    pub access: Option<String>,

    /// identifier of the user owning the credentials
    #[argh(option)]
    pub user: String,

    /// credentials to report (all, owned or inherited)
    #[argh(option, default = "View::All")]
    pub view: View,

    /// report each token only once, preferring owned credentials
    #[argh(switch)]
    pub distinct: bool,

    /// output format (csv or json)
    #[argh(option, default = "Format::Csv")]
    pub format: Format,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, argh::EarlyExit> {
        Args::from_args(&["gatewayboard"], args)
    }

    #[test]
    fn test_queues_defaults() {
        let args = parse(&["queues"]).unwrap();
        assert_eq!(args.log_level, Level::WARN);
        assert_eq!(
            args.command,
            Some(Command::Queues(QueuesArgs {
                partitions: None,
                sinfo: "sinfo".to_string(),
                scontrol: "scontrol".to_string(),
                format: Format::Csv,
            }))
        );
    }

    #[test]
    fn test_credentials() {
        let args = parse(&[
            "--log-level",
            "debug",
            "credentials",
            "--owned",
            "owned.json",
            "--user",
            "user@example.com",
            "--view",
            "inherited",
            "--distinct",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.log_level, Level::DEBUG);
        assert_eq!(
            args.command,
            Some(Command::Credentials(CredentialsArgs {
                owned: "owned.json".to_string(),
                access: None,
                user: "user@example.com".to_string(),
                view: View::Inherited,
                distinct: true,
                format: Format::Json,
            }))
        );
    }

    #[test]
    fn test_credentials_require_user() {
        assert!(parse(&["credentials", "--owned", "owned.json"]).is_err());
    }

    #[test]
    fn test_invalid_view() {
        assert!(parse(&["credentials", "--owned", "-", "--user", "u", "--view", "mine"]).is_err());
    }
}
