use std::io::Write;
use std::str::FromStr;

use color_eyre::eyre::Context;
use color_eyre::Result;
use serde::Serialize;

use crate::credentials::{
    CredentialSource, CredentialType, CredentialWithResources, Ownership, ResourceAccess,
};
use crate::partitions::BatchQueue;

/// Output format of reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Csv,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            _ => Err(format!("unknown format {:?}; expected csv or json", s)),
        }
    }
}

/// Credentials flattened to a single row; grants are written as
/// `resourceId:loginUsername` pairs separated by `;`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRow<'a> {
    token: &'a str,
    gateway_id: Option<&'a str>,
    name: &'a str,
    username: &'a str,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    description: &'a str,
    persisted_time: i64,
    ownership: Ownership,
    source: CredentialSource,
    source_id: &'a str,
    compute_resources: String,
    storage_resources: String,
}

impl<'a> From<&'a CredentialWithResources> for CredentialRow<'a> {
    fn from(credential: &'a CredentialWithResources) -> Self {
        Self {
            token: &credential.token,
            gateway_id: credential.gateway_id.as_deref(),
            name: &credential.name,
            username: &credential.username,
            credential_type: credential.credential_type,
            description: &credential.description,
            persisted_time: credential.persisted_time,
            ownership: credential.ownership,
            source: credential.source,
            source_id: &credential.source_id,
            compute_resources: join_resources(&credential.compute_resources),
            storage_resources: join_resources(&credential.storage_resources),
        }
    }
}

fn join_resources(resources: &[ResourceAccess]) -> String {
    resources
        .iter()
        .map(|v| format!("{}:{}", v.resource_id, v.login_username))
        .collect::<Vec<_>>()
        .join(";")
}

pub fn write_queues<W: Write>(writer: W, queues: &[BatchQueue], format: Format) -> Result<()> {
    match format {
        Format::Csv => write_csv(writer, queues.iter()),
        Format::Json => write_json(writer, queues),
    }
}

pub fn write_credentials<W: Write>(
    writer: W,
    credentials: &[CredentialWithResources],
    format: Format,
) -> Result<()> {
    match format {
        Format::Csv => write_csv(writer, credentials.iter().map(CredentialRow::from)),
        Format::Json => write_json(writer, credentials),
    }
}

fn write_csv<W, I, T>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    I: Iterator<Item = T>,
    T: Serialize,
{
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row).wrap_err("failed to write CSV row")?;
    }

    writer.flush().wrap_err("failed to write CSV")?;
    Ok(())
}

fn write_json<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: Write,
    T: ?Sized + Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value).wrap_err("failed to write JSON")?;
    writeln!(writer)?;
    Ok(())
}
