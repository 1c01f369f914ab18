use std::fs::File;
use std::io::{self, BufReader, Read};

use color_eyre::eyre::Context;
use color_eyre::Result;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credentials::{AccessControlCredential, CredentialSummary};
use crate::partitions::PartitionInfo;

/// Reads a JSON document from `path`, or from stdin if `path` is `-`.
/// A `null` document is returned as `None`.
pub fn read_json<T>(path: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    debug!(path, "reading feed");
    if path == "-" {
        from_reader(io::stdin().lock()).wrap_err("failed to read feed from stdin")
    } else {
        let file = File::open(path).wrap_err_with(|| format!("failed to open {:?}", path))?;
        from_reader(BufReader::new(file)).wrap_err_with(|| format!("failed to read {:?}", path))
    }
}

/// Parses a JSON document, mapping `null` to `None`
pub fn from_reader<R, T>(reader: R) -> Result<Option<T>>
where
    R: Read,
    T: DeserializeOwned,
{
    Ok(serde_json::from_reader(reader)?)
}

/// Partition inventory in the format of the compute-resource inventory API
pub fn load_partitions(path: &str) -> Result<Option<Vec<PartitionInfo>>> {
    read_json(path)
}

/// Credentials owned by the user; a `null` feed is treated as empty
pub fn load_owned_credentials(path: &str) -> Result<Vec<CredentialSummary>> {
    Ok(read_json(path)?.unwrap_or_default())
}

/// Access-control feed; absent if no path was given or the feed is `null`
pub fn load_access_credentials(path: Option<&str>) -> Result<Option<Vec<AccessControlCredential>>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::credentials::Ownership;

    #[test]
    fn test_null_document() {
        let value: Option<Vec<PartitionInfo>> = from_reader(&b"null"[..]).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_array_document() {
        let value: Option<Vec<PartitionInfo>> =
            from_reader(&br#"[{"partitionName": "normal", "nodeCount": 2}]"#[..]).unwrap();

        let value = value.unwrap();
        assert_eq!(value.len(), 1);
        assert_eq!(value[0].node_count, Some(2));
    }

    #[test]
    fn test_invalid_document() {
        let value: Result<Option<Vec<PartitionInfo>>> = from_reader(&b"{\"nodes\": 1}"[..]);
        assert!(value.is_err());
    }

    #[test]
    fn test_load_files() {
        let mut owned = tempfile::NamedTempFile::new().unwrap();
        write!(owned, "null").unwrap();
        let mut access = tempfile::NamedTempFile::new().unwrap();
        write!(
            access,
            r#"[{{"token": "t", "ownership": "INHERITED", "source": "GROUP", "sourceId": "grp"}}]"#
        )
        .unwrap();

        let owned = load_owned_credentials(owned.path().to_str().unwrap()).unwrap();
        assert!(owned.is_empty());

        let access = load_access_credentials(access.path().to_str()).unwrap().unwrap();
        assert_eq!(access[0].ownership, Some(Ownership::Inherited));

        assert_eq!(load_access_credentials(None).unwrap(), None);
    }

    #[test]
    fn test_missing_file() {
        let error = load_partitions("/nonexistent/partitions.json").unwrap_err();
        assert!(error.to_string().contains("failed to open"));
    }
}
