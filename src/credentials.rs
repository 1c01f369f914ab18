use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::partitions::nullable_list;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialType {
    #[default]
    Ssh,
    Password,
}

/// Whether a credential belongs to the user or is visible through a grant
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ownership {
    Owned,
    Inherited,
    /// Any tag not listed above; such items are never treated as inherited
    #[serde(other)]
    Unknown,
}

/// The entity a credential is rooted at
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialSource {
    User,
    Group,
    Gateway,
}

/// Grants access to a single compute or storage resource
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAccess {
    pub resource_id: String,
    /// Login username on this resource; may differ from the credential username
    #[serde(default)]
    pub login_username: String,
}

/// A credential owned directly by the requesting user
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub token: String,
    #[serde(default)]
    pub gateway_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "type")]
    pub credential_type: Option<CredentialType>,
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time in milliseconds since the epoch
    #[serde(default)]
    pub persisted_time: Option<i64>,
}

/// A credential reported by the access-control feed
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlCredential {
    pub token: String,
    #[serde(default)]
    pub gateway_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "type")]
    pub credential_type: Option<CredentialType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub persisted_time: Option<i64>,
    /// Ownership as tagged by the feed; untagged items are never inherited
    #[serde(default)]
    pub ownership: Option<Ownership>,
    pub source: CredentialSource,
    pub source_id: String,
    #[serde(default, deserialize_with = "nullable_list")]
    pub compute_resources: Vec<ResourceAccess>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub storage_resources: Vec<ResourceAccess>,
}

impl AccessControlCredential {
    pub fn is_inherited(&self) -> bool {
        self.ownership == Some(Ownership::Inherited)
    }
}

/// Unified, ownership-tagged view of a credential
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialWithResources {
    pub token: String,
    pub gateway_id: Option<String>,
    pub name: String,
    pub username: String,
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    pub description: String,
    pub persisted_time: i64,
    pub ownership: Ownership,
    pub source: CredentialSource,
    pub source_id: String,
    pub compute_resources: Vec<ResourceAccess>,
    pub storage_resources: Vec<ResourceAccess>,
}

impl CredentialWithResources {
    /// Builds the view of a credential owned by `user_id`
    pub fn owned(credential: &CredentialSummary, user_id: &str) -> Self {
        Self {
            token: credential.token.clone(),
            gateway_id: credential.gateway_id.clone(),
            name: display_name(credential.name.as_ref(), credential.description.as_ref()),
            username: credential.username.clone().unwrap_or_default(),
            credential_type: credential.credential_type.unwrap_or_default(),
            description: credential.description.clone().unwrap_or_default(),
            persisted_time: credential.persisted_time.unwrap_or(0),
            ownership: Ownership::Owned,
            source: CredentialSource::User,
            source_id: user_id.to_string(),
            compute_resources: Vec::new(),
            storage_resources: Vec::new(),
        }
    }

    /// Builds the view of a credential shared with the user
    pub fn inherited(credential: &AccessControlCredential) -> Self {
        Self {
            token: credential.token.clone(),
            gateway_id: credential.gateway_id.clone(),
            name: display_name(credential.name.as_ref(), credential.description.as_ref()),
            username: credential.username.clone().unwrap_or_default(),
            credential_type: credential.credential_type.unwrap_or_default(),
            description: credential.description.clone().unwrap_or_default(),
            persisted_time: credential.persisted_time.unwrap_or(0),
            ownership: Ownership::Inherited,
            source: credential.source,
            source_id: credential.source_id.clone(),
            compute_resources: credential.compute_resources.clone(),
            storage_resources: credential.storage_resources.clone(),
        }
    }

    /// Returns the username used to log into `resource_id`, falling back to
    /// the credential username if no grant names the resource
    pub fn login_username(&self, resource_id: &str) -> &str {
        self.compute_resources
            .iter()
            .chain(&self.storage_resources)
            .find(|v| v.resource_id == resource_id)
            .map(|v| v.login_username.as_str())
            .unwrap_or(self.username.as_str())
    }
}

/// Name shown for a credential: the name, else the description, else empty
fn display_name(name: Option<&String>, description: Option<&String>) -> String {
    name.or(description).cloned().unwrap_or_default()
}

/// Result of [`merge_credential_access`]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialAccess {
    /// Owned credentials followed by inherited credentials
    pub credentials: Vec<CredentialWithResources>,
    pub owned_credentials: Vec<CredentialWithResources>,
    pub inherited_credentials: Vec<CredentialWithResources>,
}

/// Merges the credentials owned by `user_id` with the inherited credentials
/// of the access-control feed. Items not tagged as inherited are dropped from
/// the feed; tokens present in both inputs are reported twice.
pub fn merge_credential_access(
    owned: &[CredentialSummary],
    access: Option<&[AccessControlCredential]>,
    user_id: &str,
) -> CredentialAccess {
    let inherited_credentials = access
        .unwrap_or_default()
        .iter()
        .filter(|v| v.is_inherited())
        .map(CredentialWithResources::inherited)
        .collect::<Vec<_>>();

    let owned_credentials = owned
        .iter()
        .map(|v| CredentialWithResources::owned(v, user_id))
        .collect::<Vec<_>>();

    let mut credentials = Vec::with_capacity(owned_credentials.len() + inherited_credentials.len());
    credentials.extend_from_slice(&owned_credentials);
    credentials.extend_from_slice(&inherited_credentials);

    CredentialAccess {
        credentials,
        owned_credentials,
        inherited_credentials,
    }
}

/// Number of items in the access-control feed that the merge discards
pub fn count_non_inherited(access: Option<&[AccessControlCredential]>) -> usize {
    access
        .unwrap_or_default()
        .iter()
        .filter(|v| !v.is_inherited())
        .count()
}

/// Removes repeated tokens, keeping the first occurrence of each
pub fn distinct_by_token(credentials: &[CredentialWithResources]) -> Vec<CredentialWithResources> {
    let mut seen = HashSet::new();

    credentials
        .iter()
        .filter(|v| seen.insert(v.token.as_str()))
        .cloned()
        .collect()
}
