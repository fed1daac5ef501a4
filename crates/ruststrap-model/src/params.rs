//! Requested bootstrap configuration and the reconciled parameter map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// CloudFormation parameter names used by the bootstrap template.
pub mod param {
    /// Name of the file assets bucket.
    pub const FILE_ASSETS_BUCKET_NAME: &str = "FileAssetsBucketName";
    /// KMS key ID used to encrypt the file assets bucket.
    pub const FILE_ASSETS_BUCKET_KMS_KEY_ID: &str = "FileAssetsBucketKmsKeyId";
    /// Whether public access block configuration is applied to the bucket.
    pub const PUBLIC_ACCESS_BLOCK_CONFIGURATION: &str = "PublicAccessBlockConfiguration";
    /// Comma-separated list of trusted account IDs.
    pub const TRUSTED_ACCOUNTS: &str = "TrustedAccounts";
    /// Comma-separated list of execution policy ARNs.
    pub const CLOUDFORMATION_EXECUTION_POLICIES: &str = "CloudFormationExecutionPolicies";
}

/// Requested bootstrap configuration for one invocation.
///
/// Every field is optional; absent fields fall back to template defaults or
/// to values carried forward from the existing stack (see the reconciler's
/// per-field rules).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BootstrapParameters {
    /// Explicit name for the file assets bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,

    /// Explicit KMS key ID for bucket encryption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,

    /// Whether to block public access on the assets bucket. Defaults to `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_block_configuration: Option<bool>,

    /// Accounts trusted to assume the deployment role cross-account.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trusted_accounts: Vec<String>,

    /// Policy ARNs constraining what the deployment role may do.
    ///
    /// When supplied, these replace the policies on the existing stack
    /// outright; when empty, the existing stack's policies are carried
    /// forward unchanged.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cloudformation_execution_policies: Vec<String>,
}

/// Full options for one bootstrap invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BootstrapOptions {
    /// Requested template parameters.
    pub parameters: BootstrapParameters,

    /// Stack-level termination protection.
    ///
    /// `None` means "inherit": keep whatever the existing stack has, or
    /// `false` when no stack is deployed yet. This is a stack flag, not a
    /// CloudFormation parameter; it never appears in [`StackParameters`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_protection: Option<bool>,
}

/// The reconciled CloudFormation parameter map handed to the deployer.
///
/// Backed by a `BTreeMap` so that identical inputs always produce an
/// identical, deterministically ordered parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackParameters(BTreeMap<String, String>);

impl StackParameters {
    /// Create an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Set a parameter value when present; omit the parameter otherwise.
    pub fn set_opt(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            self.0.insert(name.to_owned(), value);
        }
    }

    /// Look up a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether the parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of parameters set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for StackParameters {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
