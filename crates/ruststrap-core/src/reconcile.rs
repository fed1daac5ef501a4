//! Parameter reconciliation.
//!
//! Merges the requested configuration with the previously deployed
//! parameters into the final CloudFormation parameter map. Pure functions,
//! no I/O. Each field follows its own independent rule; no field is ever
//! silently dropped and no two source fields write the same destination.

use ruststrap_model::{BootstrapParameters, ExistingStack, StackParameters, param};

/// Requested bucket name, when given.
fn file_assets_bucket_name(desired: &BootstrapParameters) -> Option<String> {
    desired.bucket_name.clone()
}

/// Requested KMS key ID, when given.
fn file_assets_bucket_kms_key_id(desired: &BootstrapParameters) -> Option<String> {
    desired.kms_key_id.clone()
}

/// Public access block setting, stringified; defaults to `"true"`.
fn public_access_block_configuration(desired: &BootstrapParameters) -> String {
    desired
        .public_access_block_configuration
        .unwrap_or(true)
        .to_string()
}

/// Trusted accounts joined into a comma-delimited list; empty set omitted.
fn trusted_accounts(desired: &BootstrapParameters) -> Option<String> {
    if desired.trusted_accounts.is_empty() {
        None
    } else {
        Some(desired.trusted_accounts.join(","))
    }
}

/// Execution policies: a caller-supplied set replaces the deployed value
/// outright; an empty request carries the existing stack's value forward
/// unchanged.
fn cloudformation_execution_policies(
    existing: Option<&ExistingStack>,
    desired: &BootstrapParameters,
) -> Option<String> {
    if desired.cloudformation_execution_policies.is_empty() {
        existing
            .and_then(|stack| stack.parameter(param::CLOUDFORMATION_EXECUTION_POLICIES))
            .map(str::to_owned)
    } else {
        Some(desired.cloudformation_execution_policies.join(","))
    }
}

/// Reconcile the requested configuration with the deployed parameters.
///
/// Deterministic: identical inputs always yield an identical parameter map.
/// Termination protection is a stack-level flag, not a template parameter,
/// and is resolved separately (see
/// [`resolve_termination_protection`](crate::resolve_termination_protection)).
#[must_use]
pub fn reconcile(
    existing: Option<&ExistingStack>,
    desired: &BootstrapParameters,
) -> StackParameters {
    let mut params = StackParameters::new();
    params.set_opt(param::FILE_ASSETS_BUCKET_NAME, file_assets_bucket_name(desired));
    params.set_opt(
        param::FILE_ASSETS_BUCKET_KMS_KEY_ID,
        file_assets_bucket_kms_key_id(desired),
    );
    params.set(
        param::PUBLIC_ACCESS_BLOCK_CONFIGURATION,
        public_access_block_configuration(desired),
    );
    params.set_opt(param::TRUSTED_ACCOUNTS, trusted_accounts(desired));
    params.set_opt(
        param::CLOUDFORMATION_EXECUTION_POLICIES,
        cloudformation_execution_policies(existing, desired),
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_with_policies(value: &str) -> ExistingStack {
        let mut stack = ExistingStack::default();
        stack.parameters.insert(
            param::CLOUDFORMATION_EXECUTION_POLICIES.to_owned(),
            value.to_owned(),
        );
        stack
    }

    #[test]
    fn test_should_pass_bucket_name_as_parameter() {
        let desired = BootstrapParameters {
            bucket_name: Some("my-bucket-name".to_owned()),
            ..Default::default()
        };
        let params = reconcile(None, &desired);
        assert_eq!(
            params.get(param::FILE_ASSETS_BUCKET_NAME),
            Some("my-bucket-name")
        );
        assert_eq!(
            params.get(param::PUBLIC_ACCESS_BLOCK_CONFIGURATION),
            Some("true")
        );
    }

    #[test]
    fn test_should_omit_bucket_name_when_absent() {
        let params = reconcile(None, &BootstrapParameters::default());
        assert!(!params.contains(param::FILE_ASSETS_BUCKET_NAME));
    }

    #[test]
    fn test_should_pass_kms_key_id_as_parameter() {
        let desired = BootstrapParameters {
            kms_key_id: Some("my-kms-key-id".to_owned()),
            ..Default::default()
        };
        let params = reconcile(None, &desired);
        assert_eq!(
            params.get(param::FILE_ASSETS_BUCKET_KMS_KEY_ID),
            Some("my-kms-key-id")
        );
        assert_eq!(
            params.get(param::PUBLIC_ACCESS_BLOCK_CONFIGURATION),
            Some("true")
        );
    }

    #[test]
    fn test_should_pass_false_public_access_block() {
        let desired = BootstrapParameters {
            public_access_block_configuration: Some(false),
            ..Default::default()
        };
        let params = reconcile(None, &desired);
        assert_eq!(
            params.get(param::PUBLIC_ACCESS_BLOCK_CONFIGURATION),
            Some("false")
        );
    }

    #[test]
    fn test_should_join_trusted_accounts_with_commas() {
        let desired = BootstrapParameters {
            trusted_accounts: vec!["111111111111".to_owned(), "222222222222".to_owned()],
            cloudformation_execution_policies: vec!["arn:aws:policy".to_owned()],
            ..Default::default()
        };
        let params = reconcile(None, &desired);
        assert_eq!(
            params.get(param::TRUSTED_ACCOUNTS),
            Some("111111111111,222222222222")
        );
    }

    #[test]
    fn test_should_omit_trusted_accounts_when_empty() {
        let params = reconcile(None, &BootstrapParameters::default());
        assert!(!params.contains(param::TRUSTED_ACCOUNTS));
    }

    #[test]
    fn test_should_replace_policies_when_supplied() {
        let existing = existing_with_policies("arn:aws:old");
        let desired = BootstrapParameters {
            cloudformation_execution_policies: vec!["arn:aws:new".to_owned()],
            ..Default::default()
        };
        let params = reconcile(Some(&existing), &desired);
        assert_eq!(
            params.get(param::CLOUDFORMATION_EXECUTION_POLICIES),
            Some("arn:aws:new")
        );
    }

    #[test]
    fn test_should_carry_forward_existing_policies() {
        let existing = existing_with_policies("arn:aws:something");
        let params = reconcile(Some(&existing), &BootstrapParameters::default());
        assert_eq!(
            params.get(param::CLOUDFORMATION_EXECUTION_POLICIES),
            Some("arn:aws:something")
        );
    }

    #[test]
    fn test_should_omit_policies_when_none_exist_anywhere() {
        let params = reconcile(None, &BootstrapParameters::default());
        assert!(!params.contains(param::CLOUDFORMATION_EXECUTION_POLICIES));
    }

    #[test]
    fn test_should_be_deterministic_for_identical_inputs() {
        let existing = existing_with_policies("arn:aws:something");
        let desired = BootstrapParameters {
            bucket_name: Some("b".to_owned()),
            trusted_accounts: vec!["123456789012".to_owned()],
            ..Default::default()
        };
        assert_eq!(
            reconcile(Some(&existing), &desired),
            reconcile(Some(&existing), &desired)
        );
    }
}
