//! Invariant validation.
//!
//! Runs strictly after reconciliation and strictly before the deployer is
//! invoked. Checks run in order and the first failure short-circuits; a
//! failed validation leaves no partial side effects because nothing has
//! been deployed yet.

use ruststrap_model::{
    BOOTSTRAP_VERSION, BootstrapError, BootstrapParameters, ExistingStack, param,
};

/// Resolve the execution-policy value in effect for this invocation.
///
/// New policies, when supplied, take effect outright; otherwise the existing
/// stack's deployed value applies.
#[must_use]
pub fn effective_execution_policies(
    existing: Option<&ExistingStack>,
    desired: &BootstrapParameters,
) -> Option<String> {
    if desired.cloudformation_execution_policies.is_empty() {
        existing
            .and_then(|stack| stack.parameter(param::CLOUDFORMATION_EXECUTION_POLICIES))
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    } else {
        Some(desired.cloudformation_execution_policies.join(","))
    }
}

/// Resolve the effective termination-protection flag.
///
/// Explicit request wins; otherwise the existing stack's flag is inherited;
/// otherwise the stack is not protected. This is a stack-level flag passed
/// to the deployer verbatim, never a template parameter.
#[must_use]
pub fn resolve_termination_protection(
    existing: Option<&ExistingStack>,
    requested: Option<bool>,
) -> bool {
    requested.unwrap_or_else(|| existing.is_some_and(|stack| stack.termination_protection))
}

/// Validate the reconciled configuration against the safety invariants.
///
/// # Errors
/// - [`BootstrapError::DowngradeNotAllowed`] when the deployed stack is
///   newer than the template bundled with this release.
/// - [`BootstrapError::MissingExecutionPolicy`] when trust is requested
///   with no execution policy in effect.
pub fn validate(
    existing: Option<&ExistingStack>,
    desired: &BootstrapParameters,
    effective_policies: Option<&str>,
) -> Result<(), BootstrapError> {
    if let Some(stack) = existing {
        if BOOTSTRAP_VERSION < stack.version {
            return Err(BootstrapError::DowngradeNotAllowed {
                deployed: stack.version,
                requested: BOOTSTRAP_VERSION,
            });
        }
    }

    if !desired.trusted_accounts.is_empty()
        && effective_policies.is_none_or(str::is_empty)
    {
        return Err(BootstrapError::MissingExecutionPolicy);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_with_version(version: u32) -> ExistingStack {
        ExistingStack {
            version,
            ..Default::default()
        }
    }

    fn trust_request() -> BootstrapParameters {
        BootstrapParameters {
            trusted_accounts: vec!["123456789012".to_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn test_should_reject_downgrade() {
        let existing = existing_with_version(999);
        let err = validate(Some(&existing), &BootstrapParameters::default(), None).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::DowngradeNotAllowed {
                deployed: 999,
                requested: BOOTSTRAP_VERSION,
            }
        ));
    }

    #[test]
    fn test_should_allow_same_version_redeploy() {
        let existing = existing_with_version(BOOTSTRAP_VERSION);
        assert!(validate(Some(&existing), &BootstrapParameters::default(), None).is_ok());
    }

    #[test]
    fn test_should_reject_trust_without_policies() {
        let err = validate(None, &trust_request(), None).unwrap_err();
        assert!(matches!(err, BootstrapError::MissingExecutionPolicy));
    }

    #[test]
    fn test_should_reject_trust_with_empty_policy_value() {
        let err = validate(None, &trust_request(), Some("")).unwrap_err();
        assert!(matches!(err, BootstrapError::MissingExecutionPolicy));
    }

    #[test]
    fn test_should_allow_trust_with_effective_policies() {
        assert!(validate(None, &trust_request(), Some("arn:aws:something")).is_ok());
    }

    #[test]
    fn test_should_check_downgrade_before_trust() {
        // Both invariants violated: the downgrade check fires first.
        let existing = existing_with_version(999);
        let err = validate(Some(&existing), &trust_request(), None).unwrap_err();
        assert!(matches!(err, BootstrapError::DowngradeNotAllowed { .. }));
    }

    #[test]
    fn test_should_use_supplied_policies_as_effective() {
        let desired = BootstrapParameters {
            cloudformation_execution_policies: vec!["arn:a".to_owned(), "arn:b".to_owned()],
            ..Default::default()
        };
        assert_eq!(
            effective_execution_policies(None, &desired).as_deref(),
            Some("arn:a,arn:b")
        );
    }

    #[test]
    fn test_should_fall_back_to_deployed_policies() {
        let mut existing = ExistingStack::default();
        existing.parameters.insert(
            param::CLOUDFORMATION_EXECUTION_POLICIES.to_owned(),
            "arn:aws:something".to_owned(),
        );
        assert_eq!(
            effective_execution_policies(Some(&existing), &BootstrapParameters::default())
                .as_deref(),
            Some("arn:aws:something")
        );
    }

    #[test]
    fn test_should_have_no_effective_policies_without_stack() {
        assert_eq!(
            effective_execution_policies(None, &BootstrapParameters::default()),
            None
        );
    }

    #[test]
    fn test_should_default_termination_protection_to_false() {
        assert!(!resolve_termination_protection(None, None));
    }

    #[test]
    fn test_should_honor_explicit_termination_protection() {
        assert!(resolve_termination_protection(None, Some(true)));
        let existing = ExistingStack {
            termination_protection: true,
            ..Default::default()
        };
        assert!(!resolve_termination_protection(Some(&existing), Some(false)));
    }

    #[test]
    fn test_should_inherit_termination_protection_from_existing_stack() {
        let existing = ExistingStack {
            termination_protection: true,
            ..Default::default()
        };
        assert!(resolve_termination_protection(Some(&existing), None));
    }
}
