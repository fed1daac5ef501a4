//! Snapshot of a previously deployed bootstrap stack.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// State of the bootstrap stack already deployed in a target environment.
///
/// Produced by the lookup collaborator and never mutated. The absence of a
/// deployed stack is modeled as `Option<ExistingStack>::None` by callers;
/// a zeroed placeholder would conflate "never deployed" with "deployed with
/// empty trust and policies".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExistingStack {
    /// Template version recorded by the deployed stack.
    pub version: u32,

    /// CloudFormation parameters the stack was last deployed with.
    pub parameters: BTreeMap<String, String>,

    /// Whether stack-level termination protection is currently enabled.
    pub termination_protection: bool,
}

impl ExistingStack {
    /// Look up a deployed parameter value.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param;

    #[test]
    fn test_should_expose_deployed_parameters() {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            param::CLOUDFORMATION_EXECUTION_POLICIES.to_owned(),
            "arn:aws:something".to_owned(),
        );
        let stack = ExistingStack {
            version: 3,
            parameters,
            termination_protection: true,
        };
        assert_eq!(
            stack.parameter(param::CLOUDFORMATION_EXECUTION_POLICIES),
            Some("arn:aws:something")
        );
        assert_eq!(stack.parameter(param::TRUSTED_ACCOUNTS), None);
    }
}
