//! Bootstrap orchestration: lookup, reconcile, validate, deploy.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use ruststrap_model::{
    BOOTSTRAP_VERSION, BootstrapError, BootstrapOptions, Environment, ExistingStack,
    StackParameters,
};

use crate::config::BootstrapConfig;
use crate::reconcile::reconcile;
use crate::template::render_template;
use crate::validate::{effective_execution_policies, resolve_termination_protection, validate};

/// Everything the deployer needs to create or update the bootstrap stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployStackOptions {
    /// Name of the stack to create or update.
    pub stack_name: String,
    /// Rendered template body.
    pub template: Value,
    /// Reconciled CloudFormation parameters.
    pub parameters: StackParameters,
    /// Stack-level termination protection flag, passed through verbatim.
    pub termination_protection: bool,
}

/// Result of a successful deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployResult {
    /// ARN of the created or updated stack, when the deployer reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_arn: Option<String>,
    /// Stack outputs after deployment.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, String>,
}

/// External collaborators for one target environment.
///
/// Implementations wrap whatever client actually talks to the environment;
/// tests substitute a double without touching reconciliation logic.
#[async_trait]
pub trait ToolkitStackProvider: Send + Sync {
    /// Look up the deployed bootstrap stack.
    ///
    /// "No stack exists" is a normal result and must be reported as
    /// `Ok(None)`, never as an error.
    async fn lookup(
        &self,
        environment: &Environment,
    ) -> Result<Option<ExistingStack>, BootstrapError>;

    /// Create or update the bootstrap stack.
    async fn deploy(&self, options: DeployStackOptions) -> Result<DeployResult, BootstrapError>;
}

/// Drives the bootstrap pipeline for one environment per invocation.
///
/// Holds no mutable state across invocations; concurrent calls for
/// different environments are independent. Coordination of concurrent calls
/// for the *same* environment is the provider's concern.
#[derive(Debug)]
pub struct Bootstrapper<P> {
    config: BootstrapConfig,
    provider: P,
}

impl<P: ToolkitStackProvider> Bootstrapper<P> {
    /// Create a bootstrapper with the given configuration and collaborators.
    #[must_use]
    pub fn new(config: BootstrapConfig, provider: P) -> Self {
        Self { config, provider }
    }

    /// Create or upgrade the bootstrap stack in the target environment.
    ///
    /// The pipeline is strictly sequential: lookup, reconcile, validate,
    /// deploy. Validation failures are returned before the deployer is
    /// invoked, so a rejected change never partially applies. Identical
    /// inputs against unchanged existing state produce an identical
    /// parameter set and outcome.
    pub async fn bootstrap_environment(
        &self,
        environment: &Environment,
        options: BootstrapOptions,
    ) -> Result<DeployResult, BootstrapError> {
        let existing = self.provider.lookup(environment).await?;
        match &existing {
            Some(stack) => debug!(
                environment = %environment,
                deployed_version = stack.version,
                "found existing bootstrap stack"
            ),
            None => debug!(environment = %environment, "no bootstrap stack deployed yet"),
        }

        let parameters = reconcile(existing.as_ref(), &options.parameters);
        let effective_policies =
            effective_execution_policies(existing.as_ref(), &options.parameters);
        validate(
            existing.as_ref(),
            &options.parameters,
            effective_policies.as_deref(),
        )?;

        let termination_protection =
            resolve_termination_protection(existing.as_ref(), options.termination_protection);

        info!(
            environment = %environment,
            stack_name = %self.config.toolkit_stack_name,
            version = BOOTSTRAP_VERSION,
            termination_protection,
            "deploying bootstrap stack"
        );

        self.provider
            .deploy(DeployStackOptions {
                stack_name: self.config.toolkit_stack_name.clone(),
                template: render_template(&self.config.qualifier),
                parameters,
                termination_protection,
            })
            .await
    }
}
