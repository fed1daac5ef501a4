//! Error taxonomy for bootstrap reconciliation.
//!
//! Validation failures are detected and surfaced before any call to the
//! deployer; collaborator failures are propagated opaquely without retry.

/// Error type for bootstrap stack reconciliation and deployment.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// The requested template version is older than the deployed stack.
    ///
    /// Fatal and never retried: deploying would silently downgrade the
    /// bootstrap resources that other stacks depend on.
    #[error(
        "Not downgrading existing bootstrap stack from version '{deployed}' \
         to version '{requested}'"
    )]
    DowngradeNotAllowed {
        /// Version of the stack currently deployed.
        deployed: u32,
        /// Version this release would deploy.
        requested: u32,
    },

    /// Trusted accounts were requested without any execution policy in effect.
    ///
    /// Granting cross-account trust without a policy guardrail would hand the
    /// trusted account unconstrained permissions, so the combination is
    /// rejected before deployment.
    #[error(
        "Please pass --cloudformation-execution-policies when using --trust to \
         specify deployment permissions. Try a managed policy of the form \
         arn:aws:iam::aws:policy/<PolicyName>."
    )]
    MissingExecutionPolicy,

    /// The existing-state lookup collaborator failed.
    #[error("failed to look up bootstrap stack: {0}")]
    Lookup(#[source] anyhow::Error),

    /// The deployer collaborator failed; propagated unchanged, never retried.
    #[error("bootstrap stack deployment failed: {0}")]
    Deploy(#[source] anyhow::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
