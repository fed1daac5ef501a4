//! RustStrap planner - reconciled bootstrap deployment plans.
//!
//! Runs the full bootstrap pipeline (lookup, reconcile, validate) for one
//! environment and prints the resulting deployment plan as JSON on stdout.
//! The actual create/update call belongs to an external deployer; this
//! binary substitutes a recording provider, making it a safe dry run.
//!
//! # Usage
//!
//! ```text
//! AWS_ACCOUNT_ID=123456789012 AWS_REGION=us-east-1 BUCKET_NAME=my-assets ruststrap
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_ACCOUNT_ID` | *(required)* | Target account (12 digits) |
//! | `AWS_REGION` | `us-east-1` | Target region |
//! | `TOOLKIT_STACK_NAME` | `CDKToolkit` | Bootstrap stack name |
//! | `BOOTSTRAP_QUALIFIER` | `hnb659fds` | Per-environment qualifier |
//! | `BUCKET_NAME` | *(unset)* | Explicit file assets bucket name |
//! | `KMS_KEY_ID` | *(unset)* | Explicit KMS key for bucket encryption |
//! | `PUBLIC_ACCESS_BLOCK` | `true` | Block public bucket access |
//! | `TRUSTED_ACCOUNTS` | *(empty)* | Comma-separated trusted account IDs |
//! | `EXECUTION_POLICIES` | *(empty)* | Comma-separated policy ARNs |
//! | `TERMINATION_PROTECTION` | *(inherit)* | Stack termination protection |
//! | `EXISTING_STACK_FILE` | *(unset)* | JSON snapshot of the deployed stack |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ruststrap_core::{
    BootstrapConfig, Bootstrapper, DeployResult, DeployStackOptions, ToolkitStackProvider,
};
use ruststrap_model::{
    AccountId, AwsRegion, BootstrapError, BootstrapOptions, BootstrapParameters, Environment,
    ExistingStack,
};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

/// Provider that serves a snapshot for lookup and records the deploy call
/// instead of touching the target environment.
#[derive(Debug, Default)]
struct PlanProvider {
    existing: Option<ExistingStack>,
    plan: Arc<Mutex<Option<DeployStackOptions>>>,
}

#[async_trait]
impl ToolkitStackProvider for PlanProvider {
    async fn lookup(
        &self,
        _environment: &Environment,
    ) -> Result<Option<ExistingStack>, BootstrapError> {
        Ok(self.existing.clone())
    }

    async fn deploy(&self, options: DeployStackOptions) -> Result<DeployResult, BootstrapError> {
        *self.plan.lock().expect("plan lock poisoned") = Some(options);
        Ok(DeployResult::default())
    }
}

/// Parse a comma-separated env value into a list, dropping empty entries.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a boolean env value (`1`/`true` in any case are truthy).
fn parse_bool(raw: &str) -> bool {
    raw == "1" || raw.eq_ignore_ascii_case("true")
}

/// Build the requested bootstrap options from environment variables.
fn options_from_env() -> BootstrapOptions {
    let parameters = BootstrapParameters {
        bucket_name: std::env::var("BUCKET_NAME").ok(),
        kms_key_id: std::env::var("KMS_KEY_ID").ok(),
        public_access_block_configuration: std::env::var("PUBLIC_ACCESS_BLOCK")
            .ok()
            .map(|v| parse_bool(&v)),
        trusted_accounts: std::env::var("TRUSTED_ACCOUNTS")
            .map(|v| parse_list(&v))
            .unwrap_or_default(),
        cloudformation_execution_policies: std::env::var("EXECUTION_POLICIES")
            .map(|v| parse_list(&v))
            .unwrap_or_default(),
    };

    BootstrapOptions {
        parameters,
        termination_protection: std::env::var("TERMINATION_PROTECTION")
            .ok()
            .map(|v| parse_bool(&v)),
    }
}

/// Build the target environment from environment variables.
fn environment_from_env() -> Result<Environment> {
    let account = std::env::var("AWS_ACCOUNT_ID").context("AWS_ACCOUNT_ID must be set")?;
    let account = AccountId::new(account)?;
    let region = std::env::var("AWS_REGION")
        .map(AwsRegion::new)
        .unwrap_or_default();
    let name = format!("aws://{account}/{region}");
    Ok(Environment::new(account, region, name))
}

/// Load the existing-stack snapshot named by `EXISTING_STACK_FILE`, if any.
async fn load_existing_stack() -> Result<Option<ExistingStack>> {
    let Ok(path) = std::env::var("EXISTING_STACK_FILE") else {
        return Ok(None);
    };
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("cannot read existing stack snapshot: {path}"))?;
    let stack = serde_json::from_str(&raw)
        .with_context(|| format!("invalid existing stack snapshot: {path}"))?;
    Ok(Some(stack))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = BootstrapConfig::from_env();
    init_tracing(&config.log_level)?;

    let environment = environment_from_env()?;
    let options = options_from_env();
    let existing = load_existing_stack().await?;
    debug!(
        environment = %environment,
        has_snapshot = existing.is_some(),
        "planning bootstrap deployment"
    );

    let plan_slot = Arc::new(Mutex::new(None));
    let provider = PlanProvider {
        existing,
        plan: Arc::clone(&plan_slot),
    };
    let bootstrapper = Bootstrapper::new(config, provider);
    bootstrapper
        .bootstrap_environment(&environment, options)
        .await?;

    let plan = plan_slot
        .lock()
        .expect("plan lock poisoned")
        .take()
        .context("pipeline finished without producing a plan")?;

    info!(
        stack_name = %plan.stack_name,
        parameters = plan.parameters.len(),
        termination_protection = plan.termination_protection,
        "bootstrap plan ready"
    );

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
