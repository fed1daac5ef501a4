//! Bootstrap stack reconciliation core for RustStrap.
//!
//! Given the previously deployed state of a bootstrap stack and a newly
//! requested configuration, this crate produces a validated CloudFormation
//! parameter set and the stack-level flags to deploy it with. The pipeline
//! is strictly sequential: lookup, reconcile, validate, deploy. Validation
//! failures are surfaced before the deployer is ever invoked.
//!
//! The lookup and deploy collaborators are injected behind the
//! [`ToolkitStackProvider`] trait so the core can be exercised with a test
//! double without touching reconciliation logic.

mod bootstrap;
mod config;
mod reconcile;
mod template;
mod validate;

pub use bootstrap::{Bootstrapper, DeployResult, DeployStackOptions, ToolkitStackProvider};
pub use config::BootstrapConfig;
pub use reconcile::reconcile;
pub use template::{EXPECTED_EXPORTS, render_template, template_exports};
pub use validate::{effective_execution_policies, resolve_termination_protection, validate};
