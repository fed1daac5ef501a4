//! Data model for RustStrap bootstrap stack reconciliation.
//!
//! This crate provides the types shared between the reconciliation core and
//! its callers: the deployment target ([`Environment`]), the snapshot of a
//! previously deployed bootstrap stack ([`ExistingStack`]), the requested
//! configuration ([`BootstrapParameters`] / [`BootstrapOptions`]), the
//! reconciled CloudFormation parameter map ([`StackParameters`]), and the
//! error taxonomy ([`BootstrapError`]).

mod environment;
mod error;
mod params;
mod stack;

pub use environment::{AccountId, AwsRegion, Environment};
pub use error::{BootstrapError, BootstrapResult};
pub use params::{BootstrapOptions, BootstrapParameters, StackParameters, param};
pub use stack::ExistingStack;

/// Version of the bootstrap template bundled with this release.
///
/// Deployed stacks record their version in the `BootstrapVersion` output;
/// the validator refuses to deploy when this constant is older than the
/// version already live in the target environment.
pub const BOOTSTRAP_VERSION: u32 = 4;
