//! Configuration for the bootstrapper.
//!
//! All configuration is driven by environment variables, with defaults
//! matching the conventional CDK toolkit stack.

/// Configuration for bootstrap deployments.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapConfig {
    /// Name of the bootstrap stack in the target environment.
    pub toolkit_stack_name: String,
    /// Per-environment qualifier embedded in resource and export names,
    /// allowing multiple independent bootstrap stacks per account/region.
    pub qualifier: String,
    /// Log level.
    pub log_level: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            toolkit_stack_name: "CDKToolkit".to_owned(),
            qualifier: "hnb659fds".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl BootstrapConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("TOOLKIT_STACK_NAME") {
            config.toolkit_stack_name = v;
        }
        if let Ok(v) = std::env::var("BOOTSTRAP_QUALIFIER") {
            config.qualifier = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = BootstrapConfig::default();
        assert_eq!(config.toolkit_stack_name, "CDKToolkit");
        assert_eq!(config.qualifier, "hnb659fds");
        assert_eq!(config.log_level, "info");
    }
}
