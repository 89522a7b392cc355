//! Product configuration trait for CLI binaries
//!
//! The scaffolding workflow is driven by a product configuration that names
//! the registry to query, the SDK modules a project depends on and the build
//! channel those modules are pinned to.

/// Configuration trait for a scaffolding product
///
/// Each binary implements this trait to define:
/// - Product identity (name, display name)
/// - Registry location and its environment override
/// - The SDK modules every generated project depends on
/// - The build channel suffix written into manifests
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default base URL of the package registry
    fn default_registry_url(&self) -> &'static str;

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// SDK modules resolved for every project, in resolution order.
    ///
    /// The first module's tag order decides which platform version is
    /// offered as the latest one.
    fn required_modules(&self) -> &'static [&'static str];

    /// Suffix appended to the npm version to form the manifest module version
    fn channel_suffix(&self) -> &'static str {
        "-beta"
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ProductConfig;

    /// Product used by unit tests across the crate
    #[derive(Clone)]
    pub struct TestProduct;

    impl ProductConfig for TestProduct {
        fn name(&self) -> &'static str {
            "mcscript-test"
        }

        fn display_name(&self) -> &'static str {
            "MCPE-Script Test"
        }

        fn default_registry_url(&self) -> &'static str {
            "http://127.0.0.1:9"
        }

        fn registry_url_env(&self) -> &'static str {
            "MCSCRIPT_TEST_REGISTRY_URL"
        }

        fn required_modules(&self) -> &'static [&'static str] {
            &["@module-a", "@module-b"]
        }
    }
}
