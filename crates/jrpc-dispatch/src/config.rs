use serde::{Deserialize, Serialize};

/// Immutable dispatcher configuration, fixed when the dispatcher is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Expose failure detail and keep request ids on "Invalid params" and
    /// "Internal error" responses. Meant for development only.
    pub verbose: bool,
    /// Return serialized JSON text instead of structured responses.
    pub serialize_output: bool,
    /// Reported by `describe()` when greater than zero.
    pub api_version: u32,
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_serialized_output(mut self, serialize_output: bool) -> Self {
        self.serialize_output = serialize_output;
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = DispatcherConfig::new();
        assert!(!config.verbose);
        assert!(!config.serialize_output);
        assert_eq!(config.api_version, 0);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: DispatcherConfig = serde_json::from_value(json!({"verbose": true})).unwrap();
        assert_eq!(config, DispatcherConfig::new().with_verbose(true));
    }

    #[test]
    fn test_builder_setters() {
        let config = DispatcherConfig::new()
            .with_serialized_output(true)
            .with_api_version(3);
        assert!(config.serialize_output);
        assert_eq!(config.api_version, 3);
    }
}
