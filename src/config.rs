use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub salesforce: SalesforceSettings,
    pub bureau: BureauSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Credentials and endpoints for the Salesforce org.
///
/// Injected per deployment; no credential lives in the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesforceSettings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Object type of the originating record (the one fetched and patched).
    #[serde(default = "default_record_object")]
    pub record_object: String,
}

fn default_api_version() -> String { "v62.0".to_string() }
fn default_record_object() -> String { "Opportunity".to_string() }

/// Static credentials for the bureau gateway XML header.
#[derive(Debug, Clone, Deserialize)]
pub struct BureauSettings {
    pub endpoint: String,
    pub user_id: String,
    pub user_password: String,
    pub customer_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Configuration file (config/default.toml)
    /// 2. Local config file (config/local.toml, for development overrides)
    /// 3. Environment variables (prefixed with CREDIT_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CREDIT_SALESFORCE__CLIENT_ID -> salesforce.client_id
            .add_source(
                Environment::with_prefix("CREDIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CREDIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(default_api_version(), "v62.0");
        assert_eq!(default_record_object(), "Opportunity");
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }
}
