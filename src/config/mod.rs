//! Tries to create an `AppConfig` from config files and the environment.
//!
//! Sources are merged in order, later ones win:
//! 1. `config/base.toml`
//! 2. `config/{environment}.toml`, where the environment comes from `APP_ENVIRONMENT` (default: local)
//! 3. `APP_` prefixed variables, `__` separates nested keys, e.g. `APP_NET_CONFIG__APP_PORT=9000`
//! 4. `SENDGRID_API_KEY`, `SEND_WELCOME_EMAIL` and `FROM_EMAIL`, read verbatim as strings

mod error;
mod types;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, Environment, NetConfig, SendGridConfig, SubscribeConfig};

const CONFIG_DIR: &str = "config";

/// Deployment variables and the config keys they set.
/// `figment::providers::Env` would parse `1` or `0123` into numbers, these stay strings.
const DEPLOYMENT_VARS: [(&str, &str); 3] = [
    ("SENDGRID_API_KEY", "sendgrid_config.api_key"),
    ("SEND_WELCOME_EMAIL", "subscribe_config.send_welcome_email"),
    ("FROM_EMAIL", "subscribe_config.from_email"),
];

impl AppConfig {
    /// Reads the environment from `APP_ENVIRONMENT` and loads the matching configuration.
    pub fn load() -> ConfigResult<Self> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()?;

        Self::load_for(environment)
    }

    pub fn load_for(environment: Environment) -> ConfigResult<Self> {
        info!(
            "{:<12} - Loading the {} configuration",
            "load_config",
            environment.as_ref()
        );

        let config = Self::figment(environment).extract()?;
        Ok(config)
    }

    fn figment(environment: Environment) -> Figment {
        let environment_file = format!(
            "{CONFIG_DIR}/{}.toml",
            environment.as_ref().to_lowercase()
        );

        let mut figment = Figment::new()
            .merge(Toml::file(format!("{CONFIG_DIR}/base.toml")))
            .merge(Toml::file(environment_file))
            .merge(Env::prefixed("APP_").split("__"));

        for (var, key) in DEPLOYMENT_VARS {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        figment
    }
}
