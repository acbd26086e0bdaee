//! The configuration structs used to build the AppConfig, and their impls.
use secrecy::SecretString;
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};
use crate::web::types::ValidEmail;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub sendgrid_config: SendGridConfig,
    pub subscribe_config: SubscribeConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SendGridConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout_millis: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SubscribeConfig {
    /// Label stored in the `source` custom field of every upserted contact.
    pub contact_source: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub send_welcome_email: bool,
    /// Must be a sender identity verified with SendGrid.
    #[serde(default)]
    pub from_email: Option<String>,
}

// ###################################
// ->   IMPLs
// ###################################
impl SendGridConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl SubscribeConfig {
    /// Returns the validated sender when the welcome email is enabled, `None` when it is disabled.
    pub fn welcome_sender(&self) -> ConfigResult<Option<ValidEmail>> {
        if !self.send_welcome_email {
            return Ok(None);
        }

        let sender = self.from_email.as_deref().ok_or(ConfigError::MissingSender)?;
        let sender =
            ValidEmail::parse(sender).map_err(|er| ConfigError::InvalidEmail(er.to_string()))?;

        Ok(Some(sender))
    }
}

/// The flag is only on for a boolean `true` or the exact string `"true"`, anything else is off.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let flag = match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(value) => value == "true",
        Flag::Other(_) => false,
    };

    Ok(flag)
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail),
        }
    }
}

// ###################################
// ->   TESTS
// ###################################
