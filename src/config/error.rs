pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to build the 'Environment' from the provided string.")]
    StringToEnvironmentFail,
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error("welcome email is enabled but no sender address ('FROM_EMAIL') is configured")]
    MissingSender,

    #[error("figment error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}
