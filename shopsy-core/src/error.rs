/// Error types for configuration loading
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid range for {name}: min {min} > max {max} or bound not finite")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
