use std::env;

use secrecy::SecretString;
use validator::Validate;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Clone, Debug, Validate)]
pub struct Config {
    pub openai_api_key: SecretString,
    pub telegram_bot_token: SecretString,
    #[validate(length(min = 1, message = "OPENAI_MODEL cannot be empty"))]
    pub openai_model: String,
    #[validate(url(message = "OPENAI_API_BASE must be a valid URL"))]
    pub openai_api_base: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    /// Both credentials are required; the remaining fields fall back to defaults.
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            openai_api_key: required_secret("OPENAI_API_KEY")?,
            telegram_bot_token: required_secret("TELEGRAM_BOT_TOKEN")?,
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .ok()
                .filter(|base| !base.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            openai_api_key: SecretString::from("sk-test".to_string()),
            telegram_bot_token: SecretString::from("123456:test-token".to_string()),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_api_base: None,
        }
    }
}

fn required_secret(name: &str) -> AppResult<SecretString> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(AppError::ConfigError(format!(
            "{} is not set. Please check your .env file.",
            name
        ))),
    }
}
