use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{CompletionRequest, CompletionTemplate},
};

/// A language-model completion endpoint. One call, one answer, no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;
}

pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: &Config) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret());
        if let Some(api_base) = &config.openai_api_base {
            openai_config = openai_config.with_api_base(api_base);
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.openai_model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    #[allow(deprecated)]
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        log::debug!(
            "Requesting up to {} tokens from {}",
            request.max_tokens,
            self.model()
        );
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(request.max_tokens)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(request.system_role)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(request.user_prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(chat_request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                AppError::CompletionError(
                    "The completion response contained no content".to_string(),
                )
            })
    }
}

/// Runs the fixed prompt templates against a [`CompletionClient`].
pub struct CompletionService {
    client: Arc<dyn CompletionClient>,
}

impl CompletionService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Render `content` into `template` and ask for a completion. Failures are
    /// folded into the user-facing failure text of the template.
    pub async fn run_template(&self, template: &CompletionTemplate, content: &str) -> String {
        match self.client.complete(template.request(content)).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "Completion '{}' failed [{}]: {}",
                    template.name,
                    e.error_code(),
                    e
                );
                template.render_failure(&e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{QUIZ_GENERATOR_TEMPLATE, TOPIC_SUMMARISER_TEMPLATE};
    use mockall::predicate::eq;

    #[test]
    fn test_openai_client_uses_configured_model() {
        let config = Config {
            openai_model: "gpt-4o-mini".to_string(),
            ..Config::test_config()
        };

        let client = OpenAiCompletionClient::new(&config);

        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_run_template_returns_completion_text() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .with(eq(QUIZ_GENERATOR_TEMPLATE.request("Rust ownership")))
            .times(1)
            .returning(|_| Ok("Q1: What moves?".to_string()));

        let service = CompletionService::new(Arc::new(client));
        let text = service
            .run_template(&QUIZ_GENERATOR_TEMPLATE, "Rust ownership")
            .await;

        assert_eq!(text, "Q1: What moves?");
    }

    #[tokio::test]
    async fn test_run_template_prefixes_failures() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(|_| Err(AppError::CompletionError("Rate limit reached".to_string())));

        let service = CompletionService::new(Arc::new(client));
        let text = service
            .run_template(&TOPIC_SUMMARISER_TEMPLATE, "Photosynthesis")
            .await;

        assert_eq!(
            text,
            "An error occurred while summarizing the topic: Rate limit reached"
        );
    }
}
