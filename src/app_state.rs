use std::sync::Arc;

use crate::{
    config::Config,
    repositories::InMemorySessionRepository,
    services::{
        completion_service::{CompletionClient, CompletionService, OpenAiCompletionClient},
        conversation_service::ConversationService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConversationService>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_completion_client(Arc::new(OpenAiCompletionClient::new(config)))
    }

    pub fn with_completion_client(completion_client: Arc<dyn CompletionClient>) -> Self {
        let session_repository = Arc::new(InMemorySessionRepository::new());
        let completion_service = Arc::new(CompletionService::new(completion_client));
        let conversation_service = Arc::new(ConversationService::new(
            session_repository,
            completion_service,
        ));

        Self {
            conversation_service,
        }
    }
}
