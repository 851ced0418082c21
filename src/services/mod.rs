pub mod channel;
pub mod completion_service;
pub mod conversation_service;
pub mod extraction_service;

pub use channel::{DocumentSource, OutboundChannel};
pub use completion_service::{CompletionClient, CompletionService, OpenAiCompletionClient};
pub use conversation_service::ConversationService;
pub use extraction_service::ExtractionService;
