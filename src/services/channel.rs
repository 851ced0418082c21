use async_trait::async_trait;

use crate::errors::AppResult;

/// Outbound side of a single conversation.
#[async_trait]
pub trait OutboundChannel: Send + Sync {
    async fn send_text(&self, text: &str) -> AppResult<()>;
}

/// Lazily fetches the raw bytes of an uploaded document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self) -> AppResult<Vec<u8>>;
}
