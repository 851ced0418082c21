use async_trait::async_trait;
use teloxide::{
    net::Download,
    prelude::*,
    types::{Message, Update},
};

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    models::domain::{ConversationEvent, DocumentUpload},
    services::channel::{DocumentSource, OutboundChannel},
};

/// Replies into a single Telegram chat.
pub struct TelegramOutbound {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramOutbound {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl OutboundChannel for TelegramOutbound {
    async fn send_text(&self, text: &str) -> AppResult<()> {
        self.bot.send_message(self.chat_id, text).await?;
        Ok(())
    }
}

/// A document attached to a Telegram message, downloaded on demand.
pub struct TelegramDocument {
    bot: Bot,
    file_id: String,
}

impl TelegramDocument {
    pub fn new(bot: Bot, file_id: impl Into<String>) -> Self {
        Self {
            bot,
            file_id: file_id.into(),
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }
}

#[async_trait]
impl DocumentSource for TelegramDocument {
    async fn fetch(&self) -> AppResult<Vec<u8>> {
        log::debug!("Downloading Telegram file {}", self.file_id());
        let file = self
            .bot
            .get_file(self.file_id.clone())
            .await
            .map_err(|e| AppError::DownloadError(e.to_string()))?;

        let mut buffer: Vec<u8> = Vec::new();
        self.bot.download_file(&file.path, &mut buffer).await?;
        Ok(buffer)
    }
}

/// Map a Telegram message to a conversation event. Messages that are neither
/// text nor a document (stickers, photos, ...) yield `None`.
pub fn message_event(bot: &Bot, msg: &Message) -> Option<ConversationEvent> {
    if let Some(text) = msg.text() {
        return Some(ConversationEvent::from_text(text));
    }

    msg.document().map(|document| {
        let source = TelegramDocument::new(bot.clone(), document.file.id.clone());
        ConversationEvent::Document(DocumentUpload::new(
            document.file_name.clone().unwrap_or_default(),
            Box::new(source),
        ))
    })
}

async fn handle_message(bot: Bot, msg: Message, state: AppState) -> ResponseResult<()> {
    let Some(event) = message_event(&bot, &msg) else {
        log::debug!("chat {}: ignoring unsupported message kind", msg.chat.id);
        return Ok(());
    };

    let outbound = TelegramOutbound::new(bot, msg.chat.id);
    state
        .conversation_service
        .handle_event(msg.chat.id.0, event, &outbound)
        .await;
    Ok(())
}

/// Long-poll Telegram until the process is interrupted. Updates of one chat are
/// delivered to the conversation service one at a time.
pub async fn run(bot: Bot, state: AppState) {
    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
