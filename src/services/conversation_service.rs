use std::sync::Arc;

use chrono::Utc;
use tokio::sync::OwnedMutexGuard;

use crate::{
    constants::{messages, QUIZ_GENERATOR_TEMPLATE, TOPIC_SUMMARISER_TEMPLATE},
    errors::{AppError, AppResult},
    models::domain::{
        Command, ConversationEvent, ConversationState, DocumentKind, DocumentUpload, Session,
    },
    repositories::{SessionRepository, SessionSlot},
    services::{
        channel::OutboundChannel, completion_service::CompletionService,
        extraction_service::ExtractionService,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ModeChoice {
    Quiz,
    Learn,
}

/// Drives one conversation per chat: interprets each inbound event against the
/// chat's session, talks to the extractor and the completion service, and
/// sends the replies in order.
pub struct ConversationService {
    sessions: Arc<dyn SessionRepository>,
    completion_service: Arc<CompletionService>,
}

impl ConversationService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        completion_service: Arc<CompletionService>,
    ) -> Self {
        Self {
            sessions,
            completion_service,
        }
    }

    /// Process one event to completion. The chat's slot stays locked until the
    /// last reply is sent, so events of the same chat never interleave.
    pub async fn handle_event(
        &self,
        chat_id: i64,
        event: ConversationEvent,
        outbound: &dyn OutboundChannel,
    ) {
        log::debug!("chat {}: received {}", chat_id, event.kind());
        let starts = matches!(event, ConversationEvent::Command(Command::Start));

        let Some((slot, mut current)) = self.lock_slot(chat_id, starts).await else {
            log::debug!("chat {}: no active conversation, ignoring {}", chat_id, event.kind());
            return;
        };

        match event {
            ConversationEvent::Command(Command::Start) => {
                *current = Some(Session::new(chat_id));
                log::info!(
                    "chat {}: conversation started ({} active)",
                    chat_id,
                    self.sessions.active_sessions().await
                );
                self.send(outbound, chat_id, messages::GREETING).await;
            }
            ConversationEvent::Command(Command::Cancel) => match current.take() {
                Some(session) => {
                    log::info!(
                        "chat {}: conversation cancelled after {}s",
                        chat_id,
                        (Utc::now() - session.created_at).num_seconds()
                    );
                    self.send(outbound, chat_id, messages::FAREWELL).await;
                }
                None => log::debug!("chat {}: cancel without an active conversation", chat_id),
            },
            ConversationEvent::Command(Command::Unknown(name)) => {
                log::debug!("chat {}: ignoring unknown command /{}", chat_id, name);
            }
            ConversationEvent::Text(text) => match current.as_mut() {
                Some(session) => {
                    let idle = session.touch();
                    log::debug!("chat {}: idle for {}s", chat_id, idle.num_seconds());
                    self.handle_text(session, &text, outbound).await;
                }
                None => log::debug!("chat {}: no active conversation, ignoring text", chat_id),
            },
            ConversationEvent::Document(upload) => match current.as_mut() {
                Some(session) => {
                    let idle = session.touch();
                    log::debug!("chat {}: idle for {}s", chat_id, idle.num_seconds());
                    self.handle_document(session, upload, outbound).await;
                }
                None => {
                    log::debug!("chat {}: no active conversation, ignoring document", chat_id)
                }
            },
        }

        if current.is_none() {
            self.sessions.release(chat_id, &slot).await;
            log::debug!(
                "chat {}: slot released ({} active)",
                chat_id,
                self.sessions.active_sessions().await
            );
        }
    }

    /// Snapshot of the chat's session, if a conversation is active.
    pub async fn session(&self, chat_id: i64) -> Option<Session> {
        let slot = self.sessions.get(chat_id).await?;
        let current = slot.lock().await;
        current.clone()
    }

    /// Lock the chat's slot, creating it only when `create` is set. A slot that
    /// was released while this call waited for its lock is abandoned and the
    /// lookup repeated.
    async fn lock_slot(
        &self,
        chat_id: i64,
        create: bool,
    ) -> Option<(SessionSlot, OwnedMutexGuard<Option<Session>>)> {
        loop {
            let slot = if create {
                self.sessions.slot(chat_id).await
            } else {
                self.sessions.get(chat_id).await?
            };

            let guard = Arc::clone(&slot).lock_owned().await;
            if self.sessions.holds(chat_id, &slot).await {
                return Some((slot, guard));
            }
            log::debug!("chat {}: slot was released while waiting, retrying", chat_id);
        }
    }

    async fn handle_text(
        &self,
        session: &mut Session,
        text: &str,
        outbound: &dyn OutboundChannel,
    ) {
        match session.state.clone() {
            ConversationState::AwaitingMode {
                pending_quiz_topic: Some(topic),
            } => self.handle_confirmation(session, topic, text, outbound).await,
            ConversationState::AwaitingMode {
                pending_quiz_topic: None,
            } => self.handle_mode_choice(session, text, outbound).await,
            ConversationState::AwaitingTopic => self.handle_topic(session, text, outbound).await,
            ConversationState::AwaitingDocument => {
                log::debug!(
                    "chat {}: waiting for a document, ignoring text",
                    session.chat_id
                );
            }
        }
    }

    async fn handle_mode_choice(
        &self,
        session: &mut Session,
        text: &str,
        outbound: &dyn OutboundChannel,
    ) {
        match parse_mode_choice(text) {
            Ok(ModeChoice::Quiz) => {
                session.transition(ConversationState::AwaitingDocument);
                self.send(outbound, session.chat_id, messages::UPLOAD_DOCUMENT_PROMPT)
                    .await;
            }
            Ok(ModeChoice::Learn) => {
                session.transition(ConversationState::AwaitingTopic);
                self.send(outbound, session.chat_id, messages::SEND_TOPIC_PROMPT)
                    .await;
            }
            Err(e) => {
                log::debug!("chat {}: {}", session.chat_id, e);
                self.send(outbound, session.chat_id, messages::INVALID_MODE_OPTION)
                    .await;
            }
        }
    }

    async fn handle_confirmation(
        &self,
        session: &mut Session,
        topic: String,
        text: &str,
        outbound: &dyn OutboundChannel,
    ) {
        match parse_confirmation(text) {
            Ok(true) => {
                session.transition(ConversationState::awaiting_mode());
                self.send(outbound, session.chat_id, messages::GENERATING_TOPIC_QUIZ)
                    .await;
                let quiz = self
                    .completion_service
                    .run_template(&QUIZ_GENERATOR_TEMPLATE, &topic)
                    .await;
                self.send(outbound, session.chat_id, &quiz).await;
            }
            Ok(false) => {
                session.transition(ConversationState::awaiting_mode());
                self.send(outbound, session.chat_id, messages::QUIZ_DECLINED)
                    .await;
            }
            Err(e) => {
                log::debug!("chat {}: {}", session.chat_id, e);
                self.send(
                    outbound,
                    session.chat_id,
                    messages::INVALID_CONFIRMATION_OPTION,
                )
                .await;
            }
        }
    }

    async fn handle_topic(
        &self,
        session: &mut Session,
        topic: &str,
        outbound: &dyn OutboundChannel,
    ) {
        log::info!("chat {}: summarizing topic '{}'", session.chat_id, topic);
        self.send(outbound, session.chat_id, messages::SUMMARIZING_TOPIC)
            .await;

        let summary = self
            .completion_service
            .run_template(&TOPIC_SUMMARISER_TEMPLATE, topic)
            .await;
        self.send(outbound, session.chat_id, &summary).await;
        self.send(outbound, session.chat_id, messages::QUIZ_CONFIRMATION_PROMPT)
            .await;

        session.transition(ConversationState::AwaitingMode {
            pending_quiz_topic: Some(topic.to_string()),
        });
    }

    async fn handle_document(
        &self,
        session: &mut Session,
        upload: DocumentUpload,
        outbound: &dyn OutboundChannel,
    ) {
        if session.state != ConversationState::AwaitingDocument {
            log::debug!(
                "chat {}: not waiting for a document, ignoring '{}'",
                session.chat_id,
                upload.file_name
            );
            return;
        }

        session.transition(ConversationState::awaiting_mode());

        let content = match read_document(&upload).await {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "chat {}: rejected document '{}' [{}]: {}",
                    session.chat_id,
                    upload.file_name,
                    e.error_code(),
                    e
                );
                self.send(outbound, session.chat_id, &document_failure_reply(&e))
                    .await;
                return;
            }
        };

        self.send(outbound, session.chat_id, messages::GENERATING_DOCUMENT_QUIZ)
            .await;
        let quiz = self
            .completion_service
            .run_template(&QUIZ_GENERATOR_TEMPLATE, &content)
            .await;
        self.send(outbound, session.chat_id, &quiz).await;
    }

    async fn send(&self, outbound: &dyn OutboundChannel, chat_id: i64, text: &str) {
        if let Err(e) = outbound.send_text(text).await {
            log::warn!("chat {}: failed to send reply [{}]: {}", chat_id, e.error_code(), e);
        }
    }
}

/// Check the file kind before downloading, then fetch and extract off the
/// async runtime.
async fn read_document(upload: &DocumentUpload) -> AppResult<String> {
    let kind = DocumentKind::from_file_name(&upload.file_name)?;
    let bytes = upload.source.fetch().await?;
    log::debug!(
        "Extracting {} document '{}' ({} bytes)",
        kind,
        upload.file_name,
        bytes.len()
    );

    tokio::task::spawn_blocking(move || ExtractionService::extract_kind(&bytes, kind))
        .await
        .map_err(|e| AppError::MalformedDocument(format!("extraction task failed: {}", e)))?
}

fn document_failure_reply(err: &AppError) -> String {
    match err {
        AppError::UnsupportedFormat(extension) => messages::unsupported_file_type(extension),
        other => messages::unreadable_document(&other.to_string()),
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn parse_mode_choice(text: &str) -> AppResult<ModeChoice> {
    match normalize(text).as_str() {
        "quiz" => Ok(ModeChoice::Quiz),
        "learn" => Ok(ModeChoice::Learn),
        _ => Err(AppError::InvalidUserInput(format!(
            "'{}' is not 'quiz' or 'learn'",
            text
        ))),
    }
}

fn parse_confirmation(text: &str) -> AppResult<bool> {
    match normalize(text).as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(AppError::InvalidUserInput(format!(
            "'{}' is not 'yes' or 'no'",
            text
        ))),
    }
}
