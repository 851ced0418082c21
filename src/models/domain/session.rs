use chrono::{DateTime, Duration, Utc};

/// Where a conversation currently stands.
///
/// A pending quiz topic can only exist while the session is back at the mode
/// prompt, so it is carried by that variant rather than beside the enum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationState {
    AwaitingMode { pending_quiz_topic: Option<String> },
    AwaitingDocument,
    AwaitingTopic,
}

impl ConversationState {
    pub fn awaiting_mode() -> Self {
        ConversationState::AwaitingMode {
            pending_quiz_topic: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConversationState::AwaitingMode {
                pending_quiz_topic: Some(_),
            } => "awaiting_mode(confirmation)",
            ConversationState::AwaitingMode { .. } => "awaiting_mode",
            ConversationState::AwaitingDocument => "awaiting_document",
            ConversationState::AwaitingTopic => "awaiting_topic",
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::awaiting_mode()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub chat_id: i64,
    pub state: ConversationState,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    pub fn new(chat_id: i64) -> Self {
        let now = Utc::now();
        Session {
            chat_id,
            state: ConversationState::awaiting_mode(),
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn pending_quiz_topic(&self) -> Option<&str> {
        match &self.state {
            ConversationState::AwaitingMode { pending_quiz_topic } => {
                pending_quiz_topic.as_deref()
            }
            _ => None,
        }
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.pending_quiz_topic().is_some()
    }

    pub fn transition(&mut self, next: ConversationState) {
        log::debug!(
            "chat {}: {} -> {}",
            self.chat_id,
            self.state.name(),
            next.name()
        );
        self.state = next;
    }

    /// Record activity and return how long the session had been idle.
    pub fn touch(&mut self) -> Duration {
        let now = Utc::now();
        let idle = now - self.last_activity_at;
        self.last_activity_at = now;
        idle
    }
}
