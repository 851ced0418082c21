use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::models::domain::Session;

/// Per-chat slot. Holding the lock for the duration of an event serializes
/// every event of that chat. A chat only holds a slot while it has an active
/// conversation.
pub type SessionSlot = Arc<Mutex<Option<Session>>>;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Slot for `chat_id`, created empty if the chat has none.
    async fn slot(&self, chat_id: i64) -> SessionSlot;
    /// Slot for `chat_id` if one exists. Never creates one.
    async fn get(&self, chat_id: i64) -> Option<SessionSlot>;
    /// Whether `slot` is still the one registered for `chat_id`.
    async fn holds(&self, chat_id: i64, slot: &SessionSlot) -> bool;
    /// Forget `slot` if it is still registered for `chat_id`. Callers hold the
    /// slot's lock and have emptied it.
    async fn release(&self, chat_id: i64, slot: &SessionSlot);
    /// Number of chats currently holding a slot.
    async fn active_sessions(&self) -> usize;
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    slots: RwLock<HashMap<i64, SessionSlot>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn slot(&self, chat_id: i64) -> SessionSlot {
        if let Some(slot) = self.get(chat_id).await {
            return slot;
        }

        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(chat_id).or_default())
    }

    async fn get(&self, chat_id: i64) -> Option<SessionSlot> {
        self.slots.read().await.get(&chat_id).cloned()
    }

    async fn holds(&self, chat_id: i64, slot: &SessionSlot) -> bool {
        self.slots
            .read()
            .await
            .get(&chat_id)
            .is_some_and(|registered| Arc::ptr_eq(registered, slot))
    }

    async fn release(&self, chat_id: i64, slot: &SessionSlot) {
        let mut slots = self.slots.write().await;
        if slots
            .get(&chat_id)
            .is_some_and(|registered| Arc::ptr_eq(registered, slot))
        {
            slots.remove(&chat_id);
        }
    }

    async fn active_sessions(&self) -> usize {
        self.slots.read().await.len()
    }
}
