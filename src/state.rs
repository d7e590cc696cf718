use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::ChatId;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::conversation::{ConversationId, StateName};

/// One chat's progress through a conversation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversationInstance {
    pub conversation: ConversationId,
    pub state: StateName,
}

/// Chat -> active conversation mapping. At most one instance per chat.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, chat_id: ChatId) -> Option<ConversationInstance>;
    /// Replaces whatever instance the chat had.
    async fn set(&self, chat_id: ChatId, instance: ConversationInstance);
    async fn clear(&self, chat_id: ChatId);
}

/// Process-lifetime store; nothing survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    instances: Arc<Mutex<HashMap<ChatId, ConversationInstance>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.instances.lock().await.len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn get(&self, chat_id: ChatId) -> Option<ConversationInstance> {
        self.instances.lock().await.get(&chat_id).copied()
    }

    async fn set(&self, chat_id: ChatId, instance: ConversationInstance) {
        self.instances.lock().await.insert(chat_id, instance);
    }

    async fn clear(&self, chat_id: ChatId) {
        self.instances.lock().await.remove(&chat_id);
    }
}

/// Serializes update handling per chat while leaving chats independent.
#[derive(Clone, Default)]
pub struct ChatLocks {
    locks: Arc<Mutex<HashMap<ChatId, Arc<Mutex<()>>>>>,
}

impl ChatLocks {
    pub async fn acquire(&self, chat_id: ChatId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop locks nobody holds or waits on.
            locks.retain(|id, l| *id == chat_id || Arc::strong_count(l) > 1);
            locks.entry(chat_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}
