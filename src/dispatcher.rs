use std::sync::Arc;

use log::{debug, error, warn};

use crate::conversation::{self, ConversationDefinition, Next, StateDefinition};
use crate::handlers::{self, SimpleCommand};
use crate::reply::{Reply, ReplySink};
use crate::resolver::TimeResolver;
use crate::state::{ChatLocks, ConversationInstance, ConversationStore};
use crate::update::Update;

/// Routing decision for one update, in priority order.
#[derive(Debug)]
pub enum Route {
    /// Entry command: start (or restart) a conversation.
    Enter(&'static ConversationDefinition),
    /// Fallback command of the active conversation.
    Cancel(&'static ConversationDefinition),
    /// Input accepted by the active state.
    Advance(&'static ConversationDefinition, &'static StateDefinition),
    /// A conversation is active but its state does not take this input.
    Ignore,
    /// The stored instance names a conversation or state that no longer exists.
    Stale,
    Simple(SimpleCommand),
    Unhandled,
}

/// Pure routing: an entry command always wins, even over an active conversation.
pub fn route(update: &Update, active: Option<ConversationInstance>) -> Route {
    let command = update.command();

    if let Some(def) = command.and_then(conversation::by_entry_command) {
        return Route::Enter(def);
    }

    if let Some(instance) = active {
        let Some(def) = conversation::by_id(instance.conversation) else {
            return Route::Stale;
        };
        if command == Some(def.fallback_command) {
            return Route::Cancel(def);
        }
        let Some(state) = def.state(instance.state) else {
            return Route::Stale;
        };
        if state.accepts.accepts(update) {
            return Route::Advance(def, state);
        }
        return Route::Ignore;
    }

    match command.and_then(SimpleCommand::parse) {
        Some(cmd) => Route::Simple(cmd),
        None => Route::Unhandled,
    }
}

/// Routes updates, runs handlers and commits the conversation state.
pub struct Dispatcher {
    store: Arc<dyn ConversationStore>,
    resolver: Arc<dyn TimeResolver>,
    locks: ChatLocks,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ConversationStore>, resolver: Arc<dyn TimeResolver>) -> Self {
        Self {
            store,
            resolver,
            locks: ChatLocks::default(),
        }
    }

    /// Handles one update and returns the reply to send, if any.
    pub async fn handle(&self, update: &Update) -> Option<Reply> {
        let _guard = self.locks.acquire(update.chat_id).await;
        self.process(update).await
    }

    /// Handles one update and forwards the reply to `sink`. Send errors are logged.
    pub async fn dispatch(&self, update: &Update, sink: &dyn ReplySink) {
        let _guard = self.locks.acquire(update.chat_id).await;
        let Some(reply) = self.process(update).await else {
            return;
        };
        if let Err(err) = sink.send(update.chat_id, &reply).await {
            error!("Failed to reply to chat {}: {err}", update.chat_id.0);
        }
    }

    async fn process(&self, update: &Update) -> Option<Reply> {
        let chat_id = update.chat_id;
        let active = self.store.get(chat_id).await;
        let route = route(update, active);
        debug!("chat {}: {:?} -> {:?}", chat_id.0, active, route);

        match route {
            Route::Enter(def) => {
                let Some(state) = def.first_state() else {
                    error!("conversation {:?} declares no states", def.id);
                    return None;
                };
                self.store
                    .set(
                        chat_id,
                        ConversationInstance {
                            conversation: def.id,
                            state,
                        },
                    )
                    .await;
                Some(handlers::prompt(def))
            }
            Route::Cancel(_) => {
                self.store.clear(chat_id).await;
                Some(handlers::cancel())
            }
            Route::Advance(def, state) => {
                let (reply, next) = state.handler.run(update, self.resolver.as_ref()).await;
                match next {
                    Next::Goto(name) if def.state(name).is_some() => {
                        self.store
                            .set(
                                chat_id,
                                ConversationInstance {
                                    conversation: def.id,
                                    state: name,
                                },
                            )
                            .await;
                    }
                    Next::Goto(name) => {
                        error!("conversation {:?} has no state {name:?}; ending it", def.id);
                        self.store.clear(chat_id).await;
                    }
                    Next::End => self.store.clear(chat_id).await,
                }
                Some(reply)
            }
            Route::Stale => {
                warn!("dropping stale conversation {active:?} for chat {}", chat_id.0);
                self.store.clear(chat_id).await;
                None
            }
            Route::Simple(cmd) => Some(cmd.reply(update)),
            Route::Ignore | Route::Unhandled => None,
        }
    }
}
