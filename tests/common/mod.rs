#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use astrotucks_bot::dispatcher::Dispatcher;
use astrotucks_bot::reply::{Reply, ReplySink};
use astrotucks_bot::resolver::{LocalizedTime, ResolverError, TimeQuery, TimeResolver};
use astrotucks_bot::server::{WebhookRegistrar, WebhookRegistrationError};
use astrotucks_bot::state::InMemoryStore;
use astrotucks_bot::update::{Input, Location, Update};
use async_trait::async_trait;
use teloxide::types::ChatId;

/// Answers every query with a fixed time, or fails when built with `failing`.
pub struct StubResolver {
    time: Option<&'static str>,
    pub queries: Mutex<Vec<TimeQuery>>,
}

impl StubResolver {
    pub fn answering(time: &'static str) -> Self {
        Self {
            time: Some(time),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            time: None,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TimeResolver for StubResolver {
    async fn resolve(&self, query: TimeQuery) -> Result<LocalizedTime, ResolverError> {
        self.queries.lock().unwrap().push(query);
        match self.time {
            Some(time) => Ok(LocalizedTime(time.to_string())),
            None => Err(ResolverError::Upstream("HTTP 500".into())),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<(ChatId, Reply)>>,
}

impl RecordingSink {
    pub fn replies(&self) -> Vec<(ChatId, Reply)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn send(&self, chat_id: ChatId, reply: &Reply) -> Result<(), teloxide::RequestError> {
        self.sent.lock().unwrap().push((chat_id, reply.clone()));
        Ok(())
    }
}

pub struct StubRegistrar {
    pub configured: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl WebhookRegistrar for StubRegistrar {
    async fn register(&self) -> Result<(), WebhookRegistrationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.configured {
            Ok(())
        } else {
            Err(WebhookRegistrationError::NotConfigured)
        }
    }
}

pub fn dispatcher(resolver: impl TimeResolver + 'static) -> (Dispatcher, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let dispatcher = Dispatcher::new(store.clone(), Arc::new(resolver));
    (dispatcher, store)
}

pub fn command(chat: i64, name: &str) -> Update {
    Update {
        chat_id: ChatId(chat),
        first_name: "Rahim".into(),
        input: Input::Command(name.into()),
    }
}

pub fn location(chat: i64, latitude: f64, longitude: f64) -> Update {
    Update {
        chat_id: ChatId(chat),
        first_name: "Rahim".into(),
        input: Input::Location(Location { latitude, longitude }),
    }
}

pub fn text(chat: i64) -> Update {
    Update {
        chat_id: ChatId(chat),
        first_name: "Rahim".into(),
        input: Input::Other,
    }
}

/// `hh:mm:ss AM` or `hh:mm:ss PM`
pub fn is_clock_time(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 11
        && [0, 1, 3, 4, 6, 7].iter().all(|&i| bytes[i].is_ascii_digit())
        && bytes[2] == b':'
        && bytes[5] == b':'
        && (s.ends_with(" AM") || s.ends_with(" PM"))
}
