use teloxide::types::{ChatId, UpdateKind};
use thiserror::Error;

use crate::util::{command_name, get_first_name};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed update payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unparseable update: {0}")]
    Malformed(String),
    #[error("update carries no message to answer")]
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// What an update carries. Exactly one kind per update.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Command(String),
    Location(Location),
    Other,
}

/// Normalized inbound update
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub chat_id: ChatId,
    pub first_name: String,
    pub input: Input,
}

impl Update {
    pub fn command(&self) -> Option<&str> {
        match &self.input {
            Input::Command(name) => Some(name),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self.input {
            Input::Location(loc) => Some(loc),
            _ => None,
        }
    }

    /// Decodes a raw webhook body. Commands addressed to another bot via an
    /// `@suffix` other than `bot_username` count as plain input.
    pub fn decode(body: &[u8], bot_username: &str) -> Result<Self, DecodeError> {
        let update: teloxide::types::Update = serde_json::from_slice(body)?;
        Self::from_telegram(update, bot_username)
    }

    pub fn from_telegram(
        update: teloxide::types::Update,
        bot_username: &str,
    ) -> Result<Self, DecodeError> {
        let msg = match update.kind {
            UpdateKind::Message(msg) => msg,
            // teloxide keeps payloads it cannot parse instead of failing.
            UpdateKind::Error(value) => return Err(DecodeError::Malformed(value.to_string())),
            _ => return Err(DecodeError::Unsupported),
        };

        let input = if let Some(loc) = msg.location() {
            Input::Location(Location {
                latitude: loc.latitude,
                longitude: loc.longitude,
            })
        } else if let Some(name) = msg.text().and_then(|t| command_name(t, bot_username)) {
            Input::Command(name)
        } else {
            Input::Other
        };

        Ok(Self {
            chat_id: msg.chat.id,
            first_name: get_first_name(msg.from.as_ref()),
            input,
        })
    }
}
