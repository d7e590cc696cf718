use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

pub const SHARE_LOCATION_BUTTON: &str = "Share Location";

/// Keyboard handling attached to an outgoing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyShape {
    /// Leave the chat's keyboard alone.
    Plain,
    /// One-time keyboard with a single location-share button.
    RequestLocation,
    /// Remove any custom keyboard.
    RemoveKeyboard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub shape: ReplyShape,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shape: ReplyShape::Plain,
        }
    }

    pub fn request_location(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shape: ReplyShape::RequestLocation,
        }
    }

    pub fn remove_keyboard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shape: ReplyShape::RemoveKeyboard,
        }
    }
}

impl ReplyShape {
    pub fn markup(self) -> Option<ReplyMarkup> {
        match self {
            ReplyShape::Plain => None,
            ReplyShape::RequestLocation => {
                let button =
                    KeyboardButton::new(SHARE_LOCATION_BUTTON).request(ButtonRequest::Location);
                Some(ReplyMarkup::Keyboard(
                    KeyboardMarkup::new(vec![vec![button]]).one_time_keyboard(),
                ))
            }
            ReplyShape::RemoveKeyboard => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        }
    }
}

/// Where replies go.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, chat_id: ChatId, reply: &Reply) -> Result<(), teloxide::RequestError>;
}

#[async_trait]
impl ReplySink for Bot {
    async fn send(&self, chat_id: ChatId, reply: &Reply) -> Result<(), teloxide::RequestError> {
        let request = self.send_message(chat_id, reply.text.clone());
        match reply.shape.markup() {
            Some(markup) => request.reply_markup(markup).await?,
            None => request.await?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_prompt_offers_one_time_keyboard() {
        let markup = ReplyShape::RequestLocation.markup().unwrap();
        let wire = serde_json::to_value(&markup).unwrap();

        assert_eq!(wire["one_time_keyboard"], true);
        assert_ne!(wire["resize_keyboard"], true);
        assert_eq!(wire["keyboard"][0][0]["text"], SHARE_LOCATION_BUTTON);
        assert_eq!(wire["keyboard"][0][0]["request_location"], true);
        assert_eq!(wire["keyboard"][0].as_array().unwrap().len(), 1);
    }

    #[test]
    fn remove_and_plain_shapes() {
        assert!(matches!(
            ReplyShape::RemoveKeyboard.markup(),
            Some(ReplyMarkup::KeyboardRemove(_))
        ));
        assert!(ReplyShape::Plain.markup().is_none());
    }
}
