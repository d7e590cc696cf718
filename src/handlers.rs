// handlers.rs
use log::error;

use crate::conversation::ConversationDefinition;
use crate::reply::Reply;
use crate::resolver::{LocalizedTime, MomentKind, TimeQuery, TimeResolver};
use crate::update::{Location, Update};

pub const START_TEXT: &str = "Yes Boss! I'm awake 🤓";
pub const CANCEL_TEXT: &str = "Bye! I hope we can talk again some day.";
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again later.";

/// Commands answered without any conversation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimpleCommand {
    Start,
    Hello,
}

impl SimpleCommand {
    pub fn parse(command: &str) -> Option<Self> {
        match command {
            "start" => Some(SimpleCommand::Start),
            "hello" => Some(SimpleCommand::Hello),
            _ => None,
        }
    }

    pub fn reply(self, update: &Update) -> Reply {
        match self {
            SimpleCommand::Start => Reply::plain(START_TEXT),
            SimpleCommand::Hello => Reply::plain(format!("Hey There {} :D", update.first_name)),
        }
    }
}

pub fn prompt(def: &ConversationDefinition) -> Reply {
    Reply::request_location(def.prompt)
}

pub fn cancel() -> Reply {
    Reply::remove_keyboard(CANCEL_TEXT)
}

/// Resolves the moment for the shared location. Failures become the apology.
pub async fn report_moment(update: &Update, kind: MomentKind, resolver: &dyn TimeResolver) -> Reply {
    let Some(loc) = update.location() else {
        error!("{kind} handler invoked without a location for chat {}", update.chat_id.0);
        return Reply::remove_keyboard(APOLOGY_TEXT);
    };

    let query = TimeQuery {
        latitude: loc.latitude,
        longitude: loc.longitude,
        kind,
    };
    match resolver.resolve(query).await {
        Ok(time) => Reply::remove_keyboard(moment_text(kind, loc, &time)),
        Err(err) => {
            error!("Error calculating {kind}: {err}");
            Reply::remove_keyboard(APOLOGY_TEXT)
        }
    }
}

fn moment_text(kind: MomentKind, loc: Location, time: &LocalizedTime) -> String {
    let label = match kind {
        MomentKind::Sunrise => "Next Sunrise Time is",
        MomentKind::Sunset => "Sunset Time Today is",
    };
    format!(
        "📍 Location Coordinates:\n\nLatitude: {}\nLongitude: {}\n\n{label}: {time}",
        loc.latitude, loc.longitude
    )
}
