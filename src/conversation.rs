use crate::handlers;
use crate::reply::Reply;
use crate::resolver::{MomentKind, TimeResolver};
use crate::update::Update;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversationId {
    Sunrise,
    Sunset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateName {
    AwaitingLocation,
}

/// Kind of update a state is willing to consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Location,
}

impl InputKind {
    pub fn accepts(self, update: &Update) -> bool {
        match self {
            InputKind::Location => update.location().is_some(),
        }
    }
}

/// Where a conversation goes after a state handler ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    Goto(StateName),
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateHandler {
    /// Look up a sun moment for the shared location and report it.
    ReportMoment(MomentKind),
}

impl StateHandler {
    pub async fn run(self, update: &Update, resolver: &dyn TimeResolver) -> (Reply, Next) {
        match self {
            StateHandler::ReportMoment(kind) => {
                (handlers::report_moment(update, kind, resolver).await, Next::End)
            }
        }
    }
}

#[derive(Debug)]
pub struct StateDefinition {
    pub name: StateName,
    pub accepts: InputKind,
    pub handler: StateHandler,
}

#[derive(Debug)]
pub struct ConversationDefinition {
    pub id: ConversationId,
    pub entry_command: &'static str,
    pub prompt: &'static str,
    /// The first state is the one entered on the entry command.
    pub states: &'static [StateDefinition],
    pub fallback_command: &'static str,
}

impl ConversationDefinition {
    pub fn first_state(&self) -> Option<StateName> {
        self.states.first().map(|s| s.name)
    }

    pub fn state(&self, name: StateName) -> Option<&StateDefinition> {
        self.states.iter().find(|s| s.name == name)
    }
}

pub static SUNRISE: ConversationDefinition = ConversationDefinition {
    id: ConversationId::Sunrise,
    entry_command: "sunrise",
    prompt: "Please share your location so I can calculate the sunrise time:",
    states: &[StateDefinition {
        name: StateName::AwaitingLocation,
        accepts: InputKind::Location,
        handler: StateHandler::ReportMoment(MomentKind::Sunrise),
    }],
    fallback_command: "cancel",
};

pub static SUNSET: ConversationDefinition = ConversationDefinition {
    id: ConversationId::Sunset,
    entry_command: "sunset",
    prompt: "Please share your location so I can calculate the sunset time:",
    states: &[StateDefinition {
        name: StateName::AwaitingLocation,
        accepts: InputKind::Location,
        handler: StateHandler::ReportMoment(MomentKind::Sunset),
    }],
    fallback_command: "cancel",
};

/// Checked in order; the first definition whose entry command matches wins.
pub static DEFINITIONS: &[&ConversationDefinition] = &[&SUNRISE, &SUNSET];

pub fn by_entry_command(command: &str) -> Option<&'static ConversationDefinition> {
    DEFINITIONS
        .iter()
        .copied()
        .find(|def| def.entry_command == command)
}

pub fn by_id(id: ConversationId) -> Option<&'static ConversationDefinition> {
    DEFINITIONS.iter().copied().find(|def| def.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::{Input, Location};
    use teloxide::types::ChatId;

    fn update(input: Input) -> Update {
        Update {
            chat_id: ChatId(1),
            first_name: "Rahim".into(),
            input,
        }
    }

    #[test]
    fn definitions_are_well_formed() {
        for def in DEFINITIONS {
            assert!(def.first_state().is_some(), "{:?} has no states", def.id);
            assert_eq!(by_id(def.id).map(|d| d.entry_command), Some(def.entry_command));
            assert_ne!(def.entry_command, def.fallback_command);
            for state in def.states {
                assert!(def.state(state.name).is_some());
            }
        }
    }

    #[test]
    fn entry_commands_are_unique() {
        for (i, a) in DEFINITIONS.iter().enumerate() {
            for b in &DEFINITIONS[i + 1..] {
                assert_ne!(a.entry_command, b.entry_command);
            }
        }
    }

    #[test]
    fn lookup_by_entry_command() {
        assert_eq!(by_entry_command("sunrise").map(|d| d.id), Some(ConversationId::Sunrise));
        assert_eq!(by_entry_command("sunset").map(|d| d.id), Some(ConversationId::Sunset));
        assert!(by_entry_command("cancel").is_none());
    }

    #[test]
    fn location_input_only() {
        let loc = update(Input::Location(Location {
            latitude: 1.0,
            longitude: 2.0,
        }));
        assert!(InputKind::Location.accepts(&loc));
        assert!(!InputKind::Location.accepts(&update(Input::Other)));
        assert!(!InputKind::Location.accepts(&update(Input::Command("sunrise".into()))));
    }
}
