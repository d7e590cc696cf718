use teloxide::types::User;

/// Extracts the command name from message text: `/Sunrise@AstroBot now` -> `sunrise`.
/// A command addressed to a bot other than `bot_username` is not ours.
pub fn command_name(text: &str, bot_username: &str) -> Option<String> {
    let token = text.trim_start().split_whitespace().next()?;
    let token = token.strip_prefix('/')?;
    let (name, addressee) = match token.split_once('@') {
        Some((name, addressee)) => (name, Some(addressee)),
        None => (token, None),
    };

    if name.is_empty() {
        return None;
    }
    if let Some(addressee) = addressee {
        if !addressee.eq_ignore_ascii_case(bot_username.trim_start_matches('@')) {
            return None;
        }
    }
    Some(name.to_lowercase())
}

pub fn get_first_name(user: Option<&User>) -> String {
    user.map(|u| u.first_name.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "AstroBot";

    #[test]
    fn strips_slash_bot_suffix_and_arguments() {
        assert_eq!(command_name("/sunrise", BOT).as_deref(), Some("sunrise"));
        assert_eq!(command_name("/Sunset@AstroBot", BOT).as_deref(), Some("sunset"));
        assert_eq!(command_name("/cancel@astrobot", BOT).as_deref(), Some("cancel"));
        assert_eq!(command_name("  /hello there", BOT).as_deref(), Some("hello"));
    }

    #[test]
    fn commands_for_other_bots_are_ignored() {
        assert_eq!(command_name("/sunrise@SomeOtherBot", BOT), None);
        assert_eq!(command_name("/cancel@SomeOtherBot", BOT), None);
        assert_eq!(command_name("/sunrise@", BOT), None);
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(command_name("sunrise", BOT), None);
        assert_eq!(command_name("/", BOT), None);
        assert_eq!(command_name("/@AstroBot", BOT), None);
        assert_eq!(command_name("", BOT), None);
    }
}
