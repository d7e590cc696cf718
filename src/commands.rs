// commands.rs
use teloxide::utils::command::BotCommands;

/// Command menu published to Telegram on webhook registration
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "check that the bot is awake.")]
    Start,
    #[command(description = "say hello.")]
    Hello,
    #[command(description = "get the next sunrise time for your location.")]
    Sunrise,
    #[command(description = "get today's sunset time for your location.")]
    Sunset,
    #[command(description = "cancel the current request.")]
    Cancel,
}
