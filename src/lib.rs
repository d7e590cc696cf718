pub mod commands;
pub mod config;
pub mod conversation;
pub mod dispatcher;
pub mod handlers;
pub mod reply;
pub mod resolver;
pub mod server;
pub mod state;
pub mod update;
pub mod util;
