pub mod actions;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;

pub use config::BotConfig;
pub use connection::Connection;
pub use engine::Bot;
pub use error::BotError;
