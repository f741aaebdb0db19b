pub mod capture;
pub mod command;
pub mod cooldown;
pub mod matchers;

pub use capture::Capture;
pub use command::Command;
pub use cooldown::CooldownTracker;
