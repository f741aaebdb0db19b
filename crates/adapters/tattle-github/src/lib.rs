pub mod config;
pub mod poller;

pub use config::PullPollerConfig;
pub use poller::PullPoller;
