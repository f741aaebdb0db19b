pub mod poller;
pub mod rss;

pub use poller::{FeedPoller, FeedPollerConfig};
pub use rss::FeedItem;
