//! Feed ingestion library
//!
//! Normalizes RSS 2.0, Atom and the Hacker News JSON API into one
//! [`FeedItem`] shape.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use feeds::{parse_feed, FeedRegistry};
//!
//! let items = parse_feed(&xml);
//! let registry = FeedRegistry::load(&path);
//! for feed in registry.enabled() {
//!     println!("{} ({})", feed.display_name, feed.id);
//! }
//! ```
//!
//! # Configuration
//! Set `FEEDS_CONFIG_PATH` or add a `[feeds]` table to `.skylily.toml`

pub mod config;
pub mod error;
pub mod parser;
pub mod proxy;
pub mod registry;
pub mod sources;
pub mod types;

pub use config::FeedsConfig;
pub use error::{FeedError, FeedResult};
pub use parser::{parse_feed, strip_tags};
pub use registry::{FeedRegistry, FeedSourceDescriptor, FetchStrategy};
pub use sources::{FeedContext, FeedFetcher, FeedSource};
pub use types::{FeedItem, MAX_FEED_ITEMS};
