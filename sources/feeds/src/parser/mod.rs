//! Best-effort tag scanner for RSS 2.0 and Atom
//!
//! Feeds in the wild are often malformed, so instead of a strict XML parser
//! this scans for element pairs with permissive patterns. Bad input yields
//! fewer items, never an error.
//!
//! Fallback order:
//! - RSS `<item>` elements first; Atom `<entry>` elements only when the RSS
//!   pass found nothing
//! - link element, then a `<link href="...">` attribute
//! - `<pubDate>`, then `<published>`, then `<updated>`

mod atom;
mod rss;
mod text;

pub use atom::parse_atom;
pub use rss::parse_rss;
pub use text::{clean_markup, clean_text, decode_entities, strip_tags, truncate_chars};

use crate::types::FeedItem;

/// Parse an RSS or Atom document into feed items, in document order
pub fn parse_feed(xml: &str) -> Vec<FeedItem> {
    let items = parse_rss(xml);
    if !items.is_empty() {
        return items;
    }

    let entries = parse_atom(xml);
    if !entries.is_empty() {
        tracing::debug!("No RSS items found, parsed {} Atom entries", entries.len());
    }
    entries
}
