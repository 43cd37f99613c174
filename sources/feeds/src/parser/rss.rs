//! RSS 2.0 item scanning

use regex::Regex;
use std::sync::LazyLock;

use super::text::{clean_markup, clean_text, decode_entities, truncate_chars};
use crate::types::{FeedItem, SUMMARY_MAX_CHARS};

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<item(?:\s[^>]*)?>(.*?)</item>").unwrap());

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</title>").unwrap()
});

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<link>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</link>").unwrap()
});

// Atom-style link inside an RSS item
static LINK_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<link[^>]*href="([^"]*)"[^>]*/?>"#).unwrap());

static PUB_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pubDate>(.*?)</pubDate>").unwrap());

pub(super) static PUBLISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<published>(.*?)</published>").unwrap());

pub(super) static UPDATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<updated>(.*?)</updated>").unwrap());

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<description>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</description>").unwrap()
});

/// First capture group of `re` in `haystack`
pub(super) fn capture<'a>(re: &Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First non-empty capture among `patterns`, tried in order
pub(super) fn first_present<'a>(patterns: &[&Regex], haystack: &'a str) -> Option<&'a str> {
    patterns
        .iter()
        .filter_map(|re| capture(re, haystack))
        .find(|value| !value.trim().is_empty())
}

/// Clean a link: decode entities and trim, no tag stripping
pub(super) fn clean_link(raw: &str) -> String {
    decode_entities(raw).trim().to_string()
}

/// Scan `<item>` elements
///
/// Items without a non-empty title and link are skipped entirely.
pub fn parse_rss(xml: &str) -> Vec<FeedItem> {
    ITEM_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .filter_map(|body| parse_item(body.as_str()))
        .collect()
}

fn parse_item(body: &str) -> Option<FeedItem> {
    let title = clean_text(capture(&TITLE_RE, body)?);
    if title.is_empty() {
        return None;
    }

    let link = first_present(&[&*LINK_RE, &*LINK_HREF_RE], body).map(clean_link)?;
    if link.is_empty() {
        return None;
    }

    let published_at = first_present(&[&*PUB_DATE_RE, &*PUBLISHED_RE, &*UPDATED_RE], body)
        .map(|date| date.trim().to_string());

    let summary = capture(&DESCRIPTION_RE, body)
        .map(clean_markup)
        .filter(|text| !text.is_empty())
        .map(|text| truncate_chars(&text, SUMMARY_MAX_CHARS));

    Some(FeedItem {
        summary,
        published_at,
        ..FeedItem::new(title, link)
    })
}
