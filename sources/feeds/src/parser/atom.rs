//! Atom entry scanning, used when a document has no RSS items

use regex::Regex;
use std::sync::LazyLock;

use super::rss::{capture, clean_link, first_present, PUBLISHED_RE, UPDATED_RE};
use super::text::clean_text;
use crate::types::FeedItem;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<entry(?:\s[^>]*)?>(.*?)</entry>").unwrap());

// Atom titles carry a type attribute
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</title>").unwrap()
});

static LINK_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<link[^>]*href="([^"]*)"[^>]*/?>"#).unwrap());

/// Scan `<entry>` elements. No summary is extracted.
pub fn parse_atom(xml: &str) -> Vec<FeedItem> {
    ENTRY_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .filter_map(|body| parse_entry(body.as_str()))
        .collect()
}

fn parse_entry(body: &str) -> Option<FeedItem> {
    let title = clean_text(capture(&TITLE_RE, body)?);
    let link = clean_link(capture(&LINK_HREF_RE, body)?);
    if title.is_empty() || link.is_empty() {
        return None;
    }

    let published_at =
        first_present(&[&*PUBLISHED_RE, &*UPDATED_RE], body).map(|date| date.trim().to_string());

    Some(FeedItem {
        published_at,
        ..FeedItem::new(title, link)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_fields() {
        let xml = r#"<feed>
<entry>
  <title type="text"><![CDATA[Hello <i>Atom</i>]]></title>
  <link href="https://x.test/hello" rel="alternate"/>
  <summary>ignored</summary>
  <published>2024-03-01T10:00:00Z</published>
  <updated>2024-03-02T10:00:00Z</updated>
</entry>
</feed>"#;

        let items = parse_atom(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Hello Atom");
        assert_eq!(items[0].link, "https://x.test/hello");
        assert_eq!(items[0].published_at.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert_eq!(items[0].summary, None);
    }

    #[test]
    fn test_entry_without_href_skipped() {
        let xml = r#"<feed>
<entry><title>no link</title><link>https://x.test/text-link</link></entry>
<entry><title>ok</title><link href="https://x.test/ok"/></entry>
</feed>"#;

        let items = parse_atom(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "ok");
    }

    #[test]
    fn test_entry_blank_title_skipped() {
        let xml = r#"<feed><entry><title> </title><link href="https://x.test/1"/></entry></feed>"#;
        assert!(parse_atom(xml).is_empty());
    }
}
