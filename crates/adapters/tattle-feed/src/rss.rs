use serde::Deserialize;

/// One feed entry. Equality over all fields is what the poller uses to find
/// the previously-seen entry in a fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "creator", alias = "dc:creator")]
    pub author: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(default, rename = "item")]
    items: Vec<FeedItem>,
}

/// Parse an RSS document into its entries, newest first as served.
pub fn parse_feed(body: &str) -> Result<Vec<FeedItem>, String> {
    let rss: Rss = quick_xml::de::from_str(body).map_err(|e| e.to_string())?;
    Ok(rss.channel.items)
}

/// The entries published since `last`, newest first.
///
/// Scans until the first entry equal to `last`; if `last` has fallen off the
/// feed entirely, every entry counts as new. With no previous entry (first
/// cycle) nothing counts as new, so startup never floods the channel with
/// feed history.
pub fn entries_since<'a>(items: &'a [FeedItem], last: Option<&FeedItem>) -> &'a [FeedItem] {
    let Some(last) = last else {
        return &[];
    };
    match items.iter().position(|item| item == last) {
        Some(idx) => &items[..idx],
        None => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            author: "alice".to_string(),
            link: format!("https://example.org/{title}"),
        }
    }

    #[test]
    fn parses_rss_items_in_document_order() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Timeline</title>
    <link>https://example.org/timeline</link>
    <item>
      <title>Ticket #42 closed</title>
      <dc:creator>alice</dc:creator>
      <link>https://example.org/ticket/42</link>
    </item>
    <item>
      <title>Changeset r100</title>
      <dc:creator>bob</dc:creator>
      <link>https://example.org/changeset/100</link>
    </item>
  </channel>
</rss>"#;
        let items = parse_feed(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Ticket #42 closed");
        assert_eq!(items[0].author, "alice");
        assert_eq!(items[1].link, "https://example.org/changeset/100");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let xml = "<rss><channel><item><title>bare</title></item></channel></rss>";
        let items = parse_feed(xml).unwrap();
        assert_eq!(items[0].title, "bare");
        assert_eq!(items[0].author, "");
        assert_eq!(items[0].link, "");
    }

    #[test]
    fn channel_without_items_parses_empty() {
        let xml = "<rss><channel><title>quiet</title></channel></rss>";
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(parse_feed("this is not xml").is_err());
    }

    #[test]
    fn first_cycle_yields_nothing() {
        let items = vec![item("A"), item("B"), item("C")];
        assert!(entries_since(&items, None).is_empty());
    }

    #[test]
    fn scan_stops_at_previously_seen_entry() {
        let items = vec![item("D"), item("A"), item("B")];
        let last = item("A");
        assert_eq!(entries_since(&items, Some(&last)), &[item("D")]);
    }

    #[test]
    fn entry_fallen_off_the_feed_means_everything_is_new() {
        let items = vec![item("E"), item("D")];
        let last = item("A");
        assert_eq!(entries_since(&items, Some(&last)), items.as_slice());
    }
}
