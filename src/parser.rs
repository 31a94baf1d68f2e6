//! RSS item extraction.
//!
//! Walks the document with a streaming reader and turns every `<item>`
//! element into a [`FeedItem`]. Fields that are missing from an item are
//! filled in by [`RawItem::into_item`], which is the only place that knows
//! the defaulting rules.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Placeholder for a missing source or publish date.
pub const UNKNOWN: &str = "Unknown";
/// Placeholder for a missing title.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: String, message: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("document ended with {0} unclosed element(s)")]
    Truncated(usize),
}

/// One news entry, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub source: String,
    pub published_at: String,
    /// `None` when the feed gave no link or one that is not an http(s) URL.
    pub link: Option<Url>,
}

/// Text collected from an `<item>` before defaults are applied.
#[derive(Debug, Default)]
struct RawItem {
    title: Option<String>,
    source: Option<String>,
    pub_date: Option<String>,
    link: Option<String>,
}

impl RawItem {
    fn into_item(self) -> FeedItem {
        let link = non_empty(self.link).and_then(|raw| match Url::parse(&raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
            Ok(url) => {
                warn!("Dropping item link with scheme '{}': {}", url.scheme(), raw);
                None
            }
            Err(e) => {
                warn!("Dropping invalid item link '{}': {}", raw, e);
                None
            }
        });

        FeedItem {
            title: non_empty(self.title).unwrap_or_else(|| UNTITLED.to_string()),
            source: non_empty(self.source).unwrap_or_else(|| UNKNOWN.to_string()),
            published_at: non_empty(self.pub_date).unwrap_or_else(|| UNKNOWN.to_string()),
            link,
        }
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Source => &mut self.source,
            Field::PubDate => &mut self.pub_date,
            Field::Link => &mut self.link,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Source,
    PubDate,
    Link,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"title" => Some(Field::Title),
            b"source" => Some(Field::Source),
            b"pubDate" => Some(Field::PubDate),
            b"link" => Some(Field::Link),
            _ => None,
        }
    }
}

/// An `<item>` currently being read.
struct OpenItem {
    /// Element depth of the `<item>` start tag.
    depth: usize,
    /// Position in the output, fixed when the start tag is seen.
    slot: usize,
    raw: RawItem,
    /// Field whose text is being collected. Only direct children of the item
    /// are captured; the first occurrence of each field wins.
    capture: Option<(Field, String)>,
}

impl OpenItem {
    fn new(depth: usize, slot: usize) -> Self {
        Self {
            depth,
            slot,
            raw: RawItem::default(),
            capture: None,
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, buffer)) = &mut self.capture {
            buffer.push_str(text);
        }
    }

    fn finish_capture(&mut self) {
        if let Some((field, text)) = self.capture.take() {
            let slot = self.raw.slot(field);
            if slot.is_none() {
                *slot = Some(text);
            }
        }
    }
}

/// Parse an RSS document into its items, in document order.
///
/// Items nested inside other items are returned too, ordered by their start
/// tags.
pub fn parse_items(bytes: &[u8]) -> Result<Vec<FeedItem>, ParseError> {
    let mut reader = Reader::from_reader(bytes);

    let mut items: Vec<Option<FeedItem>> = Vec::new();
    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut seen_root = false;
    let mut open: Vec<OpenItem> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                seen_root = true;
                if e.name().as_ref() == b"item" {
                    open.push(OpenItem::new(depth, items.len()));
                    items.push(None);
                } else if let Some(item) = open.last_mut() {
                    if depth == item.depth + 1 {
                        if let Some(field) = Field::from_tag(e.name().as_ref()) {
                            item.capture = Some((field, String::new()));
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                seen_root = true;
                if e.name().as_ref() == b"item" {
                    items.push(Some(RawItem::default().into_item()));
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(item) = open.last_mut() {
                    let text = e.unescape().map_err(|err| xml_error(&reader, err))?;
                    item.push_text(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(item) = open.last_mut() {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|err| xml_error(&reader, err))?;
                    item.push_text(&text);
                }
            }
            Ok(Event::End(_)) => {
                match open.last().map(|item| item.depth) {
                    Some(item_depth) if depth == item_depth => {
                        if let Some(item) = open.pop() {
                            items[item.slot] = Some(item.raw.into_item());
                        }
                    }
                    Some(item_depth) if depth == item_depth + 1 => {
                        if let Some(item) = open.last_mut() {
                            item.finish_capture();
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(ParseError::NoRoot);
    }
    if depth > 0 {
        return Err(ParseError::Truncated(depth));
    }

    Ok(items.into_iter().flatten().collect())
}

fn xml_error<R>(reader: &Reader<R>, err: impl std::fmt::Display) -> ParseError {
    ParseError::Xml {
        position: reader.buffer_position().to_string(),
        message: err.to_string(),
    }
}
