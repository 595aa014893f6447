// src/services/feed.rs

//! Results feed retrieval.
//!
//! Fetches the RSS (or Atom) document with a conditional GET and flattens
//! it into `FeedEntry` values in document order.

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use reqwest::StatusCode;
use reqwest::header::{IF_MODIFIED_SINCE, LAST_MODIFIED};

use crate::error::{AppError, Result};
use crate::models::{FeedConfig, FeedEntry, FeedSnapshot};
use crate::utils::http;

/// Source of feed snapshots.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the feed, skipping the body when `since` is still current.
    async fn fetch(&self, since: Option<&str>) -> Result<FeedSnapshot>;
}

/// HTTP feed client.
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a feed client with the configured URL, user agent and timeout.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self, since: Option<&str>) -> Result<FeedSnapshot> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = since {
            request = request.header(IF_MODIFIED_SINCE, token);
        }

        log::debug!("GET {} (If-Modified-Since: {:?})", self.url, since);
        let response = request
            .send()
            .await
            .map_err(|e| AppError::feed(&self.url, e))?;

        if response.status() == StatusCode::NOT_MODIFIED {
            log::debug!("Feed not modified since {:?}", since);
            return Ok(FeedSnapshot::not_modified(since.map(str::to_string)));
        }

        let response = response
            .error_for_status()
            .map_err(|e| AppError::feed(&self.url, e))?;

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| AppError::feed(&self.url, e))?;

        let parsed = parse_feed(&self.url, &body)?;
        log::debug!("Feed has {} entries", parsed.entries.len());

        Ok(FeedSnapshot {
            modified: last_modified.or(parsed.updated),
            entries: parsed.entries,
            not_modified: false,
        })
    }
}

/// A decoded feed document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Channel `lastBuildDate` (RSS) or feed `updated` (Atom)
    pub updated: Option<String>,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Content,
    Updated,
}

impl Field {
    fn for_element(name: &[u8], in_entry: bool) -> Option<Self> {
        match (name, in_entry) {
            (b"title", true) => Some(Field::Title),
            (b"description" | b"summary", true) => Some(Field::Summary),
            (b"content", true) => Some(Field::Content),
            (b"lastBuildDate" | b"updated", false) => Some(Field::Updated),
            _ => None,
        }
    }
}

/// Element whose text is being collected.
struct OpenField {
    field: Field,
    /// Atom `type="xhtml"`: children are markup, not text
    xhtml: bool,
    /// Nesting depth of child elements
    depth: usize,
}

fn is_xhtml(e: &BytesStart<'_>) -> bool {
    matches!(e.try_get_attribute("type"), Ok(Some(attr)) if attr.value.as_ref() == b"xhtml")
}

fn push_text(text: &mut String, value: &str, xhtml: bool) {
    if xhtml {
        text.push_str(&escape(value));
    } else {
        text.push_str(value);
    }
}

/// Parse an RSS 2.0 or Atom document.
///
/// `source` is only used in error messages.
pub fn parse_feed(source: &str, xml: &str) -> Result<ParsedFeed> {
    let mut reader = Reader::from_str(xml);
    let mut feed = ParsedFeed::default();
    let mut saw_root = false;
    let mut entry: Option<FeedEntry> = None;
    let mut open: Option<OpenField> = None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            AppError::feed(
                source,
                format!("XML error at byte {}: {e}", reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                let name = name.as_ref();

                if let Some(current) = open.as_mut() {
                    current.depth += 1;
                    if current.xhtml {
                        text.push('<');
                        text.push_str(&String::from_utf8_lossy(name));
                        text.push('>');
                    }
                    continue;
                }

                match name {
                    b"rss" | b"feed" | b"RDF" => saw_root = true,
                    b"item" | b"entry" => entry = Some(FeedEntry::default()),
                    _ => {
                        if let Some(field) = Field::for_element(name, entry.is_some()) {
                            open = Some(OpenField {
                                field,
                                xhtml: is_xhtml(&e),
                                depth: 0,
                            });
                            text.clear();
                        }
                    }
                }
            }
            Event::Empty(e) => {
                if open.as_ref().is_some_and(|current| current.xhtml) {
                    text.push('<');
                    text.push_str(&String::from_utf8_lossy(e.local_name().as_ref()));
                    text.push_str("/>");
                }
            }
            Event::Text(e) => {
                if let Some(current) = &open {
                    let unescaped = e.unescape().map_err(|err| AppError::feed(source, err))?;
                    push_text(&mut text, &unescaped, current.xhtml);
                }
            }
            Event::CData(e) => {
                if let Some(current) = &open {
                    let raw = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    push_text(&mut text, &raw, current.xhtml);
                }
            }
            Event::End(e) => {
                if let Some(current) = open.as_mut() {
                    if current.depth > 0 {
                        current.depth -= 1;
                        if current.xhtml {
                            text.push_str("</");
                            text.push_str(&String::from_utf8_lossy(e.local_name().as_ref()));
                            text.push('>');
                        }
                        continue;
                    }

                    let field = current.field;
                    open = None;
                    let value = text.trim().to_string();
                    match (field, entry.as_mut()) {
                        (Field::Title, Some(current)) => current.title = value,
                        (Field::Summary, Some(current)) => current.summary = value,
                        (Field::Content, Some(current)) if current.summary.is_empty() => {
                            current.summary = value
                        }
                        (Field::Updated, None) if !value.is_empty() => {
                            feed.updated.get_or_insert(value);
                        }
                        _ => {}
                    }
                    continue;
                }

                if matches!(e.local_name().as_ref(), b"item" | b"entry") {
                    if let Some(current) = entry.take() {
                        feed.entries.push(current);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(AppError::feed(source, "document is not an RSS or Atom feed"));
    }

    Ok(feed)
}
