use crate::types::{IngestError, ParsedEntry, ParsedFeed, Result};
use feed_rs::parser;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        // feed-rs invents ids for entries that lack one; keep them empty so the
        // connector can apply its own link / hash fallback. The builder holds
        // non-Send hooks, so it lives only for this call.
        let feed = parser::Builder::new()
            .id_generator(|_links, _title, _uri| String::new())
            .build()
            .parse(content.as_bytes())
            .map_err(|e| IngestError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries: Vec<ParsedEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", entries.len());
        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> ParsedEntry {
        let title = entry.title.map(|t| t.content).unwrap_or_default();

        let guid = Some(entry.id).filter(|id| !id.trim().is_empty());
        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .filter(|href| !href.trim().is_empty());

        let summary = entry.summary.map(|s| s.content);
        let author = entry
            .authors
            .first()
            .map(|a| a.name.clone())
            .filter(|name| !name.trim().is_empty());

        ParsedEntry {
            guid,
            link,
            title,
            summary,
            author,
            published_at: entry.published,
        }
    }
}
