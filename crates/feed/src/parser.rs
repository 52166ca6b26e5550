// ABOUTME: Dialect detection and per-dialect podcast extraction.
// ABOUTME: Maps Atom, RSS 1.0, and RSS 2.0 documents onto the canonical schema.

use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::dom::{Document, ElementRef, NodeId};
use crate::duration_parse::parse_itunes_duration;
use crate::error::FeedError;
use crate::models::{FeedType, Podcast, PodcastEpisode};
use crate::result::{Episodes, PodcastRequestResult};
use crate::time_parse::parse_feed_datetime;

/// Parses a complete podcast feed document.
///
/// # Arguments
/// * `xml` - The feed document text (Atom, RSS 1.0, or RSS 2.0)
///
/// # Returns
/// * `Ok(PodcastRequestResult)` - Channel metadata plus the lazy episode sequence
/// * `Err(FeedError)` - The document is not well-formed XML, or lacks the
///   dialect's root element
pub fn parse_podcast(xml: &str) -> Result<PodcastRequestResult, FeedError> {
    let doc = Document::parse(xml)?;
    match detect_feed_type(&doc) {
        FeedType::Atom => parse_atom(doc),
        FeedType::Rss1 => parse_rss1(doc),
        FeedType::Rss2 => parse_rss2(doc),
    }
}

/// Decides which dialect strategy applies.
///
/// An `rss` element with version "1.0" or "2.0" selects the matching RSS
/// strategy. Any other document - no `rss` element, a missing version
/// attribute, or an unrecognized version string - reads as Atom. Total
/// over well-formed input.
fn detect_feed_type(doc: &Document) -> FeedType {
    match doc.find("rss").and_then(|rss| rss.attr("version")) {
        Some("1.0") => FeedType::Rss1,
        Some("2.0") => FeedType::Rss2,
        _ => FeedType::Atom,
    }
}

fn parse_atom(doc: Document) -> Result<PodcastRequestResult, FeedError> {
    let feed = doc
        .find("feed")
        .ok_or_else(|| FeedError::invalid("document has no <feed> element"))?;

    let entries: Vec<NodeId> = feed.descendants("entry").map(|entry| entry.id()).collect();
    let podcast = Podcast {
        name: child_text(feed, "title"),
        artwork: child_text(feed, "icon"),
        episodes_count: entries.len(),
        inner_xml: feed.inner_xml().to_string(),
        feed_type: FeedType::Atom,
        ..Podcast::default()
    };

    Ok(PodcastRequestResult::new(
        podcast,
        Episodes::new(doc, FeedType::Atom, entries, String::new()),
    ))
}

fn parse_rss1(doc: Document) -> Result<PodcastRequestResult, FeedError> {
    let channel = doc
        .find("channel")
        .ok_or_else(|| FeedError::invalid("document has no <channel> element"))?;

    let items: Vec<NodeId> = channel.descendants("item").map(|item| item.id()).collect();
    let podcast = Podcast {
        name: child_text(channel, "title"),
        summary: child_text(channel, "description"),
        itunes_link: child_text(channel, "link"),
        episodes_count: items.len(),
        inner_xml: channel.inner_xml().to_string(),
        feed_type: FeedType::Rss1,
        ..Podcast::default()
    };

    Ok(PodcastRequestResult::new(
        podcast,
        Episodes::new(doc, FeedType::Rss1, items, String::new()),
    ))
}

fn parse_rss2(doc: Document) -> Result<PodcastRequestResult, FeedError> {
    let channel = doc
        .find("channel")
        .ok_or_else(|| FeedError::invalid("document has no <channel> element"))?;

    let editor = channel
        .descendants("itunes:author")
        .next()
        .map(|author| author.text())
        .unwrap_or_default();
    let genre = channel
        .descendants("itunes:category")
        .next()
        .and_then(|category| category.first_attr())
        .unwrap_or_default()
        .to_string();

    // The channel <image> fallback applies only when itunes:image resolved
    // to an exactly-empty attribute value, not when the element or its
    // attribute is missing altogether.
    let mut artwork = channel
        .descendants("itunes:image")
        .next()
        .and_then(|image| image.first_attr())
        .map(str::to_string);
    if artwork.as_deref() == Some("") {
        if let Some(image) = channel.descendants("image").next() {
            artwork = Some(child_text(image, "url"));
        }
    }

    let items: Vec<NodeId> = channel.descendants("item").map(|item| item.id()).collect();
    let podcast = Podcast {
        name: child_text(channel, "title"),
        editor: editor.clone(),
        itunes_link: child_text(channel, "link"),
        summary: child_text(channel, "description"),
        release_date: parse_date_or_epoch(&child_text(channel, "pubDate")),
        genre,
        artwork: artwork.unwrap_or_default(),
        episodes_count: items.len(),
        inner_xml: channel.inner_xml().to_string(),
        feed_type: FeedType::Rss2,
    };

    Ok(PodcastRequestResult::new(
        podcast,
        Episodes::new(doc, FeedType::Rss2, items, editor),
    ))
}

pub(crate) fn atom_episode(
    entry: ElementRef<'_>,
    number: usize,
) -> Result<PodcastEpisode, FeedError> {
    // No fallback for Atom: the entry's link href is the only source.
    let href = attr_text(entry.child("link"), "href");
    let file_url =
        Url::parse(&href).map_err(|source| FeedError::episode_url(href.clone(), source))?;

    Ok(PodcastEpisode {
        episode_number: number,
        title: child_text(entry, "title"),
        summary: child_text(entry, "summary"),
        editor: String::new(),
        file_url,
        published_date: parse_date_or_epoch(&child_text(entry, "updated")),
        duration: Duration::ZERO,
        inner_xml: entry.inner_xml().to_string(),
    })
}

pub(crate) fn rss1_episode(
    item: ElementRef<'_>,
    number: usize,
) -> Result<PodcastEpisode, FeedError> {
    let link = child_text(item, "link");
    let file_url =
        Url::parse(&link).map_err(|source| FeedError::episode_url(link.clone(), source))?;

    Ok(PodcastEpisode {
        episode_number: number,
        title: child_text(item, "title"),
        summary: child_text(item, "description"),
        editor: child_text(item, "author"),
        file_url,
        published_date: parse_date_or_epoch(&child_text(item, "pubDate")),
        duration: Duration::ZERO,
        inner_xml: item.inner_xml().to_string(),
    })
}

pub(crate) fn rss2_episode(
    item: ElementRef<'_>,
    number: usize,
    editor: &str,
) -> Result<PodcastEpisode, FeedError> {
    // An enclosure wins over the plain link when the item carries one.
    let link = match item.child("enclosure") {
        Some(enclosure) => attr_text(Some(enclosure), "url"),
        None => child_text(item, "link"),
    };
    let file_url =
        Url::parse(&link).map_err(|source| FeedError::episode_url(link.clone(), source))?;

    let duration =
        parse_itunes_duration(&child_text(item, "itunes:duration")).unwrap_or(Duration::ZERO);

    Ok(PodcastEpisode {
        episode_number: number,
        title: child_text(item, "title"),
        summary: child_text(item, "description"),
        editor: editor.to_string(),
        file_url,
        published_date: parse_date_or_epoch(&child_text(item, "pubDate")),
        duration,
        inner_xml: item.inner_xml().to_string(),
    })
}

/// Text content of the first direct child element with the given name, or
/// the empty string when the child is absent.
fn child_text(node: ElementRef<'_>, name: &str) -> String {
    node.child(name)
        .map(|child| child.text())
        .unwrap_or_default()
}

/// Attribute value on a node that may itself be absent; the empty string
/// stands in for a missing node, attribute, or value.
fn attr_text(node: Option<ElementRef<'_>>, name: &str) -> String {
    node.and_then(|node| node.attr(name))
        .unwrap_or_default()
        .to_string()
}

fn parse_date_or_epoch(s: &str) -> DateTime<Utc> {
    parse_feed_datetime(s).unwrap_or(DateTime::UNIX_EPOCH)
}
