// ABOUTME: Canonical podcast and episode models shared by the three dialect extractors.
// ABOUTME: One normalized schema regardless of the source feed dialect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// The three supported feed dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedType {
    /// The detector's fallback: anything that is not an `rss` document
    /// with a recognized version.
    #[default]
    Atom,
    Rss1,
    Rss2,
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedType::Atom => "atom",
            FeedType::Rss1 => "rss1",
            FeedType::Rss2 => "rss2",
        };
        write!(f, "{}", s)
    }
}

/// Channel-level podcast metadata, one per parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    pub name: String,
    pub summary: String,
    pub editor: String,
    pub itunes_link: String,
    pub artwork: String,
    pub genre: String,
    /// Channel publication date; the epoch when the feed carries none.
    pub release_date: DateTime<Utc>,
    /// Number of entry/item elements present in the document, independent
    /// of how many episodes are successfully yielded.
    pub episodes_count: usize,
    pub feed_type: FeedType,
    /// Inner markup of the source channel/feed element, kept verbatim.
    pub inner_xml: String,
}

impl Default for Podcast {
    fn default() -> Self {
        Self {
            name: String::new(),
            summary: String::new(),
            editor: String::new(),
            itunes_link: String::new(),
            artwork: String::new(),
            genre: String::new(),
            release_date: DateTime::UNIX_EPOCH,
            episodes_count: 0,
            feed_type: FeedType::default(),
            inner_xml: String::new(),
        }
    }
}

impl Podcast {
    /// Returns true if the podcast resolved a non-empty artwork URL.
    pub fn has_artwork(&self) -> bool {
        !self.artwork.is_empty()
    }

    /// Returns true if the podcast resolved a non-empty editor.
    pub fn has_editor(&self) -> bool {
        !self.editor.is_empty()
    }
}

/// A single episode extracted from an entry/item element.
///
/// Episodes carry no back-reference to their podcast; inherited values
/// are copied in at extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastEpisode {
    /// Position counted from the end of the document: the first entry in
    /// document order carries the highest number, the last carries 1.
    pub episode_number: usize,
    pub title: String,
    pub summary: String,
    /// Empty for Atom, per-item author for RSS 1.0, the podcast-level
    /// editor for RSS 2.0.
    pub editor: String,
    pub file_url: Url,
    /// The epoch when the source date is missing or unparsable.
    pub published_date: DateTime<Utc>,
    /// Zero when the feed carries no parsable duration (RSS 2.0 only).
    pub duration: Duration,
    /// Inner markup of the source entry/item element, kept verbatim.
    pub inner_xml: String,
}
