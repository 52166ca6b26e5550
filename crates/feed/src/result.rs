// ABOUTME: Parse result assembly: channel metadata plus the lazy episode sequence.
// ABOUTME: Episodes is a forward-only, single-pass iterator over entry/item nodes.

use crate::dom::{Document, NodeId};
use crate::error::FeedError;
use crate::models::{FeedType, Podcast, PodcastEpisode};
use crate::parser;

/// The result of parsing one feed document: channel metadata resolved
/// eagerly, episodes produced on demand.
#[derive(Debug)]
pub struct PodcastRequestResult {
    pub podcast: Podcast,
    pub episodes: Episodes,
}

impl PodcastRequestResult {
    pub(crate) fn new(podcast: Podcast, episodes: Episodes) -> Self {
        Self { podcast, episodes }
    }

    /// Splits the result into its channel metadata and episode sequence.
    pub fn into_parts(self) -> (Podcast, Episodes) {
        (self.podcast, self.episodes)
    }
}

/// Lazy episode sequence over the entry/item elements of a parsed document.
///
/// Episodes come out in document order, numbered from the entry count down
/// to 1. Each `next` call extracts one episode from the retained document;
/// a URL construction failure is yielded as an error for that episode and
/// ends the sequence. The iterator is single-consumer and cannot be
/// restarted; parse the document again to read the episodes again.
#[derive(Debug)]
pub struct Episodes {
    doc: Document,
    dialect: FeedType,
    items: Vec<NodeId>,
    cursor: usize,
    editor: String,
    failed: bool,
}

impl Episodes {
    pub(crate) fn new(
        doc: Document,
        dialect: FeedType,
        items: Vec<NodeId>,
        editor: String,
    ) -> Self {
        Self {
            doc,
            dialect,
            items,
            cursor: 0,
            editor,
            failed: false,
        }
    }

    /// Number of entries not yet consumed.
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.items.len() - self.cursor
        }
    }
}

impl Iterator for Episodes {
    type Item = Result<PodcastEpisode, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.items.len() {
            return None;
        }
        let id = self.items[self.cursor];
        let number = self.items.len() - self.cursor;
        self.cursor += 1;

        let node = self.doc.element(id);
        let episode = match self.dialect {
            FeedType::Atom => parser::atom_episode(node, number),
            FeedType::Rss1 => parser::rss1_episode(node, number),
            FeedType::Rss2 => parser::rss2_episode(node, number, &self.editor),
        };
        if episode.is_err() {
            self.failed = true;
        }
        Some(episode)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // An episode error can end the sequence early, so only the upper
        // bound is firm.
        (0, Some(self.remaining()))
    }
}

impl std::iter::FusedIterator for Episodes {}
