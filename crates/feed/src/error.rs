// ABOUTME: Error types for podcast feed parsing.
// ABOUTME: Provides FeedError covering document, structure, and episode URL failures.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while parsing a podcast feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The input is not well-formed XML.
    #[error("malformed feed document: {0}")]
    Document(String),

    /// The document is well-formed XML but lacks the dialect's root element.
    #[error("invalid feed: {0}")]
    Invalid(String),

    /// An episode's link or enclosure value does not form a valid URL.
    /// Surfaced when that episode is consumed from the sequence, not at
    /// parse time.
    #[error("invalid episode url `{url}`: {source}")]
    EpisodeUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl FeedError {
    /// Creates a Document error from an underlying XML error.
    pub fn document(err: impl fmt::Display) -> Self {
        FeedError::Document(err.to_string())
    }

    /// Creates an Invalid error with a custom message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        FeedError::Invalid(msg.into())
    }

    /// Creates an EpisodeUrl error for a link that failed URL construction.
    pub fn episode_url(url: impl Into<String>, source: url::ParseError) -> Self {
        FeedError::EpisodeUrl {
            url: url.into(),
            source,
        }
    }
}
