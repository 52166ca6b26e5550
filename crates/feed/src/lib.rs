// ABOUTME: Core podcast feed parsing library for podfinder-core.
// ABOUTME: Detects the feed dialect and maps it onto one canonical podcast schema.

pub mod dom;
pub mod duration_parse;
pub mod error;
pub mod models;
pub mod parser;
pub mod result;
pub mod time_parse;

pub use duration_parse::parse_itunes_duration;
pub use error::FeedError;
pub use models::{FeedType, Podcast, PodcastEpisode};
pub use parser::parse_podcast;
pub use result::{Episodes, PodcastRequestResult};
pub use time_parse::parse_feed_datetime;
