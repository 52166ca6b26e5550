// ABOUTME: itunes:duration parsing for episode lengths.
// ABOUTME: Accepts plain seconds, HH:MM:SS / MM:SS, and human-style duration strings.

use std::time::Duration;

/// Parses an `itunes:duration` value.
///
/// A plain integer is a whole number of seconds. Colon values read as
/// HH:MM:SS or MM:SS. Anything else is tried as a human-style duration
/// ("1h30m"). Returns None when nothing matches; callers substitute a
/// zero duration rather than failing the episode.
pub fn parse_itunes_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(secs) = s.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    if s.contains(':') {
        return parse_colon_format(s);
    }

    parse_duration::parse(s).ok()
}

fn parse_colon_format(s: &str) -> Option<Duration> {
    let parts: Vec<&str> = s.split(':').collect();
    let seconds = match parts.len() {
        2 => {
            let mins: u64 = parts[0].parse().ok()?;
            let secs: u64 = parts[1].parse().ok()?;
            mins * 60 + secs
        }
        3 => {
            let hours: u64 = parts[0].parse().ok()?;
            let mins: u64 = parts[1].parse().ok()?;
            let secs: u64 = parts[2].parse().ok()?;
            hours * 3600 + mins * 60 + secs
        }
        _ => return None,
    };
    Some(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_integer_seconds() {
        assert_eq!(parse_itunes_duration("125"), Some(Duration::from_secs(125)));
        assert_eq!(parse_itunes_duration("0"), Some(Duration::ZERO));
    }

    #[test]
    fn test_hhmmss() {
        assert_eq!(
            parse_itunes_duration("00:02:05"),
            Some(Duration::from_secs(125))
        );
        assert_eq!(
            parse_itunes_duration("1:2:3"),
            Some(Duration::from_secs(3723))
        );
    }

    #[test]
    fn test_mmss() {
        assert_eq!(
            parse_itunes_duration("45:30"),
            Some(Duration::from_secs(2730))
        );
        assert_eq!(parse_itunes_duration("0:30"), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_human_style() {
        assert_eq!(
            parse_itunes_duration("1h30m"),
            Some(Duration::from_secs(5400))
        );
        assert_eq!(
            parse_itunes_duration("45m"),
            Some(Duration::from_secs(2700))
        );
    }

    #[test]
    fn test_empty_and_invalid_return_none() {
        assert!(parse_itunes_duration("").is_none());
        assert!(parse_itunes_duration("   ").is_none());
        assert!(parse_itunes_duration("not a duration").is_none());
        assert!(parse_itunes_duration("1:2:3:4").is_none());
    }
}
