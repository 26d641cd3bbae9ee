//! SRT caption payload parsing.

use std::sync::OnceLock;

use regex::Regex;

use aclip_models::TranscriptSegment;

use crate::error::{TranscriptError, TranscriptResult};

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+):(\d+):(\d+)[,.](\d+)$").expect("valid regex"))
}

/// Convert an SRT timestamp (`HH:MM:SS,mmm`) to seconds.
fn srt_time_to_seconds(time: &str) -> Option<f64> {
    let caps = timestamp_re().captures(time.trim())?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    let millis: f64 = caps[4].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}

/// Parse an SRT payload into normalized segments.
///
/// Malformed entries are skipped rather than failing the whole payload;
/// an entirely unparseable payload is an error so tier 1 can fall through.
pub fn parse_srt(payload: &str) -> TranscriptResult<Vec<TranscriptSegment>> {
    let mut segments = Vec::new();

    for entry in payload.replace("\r\n", "\n").split("\n\n") {
        let lines: Vec<&str> = entry.trim().lines().collect();
        if lines.len() < 3 {
            continue;
        }

        // lines[0] is the entry index; lines[1] the timestamp pair
        let Some((start_raw, end_raw)) = lines[1].split_once(" --> ") else {
            continue;
        };
        let (Some(start), Some(end)) = (
            srt_time_to_seconds(start_raw),
            srt_time_to_seconds(end_raw),
        ) else {
            continue;
        };

        let text = lines[2..].join(" ").trim().to_string();
        if text.is_empty() {
            continue;
        }

        segments.push(TranscriptSegment::new(start, end, text));
    }

    if segments.is_empty() {
        return Err(TranscriptError::captions_malformed(
            "no parseable SRT entries",
        ));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello world\n\n2\n00:00:02,500 --> 00:00:05,000\nSecond line\nwraps here\n";

    #[test]
    fn test_parse_basic_payload() {
        let segments = parse_srt(SAMPLE).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 2.5);
        assert_eq!(segments[0].text, "Hello world");
        assert_eq!(segments[1].text, "Second line wraps here");
    }

    #[test]
    fn test_parse_crlf_payload() {
        let payload = SAMPLE.replace('\n', "\r\n");
        let segments = parse_srt(&payload).unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let payload = format!("garbage\n\n{SAMPLE}");
        let segments = parse_srt(&payload).unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_unparseable_payload_is_error() {
        assert!(parse_srt("not srt at all").is_err());
        assert!(parse_srt("").is_err());
    }

    #[test]
    fn test_timestamp_with_dot_millis() {
        assert_eq!(srt_time_to_seconds("00:01:23.456"), Some(83.456));
        assert_eq!(srt_time_to_seconds("01:00:00,000"), Some(3600.0));
        assert_eq!(srt_time_to_seconds("bogus"), None);
    }
}
