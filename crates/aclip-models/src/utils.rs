//! Video id extraction from watch URLs.
//!
//! The discovery collaborator hands over either bare 11-character ids or
//! full watch/short URLs; the registry keys on the bare id.

use thiserror::Error;
use url::Url;

/// Result type for id extraction.
pub type VideoIdResult = Result<String, VideoIdError>;

/// Errors from video id extraction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VideoIdError {
    #[error("not a valid URL or video id: {0}")]
    Invalid(String),

    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("no video id found in URL: {0}")]
    Missing(String),
}

/// True for a bare platform-native video id (11 URL-safe characters).
fn is_bare_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the video id from a watch URL or bare id.
///
/// Supported shapes: `https://www.youtube.com/watch?v=<id>`,
/// `https://youtu.be/<id>`, `/shorts/<id>`, `/embed/<id>`, and the bare
/// 11-character id itself.
pub fn extract_video_id(input: &str) -> VideoIdResult {
    let input = input.trim();

    if is_bare_id(input) {
        return Ok(input.to_string());
    }

    let url = Url::parse(input).map_err(|_| VideoIdError::Invalid(input.to_string()))?;

    let host = url
        .host_str()
        .ok_or_else(|| VideoIdError::Invalid(input.to_string()))?
        .trim_start_matches("www.")
        .trim_start_matches("m.")
        .to_string();

    match host.as_str() {
        "youtube.com" | "youtube-nocookie.com" => {
            // watch?v=<id>
            if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
                if is_bare_id(&v) {
                    return Ok(v.to_string());
                }
            }
            // /shorts/<id>, /embed/<id>, /live/<id>
            if let Some(mut segments) = url.path_segments() {
                while let Some(seg) = segments.next() {
                    if matches!(seg, "shorts" | "embed" | "live") {
                        if let Some(id) = segments.next() {
                            if is_bare_id(id) {
                                return Ok(id.to_string());
                            }
                        }
                    }
                }
            }
            Err(VideoIdError::Missing(input.to_string()))
        }
        "youtu.be" => {
            let id = url
                .path_segments()
                .and_then(|mut s| s.next())
                .unwrap_or_default();
            if is_bare_id(id) {
                Ok(id.to_string())
            } else {
                Err(VideoIdError::Missing(input.to_string()))
            }
        }
        other => Err(VideoIdError::UnsupportedHost(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id_passthrough() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_shorts_path() {
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_unsupported_host() {
        assert_eq!(
            extract_video_id("https://vimeo.com/12345"),
            Err(VideoIdError::UnsupportedHost("vimeo.com".to_string()))
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            extract_video_id("definitely not a url"),
            Err(VideoIdError::Invalid(_))
        ));
    }
}
