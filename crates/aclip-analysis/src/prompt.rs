//! Analysis prompt construction.
//!
//! The prompt embeds the timestamped transcript, bounded to a character
//! budget so a very long video cannot blow up the request.

use aclip_models::{Niche, Transcript};

/// Default transcript budget inside the prompt, in characters.
pub const DEFAULT_TRANSCRIPT_CHAR_BUDGET: usize = 60_000;

/// Render the transcript as `[12.3s - 15.0s] text` lines, truncated to
/// `char_budget` on a line boundary.
pub fn timestamped_transcript(transcript: &Transcript, char_budget: usize) -> String {
    let mut out = String::new();
    for segment in &transcript.segments {
        let line = format!("[{:.1}s - {:.1}s] {}\n", segment.start, segment.end, segment.text);
        if out.len() + line.len() > char_budget {
            break;
        }
        out.push_str(&line);
    }
    out
}

/// Build the full analysis prompt for a transcript and niche.
pub fn build_analysis_prompt(transcript: &Transcript, niche: Niche, char_budget: usize) -> String {
    let body = timestamped_transcript(transcript, char_budget);

    format!(
        r#"Analyze this {niche} gaming video transcript and identify viral moments suitable for short-form content (YouTube Shorts, TikTok, Instagram Reels).

Transcript with timestamps:
{body}

For each viral moment, provide:
1. start_time: Start timestamp in seconds (must match a timestamp from the transcript)
2. end_time: End timestamp in seconds (must be within 15-60 seconds from start)
3. type: One of: exciting, funny, shocking, emotional, epic
4. virality_score: Score from 0-100 based on engagement potential
5. quote: Exact quote from the transcript (10-15 words max for hook potential)
6. reason: Why this moment is viral (be specific about what makes it engaging)
7. engagement: Object with excitement, emotional_arc and hook_strength, each 0-100
8. brand_safety: Object with boolean flags profanity, violence, controversy, copyright, explicit

Requirements:
- Identify 3-6 best moments maximum
- Each clip must be 15-60 seconds (optimal for short-form)
- Prioritize moments with high energy, surprises, or emotional peaks
- Quote must be verbatim from the transcript
- Consider what would make someone stop scrolling

IMPORTANT: You must strictly follow this output format.
Return ONLY a single JSON object (no markdown, no code blocks):
{{
  "overall_virality": <score>,
  "moments": [
    {{
      "start_time": <seconds>,
      "end_time": <seconds>,
      "type": "<type>",
      "virality_score": <score>,
      "quote": "<exact_quote>",
      "reason": "<explanation>",
      "engagement": {{"excitement": <0-100>, "emotional_arc": <0-100>, "hook_strength": <0-100>}},
      "brand_safety": {{"profanity": false, "violence": false, "controversy": false, "copyright": false, "explicit": false}}
    }}
  ]
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aclip_models::{TranscriptSegment, TranscriptSource};

    fn transcript(lines: usize) -> Transcript {
        let segments = (0..lines)
            .map(|i| TranscriptSegment::new(i as f64, (i + 1) as f64, format!("line {i}")))
            .collect();
        Transcript::new(TranscriptSource::Tier1, segments)
    }

    #[test]
    fn test_prompt_contains_transcript_and_niche() {
        let prompt = build_analysis_prompt(&transcript(3), Niche::Fortnite, 10_000);
        assert!(prompt.contains("fortnite"));
        assert!(prompt.contains("[0.0s - 1.0s] line 0"));
        assert!(prompt.contains("overall_virality"));
    }

    #[test]
    fn test_transcript_budget_truncates_on_line_boundary() {
        let full = timestamped_transcript(&transcript(1000), usize::MAX);
        let bounded = timestamped_transcript(&transcript(1000), 500);
        assert!(bounded.len() <= 500);
        assert!(bounded.len() < full.len());
        // Still whole lines
        assert!(bounded.ends_with('\n'));
    }
}
