//! Platform metadata generation.
//!
//! Template-based titles, descriptions and hashtags for the selected clip.
//! Titles are capped at the platform limit.

use rand::prelude::IndexedRandom;

use aclip_models::{ClipCandidate, ClipMetadata, MomentType, Niche, Platform};

const GAMING_HASHTAGS: &[&str] = &[
    "#gaming",
    "#gamer",
    "#gamingclips",
    "#viral",
    "#trending",
    "#shorts",
    "#fyp",
    "#clips",
];

fn niche_hashtags(niche: Niche) -> &'static [&'static str] {
    match niche {
        Niche::Fortnite => &["#fortnite", "#fortniteclips", "#battleroyale"],
        Niche::Horror => &["#horror", "#horrorgame", "#scary"],
        Niche::Roblox => &["#roblox", "#robloxfyp", "#robloxedit"],
        Niche::Minecraft => &["#minecraft", "#minecraftclips", "#minecraftshorts"],
        Niche::CallOfDuty => &["#cod", "#callofduty", "#warzone"],
        Niche::Valorant => &["#valorant", "#valorantclips", "#radiant"],
        Niche::Gaming => &["#gameplay", "#letsplay", "#epic"],
    }
}

fn title_prefixes(moment_type: MomentType) -> &'static [&'static str] {
    match moment_type {
        MomentType::Funny => &["LMAO!", "THIS IS HILARIOUS!", "CAN'T STOP LAUGHING!"],
        MomentType::Shocking => &["NO WAY!", "ARE YOU SERIOUS?!", "I'M SHOOK!"],
        MomentType::Emotional => &["This hit different...", "My heart...", "NOT ME CRYING"],
        MomentType::Epic => &["INSANE MOMENT!", "ABSOLUTELY EPIC!", "LEGENDARY PLAY!"],
        MomentType::Exciting | MomentType::Other => {
            &["OMG!", "YOU WON'T BELIEVE THIS!", "WTF?!"]
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Generate publish metadata for a clip on one platform.
pub fn generate_metadata(clip: &ClipCandidate, platform: Platform) -> ClipMetadata {
    let prefix = title_prefixes(clip.moment_type)
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("OMG!");

    let hook = truncate_chars(clip.quote.trim(), 60);
    let title = if hook.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix} {hook}")
    };
    let title = truncate_chars(&title, platform.title_max_chars());

    let mut hashtags: Vec<String> = niche_hashtags(clip.niche)
        .iter()
        .chain(GAMING_HASHTAGS.iter().take(5))
        .map(|t| t.to_string())
        .collect();
    hashtags.dedup();

    let description = format!(
        "{} {}\n\n{}",
        hook,
        if hook.is_empty() { "" } else { "🎮" },
        hashtags.join(" ")
    )
    .trim()
    .to_string();

    ClipMetadata {
        platform,
        title,
        description,
        hashtags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aclip_models::{BrandSafety, EngagementSignals};
    use chrono::Utc;

    fn clip(niche: Niche, platform: Platform) -> ClipCandidate {
        ClipCandidate {
            source_video_id: "vid00000001".into(),
            source_discovered_at: Utc::now(),
            start_time: 0.0,
            end_time: 30.0,
            moment_type: MomentType::Exciting,
            quote: "what a play".to_string(),
            virality_score: 90.0,
            engagement_quality: 85.0,
            engagement: EngagementSignals::default(),
            brand_safety: BrandSafety::clean(),
            safety_score: 100.0,
            earning_potential: 80.0,
            niche,
            platform,
            disqualified: false,
            disqualify_reason: None,
        }
    }

    #[test]
    fn test_title_respects_platform_cap() {
        let mut long_clip = clip(Niche::Fortnite, Platform::YoutubeShorts);
        long_clip.quote = "a".repeat(300);
        let meta = generate_metadata(&long_clip, Platform::YoutubeShorts);
        assert!(meta.title.chars().count() <= 100);
    }

    #[test]
    fn test_hashtags_include_niche_tags() {
        let meta = generate_metadata(&clip(Niche::Valorant, Platform::Tiktok), Platform::Tiktok);
        assert!(meta.hashtags.iter().any(|t| t == "#valorant"));
        assert!(meta.description.contains("#valorant"));
    }

    #[test]
    fn test_empty_quote_still_produces_title() {
        let mut quiet = clip(Niche::Gaming, Platform::InstagramReels);
        quiet.quote = String::new();
        let meta = generate_metadata(&quiet, Platform::InstagramReels);
        assert!(!meta.title.is_empty());
    }
}
