//! Content niche labels.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gaming niche of a source video.
///
/// Unknown labels collapse into `Gaming`, which also carries the default
/// revenue assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Niche {
    Fortnite,
    Horror,
    Roblox,
    Minecraft,
    CallOfDuty,
    Valorant,
    #[default]
    Gaming,
}

impl Niche {
    pub fn as_str(&self) -> &'static str {
        match self {
            Niche::Fortnite => "fortnite",
            Niche::Horror => "horror",
            Niche::Roblox => "roblox",
            Niche::Minecraft => "minecraft",
            Niche::CallOfDuty => "call_of_duty",
            Niche::Valorant => "valorant",
            Niche::Gaming => "gaming",
        }
    }

    /// Parse a free-form niche label from the discovery collaborator.
    ///
    /// Lenient on purpose: common aliases map to their canonical niche and
    /// anything unrecognized falls back to `Gaming`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "fortnite" => Niche::Fortnite,
            "horror" | "horror games" => Niche::Horror,
            "roblox" => Niche::Roblox,
            "minecraft" => Niche::Minecraft,
            "call_of_duty" | "cod" => Niche::CallOfDuty,
            "valorant" => Niche::Valorant,
            _ => Niche::Gaming,
        }
    }

    pub fn all() -> &'static [Niche] {
        &[
            Niche::Fortnite,
            Niche::Horror,
            Niche::Roblox,
            Niche::Minecraft,
            Niche::CallOfDuty,
            Niche::Valorant,
            Niche::Gaming,
        ]
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Niche::parse("cod"), Niche::CallOfDuty);
        assert_eq!(Niche::parse("Horror games"), Niche::Horror);
        assert_eq!(Niche::parse("FORTNITE"), Niche::Fortnite);
    }

    #[test]
    fn test_parse_unknown_falls_back() {
        assert_eq!(Niche::parse("apex"), Niche::Gaming);
        assert_eq!(Niche::parse(""), Niche::Gaming);
    }
}
