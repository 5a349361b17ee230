//! Gamification tiers earned by sharing places.

use serde::{Deserialize, Serialize};

/// A user's rank, derived purely from how many places they have shared.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    #[default]
    #[serde(rename = "Novice")]
    Novice,
    #[serde(rename = "Seeker")]
    Seeker,
    #[serde(rename = "Top Curator")]
    TopCurator,
    #[serde(rename = "Legend of the Roads")]
    LegendOfTheRoads,
}

impl Level {
    /// Tier for a cumulative place count. Thresholds are exclusive lower bounds.
    pub fn for_places_count(count: i64) -> Self {
        if count > 50 {
            Level::LegendOfTheRoads
        } else if count > 30 {
            Level::TopCurator
        } else if count > 10 {
            Level::Seeker
        } else {
            Level::Novice
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Novice => "Novice",
            Level::Seeker => "Seeker",
            Level::TopCurator => "Top Curator",
            Level::LegendOfTheRoads => "Legend of the Roads",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Novice" => Some(Level::Novice),
            "Seeker" => Some(Level::Seeker),
            "Top Curator" => Some(Level::TopCurator),
            "Legend of the Roads" => Some(Level::LegendOfTheRoads),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
