use serde::{Deserialize, Serialize};

use crate::hole::Score;

/// Stableford point table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointSystem {
    #[default]
    #[serde(rename = "standard", alias = "stableford-standard")]
    Standard,
    #[serde(rename = "modified", alias = "stableford-modified")]
    Modified,
}

impl PointSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            PointSystem::Standard => "standard",
            PointSystem::Modified => "modified",
        }
    }

    /// Points for a hole played `diff` strokes relative to par.
    pub fn points_for(self, diff: i32) -> i32 {
        match self {
            PointSystem::Standard => match diff {
                d if d <= -4 => 5 - d,
                -3 => 5,
                -2 => 4,
                -1 => 3,
                0 => 2,
                1 => 1,
                _ => 0,
            },
            PointSystem::Modified => match diff {
                d if d <= -4 => 4 - d,
                -3 => 4,
                -2 => 3,
                -1 => 2,
                0 => 1,
                1 => 0,
                2 => -1,
                _ => -2,
            },
        }
    }
}

impl std::str::FromStr for PointSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "stableford-standard" => Ok(PointSystem::Standard),
            "modified" | "stableford-modified" => Ok(PointSystem::Modified),
            other => Err(format!("unknown point system '{other}'")),
        }
    }
}

/// Stableford points for one hole; `None` when the score or par is missing.
pub fn stableford_points(score: Score, par: Score, system: PointSystem) -> Option<i32> {
    let diff = i32::from(score?) - i32::from(par?);
    Some(system.points_for(diff))
}
