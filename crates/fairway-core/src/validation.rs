use serde::Serialize;

use crate::hole::MAX_STROKES;

/// Verdict on a typed-in stroke count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum ScoreCheck {
    Ok,
    Warn(String),
    Invalid(String),
}

impl ScoreCheck {
    pub fn is_invalid(&self) -> bool {
        matches!(self, ScoreCheck::Invalid(_))
    }
}

/// Sanity-check a raw score against the hole's par.
///
/// Scores below one or above [`MAX_STROKES`] are rejected. Scores more than
/// five over par, or more than three under par on a par four or five, are
/// accepted with a warning.
pub fn validate_score(score: i32, par: Option<u8>) -> ScoreCheck {
    if score < 1 {
        return ScoreCheck::Invalid("Score must be a positive number".to_string());
    }
    if score > i32::from(MAX_STROKES) {
        return ScoreCheck::Invalid(format!("Score cannot be more than {MAX_STROKES}"));
    }
    let Some(par) = par.map(i32::from) else {
        return ScoreCheck::Ok;
    };
    if score > par + 5 {
        return ScoreCheck::Warn("Score seems high relative to par".to_string());
    }
    if par > 3 && score < par - 3 {
        return ScoreCheck::Warn("Score seems low relative to par".to_string());
    }
    ScoreCheck::Ok
}
