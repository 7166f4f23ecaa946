use serde::{Deserialize, Serialize};

/// Format a money amount as `$X.YY`. The sign is dropped; callers phrase
/// direction with "owes", "collects" or "pays".
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    format!("${:.2}", amount.abs())
}

/// Colour class of a match status, relative to side one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Halved,
    Winning,
    Losing,
}

pub fn classify_status(status: i32) -> StatusClass {
    match status.signum() {
        0 => StatusClass::Halved,
        1 => StatusClass::Winning,
        _ => StatusClass::Losing,
    }
}

/// Colour class of a signed number (points, differences, money).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueClass {
    Neutral,
    Positive,
    Negative,
}

pub fn classify_value(value: f64) -> ValueClass {
    if value > 0.0 {
        ValueClass::Positive
    } else if value < 0.0 {
        ValueClass::Negative
    } else {
        ValueClass::Neutral
    }
}

/// Render a match-play status.
///
/// `status` is positive when side one leads. Final statuses read
/// `"<leader> N"` (or `TIED`). In play, a lead larger than the holes left is
/// shown closed out as `"<leader> X & Y"`, where X is the margin beyond the
/// holes remaining and Y is the holes remaining. A square match with no holes
/// left reads `TIED` either way.
pub fn format_match_status(
    status: i32,
    holes_remaining: usize,
    is_final: bool,
    name1: &str,
    name2: &str,
) -> String {
    if status == 0 {
        let settled = is_final || holes_remaining == 0;
        return if settled { "TIED" } else { "AS" }.to_string();
    }

    let leader = if status > 0 { name1 } else { name2 };
    let margin = status.unsigned_abs() as usize;

    if is_final {
        return format!("{leader} {margin}");
    }
    if margin > holes_remaining {
        return format!(
            "{leader} {} & {holes_remaining}",
            margin - holes_remaining
        );
    }
    format!("{leader} {margin} UP")
}
