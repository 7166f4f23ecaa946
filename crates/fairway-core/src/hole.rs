use std::ops::{Index, IndexMut, Range};

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Holes in a full round.
pub const HOLES: usize = 18;

/// Holes in each nine.
pub const NINE: usize = 9;

/// Highest stroke count accepted from raw input.
pub const MAX_STROKES: u8 = 30;

/// A recorded stroke count (or par). `None` until the hole has been entered.
pub type Score = Option<u8>;

/// Whether a stroke count or par survives storage. Deserialization and edits
/// share this bound.
pub fn is_recordable(strokes: u8) -> bool {
    (1..=MAX_STROKES).contains(&strokes)
}

/// Front nine, back nine, or the whole round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Front,
    Back,
    Total,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Front, Segment::Back, Segment::Total];

    /// 0-based hole indices covered by this segment.
    pub fn holes(self) -> Range<usize> {
        match self {
            Segment::Front => 0..NINE,
            Segment::Back => NINE..HOLES,
            Segment::Total => 0..HOLES,
        }
    }

    /// The nine a 0-based hole index belongs to.
    pub fn of_hole(index: usize) -> Segment {
        if index < NINE {
            Segment::Front
        } else {
            Segment::Back
        }
    }
}

/// A raw per-hole entry as it arrives from a form field or an imported file.
///
/// Every shape is accepted so that malformed values degrade to "unset"
/// instead of failing the whole round.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Flag(bool),
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// A value that can live in a [`PerHole`] slot and be normalized from raw input.
pub trait HoleValue: Copy + Default {
    fn from_raw(raw: RawEntry) -> Self;
}

impl HoleValue for Score {
    fn from_raw(raw: RawEntry) -> Self {
        let value = match raw {
            RawEntry::Number(n) => n,
            RawEntry::Text(text) => text.trim().parse::<f64>().ok()?,
            RawEntry::Flag(_) | RawEntry::Other(_) => return None,
        };
        if value.is_finite() && value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
            Some(value as u8).filter(|&strokes| is_recordable(strokes))
        } else {
            None
        }
    }
}

impl HoleValue for bool {
    fn from_raw(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Flag(b) => b,
            RawEntry::Number(n) => n != 0.0,
            RawEntry::Text(text) => matches!(text.trim(), "true" | "1" | "on" | "x"),
            RawEntry::Other(_) => false,
        }
    }
}

/// Fixed 18-slot container indexed by `hole - 1`.
///
/// Deserializes leniently: short arrays are padded with the default value,
/// long arrays are truncated, and unparseable entries become the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PerHole<T>([T; HOLES]);

impl<T: Copy> PerHole<T> {
    pub fn new(values: [T; HOLES]) -> Self {
        Self(values)
    }

    pub fn filled(value: T) -> Self {
        Self([value; HOLES])
    }

    /// Value at a 0-based hole index.
    pub fn get(&self, index: usize) -> T {
        self.0[index]
    }

    pub fn set(&mut self, index: usize, value: T) {
        self.0[index] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }

    pub fn as_array(&self) -> &[T; HOLES] {
        &self.0
    }
}

impl<T: Copy + Default> Default for PerHole<T> {
    fn default() -> Self {
        Self([T::default(); HOLES])
    }
}

impl<T: Copy + Default> FromIterator<T> for PerHole<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut holes = Self::default();
        for (slot, value) in holes.0.iter_mut().zip(iter) {
            *slot = value;
        }
        holes
    }
}

impl<T> Index<usize> for PerHole<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T> IndexMut<usize> for PerHole<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

impl<T: Serialize> Serialize for PerHole<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de, T: HoleValue> Deserialize<'de> for PerHole<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Vec<RawEntry>>::deserialize(deserializer)?.unwrap_or_default();
        if raw.len() > HOLES {
            tracing::debug!(entries = raw.len(), "dropping entries past hole {HOLES}");
        }
        Ok(raw
            .into_iter()
            .map(T::from_raw)
            .collect())
    }
}

impl PerHole<Score> {
    /// Number of holes with a recorded value.
    pub fn recorded(&self) -> usize {
        self.0.iter().filter(|s| s.is_some()).count()
    }

    /// Sum of a segment, present only when every hole of the segment is recorded.
    pub fn complete_total(&self, segment: Segment) -> Option<i32> {
        segment
            .holes()
            .map(|i| self.0[i].map(i32::from))
            .sum::<Option<i32>>()
    }

    /// Sum of whatever has been recorded in a segment.
    pub fn recorded_total(&self, segment: Segment) -> i32 {
        segment
            .holes()
            .filter_map(|i| self.0[i])
            .map(i32::from)
            .sum()
    }

    pub fn segment_totals(&self) -> SegmentTotals {
        SegmentTotals {
            front: self.complete_total(Segment::Front),
            back: self.complete_total(Segment::Back),
            total: self.complete_total(Segment::Total),
        }
    }

    /// Totals of recorded values, used for par rows.
    pub fn recorded_totals(&self) -> Totals {
        Totals {
            front: self.recorded_total(Segment::Front),
            back: self.recorded_total(Segment::Back),
            total: self.recorded_total(Segment::Total),
        }
    }
}

/// Stroke totals per segment; a segment is blank until it is fully recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTotals {
    pub front: Option<i32>,
    pub back: Option<i32>,
    pub total: Option<i32>,
}

/// Point (or difference) sums per segment. Unplayed holes contribute zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub front: i32,
    pub back: i32,
    pub total: i32,
}

impl Totals {
    /// Add a hole's value to its nine and to the total.
    pub fn add(&mut self, hole_index: usize, value: i32) {
        match Segment::of_hole(hole_index) {
            Segment::Front => self.front += value,
            _ => self.back += value,
        }
        self.total += value;
    }

    pub fn get(&self, segment: Segment) -> i32 {
        match segment {
            Segment::Front => self.front,
            Segment::Back => self.back,
            Segment::Total => self.total,
        }
    }
}

/// Build a score row from a prefix of holes; remaining holes stay unset.
pub fn scores_from(prefix: &[u8]) -> PerHole<Score> {
    prefix.iter().map(|&s| Some(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PerHole<Score> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn short_array_is_padded() {
        let holes = parse("[4, 5]");
        assert_eq!(holes.get(0), Some(4));
        assert_eq!(holes.get(1), Some(5));
        assert_eq!(holes.get(17), None);
    }

    #[test]
    fn long_array_is_truncated() {
        let json = format!("[{}]", vec!["3"; 25].join(","));
        let holes = parse(&json);
        assert_eq!(holes.recorded(), HOLES);
    }

    #[test]
    fn malformed_entries_become_unset() {
        let holes = parse(r#"[null, "", "abc", true, 0, -2, 4.5, "6", 7.0, {"x": 1}, 99]"#);
        assert_eq!(holes.get(0), None);
        assert_eq!(holes.get(1), None);
        assert_eq!(holes.get(2), None);
        assert_eq!(holes.get(3), None);
        assert_eq!(holes.get(4), None);
        assert_eq!(holes.get(5), None);
        assert_eq!(holes.get(6), None);
        assert_eq!(holes.get(7), Some(6));
        assert_eq!(holes.get(8), Some(7));
        assert_eq!(holes.get(9), None);
        assert_eq!(holes.get(10), None);
    }

    #[test]
    fn null_array_is_all_unset() {
        let holes = parse("null");
        assert_eq!(holes.recorded(), 0);
    }

    #[test]
    fn flags_parse_leniently() {
        let flags: PerHole<bool> = serde_json::from_str(r#"[true, 1, "on", false, null]"#).unwrap();
        assert!(flags.get(0));
        assert!(flags.get(1));
        assert!(flags.get(2));
        assert!(!flags.get(3));
        assert!(!flags.get(4));
    }

    #[test]
    fn serializes_as_full_array() {
        let holes = scores_from(&[4]);
        let json = serde_json::to_value(holes).unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), HOLES);
        assert_eq!(arr[0], 4);
        assert!(arr[1].is_null());
    }

    #[test]
    fn segment_total_requires_every_hole() {
        let mut holes = scores_from(&[4; 9]);
        assert_eq!(holes.complete_total(Segment::Front), Some(36));
        assert_eq!(holes.complete_total(Segment::Back), None);
        assert_eq!(holes.complete_total(Segment::Total), None);

        holes.set(4, None);
        assert_eq!(holes.complete_total(Segment::Front), None);
        assert_eq!(holes.recorded_total(Segment::Front), 32);
    }

    #[test]
    fn totals_split_by_nine() {
        let mut totals = Totals::default();
        totals.add(0, 2);
        totals.add(8, 1);
        totals.add(9, -3);
        assert_eq!(totals.front, 3);
        assert_eq!(totals.back, -3);
        assert_eq!(totals.total, 0);
    }
}
