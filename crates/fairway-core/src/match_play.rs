use serde::{Deserialize, Serialize};

use crate::hole::{HOLES, NINE, PerHole, Score};

/// Hole-by-hole match-play status between two sides.
///
/// Status is measured from side one's view: positive means side one is up.
/// Holes without both scores carry the previous status forward and have no
/// hole result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTrack {
    /// `score1 - score2` for holes where both scores are present.
    pub hole_results: [Option<i32>; HOLES],
    /// Running status after each hole.
    pub match_status: [i32; HOLES],
}

impl Default for MatchTrack {
    fn default() -> Self {
        Self {
            hole_results: [None; HOLES],
            match_status: [0; HOLES],
        }
    }
}

impl MatchTrack {
    pub fn from_scores(side1: &PerHole<Score>, side2: &PerHole<Score>) -> Self {
        let mut track = Self::default();
        let mut current = 0;
        for i in 0..HOLES {
            if let (Some(a), Some(b)) = (side1.get(i), side2.get(i)) {
                let diff = i32::from(a) - i32::from(b);
                track.hole_results[i] = Some(diff);
                current += match diff.signum() {
                    -1 => 1,
                    1 => -1,
                    _ => 0,
                };
            }
            track.match_status[i] = current;
        }
        track
    }

    pub fn has_result(&self, index: usize) -> bool {
        self.hole_results[index].is_some()
    }

    /// 1-based number of the last hole where both sides have a score.
    pub fn current_hole(&self) -> Option<usize> {
        (0..HOLES).rev().find(|&i| self.has_result(i)).map(|i| i + 1)
    }

    /// 1-based number of the last scored hole at or after `start` (1-based).
    pub fn last_complete_hole_from(&self, start: usize) -> Option<usize> {
        let first = start.max(1) - 1;
        (first..HOLES)
            .rev()
            .find(|&i| self.has_result(i))
            .map(|i| i + 1)
    }

    /// Status after the front nine (carried forward from the last scored hole).
    pub fn front(&self) -> i32 {
        self.match_status[NINE - 1]
    }

    /// Holes won on the back nine minus holes lost there.
    pub fn back(&self) -> i32 {
        self.match_status[HOLES - 1] - self.match_status[NINE - 1]
    }

    pub fn overall(&self) -> i32 {
        self.match_status[HOLES - 1]
    }

    pub fn played(&self) -> usize {
        self.hole_results.iter().filter(|r| r.is_some()).count()
    }

    /// Holes still unplayed after the given 0-based hole index.
    pub fn remaining_after(index: usize) -> usize {
        HOLES - (index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hole::scores_from;

    #[test]
    fn winning_every_front_hole() {
        let track = MatchTrack::from_scores(&scores_from(&[3; 9]), &scores_from(&[4; 9]));
        assert_eq!(track.match_status[8], 9);
        assert_eq!(track.front(), 9);
        assert_eq!(track.back(), 0);
        assert_eq!(track.overall(), 9);
        assert_eq!(track.current_hole(), Some(9));
    }

    #[test]
    fn missing_holes_carry_status() {
        let mut p1 = scores_from(&[4, 4, 5]);
        let mut p2 = scores_from(&[5, 4, 4]);
        p1.set(5, Some(3));
        p2.set(5, Some(4));
        let track = MatchTrack::from_scores(&p1, &p2);
        assert_eq!(&track.match_status[..6], &[1, 1, 0, 0, 0, 1]);
        assert_eq!(track.hole_results[3], None);
        assert_eq!(track.hole_results[1], Some(0));
        assert_eq!(track.current_hole(), Some(6));
        assert_eq!(track.played(), 4);
    }

    #[test]
    fn one_sided_scores_do_not_count() {
        let track = MatchTrack::from_scores(&scores_from(&[4, 4]), &PerHole::default());
        assert_eq!(track.current_hole(), None);
        assert_eq!(track.overall(), 0);
    }

    #[test]
    fn last_complete_hole_respects_start() {
        let track = MatchTrack::from_scores(&scores_from(&[4; 5]), &scores_from(&[4; 5]));
        assert_eq!(track.last_complete_hole_from(3), Some(5));
        assert_eq!(track.last_complete_hole_from(6), None);
        assert_eq!(track.last_complete_hole_from(0), Some(5));
    }
}
