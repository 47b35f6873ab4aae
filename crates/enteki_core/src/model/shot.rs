//! Single arrow placement.

use crate::scoring::ScoreTable;
use serde::{Deserialize, Serialize};

/// One arrow impact in target-local units, bullseye at the origin.
///
/// Fields are read-only outside the crate so `score` cannot drift from the
/// coordinates it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    x: f64,
    y: f64,
    score: u32,
}

impl Shot {
    /// Creates a shot scored against `table`.
    pub fn new(x: f64, y: f64, table: &ScoreTable) -> Self {
        Self {
            x,
            y,
            score: table.score(x, y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::Shot;
    use crate::scoring::ScoreTable;

    #[test]
    fn new_derives_score_from_coordinates() {
        let shot = Shot::new(3.0, 4.0, &ScoreTable::canonical());
        assert_eq!(shot.x(), 3.0);
        assert_eq!(shot.y(), 4.0);
        assert_eq!(shot.score(), 10);
    }

    #[test]
    fn serializes_with_plain_field_names() {
        let shot = Shot::new(0.0, 25.0, &ScoreTable::canonical());
        let json = serde_json::to_value(shot).unwrap();
        assert_eq!(json, serde_json::json!({ "x": 0.0, "y": 25.0, "score": 7 }));
    }
}
