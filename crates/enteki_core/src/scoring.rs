//! Target-coordinate to score mapping over concentric zones.
//!
//! # Responsibility
//! - Own the zone table used to score every new shot.
//! - Map a target-local `(x, y)` to an integer score.
//!
//! # Invariants
//! - Zones are ordered innermost first; radius strictly increases as score
//!   strictly decreases.
//! - A point exactly on a ring boundary belongs to the inner (higher) zone.
//! - Points outside the outermost ring score `0`.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Score awarded for a miss (outside every zone).
pub const MISS_SCORE: u32 = 0;

/// One concentric scoring ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreZone {
    /// Outer radius of the ring in target-local units.
    pub radius: f64,
    /// Points awarded for any impact inside this ring.
    pub score: u32,
}

impl ScoreZone {
    pub const fn new(radius: f64, score: u32) -> Self {
        Self { radius, score }
    }
}

/// Validation failures for a custom zone table.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreTableError {
    Empty,
    InvalidRadius(f64),
    NotNested { radius: f64, score: u32 },
}

impl Display for ScoreTableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "score table must contain at least one zone"),
            Self::InvalidRadius(radius) => {
                write!(f, "zone radius must be finite and positive, got {radius}")
            }
            Self::NotNested { radius, score } => write!(
                f,
                "zone (radius {radius}, score {score}) breaks nesting; radius must shrink as score grows"
            ),
        }
    }
}

impl Error for ScoreTableError {}

/// Ordered zone table, stored innermost (highest score) first.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    zones: Vec<ScoreZone>,
}

impl ScoreTable {
    /// Builds a table from zones given in any order.
    ///
    /// # Errors
    /// - `Empty` for an empty zone list.
    /// - `InvalidRadius` for non-finite or non-positive radii.
    /// - `NotNested` when two zones share a radius or a score, or when a
    ///   larger ring would award more points than a smaller one.
    pub fn new(zones: impl IntoIterator<Item = ScoreZone>) -> Result<Self, ScoreTableError> {
        let mut zones: Vec<ScoreZone> = zones.into_iter().collect();
        if zones.is_empty() {
            return Err(ScoreTableError::Empty);
        }
        if let Some(zone) = zones
            .iter()
            .find(|zone| !zone.radius.is_finite() || zone.radius <= 0.0)
        {
            return Err(ScoreTableError::InvalidRadius(zone.radius));
        }

        zones.sort_by(|a, b| a.radius.total_cmp(&b.radius));
        for pair in zones.windows(2) {
            let (inner, outer) = (pair[0], pair[1]);
            if inner.radius == outer.radius || inner.score <= outer.score {
                return Err(ScoreTableError::NotNested {
                    radius: outer.radius,
                    score: outer.score,
                });
            }
        }

        Ok(Self { zones })
    }

    /// The standard five-ring table: 10/9/7/5/3 at radius 10/20/30/40/50.
    pub fn canonical() -> Self {
        Self {
            zones: vec![
                ScoreZone::new(10.0, 10),
                ScoreZone::new(20.0, 9),
                ScoreZone::new(30.0, 7),
                ScoreZone::new(40.0, 5),
                ScoreZone::new(50.0, 3),
            ],
        }
    }

    /// Zones, innermost first.
    pub fn zones(&self) -> &[ScoreZone] {
        &self.zones
    }

    /// Radius of the outermost ring.
    pub fn outer_radius(&self) -> f64 {
        self.zones.last().map_or(0.0, |zone| zone.radius)
    }

    /// Scores an impact at target-local `(x, y)`.
    ///
    /// Total over all reals; `NaN` coordinates score as a miss.
    pub fn score(&self, x: f64, y: f64) -> u32 {
        let dist = x.hypot(y);
        self.zones
            .iter()
            .find(|zone| dist <= zone.radius)
            .map_or(MISS_SCORE, |zone| zone.score)
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::canonical()
    }
}
