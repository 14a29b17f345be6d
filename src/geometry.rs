//! Drag geometry: points, the stock pass/fail rule and the stock scoring
//! function, plus the colour tier used for score indicators.

/// Surface-local pointer position in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Minimum drag length (exclusive) accepted by [`distance_rule`].
pub const MIN_DRAG_DISTANCE: f64 = 100.0;

/// A drag counts only when it is longer than [`MIN_DRAG_DISTANCE`].
pub fn distance_rule(p1: Point, p2: Point) -> bool {
    p1.distance(p2) > MIN_DRAG_DISTANCE
}

/// Scores how close the dragged rectangle is to a square, 0..=100.
///
/// Follows IEEE semantics for degenerate sides: a zero-width (or zero-height)
/// rectangle yields `min(0, inf) = 0`. A zero-area drag yields NaN; the
/// stock rule never lets one through.
pub fn squareness_score(p1: Point, p2: Point) -> f64 {
    let width = (p2.x - p1.x).abs();
    let height = (p2.y - p1.y).abs();
    (width / height).min(height / width) * 100.0
}

/// Colour band of a recorded score in the progress row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreTier {
    Great,
    Good,
    Poor,
    Empty,
}

impl ScoreTier {
    pub fn classify(score: Option<f64>) -> Self {
        match score {
            Some(s) if s > 90.0 => ScoreTier::Great,
            Some(s) if s > 70.0 => ScoreTier::Good,
            Some(s) if s > 0.0 => ScoreTier::Poor,
            // NaN, zero, negative and unplayed slots all land here
            _ => ScoreTier::Empty,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreTier::Great => "green",
            ScoreTier::Good => "orange",
            ScoreTier::Poor => "red",
            ScoreTier::Empty => "gray",
        }
    }

    /// Empty slots are drawn as a bare circle without a label.
    pub fn has_label(self) -> bool {
        !matches!(self, ScoreTier::Empty)
    }
}
