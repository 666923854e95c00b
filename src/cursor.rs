use kurbo::Point;

use crate::ease::approach;

/// Fraction of the remaining gap the trailing marker closes per frame.
pub const FOLLOW_FACTOR: f64 = 0.1;

/// Two-part pointer presentation: a dot glued to the raw pointer and a larger
/// marker that chases it with exponential lag. Hover state widens the marker
/// over interactive regions; the director decides when that applies.
#[derive(Debug, Default)]
pub struct CursorTrail {
    target: Point,
    marker: Point,
    hover: bool,
}

impl CursorTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_moved(&mut self, p: Point) {
        self.target = p;
    }

    pub fn set_hover(&mut self, on: bool) {
        self.hover = on;
    }

    pub fn step(&mut self) {
        self.marker.x = approach(self.marker.x, self.target.x, FOLLOW_FACTOR);
        self.marker.y = approach(self.marker.y, self.target.y, FOLLOW_FACTOR);
    }

    pub fn marker(&self) -> Point {
        self.marker
    }

    /// The dot never lags.
    pub fn dot(&self) -> Point {
        self.target
    }

    pub fn is_hover(&self) -> bool {
        self.hover
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_tracks_the_pointer_exactly() {
        let mut cursor = CursorTrail::new();
        cursor.pointer_moved(Point::new(40.0, 80.0));
        assert_eq!(cursor.dot(), Point::new(40.0, 80.0));
        cursor.step();
        assert_eq!(cursor.dot(), Point::new(40.0, 80.0));
    }

    #[test]
    fn marker_lags_then_converges() {
        let mut cursor = CursorTrail::new();
        cursor.pointer_moved(Point::new(100.0, 0.0));

        cursor.step();
        assert_eq!(cursor.marker(), Point::new(10.0, 0.0));

        let mut last_gap = 90.0;
        for _ in 0..200 {
            cursor.step();
            let gap = (cursor.dot() - cursor.marker()).hypot();
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-6);
    }

    #[test]
    fn hover_is_explicit_state() {
        let mut cursor = CursorTrail::new();
        assert!(!cursor.is_hover());
        cursor.set_hover(true);
        assert!(cursor.is_hover());
        cursor.set_hover(false);
        assert!(!cursor.is_hover());
    }
}
