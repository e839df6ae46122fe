//! Geometry primitives and the positioning anchor capability

use std::fmt::Debug;

/// Axis-aligned rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Bounding box of `rects`, or [`Rect::ZERO`] when there are none
    pub fn bounding(rects: &[Rect]) -> Rect {
        let mut iter = rects.iter();
        match iter.next() {
            Some(first) => iter.fold(*first, |acc, rect| acc.union(rect)),
            None => Rect::ZERO,
        }
    }
}

/// Anything an overlay can be positioned against
///
/// A real widget, a text range, or a synthesized rectangle all qualify.
pub trait VirtualElement: Debug {
    fn bounding_rect(&self) -> Rect;
    fn client_rects(&self) -> Vec<Rect>;
}

impl VirtualElement for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }

    fn client_rects(&self) -> Vec<Rect> {
        vec![*self]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union() {
        let a = Rect::new(10.0, 10.0, 5.0, 5.0);
        let b = Rect::new(0.0, 12.0, 5.0, 10.0);
        assert_eq!(a.union(&b), Rect::from_edges(0.0, 10.0, 15.0, 22.0));
    }

    #[test]
    fn test_bounding_of_nothing_is_zero() {
        assert_eq!(Rect::bounding(&[]), Rect::ZERO);
        assert!(Rect::ZERO.is_empty());
    }

    #[test]
    fn test_bounding_of_lines() {
        let lines = [
            Rect::new(40.0, 0.0, 60.0, 20.0),
            Rect::new(0.0, 20.0, 100.0, 20.0),
            Rect::new(0.0, 40.0, 30.0, 20.0),
        ];
        assert_eq!(Rect::bounding(&lines), Rect::new(0.0, 0.0, 100.0, 60.0));
    }
}
