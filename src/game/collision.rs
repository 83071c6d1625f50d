//! Pixel-accurate collision oracle.
//!
//! Bounding-box overlap alone is not sufficient: sprites have transparent
//! corners, and the reward signal the learner trains against depends on the
//! exact pixel-level outcome. The oracle clips the two bounding boxes and
//! scans the overlap against both opacity masks.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Intersection with another rectangle; zero width or height when the
    /// rectangles do not overlap.
    pub fn clip(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = (self.x + self.w).min(other.x + other.w);
        let bottom = (self.y + self.h).min(other.y + other.h);

        Rect {
            x,
            y,
            w: (right - x).max(0),
            h: (bottom - y).max(0),
        }
    }
}

/// Per-pixel boolean opacity grid for one sprite frame, indexed `[x][y]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hitmask(Vec<Vec<bool>>);

impl Hitmask {
    /// Build a mask from columns of opacity flags.
    pub fn from_columns(columns: Vec<Vec<bool>>) -> Self {
        Self(columns)
    }

    /// Fully-opaque mask of the given dimensions.
    pub fn solid(width: usize, height: usize) -> Self {
        Self(vec![vec![true; height]; width])
    }

    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn height(&self) -> usize {
        self.0.first().map(Vec::len).unwrap_or(0)
    }

    /// Opacity at a local coordinate; out-of-range coordinates read as
    /// transparent, keeping the oracle total over any geometric input.
    pub fn opaque(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.0
            .get(x as usize)
            .and_then(|column| column.get(y as usize))
            .copied()
            .unwrap_or(false)
    }
}

/// Exact pixel-level overlap test between two sprites.
///
/// Clips the bounding boxes first: an empty intersection reports no collision
/// without scanning any pixels. Otherwise the overlap region is translated
/// into each sprite's local coordinate space and scanned until the first
/// pixel where both masks are opaque.
pub fn pixel_collision(rect1: Rect, rect2: Rect, mask1: &Hitmask, mask2: &Hitmask) -> bool {
    let overlap = rect1.clip(&rect2);
    if overlap.w == 0 || overlap.h == 0 {
        return false;
    }

    let (x1, y1) = (overlap.x - rect1.x, overlap.y - rect1.y);
    let (x2, y2) = (overlap.x - rect2.x, overlap.y - rect2.y);

    for x in 0..overlap.w {
        for y in 0..overlap.h {
            if mask1.opaque(x1 + x, y1 + y) && mask2.opaque(x2 + x, y2 + y) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_bounding_boxes_do_not_collide() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        let mask = Hitmask::solid(10, 10);
        assert!(!pixel_collision(a, b, &mask, &mask));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        // Shared edge has zero-width overlap.
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        let mask = Hitmask::solid(10, 10);
        assert!(!pixel_collision(a, b, &mask, &mask));
    }

    #[test]
    fn overlapping_solid_masks_collide() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 10, 10);
        let mask = Hitmask::solid(10, 10);
        assert!(pixel_collision(a, b, &mask, &mask));
    }

    #[test]
    fn single_pixel_overlap_collides() {
        let a = Rect::new(0, 0, 1, 1);
        let b = Rect::new(0, 0, 1, 1);
        let mask = Hitmask::solid(1, 1);
        assert!(pixel_collision(a, b, &mask, &mask));
    }

    #[test]
    fn disjoint_opacity_within_overlap_does_not_collide() {
        // Boxes fully overlap, but sprite A is opaque only in its left half
        // and sprite B only in its right half.
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(0, 0, 4, 4);

        let left_half = Hitmask::from_columns(vec![
            vec![true; 4],
            vec![true; 4],
            vec![false; 4],
            vec![false; 4],
        ]);
        let right_half = Hitmask::from_columns(vec![
            vec![false; 4],
            vec![false; 4],
            vec![true; 4],
            vec![true; 4],
        ]);

        assert!(!pixel_collision(a, b, &left_half, &right_half));
        assert!(pixel_collision(a, b, &left_half, &left_half));
    }

    #[test]
    fn overlap_is_translated_into_local_coordinates() {
        // Sprite B sits 2px right of A. A's rightmost column is transparent,
        // so the 2px overlap can only hit through A's column 2..3.
        let a = Rect::new(0, 0, 4, 1);
        let b = Rect::new(2, 0, 4, 1);

        let a_mask = Hitmask::from_columns(vec![
            vec![true],
            vec![true],
            vec![true],
            vec![false],
        ]);
        let b_mask = Hitmask::solid(4, 1);

        assert!(pixel_collision(a, b, &a_mask, &b_mask));

        let a_mask_hollow = Hitmask::from_columns(vec![
            vec![true],
            vec![true],
            vec![false],
            vec![false],
        ]);
        assert!(!pixel_collision(a, b, &a_mask_hollow, &b_mask));
    }

    #[test]
    fn clip_produces_expected_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.clip(&b), Rect::new(5, 5, 5, 5));
        assert_eq!(b.clip(&a), Rect::new(5, 5, 5, 5));
    }
}
