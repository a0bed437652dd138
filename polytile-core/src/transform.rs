//! Symmetry transforms of piece shapes.
//!
//! Square and segment grids use the 8 symmetries of the square, triangle
//! grids the 12 symmetries of the hexagon. Transforms map shape coordinates
//! (origin at `(0, 0)`); the caller translates the result so that the image
//! of the origin lands on the anchor point.
//!
//! Triangle coordinates are handled in a three-axis lattice `(a, b, c)` where
//! a sixth turn is a cyclic shift with reflection of the triangle:
//!
//! ```text
//! up triangle   (x + y even):  b = -y, s = y + 2, a = (x + s) / 2, c = (s - x) / 2
//! down triangle (x + y odd):   b = -y, s = y + 1, a = (x + s) / 2, c = (s - x) / 2
//! rotate 60°:   (a, b, c) -> (1 - c, 1 - a, 1 - b)
//! mirror:       (a, b, c) -> (c, b, a)
//! back:         x = a - c, y = -b
//! ```

use crate::geometry::{CoordPoint, GeometryKind};

/// One symmetry of the grid. The mirror (left-right flip) is applied first,
/// then `rot` turns (quarter turns on squares, sixth turns on triangles).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Transform {
    Rect { rot: u8, mirror: bool },
    Trigon { rot: u8, mirror: bool },
}

const RECT_TRANSFORMS: [Transform; 8] = [
    Transform::Rect { rot: 0, mirror: false }, // Identity
    Transform::Rect { rot: 1, mirror: false }, // Rotate 90°
    Transform::Rect { rot: 2, mirror: false }, // Rotate 180°
    Transform::Rect { rot: 3, mirror: false }, // Rotate 270°
    Transform::Rect { rot: 0, mirror: true },  // Mirror
    Transform::Rect { rot: 1, mirror: true },
    Transform::Rect { rot: 2, mirror: true },
    Transform::Rect { rot: 3, mirror: true },
];

const TRIGON_TRANSFORMS: [Transform; 12] = [
    Transform::Trigon { rot: 0, mirror: false },
    Transform::Trigon { rot: 1, mirror: false },
    Transform::Trigon { rot: 2, mirror: false },
    Transform::Trigon { rot: 3, mirror: false },
    Transform::Trigon { rot: 4, mirror: false },
    Transform::Trigon { rot: 5, mirror: false },
    Transform::Trigon { rot: 0, mirror: true },
    Transform::Trigon { rot: 1, mirror: true },
    Transform::Trigon { rot: 2, mirror: true },
    Transform::Trigon { rot: 3, mirror: true },
    Transform::Trigon { rot: 4, mirror: true },
    Transform::Trigon { rot: 5, mirror: true },
];

impl Transform {
    /// All transforms of a grid kind, in canonical order.
    pub fn all(kind: GeometryKind) -> &'static [Transform] {
        match kind {
            GeometryKind::Trigon { .. } => &TRIGON_TRANSFORMS,
            GeometryKind::Rect | GeometryKind::Nexos => &RECT_TRANSFORMS,
        }
    }

    /// Position in `Transform::all` of its grid kind.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Transform::Rect { rot, mirror } => rot as usize + if mirror { 4 } else { 0 },
            Transform::Trigon { rot, mirror } => rot as usize + if mirror { 6 } else { 0 },
        }
    }

    /// Map shape coordinates.
    pub fn apply(self, p: CoordPoint) -> CoordPoint {
        match self {
            Transform::Rect { rot, mirror } => {
                let (mut x, mut y) = (p.x, p.y);
                if mirror {
                    x = -x;
                }
                for _ in 0..rot {
                    (x, y) = (-y, x);
                }
                CoordPoint::new(x, y)
            }
            Transform::Trigon { rot, mirror } => {
                let mut t = to_abc(p);
                if mirror {
                    t = (t.2, t.1, t.0);
                }
                for _ in 0..rot {
                    t = (1 - t.2, 1 - t.0, 1 - t.1);
                }
                CoordPoint::new(t.0 - t.2, -t.1)
            }
        }
    }

    /// Point type the piece origin has after the transform. A placement
    /// anchored at a board point is only valid if the point has this type.
    #[inline]
    pub fn new_point_type(self) -> u8 {
        match self {
            Transform::Rect { .. } => 0,
            Transform::Trigon { rot, .. } => rot % 2,
        }
    }

    /// Map shape coordinates relative to the transformed origin.
    #[inline]
    pub fn apply_relative(self, p: CoordPoint) -> CoordPoint {
        self.apply(p) - self.apply(CoordPoint::default())
    }
}

#[inline]
fn to_abc(p: CoordPoint) -> (i32, i32, i32) {
    let s = if (p.x + p.y).rem_euclid(2) == 0 { p.y + 2 } else { p.y + 1 };
    ((p.x + s) / 2, -p.y, (s - p.x) / 2)
}
