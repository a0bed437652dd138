//! Move identities and per-move records.

use crate::geometry::Point;
use crate::piece::{Piece, MAX_PIECE_SIZE};

/// A placement. Dense id into the tables of one `BoardConst`; 0 is the null
/// move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default)]
pub struct Move(pub u16);

impl Move {
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Points of a move, in canonical order. Fixed capacity, no heap allocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MovePoints {
    points: [Point; MAX_PIECE_SIZE],
    len: u8,
}

impl MovePoints {
    pub const fn new() -> MovePoints {
        MovePoints {
            points: [Point::NULL; MAX_PIECE_SIZE],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, p: Point) {
        debug_assert!((self.len as usize) < MAX_PIECE_SIZE);
        self.points[self.len as usize] = p;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Point] {
        &self.points[..self.len as usize]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Point] {
        &mut self.points[..self.len as usize]
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.as_slice().contains(&p)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for MovePoints {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Point> for MovePoints {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut points = MovePoints::new();
        for p in iter {
            points.push(p);
        }
        points
    }
}

/// Piece and occupied points of a move. Hot data used during search.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveInfo {
    piece: Piece,
    points: MovePoints,
}

impl MoveInfo {
    pub fn new(piece: Piece, points: MovePoints) -> MoveInfo {
        MoveInfo { piece, points }
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        self.points.as_slice()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.points.contains(p)
    }
}

/// Neighbor points of a move, stored as a range into a shared arena:
/// first the edge-adjacent points, then the attach points.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveInfoExt {
    pub(crate) begin: u32,
    pub(crate) size_adj_points: u8,
    pub(crate) size_attach_points: u8,
}

impl MoveInfoExt {
    #[inline]
    pub fn nu_adj_points(&self) -> usize {
        self.size_adj_points as usize
    }

    #[inline]
    pub fn nu_attach_points(&self) -> usize {
        self.size_attach_points as usize
    }
}

/// Rarely used move data.
#[derive(Clone, Copy, Debug)]
pub struct MoveInfoExt2 {
    /// Point for drawing the piece label.
    pub label_pos: Point,
    /// Playing the move on a half-turn-symmetric position destroys the
    /// symmetry (the move overlaps its own mirror image).
    pub breaks_symmetry: bool,
    /// Mirror image under a half turn, or null.
    pub symmetric_move: Move,
}

impl Default for MoveInfoExt2 {
    fn default() -> Self {
        MoveInfoExt2 {
            label_pos: Point::NULL,
            breaks_symmetry: false,
            symmetric_move: Move::NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_points() {
        let mut points = MovePoints::new();
        assert!(points.is_empty());
        points.push(Point(3));
        points.push(Point(1));
        assert_eq!(points.len(), 2);
        assert!(points.contains(Point(1)));
        assert!(!points.contains(Point(2)));
        points.as_mut_slice().sort();
        assert_eq!(points.as_slice(), &[Point(1), Point(3)]);
        let collected: MovePoints = [Point(5), Point(6)].into_iter().collect();
        assert_eq!(collected.iter().collect::<Vec<_>>(), vec![Point(5), Point(6)]);
    }

    #[test]
    fn test_null_move() {
        assert!(Move::NULL.is_null());
        assert!(Move::default().is_null());
        assert!(!Move(1).is_null());
    }
}
