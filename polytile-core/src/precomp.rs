//! Compacted move index: one flat move array plus a range per
//! (point, adjacency status, piece).
//!
//! Ranges are laid out point-major, then status, then piece. Both the static
//! per-variant table and the per-color legal-move index use this layout, and
//! the in-place rebuild relies on it.

use crate::adj_status::{AdjStatus, NU_ADJ_STATUS};
use crate::geometry::Point;
use crate::move_info::Move;
use crate::piece::Piece;

/// Slice `[begin, begin + size)` of the move array.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ListRange {
    pub begin: u32,
    pub size: u32,
}

impl ListRange {
    #[inline]
    pub fn end(self) -> usize {
        (self.begin + self.size) as usize
    }
}

#[derive(Clone, Debug)]
pub struct PrecompMoves {
    nu_pieces: usize,
    moves: Vec<Move>,
    ranges: Vec<ListRange>,
}

impl PrecompMoves {
    /// Empty index with room for `capacity` move entries.
    pub fn new(nu_points: usize, nu_pieces: usize, capacity: usize) -> PrecompMoves {
        PrecompMoves {
            nu_pieces,
            moves: vec![Move::NULL; capacity],
            ranges: vec![ListRange::default(); nu_points * NU_ADJ_STATUS * nu_pieces],
        }
    }

    #[inline]
    fn range_index(&self, p: Point, status: AdjStatus, piece: Piece) -> usize {
        debug_assert!((status as usize) < NU_ADJ_STATUS, "adj status out of range");
        debug_assert!(piece.index() < self.nu_pieces, "piece out of range");
        (p.index() * NU_ADJ_STATUS + status as usize) * self.nu_pieces + piece.index()
    }

    /// First range index of a (point, status) block.
    #[inline]
    fn block_index(&self, p: Point, status: AdjStatus) -> usize {
        (p.index() * NU_ADJ_STATUS + status as usize) * self.nu_pieces
    }

    #[inline]
    pub fn nu_pieces(&self) -> usize {
        self.nu_pieces
    }

    /// Number of move slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn list_range(&self, p: Point, status: AdjStatus, piece: Piece) -> ListRange {
        self.ranges[self.range_index(p, status, piece)]
    }

    #[inline]
    pub fn has_moves(&self, piece: Piece, p: Point, status: AdjStatus) -> bool {
        self.list_range(p, status, piece).size != 0
    }

    /// Moves of `piece` through `p` compatible with `status`.
    #[inline]
    pub fn get_moves(&self, piece: Piece, p: Point, status: AdjStatus) -> &[Move] {
        let r = self.list_range(p, status, piece);
        &self.moves[r.begin as usize..r.end()]
    }

    #[inline]
    pub fn move_at(&self, n: usize) -> Move {
        self.moves[n]
    }

    #[inline]
    pub fn set_move(&mut self, n: usize, mv: Move) {
        self.moves[n] = mv;
    }

    #[inline]
    pub fn set_list_range(
        &mut self,
        p: Point,
        status: AdjStatus,
        piece: Piece,
        begin: usize,
        size: usize,
    ) {
        let i = self.range_index(p, status, piece);
        self.ranges[i] = ListRange {
            begin: begin as u32,
            size: size as u32,
        };
    }

    /// Set all ranges of a (point, status) block to empty.
    pub fn clear_block(&mut self, p: Point, status: AdjStatus, begin: usize) {
        let i = self.block_index(p, status);
        let empty = ListRange {
            begin: begin as u32,
            size: 0,
        };
        self.ranges[i..i + self.nu_pieces].fill(empty);
    }

    /// Set all ranges of a point to empty.
    pub fn clear_point(&mut self, p: Point, begin: usize) {
        let i = self.block_index(p, 0);
        let empty = ListRange {
            begin: begin as u32,
            size: 0,
        };
        self.ranges[i..i + NU_ADJ_STATUS * self.nu_pieces].fill(empty);
    }

    /// Overwrite with the contents of `other`, reusing the allocations.
    pub fn copy_from(&mut self, other: &PrecompMoves) {
        self.nu_pieces = other.nu_pieces;
        self.moves.clone_from(&other.moves);
        self.ranges.clone_from(&other.ranges);
    }

    /// Raw move array (including unused tail slots).
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Raw range table in layout order.
    #[inline]
    pub fn ranges(&self) -> &[ListRange] {
        &self.ranges
    }

    /// Number of move entries in use (end of the last non-empty range).
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|r| r.end()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compare list contents bucket by bucket, ignoring where in the move
    /// array each list lives.
    pub fn lists_eq(&self, other: &PrecompMoves) -> bool {
        if self.nu_pieces != other.nu_pieces || self.ranges.len() != other.ranges.len() {
            return false;
        }
        self.ranges.iter().zip(&other.ranges).all(|(a, b)| {
            self.moves[a.begin as usize..a.end()] == other.moves[b.begin as usize..b.end()]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let mut pm = PrecompMoves::new(2, 3, 10);
        pm.set_move(0, Move(5));
        pm.set_move(1, Move(7));
        pm.set_list_range(Point(1), 4, Piece(2), 0, 2);
        assert_eq!(pm.get_moves(Piece(2), Point(1), 4), &[Move(5), Move(7)]);
        assert!(pm.has_moves(Piece(2), Point(1), 4));
        assert!(!pm.has_moves(Piece(1), Point(1), 4));
        assert!(pm.get_moves(Piece(2), Point(0), 4).is_empty());
        assert_eq!(pm.len(), 2);
        pm.clear_point(Point(1), 0);
        assert!(pm.is_empty());
    }

    #[test]
    fn test_lists_eq_ignores_layout() {
        let mut a = PrecompMoves::new(1, 1, 4);
        let mut b = PrecompMoves::new(1, 1, 4);
        a.set_move(0, Move(3));
        a.set_list_range(Point(0), 1, Piece(0), 0, 1);
        b.set_move(2, Move(3));
        b.set_list_range(Point(0), 1, Piece(0), 2, 1);
        assert!(a.lists_eq(&b));
        b.set_move(2, Move(4));
        assert!(!a.lists_eq(&b));
    }
}
