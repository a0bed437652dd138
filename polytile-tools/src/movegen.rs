//! Lazy move generator over the legal-move index.
//!
//! Moves are produced one at a time, in order of candidate point, then
//! piece, then list position. A move reachable from several candidate points
//! is produced once.

use polytile_core::{
    AdjStatus, Color, LegalMoveIndex, Move, Piece, PieceMask, Point, Position, PositionView,
};

/// Lazy move generator that produces moves on demand.
///
/// Candidates are the starting points before a color's first piece and its
/// attach points afterwards.
pub struct MoveGenerator {
    color: Color,
    candidates: Vec<Point>,
    pieces: PieceMask,
    /// Current candidate point
    point_idx: usize,
    /// Status of the current point, None until the point is entered
    status: Option<AdjStatus>,
    /// Next piece index to try at the current point
    piece_idx: u8,
    /// Current piece and position in its list
    current: Option<(Piece, usize)>,
    /// Moves already produced, indexed by move id
    produced: Vec<bool>,
}

impl MoveGenerator {
    /// Create a generator for `c`, restricted to the pieces in `pieces`.
    pub fn new(pos: &Position, c: Color, pieces: PieceMask) -> Self {
        let candidates = if pos.is_first_piece(c) {
            pos.starting_points(c).to_vec()
        } else {
            pos.attach_points(c).to_vec()
        };
        Self {
            color: c,
            candidates,
            pieces: pieces & pos.pieces_left(c),
            point_idx: 0,
            status: None,
            piece_idx: 0,
            current: None,
            produced: vec![false; pos.bc().nu_moves()],
        }
    }

    /// Get the next legal move, or None if exhausted.
    pub fn next(&mut self, index: &LegalMoveIndex, pos: &Position) -> Option<Move> {
        let nu_pieces = pos.bc().nu_pieces() as u8;
        while self.point_idx < self.candidates.len() {
            let p = self.candidates[self.point_idx];
            let status = match self.status {
                Some(s) => s,
                None => {
                    if pos.is_forbidden(p, self.color) {
                        self.point_idx += 1;
                        continue;
                    }
                    let s = pos.adj_status(p, self.color);
                    self.status = Some(s);
                    self.piece_idx = 0;
                    s
                }
            };

            if let Some((piece, i)) = self.current {
                let moves = index.lookup(self.color, p, status, piece);
                let mut i = i;
                while i < moves.len() {
                    let mv = moves[i];
                    i += 1;
                    if !self.produced[mv.index()] {
                        self.produced[mv.index()] = true;
                        self.current = Some((piece, i));
                        return Some(mv);
                    }
                }
                self.current = None;
            }

            // Find the next piece with moves at this point
            while self.piece_idx < nu_pieces {
                let piece = Piece(self.piece_idx);
                self.piece_idx += 1;
                if self.pieces.contains(piece)
                    && !index.lookup(self.color, p, status, piece).is_empty()
                {
                    self.current = Some((piece, 0));
                    break;
                }
            }
            if self.current.is_none() {
                self.point_idx += 1;
                self.status = None;
            }
        }
        None
    }

    /// Drain the remaining moves into a vector.
    pub fn collect_all(&mut self, index: &LegalMoveIndex, pos: &Position) -> Vec<Move> {
        let mut moves = Vec::new();
        while let Some(mv) = self.next(index, pos) {
            moves.push(mv);
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polytile_core::{Registry, Variant};
    use std::sync::Arc;

    static REGISTRY: Registry = Registry::new();

    #[test]
    fn test_initial_position_matches_position() {
        let pos = Position::from_registry(&REGISTRY, Variant::Duo);
        let mut index = LegalMoveIndex::new(Arc::clone(pos.bc()));
        index.init(&pos, false);
        let all = PieceMask::all(pos.bc().nu_pieces());
        let mut gen = MoveGenerator::new(&pos, Color(0), all);
        let mut from_gen = gen.collect_all(&index, &pos);
        let mut legal = pos.legal_moves(Color(0));
        assert_eq!(from_gen.len(), legal.len());
        from_gen.sort_unstable();
        legal.sort_unstable();
        assert_eq!(from_gen, legal);
    }

    #[test]
    fn test_generator_respects_piece_mask() {
        let pos = Position::from_registry(&REGISTRY, Variant::Junior);
        let mut index = LegalMoveIndex::new(Arc::clone(pos.bc()));
        index.init(&pos, false);
        let bc = pos.bc();
        let mut mask = PieceMask::default();
        mask.insert(bc.piece_by_name("L5").unwrap());
        let mut gen = MoveGenerator::new(&pos, Color(1), mask);
        let moves = gen.collect_all(&index, &pos);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|&mv| bc.piece_info(bc.move_piece(mv)).name() == "L5"));
    }

    #[test]
    fn test_generator_after_moves() {
        let mut pos = Position::from_registry(&REGISTRY, Variant::Duo);
        let mut index = LegalMoveIndex::new(Arc::clone(pos.bc()));
        index.init(&pos, false);
        for _ in 0..4 {
            let c = pos.to_play();
            let all = PieceMask::all(pos.bc().nu_pieces());
            let mut gen = MoveGenerator::new(&pos, c, all);
            let mut from_gen = gen.collect_all(&index, &pos);
            let mut legal = pos.legal_moves(c);
            from_gen.sort_unstable();
            legal.sort_unstable();
            assert_eq!(from_gen, legal);
            pos.play(c, legal[legal.len() / 2]);
            index.init(&pos, true);
        }
    }
}
