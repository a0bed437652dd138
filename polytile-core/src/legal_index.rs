//! Per-color index of the moves that are still legal in a line of play.
//!
//! The index has the layout of the static `PrecompMoves` of the variant but
//! only keeps moves whose points are all free for the color, of pieces the
//! color still has, listed under points that are not forbidden and statuses
//! that can still occur. A followup init refines the index of the previous
//! position in place: the rebuild walks points, statuses and pieces in the
//! same order the lists were written, so the write cursor never overtakes
//! data it has not read yet.

use std::sync::Arc;

use crate::adj_status::{is_followup_adj_status, AdjStatus, NU_ADJ_STATUS};
use crate::board_const::BoardConst;
use crate::geometry::Point;
use crate::move_info::Move;
use crate::piece::Piece;
use crate::position::PositionView;
use crate::precomp::PrecompMoves;
use crate::variant::{Color, MAX_COLORS};

/// One bit per move id.
#[derive(Clone, Debug)]
struct MoveBits {
    words: Vec<u64>,
}

impl MoveBits {
    fn new(nu_moves: usize) -> MoveBits {
        MoveBits {
            words: vec![0; nu_moves.div_ceil(64)],
        }
    }

    #[inline]
    fn set_all(&mut self) {
        self.words.fill(u64::MAX);
    }

    #[inline]
    fn contains(&self, mv: Move) -> bool {
        let i = mv.index();
        self.words[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    fn remove(&mut self, mv: Move) {
        let i = mv.index();
        self.words[i / 64] &= !(1 << (i % 64));
    }
}

#[derive(Clone, Debug)]
pub struct LegalMoveIndex {
    bc: Arc<BoardConst>,
    precomp: Vec<PrecompMoves>,
    is_init: [bool; MAX_COLORS],
    /// Scratch: moves that are not known to be legal for the color being
    /// rebuilt.
    is_forbidden: MoveBits,
}

impl LegalMoveIndex {
    pub fn new(bc: Arc<BoardConst>) -> LegalMoveIndex {
        let is_forbidden = MoveBits::new(bc.nu_moves());
        LegalMoveIndex {
            precomp: vec![PrecompMoves::new(0, bc.nu_pieces(), 0); MAX_COLORS],
            is_init: [false; MAX_COLORS],
            is_forbidden,
            bc,
        }
    }

    #[inline]
    pub fn board_const(&self) -> &Arc<BoardConst> {
        &self.bc
    }

    /// Rebuild the lists of every color of `pos`.
    ///
    /// With `is_followup`, each color's lists are refined from the previous
    /// init, which must have been done on a position that `pos` descends
    /// from. Colors never initialized fall back to the static tables.
    pub fn init(&mut self, pos: &impl PositionView, is_followup: bool) {
        for c in Color::all(pos.nu_colors()) {
            self.init_color(pos, c, is_followup);
        }
    }

    /// Rebuild the lists of one color. Returns the number of listed entries.
    pub fn init_color(&mut self, pos: &impl PositionView, c: Color, is_followup: bool) -> usize {
        debug_assert!(
            std::ptr::eq(pos.board_const(), &*self.bc),
            "position uses a different move table"
        );
        let ci = c.index();
        if !is_followup || !self.is_init[ci] {
            self.precomp[ci].copy_from(self.bc.precomp_moves());
        }
        self.is_init[ci] = true;
        self.mark_forbidden_moves(pos, c);
        self.rebuild(pos, c)
    }

    /// Clear the forbidden bit of every move reachable from a free point of
    /// `c` whose points are all free.
    fn mark_forbidden_moves(&mut self, pos: &impl PositionView, c: Color) {
        let old = &self.precomp[c.index()];
        let is_forbidden = &mut self.is_forbidden;
        let pieces_left = pos.pieces_left(c);
        is_forbidden.set_all();
        for p in self.bc.geometry().points() {
            if pos.is_forbidden(p, c) {
                continue;
            }
            let status = pos.adj_status(p, c);
            for piece in pieces_left.iter() {
                for &mv in old.get_moves(piece, p, status) {
                    if is_forbidden.contains(mv) && !pos.is_move_forbidden(c, mv) {
                        is_forbidden.remove(mv);
                    }
                }
            }
        }
    }

    /// Compact the surviving moves of `c` to the front of its buffer.
    fn rebuild(&mut self, pos: &impl PositionView, c: Color) -> usize {
        let precomp = &mut self.precomp[c.index()];
        let is_forbidden = &self.is_forbidden;
        let pieces_left = pos.pieces_left(c);
        let nu_pieces = self.bc.nu_pieces();
        let mut n = 0;
        let mut read_end = 0;
        for p in self.bc.geometry().points() {
            if pos.is_forbidden(p, c) {
                precomp.clear_point(p, n);
                continue;
            }
            let status = pos.adj_status(p, c);
            for i in 0..NU_ADJ_STATUS {
                let i = i as AdjStatus;
                if !is_followup_adj_status(i, status) {
                    precomp.clear_block(p, i, n);
                    continue;
                }
                // Pieces by index, not by the pieces-left mask, so the order
                // matches the previous rebuild.
                for j in 0..nu_pieces {
                    let piece = Piece(j as u8);
                    let begin = n;
                    if pieces_left.contains(piece) {
                        let r = precomp.list_range(p, i, piece);
                        if r.size > 0 {
                            assert!(
                                r.begin as usize >= read_end,
                                "move list read out of order at {:?}/{}/{}",
                                p,
                                i,
                                j
                            );
                            assert!(n <= r.begin as usize, "write cursor passed read cursor");
                            for k in r.begin as usize..r.end() {
                                let mv = precomp.move_at(k);
                                if !is_forbidden.contains(mv) {
                                    precomp.set_move(n, mv);
                                    n += 1;
                                }
                            }
                            read_end = r.end();
                        }
                    }
                    precomp.set_list_range(p, i, piece, begin, n - begin);
                }
            }
        }
        n
    }

    /// Still-legal moves of `piece` through `p` under `status` for `c`.
    #[inline]
    pub fn lookup(&self, c: Color, p: Point, status: AdjStatus, piece: Piece) -> &[Move] {
        debug_assert!(self.is_init[c.index()], "color {:?} not initialized", c);
        self.precomp[c.index()].get_moves(piece, p, status)
    }

    /// Lists of `c` in the static layout.
    #[inline]
    pub fn precomp(&self, c: Color) -> &PrecompMoves {
        &self.precomp[c.index()]
    }

    #[inline]
    pub fn is_init(&self, c: Color) -> bool {
        self.is_init[c.index()]
    }

    /// All legal moves of `c`, deduplicated, in order of first appearance
    /// at the given candidate points.
    pub fn legal_moves(
        &self,
        pos: &impl PositionView,
        c: Color,
        candidates: &[Point],
        marker: &mut Vec<bool>,
    ) -> Vec<Move> {
        marker.clear();
        marker.resize(self.bc.nu_moves(), false);
        let precomp = &self.precomp[c.index()];
        let mut result = Vec::new();
        for &p in candidates {
            if pos.is_forbidden(p, c) {
                continue;
            }
            let status = pos.adj_status(p, c);
            for piece in pos.pieces_left(c).iter() {
                for &mv in precomp.get_moves(piece, p, status) {
                    if !marker[mv.index()] {
                        marker[mv.index()] = true;
                        result.push(mv);
                    }
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::registry::Registry;
    use crate::variant::Variant;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    static REGISTRY: Registry = Registry::new();

    /// Filter the static lists directly against the position.
    fn expected_moves(pos: &Position, c: Color, p: Point, s: AdjStatus, piece: Piece) -> Vec<Move> {
        if pos.is_forbidden(p, c)
            || !is_followup_adj_status(s, pos.adj_status(p, c))
            || !pos.is_piece_left(c, piece)
        {
            return Vec::new();
        }
        pos.bc()
            .lookup(p, s, piece)
            .iter()
            .copied()
            .filter(|&mv| !pos.is_move_forbidden(c, mv))
            .collect()
    }

    fn check_against_static(index: &LegalMoveIndex, pos: &Position) {
        let bc = pos.bc();
        for c in Color::all(pos.nu_colors()) {
            for p in bc.geometry().points() {
                for s in 0..NU_ADJ_STATUS as AdjStatus {
                    for piece in bc.catalog().pieces() {
                        assert_eq!(
                            index.lookup(c, p, s, piece),
                            expected_moves(pos, c, p, s, piece).as_slice(),
                            "lists differ at color {:?} point {:?} status {} piece {:?}",
                            c,
                            p,
                            s,
                            piece
                        );
                    }
                }
            }
        }
    }

    fn play_random(pos: &mut Position, rng: &mut StdRng) -> bool {
        let c = pos.to_play();
        let moves = pos.legal_moves(c);
        if moves.is_empty() {
            pos.pass(c);
            return false;
        }
        pos.play(c, moves[rng.random_range(0..moves.len())]);
        true
    }

    #[test]
    fn test_fresh_equals_static_on_empty_board() {
        let pos = Position::from_registry(&REGISTRY, Variant::Junior);
        let mut index = LegalMoveIndex::new(Arc::clone(pos.bc()));
        index.init(&pos, false);
        for c in Color::all(2) {
            assert!(index.precomp(c).lists_eq(pos.bc().precomp_moves()));
        }
    }

    #[test]
    fn test_followup_matches_static_filter() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pos = Position::from_registry(&REGISTRY, Variant::Junior);
        let mut index = LegalMoveIndex::new(Arc::clone(pos.bc()));
        index.init(&pos, false);
        for ply in 0..12 {
            play_random(&mut pos, &mut rng);
            index.init(&pos, true);
            if ply % 4 == 3 {
                check_against_static(&index, &pos);
            }
        }
    }

    #[test]
    fn test_followup_equals_fresh() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pos = Position::from_registry(&REGISTRY, Variant::Duo);
        let mut followup = LegalMoveIndex::new(Arc::clone(pos.bc()));
        let mut fresh = LegalMoveIndex::new(Arc::clone(pos.bc()));
        followup.init(&pos, false);
        for _ in 0..16 {
            play_random(&mut pos, &mut rng);
            followup.init(&pos, true);
            fresh.init(&pos, false);
            for c in Color::all(2) {
                assert!(followup.precomp(c).lists_eq(fresh.precomp(c)));
                assert!(followup.precomp(c).len() <= pos.bc().precomp_moves().len());
            }
        }
    }

    #[test]
    fn test_legal_moves_match_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pos = Position::from_registry(&REGISTRY, Variant::Classic2);
        let mut index = LegalMoveIndex::new(Arc::clone(pos.bc()));
        let mut marker = Vec::new();
        index.init(&pos, false);
        for _ in 0..10 {
            let c = pos.to_play();
            let candidates: Vec<Point> = if pos.is_first_piece(c) {
                pos.starting_points(c).to_vec()
            } else {
                pos.attach_points(c).to_vec()
            };
            let mut from_index = index.legal_moves(&pos, c, &candidates, &mut marker);
            let mut from_position = pos.legal_moves(c);
            from_index.sort_unstable();
            from_position.sort_unstable();
            assert_eq!(from_index, from_position);
            play_random(&mut pos, &mut rng);
            index.init(&pos, true);
        }
    }

    #[test]
    fn test_followup_without_predecessor_is_fresh() {
        let pos = Position::from_registry(&REGISTRY, Variant::Junior);
        let mut index = LegalMoveIndex::new(Arc::clone(pos.bc()));
        assert!(!index.is_init(Color(0)));
        let n = index.init_color(&pos, Color(0), true);
        assert!(index.is_init(Color(0)));
        assert_eq!(n, pos.bc().precomp_moves().len());
    }

    #[test]
    #[should_panic(expected = "read out of order")]
    fn test_out_of_order_ranges_panic() {
        let pos = Position::from_registry(&REGISTRY, Variant::Junior);
        let bc = Arc::clone(pos.bc());
        let mut index = LegalMoveIndex::new(Arc::clone(&bc));
        index.init(&pos, false);

        // Point the first list at the last list's moves and back.
        let piece = bc.catalog().pieces().next().unwrap();
        let with_moves: Vec<Point> = bc
            .geometry()
            .points()
            .filter(|&p| index.precomp[0].list_range(p, 0, piece).size > 0)
            .collect();
        let (p1, p2) = (with_moves[0], with_moves[with_moves.len() - 1]);
        assert_ne!(p1, p2);
        let r1 = index.precomp[0].list_range(p1, 0, piece);
        let r2 = index.precomp[0].list_range(p2, 0, piece);
        index.precomp[0].set_list_range(p1, 0, piece, r2.begin as usize, r2.size as usize);
        index.precomp[0].set_list_range(p2, 0, piece, r1.begin as usize, r1.size as usize);

        index.init_color(&pos, Color(0), true);
    }
}
