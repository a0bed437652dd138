//! Board occupancy and per-color inventories.
//!
//! `PositionView` is everything the legal-move index needs from a live
//! position. `Position` is a straightforward implementation used by the tools
//! and tests: a point is forbidden for a color if anyone occupies it or it
//! shares an edge with a piece of that color; a color's first piece must
//! cover one of its starting points, later pieces must cover an attach point
//! (a corner neighbor of an own piece).

use std::sync::Arc;

use crate::adj_status::AdjStatus;
use crate::board_const::BoardConst;
use crate::geometry::Point;
use crate::move_info::Move;
use crate::piece::{Piece, PieceMask};
use crate::registry::Registry;
use crate::variant::{BoardType, Color, Variant};

/// Read access to a live position.
pub trait PositionView {
    fn board_const(&self) -> &BoardConst;

    fn nu_colors(&self) -> usize;

    /// Number of pieces placed so far by all colors.
    fn nu_moves(&self) -> usize;

    fn is_forbidden(&self, p: Point, c: Color) -> bool;

    /// Bitmask over the neighbor slots of `p` that are forbidden for `c`.
    fn adj_status(&self, p: Point, c: Color) -> AdjStatus;

    fn pieces_left(&self, c: Color) -> PieceMask;

    #[inline]
    fn is_piece_left(&self, c: Color, piece: Piece) -> bool {
        self.pieces_left(c).contains(piece)
    }

    /// Whether any point of the move is forbidden for `c`.
    #[inline]
    fn is_move_forbidden(&self, c: Color, mv: Move) -> bool {
        self.board_const()
            .move_points(mv)
            .iter()
            .any(|&p| self.is_forbidden(p, c))
    }
}

#[derive(Clone, Debug)]
pub struct Position {
    variant: Variant,
    bc: Arc<BoardConst>,
    point_state: Vec<Option<Color>>,
    /// [color][point]
    forbidden: Vec<Vec<bool>>,
    is_attach: Vec<Vec<bool>>,
    /// Attach points in the order they appeared; may contain points that
    /// became forbidden later.
    attach_points: Vec<Vec<Point>>,
    starting_points: Vec<Vec<Point>>,
    /// [color][piece] remaining instances
    inventory: Vec<Vec<u8>>,
    pieces_left: Vec<PieceMask>,
    nu_onboard_pieces: Vec<usize>,
    moves: Vec<(Color, Move)>,
    to_play: Color,
}

impl Position {
    /// Empty position. Panics if `bc` is not the table of `variant`.
    pub fn new(variant: Variant, bc: Arc<BoardConst>) -> Position {
        assert_eq!(bc.board_type(), variant.board_type(), "board type mismatch");
        assert_eq!(bc.piece_set(), variant.piece_set(), "piece set mismatch");
        let nu_colors = variant.nu_colors();
        let nu_points = bc.geometry().nu_points();
        let nu_pieces = bc.nu_pieces();
        let instances = variant.piece_set().nu_instances();
        let starting_points = Self::init_starting_points(variant, &bc);
        Position {
            variant,
            point_state: vec![None; nu_points],
            forbidden: vec![vec![false; nu_points]; nu_colors],
            is_attach: vec![vec![false; nu_points]; nu_colors],
            attach_points: vec![Vec::new(); nu_colors],
            starting_points,
            inventory: vec![vec![instances; nu_pieces]; nu_colors],
            pieces_left: vec![PieceMask::all(nu_pieces); nu_colors],
            nu_onboard_pieces: vec![0; nu_colors],
            moves: Vec::new(),
            to_play: Color(0),
            bc,
        }
    }

    /// Empty position with tables from a registry.
    pub fn from_registry(registry: &Registry, variant: Variant) -> Position {
        Position::new(variant, Arc::clone(registry.for_variant(variant)))
    }

    fn init_starting_points(variant: Variant, bc: &BoardConst) -> Vec<Vec<Point>> {
        let geo = bc.geometry();
        let nu_colors = variant.nu_colors();
        let at = |coords: &[(i32, i32)]| -> Vec<Point> {
            coords.iter().filter_map(|&(x, y)| geo.point(x, y)).collect()
        };
        match variant.board_type() {
            BoardType::Classic => [(0, 0), (19, 0), (19, 19), (0, 19)]
                .iter()
                .take(nu_colors)
                .map(|&c| at(&[c]))
                .collect(),
            BoardType::Duo => vec![at(&[(4, 4)]), at(&[(9, 9)])],
            BoardType::Trigon => {
                let shared = at(&[(17, 3), (17, 14), (9, 6), (9, 11), (25, 6), (25, 11)]);
                vec![shared; nu_colors]
            }
            BoardType::Trigon3 => {
                let shared = at(&[(15, 2), (15, 13), (7, 5), (7, 10), (23, 5), (23, 10)]);
                vec![shared; nu_colors]
            }
            BoardType::Nexos => [(5, 4), (19, 4), (19, 20), (5, 20)]
                .iter()
                .take(nu_colors)
                .map(|&c| at(&[c]))
                .collect(),
        }
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub fn bc(&self) -> &Arc<BoardConst> {
        &self.bc
    }

    #[inline]
    pub fn to_play(&self) -> Color {
        self.to_play
    }

    pub fn set_to_play(&mut self, c: Color) {
        debug_assert!(c.index() < self.variant.nu_colors());
        self.to_play = c;
    }

    /// Color after `c` in turn order.
    #[inline]
    pub fn next_color(&self, c: Color) -> Color {
        Color(((c.index() + 1) % self.variant.nu_colors()) as u8)
    }

    #[inline]
    pub fn point_state(&self, p: Point) -> Option<Color> {
        self.point_state[p.index()]
    }

    #[inline]
    pub fn is_first_piece(&self, c: Color) -> bool {
        self.nu_onboard_pieces[c.index()] == 0
    }

    #[inline]
    pub fn nu_onboard_pieces(&self, c: Color) -> usize {
        self.nu_onboard_pieces[c.index()]
    }

    #[inline]
    pub fn nu_left_instances(&self, c: Color, piece: Piece) -> u8 {
        self.inventory[c.index()][piece.index()]
    }

    #[inline]
    pub fn starting_points(&self, c: Color) -> &[Point] {
        &self.starting_points[c.index()]
    }

    #[inline]
    pub fn is_attach_point(&self, p: Point, c: Color) -> bool {
        self.is_attach[c.index()][p.index()]
    }

    #[inline]
    pub fn attach_points(&self, c: Color) -> &[Point] {
        &self.attach_points[c.index()]
    }

    /// Moves played so far, in order.
    #[inline]
    pub fn moves(&self) -> &[(Color, Move)] {
        &self.moves
    }

    /// Check if `c` may play `mv` now.
    pub fn is_legal(&self, c: Color, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        let info = self.bc.move_info(mv);
        if !self.is_piece_left(c, info.piece()) || self.is_move_forbidden(c, mv) {
            return false;
        }
        if self.is_first_piece(c) {
            info.points().iter().any(|p| self.starting_points(c).contains(p))
        } else {
            info.points().iter().any(|&p| self.is_attach_point(p, c))
        }
    }

    /// Place a move for `c` and pass the turn to the next color. Legality is
    /// only checked in debug builds.
    pub fn play(&mut self, c: Color, mv: Move) {
        debug_assert!(self.is_legal(c, mv), "illegal move {}", self.bc.to_text(mv, true));
        let bc = Arc::clone(&self.bc);
        let info = bc.move_info(mv);
        let ci = c.index();
        for &p in info.points() {
            self.point_state[p.index()] = Some(c);
            for forbidden in &mut self.forbidden {
                forbidden[p.index()] = true;
            }
        }
        for &p in bc.adj_points(mv) {
            self.forbidden[ci][p.index()] = true;
        }
        for &p in bc.attach_points(mv) {
            if !self.forbidden[ci][p.index()] && !self.is_attach[ci][p.index()] {
                self.is_attach[ci][p.index()] = true;
                self.attach_points[ci].push(p);
            }
        }
        let piece = info.piece();
        let left = &mut self.inventory[ci][piece.index()];
        debug_assert!(*left > 0);
        *left -= 1;
        if *left == 0 {
            self.pieces_left[ci].remove(piece);
        }
        self.nu_onboard_pieces[ci] += 1;
        self.moves.push((c, mv));
        self.to_play = self.next_color(c);
    }

    /// Skip the turn of `c`.
    pub fn pass(&mut self, c: Color) {
        self.to_play = self.next_color(c);
    }

    /// All legal moves of `c`, found through the static tables.
    pub fn legal_moves(&self, c: Color) -> Vec<Move> {
        let bc = &*self.bc;
        let candidates: &[Point] = if self.is_first_piece(c) {
            self.starting_points(c)
        } else {
            self.attach_points(c)
        };
        let mut marker = vec![false; bc.nu_moves()];
        let mut result = Vec::new();
        for &p in candidates {
            if self.is_forbidden(p, c) {
                continue;
            }
            let status = self.adj_status(p, c);
            for piece in self.pieces_left(c).iter() {
                for &mv in bc.lookup(p, status, piece) {
                    if !marker[mv.index()] && !self.is_move_forbidden(c, mv) {
                        marker[mv.index()] = true;
                        result.push(mv);
                    }
                }
            }
        }
        result
    }
}

impl PositionView for Position {
    #[inline]
    fn board_const(&self) -> &BoardConst {
        &self.bc
    }

    #[inline]
    fn nu_colors(&self) -> usize {
        self.variant.nu_colors()
    }

    #[inline]
    fn nu_moves(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    fn is_forbidden(&self, p: Point, c: Color) -> bool {
        self.forbidden[c.index()][p.index()]
    }

    #[inline]
    fn adj_status(&self, p: Point, c: Color) -> AdjStatus {
        let forbidden = &self.forbidden[c.index()];
        self.bc.adj_status_table().status_of(p, |q| forbidden[q.index()])
    }

    #[inline]
    fn pieces_left(&self, c: Color) -> PieceMask {
        self.pieces_left[c.index()]
    }
}
