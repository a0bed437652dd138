//! Static move tables of one (board type, piece set) pair.
//!
//! Construction enumerates every placement of every piece, assigns dense move
//! ids starting at 1, records per-move neighbor data, and compacts the moves
//! into a `PrecompMoves` keyed by (point, adjacency status, piece). A move is
//! listed under every point it occupies, for every status whose blocked
//! neighbors of that point it does not occupy.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use serde::Serialize;

use crate::adj_status::{AdjStatus, AdjStatusTable, NU_ADJ_STATUS};
use crate::error::MoveTextError;
use crate::geometry::{CoordPoint, Geometry, GeometryKind, Point};
use crate::move_info::{Move, MoveInfo, MoveInfoExt, MoveInfoExt2, MovePoints};
use crate::piece::{normalize_shape, Piece, PieceCatalog, PieceInfo, MAX_PIECE_SIZE};
use crate::precomp::PrecompMoves;
use crate::transform::Transform;
use crate::variant::{BoardType, PieceSet};

/// Size summary of a built table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub board_type: BoardType,
    pub piece_set: PieceSet,
    pub nu_points: usize,
    pub nu_pieces: usize,
    /// Including the null move.
    pub nu_moves: usize,
    pub precomp_len: usize,
}

/// Everything known about one move, in text form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub id: u16,
    pub piece: String,
    pub points: Vec<String>,
    pub adj_points: Vec<String>,
    pub attach_points: Vec<String>,
    pub label: String,
    pub breaks_symmetry: bool,
    pub symmetric_move: Option<u16>,
}

pub struct BoardConst {
    board_type: BoardType,
    piece_set: PieceSet,
    geo: Arc<Geometry>,
    adj_status: Arc<AdjStatusTable>,
    catalog: PieceCatalog,
    move_info: Vec<MoveInfo>,
    move_info_ext: Vec<MoveInfoExt>,
    move_info_ext_2: Vec<MoveInfoExt2>,
    /// Arena for `MoveInfoExt` ranges.
    ext_points: Vec<Point>,
    /// Per piece, maximum number of attach points of any of its moves.
    nu_attach_points: Vec<usize>,
    precomp_moves: PrecompMoves,
}

impl std::fmt::Debug for BoardConst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardConst")
            .field("board_type", &self.board_type)
            .field("piece_set", &self.piece_set)
            .field("nu_moves", &self.move_info.len())
            .finish()
    }
}

/// Per-(point, status, piece) move lists before compaction.
struct FullMoveTable {
    nu_pieces: usize,
    lists: Vec<Vec<Move>>,
}

impl FullMoveTable {
    fn new(nu_points: usize, nu_pieces: usize) -> FullMoveTable {
        FullMoveTable {
            nu_pieces,
            lists: vec![Vec::new(); nu_points * NU_ADJ_STATUS * nu_pieces],
        }
    }

    #[inline]
    fn list_mut(&mut self, p: Point, status: usize, piece: Piece) -> &mut Vec<Move> {
        &mut self.lists[(p.index() * NU_ADJ_STATUS + status) * self.nu_pieces + piece.index()]
    }
}

impl BoardConst {
    /// Build the tables, with a geometry of its own.
    pub fn new(board_type: BoardType, piece_set: PieceSet) -> BoardConst {
        let geo = Arc::new(Geometry::new(board_type));
        let adj_status = Arc::new(AdjStatusTable::new(&geo));
        BoardConst::with_geometry(board_type, piece_set, geo, adj_status)
    }

    /// Build the tables on a shared geometry and adjacency-status table.
    pub fn with_geometry(
        board_type: BoardType,
        piece_set: PieceSet,
        geo: Arc<Geometry>,
        adj_status: Arc<AdjStatusTable>,
    ) -> BoardConst {
        assert!(
            piece_set.fits(board_type),
            "piece set {:?} cannot be played on {:?}",
            piece_set,
            board_type
        );
        let start = Instant::now();
        let catalog = PieceCatalog::new(piece_set, geo.kind());
        let nu_pieces = catalog.len();
        let mut bc = BoardConst {
            board_type,
            piece_set,
            geo,
            adj_status,
            catalog,
            move_info: vec![MoveInfo::default()],
            move_info_ext: vec![MoveInfoExt::default()],
            move_info_ext_2: vec![MoveInfoExt2::default()],
            ext_points: Vec::new(),
            nu_attach_points: vec![0; nu_pieces],
            precomp_moves: PrecompMoves::new(0, nu_pieces, 0),
        };
        bc.create_moves();
        if board_type.has_symmetry_info() {
            bc.init_symmetry_info();
        }
        info!(
            "built move table board={:?} pieces={:?} moves={} precomp={} time={:.1?}",
            board_type,
            piece_set,
            bc.nu_moves() - 1,
            bc.precomp_moves.len(),
            start.elapsed()
        );
        bc
    }

    // ========================================================================
    // Construction
    // ========================================================================

    fn create_moves(&mut self) {
        let nu_points = self.geo.nu_points();
        let nu_pieces = self.catalog.len();
        let mut full = FullMoveTable::new(nu_points, nu_pieces);
        let mut marker = vec![false; nu_points];
        for piece in self.catalog.pieces() {
            self.create_piece_moves(piece, &mut full, &mut marker);
        }
        assert!(self.move_info.len() <= u16::MAX as usize, "too many moves");

        let total: usize = full.lists.iter().map(Vec::len).sum();
        let mut precomp = PrecompMoves::new(nu_points, nu_pieces, total);
        let mut n = 0;
        for p in self.geo.points() {
            for status in 0..NU_ADJ_STATUS {
                for piece in self.catalog.pieces() {
                    let list = full.list_mut(p, status, piece);
                    let begin = n;
                    for &mv in list.iter() {
                        precomp.set_move(n, mv);
                        n += 1;
                    }
                    precomp.set_list_range(p, status as AdjStatus, piece, begin, n - begin);
                }
            }
        }
        debug!("created moves={} precomp={}", self.move_info.len(), n);
        self.precomp_moves = precomp;
    }

    fn create_piece_moves(&mut self, piece: Piece, full: &mut FullMoveTable, marker: &mut [bool]) {
        let info = self.catalog.info(piece);
        debug!("creating moves for piece {}", info.name());
        let transformed: Vec<(Transform, Vec<CoordPoint>, CoordPoint)> = info
            .transforms()
            .iter()
            .map(|&t| {
                let mut points: Vec<CoordPoint> =
                    info.points().iter().map(|&p| t.apply_relative(p)).collect();
                // Canonical order: bottom row first, then left to right.
                points.sort_unstable_by_key(|p| (-p.y, p.x));
                (t, points, t.apply_relative(info.label_pos()))
            })
            .collect();

        let geo = Arc::clone(&self.geo);
        for p in geo.points() {
            let anchor = geo.coord(p);
            let point_type = geo.point_type(p);
            for (t, offsets, label_offset) in &transformed {
                if t.new_point_type() != point_type {
                    continue;
                }
                let mut points = MovePoints::new();
                let mut is_onboard = true;
                for &off in offsets {
                    let c = anchor + off;
                    match geo.point(c.x, c.y) {
                        Some(q) => points.push(q),
                        None => {
                            is_onboard = false;
                            break;
                        }
                    }
                }
                if !is_onboard {
                    continue;
                }
                let label = anchor + *label_offset;
                let label_pos = geo.point(label.x, label.y).unwrap_or(points.as_slice()[0]);
                self.create_move(piece, points, label_pos, full, marker);
            }
        }
    }

    fn create_move(
        &mut self,
        piece: Piece,
        points: MovePoints,
        label_pos: Point,
        full: &mut FullMoveTable,
        marker: &mut [bool],
    ) {
        let mv = Move(self.move_info.len() as u16);
        for p in points.iter() {
            marker[p.index()] = true;
        }
        for p in points.iter() {
            // Slots of p occupied by the move itself; statuses blocking any
            // of them are incompatible.
            let occupied = self.adj_status.status_of(p, |q| marker[q.index()]);
            for status in 0..NU_ADJ_STATUS {
                if status as AdjStatus & occupied == 0 {
                    full.list_mut(p, status, piece).push(mv);
                }
            }
        }

        let begin = self.ext_points.len();
        for p in points.iter() {
            for &q in self.geo.adj(p) {
                if !marker[q.index()] {
                    marker[q.index()] = true;
                    self.ext_points.push(q);
                }
            }
        }
        let size_adj_points = self.ext_points.len() - begin;
        for p in points.iter() {
            for &q in self.geo.diag(p) {
                if !marker[q.index()] {
                    marker[q.index()] = true;
                    self.ext_points.push(q);
                }
            }
        }
        let size_attach_points = self.ext_points.len() - begin - size_adj_points;
        for p in points.iter() {
            marker[p.index()] = false;
        }
        for &q in &self.ext_points[begin..] {
            marker[q.index()] = false;
        }

        let slot = &mut self.nu_attach_points[piece.index()];
        *slot = (*slot).max(size_attach_points);
        self.move_info.push(MoveInfo::new(piece, points));
        self.move_info_ext.push(MoveInfoExt {
            begin: begin as u32,
            size_adj_points: size_adj_points as u8,
            size_attach_points: size_attach_points as u8,
        });
        self.move_info_ext_2.push(MoveInfoExt2 {
            label_pos,
            breaks_symmetry: false,
            symmetric_move: Move::NULL,
        });
    }

    fn init_symmetry_info(&mut self) {
        for i in 1..self.move_info.len() {
            let info = self.move_info[i];
            let mut sym_points = MovePoints::new();
            let mut breaks_symmetry = false;
            for p in info.points() {
                let q = self.geo.symmetric_point(*p);
                if info.contains(q) {
                    breaks_symmetry = true;
                }
                sym_points.push(q);
            }
            let ext = &mut self.move_info_ext_2[i];
            ext.breaks_symmetry = breaks_symmetry;
            if !breaks_symmetry {
                let symmetric_move = self.find_move_with_piece(sym_points.as_slice(), info.piece());
                let ext = &mut self.move_info_ext_2[i];
                ext.symmetric_move = symmetric_move.unwrap_or(Move::NULL);
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn board_type(&self) -> BoardType {
        self.board_type
    }

    #[inline]
    pub fn piece_set(&self) -> PieceSet {
        self.piece_set
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geo
    }

    #[inline]
    pub fn adj_status_table(&self) -> &AdjStatusTable {
        &self.adj_status
    }

    /// Shared handles, for building another piece set on the same board.
    pub fn shared_geometry(&self) -> (Arc<Geometry>, Arc<AdjStatusTable>) {
        (Arc::clone(&self.geo), Arc::clone(&self.adj_status))
    }

    #[inline]
    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    #[inline]
    pub fn nu_pieces(&self) -> usize {
        self.catalog.len()
    }

    #[inline]
    pub fn piece_info(&self, piece: Piece) -> &PieceInfo {
        self.catalog.info(piece)
    }

    pub fn piece_by_name(&self, name: &str) -> Option<Piece> {
        self.catalog.piece_by_name(name)
    }

    #[inline]
    pub fn max_piece_size(&self) -> usize {
        self.catalog.max_size()
    }

    /// Maximum number of attach points over all moves of a piece.
    #[inline]
    pub fn nu_attach_points(&self, piece: Piece) -> usize {
        self.nu_attach_points[piece.index()]
    }

    /// Number of move ids, including the null move.
    #[inline]
    pub fn nu_moves(&self) -> usize {
        self.move_info.len()
    }

    /// Iterate over all non-null moves.
    pub fn moves_iter(&self) -> impl Iterator<Item = Move> {
        (1..self.move_info.len() as u16).map(Move)
    }

    #[inline]
    pub fn move_info(&self, mv: Move) -> &MoveInfo {
        debug_assert!(!mv.is_null());
        &self.move_info[mv.index()]
    }

    #[inline]
    pub fn move_info_ext_2(&self, mv: Move) -> &MoveInfoExt2 {
        &self.move_info_ext_2[mv.index()]
    }

    #[inline]
    pub fn move_points(&self, mv: Move) -> &[Point] {
        self.move_info(mv).points()
    }

    #[inline]
    pub fn move_piece(&self, mv: Move) -> Piece {
        self.move_info(mv).piece()
    }

    /// Points sharing an edge with the move, not occupied by it.
    #[inline]
    pub fn adj_points(&self, mv: Move) -> &[Point] {
        let ext = &self.move_info_ext[mv.index()];
        let begin = ext.begin as usize;
        &self.ext_points[begin..begin + ext.nu_adj_points()]
    }

    /// Points touching the move only at corners.
    #[inline]
    pub fn attach_points(&self, mv: Move) -> &[Point] {
        let ext = &self.move_info_ext[mv.index()];
        let begin = ext.begin as usize + ext.nu_adj_points();
        &self.ext_points[begin..begin + ext.nu_attach_points()]
    }

    #[inline]
    pub fn label_pos(&self, mv: Move) -> Point {
        self.move_info_ext_2[mv.index()].label_pos
    }

    #[inline]
    pub fn breaks_symmetry(&self, mv: Move) -> bool {
        self.move_info_ext_2[mv.index()].breaks_symmetry
    }

    /// Half-turn image of a move, if the board tracks symmetry and the move
    /// does not overlap its own image.
    #[inline]
    pub fn symmetric_move(&self, mv: Move) -> Option<Move> {
        let m = self.move_info_ext_2[mv.index()].symmetric_move;
        if m.is_null() { None } else { Some(m) }
    }

    #[inline]
    pub fn precomp_moves(&self) -> &PrecompMoves {
        &self.precomp_moves
    }

    /// Moves of `piece` occupying `p` that avoid every neighbor `status`
    /// marks as blocked.
    #[inline]
    pub fn lookup(&self, p: Point, status: AdjStatus, piece: Piece) -> &[Move] {
        self.precomp_moves.get_moves(piece, p, status)
    }

    /// All moves of `piece` occupying `p`.
    #[inline]
    pub fn moves(&self, piece: Piece, p: Point) -> &[Move] {
        self.lookup(p, 0, piece)
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            board_type: self.board_type,
            piece_set: self.piece_set,
            nu_points: self.geo.nu_points(),
            nu_pieces: self.nu_pieces(),
            nu_moves: self.nu_moves(),
            precomp_len: self.precomp_moves.len(),
        }
    }

    // ========================================================================
    // Move lookup and text form
    // ========================================================================

    /// Find the move occupying exactly `points` (any order).
    pub fn find_move(&self, points: &[Point]) -> Option<Move> {
        if points.is_empty() || points.len() > MAX_PIECE_SIZE {
            return None;
        }
        let sorted = self.sorted_points(points);
        self.catalog
            .pieces()
            .filter(|&piece| self.catalog.info(piece).size() == points.len())
            .find_map(|piece| self.find_sorted(&sorted, piece))
    }

    /// Find the move of `piece` occupying exactly `points` (any order).
    pub fn find_move_with_piece(&self, points: &[Point], piece: Piece) -> Option<Move> {
        if points.is_empty() || points.len() > MAX_PIECE_SIZE {
            return None;
        }
        let sorted = self.sorted_points(points);
        self.find_sorted(&sorted, piece)
    }

    fn sorted_points(&self, points: &[Point]) -> MovePoints {
        let mut sorted: MovePoints = points.iter().copied().collect();
        self.geo.sort_points(sorted.as_mut_slice());
        sorted
    }

    fn find_sorted(&self, sorted: &MovePoints, piece: Piece) -> Option<Move> {
        self.moves(piece, sorted.as_slice()[0])
            .iter()
            .copied()
            .find(|&mv| self.move_points(mv) == sorted.as_slice())
    }

    /// Text form: comma-separated point labels in canonical order, optionally
    /// prefixed by `[name]`; `null` for the null move.
    pub fn to_text(&self, mv: Move, with_piece_name: bool) -> String {
        if mv.is_null() {
            return "null".to_string();
        }
        let info = self.move_info(mv);
        let mut s = String::new();
        if with_piece_name {
            s.push('[');
            s.push_str(self.catalog.info(info.piece()).name());
            s.push(']');
        }
        let labels: Vec<String> = info.points().iter().map(|&p| self.geo.to_label(p)).collect();
        s.push_str(&labels.join(","));
        s
    }

    /// Parse a comma-separated point list (case-insensitive) or `null`.
    pub fn from_text(&self, text: &str) -> Result<Move, MoveTextError> {
        let trimmed = text.trim().to_ascii_lowercase();
        if trimmed == "null" {
            return Ok(Move::NULL);
        }
        let labels: Vec<&str> = trimmed.split(',').collect();
        if labels.len() > MAX_PIECE_SIZE {
            return Err(MoveTextError::TooManyPoints(labels.len()));
        }
        let mut points = MovePoints::new();
        for label in labels {
            match self.geo.from_label(label) {
                Some(p) => points.push(p),
                None => return Err(MoveTextError::InvalidPoint(label.trim().to_string())),
            }
        }
        self.find_move(points.as_slice())
            .ok_or_else(|| MoveTextError::NoSuchMove(text.trim().to_string()))
    }

    /// Which unique transform of its piece a move uses.
    pub fn transform_of(&self, mv: Move) -> Option<Transform> {
        let info = self.move_info(mv);
        let kind = self.geo.kind();
        // Board coordinates of triangles have the opposite parity convention
        // from shape coordinates on odd edge lengths; shift to match.
        let dx = match kind {
            GeometryKind::Trigon { edge } => edge as i32 + 1,
            _ => 0,
        };
        let placed: Vec<CoordPoint> = info
            .points()
            .iter()
            .map(|&p| self.geo.coord(p) + CoordPoint::new(dx, 0))
            .collect();
        let placed = normalize_shape(kind, &placed);
        let piece_info = self.catalog.info(info.piece());
        piece_info.transforms().iter().copied().find(|t| {
            let image: Vec<CoordPoint> = piece_info.points().iter().map(|&p| t.apply(p)).collect();
            normalize_shape(kind, &image) == placed
        })
    }

    /// Full record of a move in text form.
    pub fn move_record(&self, mv: Move) -> MoveRecord {
        let labels = |points: &[Point]| -> Vec<String> {
            points.iter().map(|&p| self.geo.to_label(p)).collect()
        };
        MoveRecord {
            id: mv.0,
            piece: self.piece_info(self.move_piece(mv)).name().to_string(),
            points: labels(self.move_points(mv)),
            adj_points: labels(self.adj_points(mv)),
            attach_points: labels(self.attach_points(mv)),
            label: self.geo.to_label(self.label_pos(mv)),
            breaks_symmetry: self.breaks_symmetry(mv),
            symmetric_move: self.symmetric_move(mv).map(|m| m.0),
        }
    }
}
