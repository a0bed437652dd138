//! Piece catalogs and per-piece transform deduplication.

use std::ops::BitAnd;

use rustc_hash::FxHashMap;

use crate::geometry::{CoordPoint, GeometryKind};
use crate::transform::Transform;
use crate::variant::PieceSet;

/// Maximum number of points of a piece (nexos I4: four segments plus the
/// three junctions between them).
pub const MAX_PIECE_SIZE: usize = 7;

/// Maximum catalog size supported by `PieceMask`.
pub const MAX_PIECES: usize = 32;

/// Index into a piece catalog.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Default)]
pub struct Piece(pub u8);

impl Piece {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Set of pieces of one catalog.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct PieceMask(pub u32);

impl PieceMask {
    /// Mask containing the first `nu_pieces` pieces.
    #[inline]
    pub fn all(nu_pieces: usize) -> PieceMask {
        debug_assert!(nu_pieces <= MAX_PIECES);
        if nu_pieces == MAX_PIECES {
            PieceMask(u32::MAX)
        } else {
            PieceMask((1 << nu_pieces) - 1)
        }
    }

    #[inline]
    pub fn contains(self, piece: Piece) -> bool {
        self.0 & (1 << piece.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, piece: Piece) {
        self.0 |= 1 << piece.0;
    }

    #[inline]
    pub fn remove(&mut self, piece: Piece) {
        self.0 &= !(1 << piece.0);
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over contained pieces in catalog order.
    pub fn iter(self) -> impl Iterator<Item = Piece> {
        (0..MAX_PIECES as u8).filter(move |&i| self.0 & (1 << i) != 0).map(Piece)
    }
}

impl BitAnd for PieceMask {
    type Output = PieceMask;

    #[inline]
    fn bitand(self, o: PieceMask) -> PieceMask {
        PieceMask(self.0 & o.0)
    }
}

// ============================================================================
// Shape data
// ============================================================================

/// (name, points, label position)
type ShapeDef = (&'static str, &'static [(i32, i32)], (i32, i32));

const CLASSIC_SHAPES: [ShapeDef; 21] = [
    ("V5", &[(0, 0), (0, -1), (0, -2), (1, 0), (2, 0)], (0, 0)),
    ("L5", &[(0, 1), (1, 1), (0, 0), (0, -1), (0, -2)], (0, 0)),
    ("Z5", &[(-1, -1), (0, 1), (0, 0), (0, -1), (1, 1)], (0, 0)),
    ("N", &[(-1, 1), (-1, 0), (0, 0), (0, -1), (0, -2)], (0, 0)),
    ("W", &[(-1, 0), (-1, -1), (0, 0), (0, 1), (1, 1)], (0, 0)),
    ("X", &[(-1, 0), (0, -1), (0, 0), (0, 1), (1, 0)], (0, 0)),
    ("F", &[(0, -1), (1, -1), (-1, 0), (0, 0), (0, 1)], (0, 0)),
    ("I5", &[(0, 2), (0, 1), (0, 0), (0, -1), (0, -2)], (0, 0)),
    ("T5", &[(-1, -1), (0, 1), (0, 0), (0, -1), (1, -1)], (0, 0)),
    ("Y", &[(-1, 0), (0, 0), (0, -1), (0, 1), (0, 2)], (0, 0)),
    ("P", &[(0, 1), (0, 0), (0, -1), (1, 0), (1, -1)], (0, 0)),
    ("U", &[(-1, 0), (-1, -1), (0, 0), (1, 0), (1, -1)], (0, 0)),
    ("L4", &[(0, 1), (0, 0), (0, -1), (1, 1)], (0, 0)),
    ("I4", &[(0, -1), (0, 0), (0, 1), (0, 2)], (0, 0)),
    ("T4", &[(-1, 0), (0, 0), (1, 0), (0, 1)], (0, 0)),
    ("Z4", &[(-1, 0), (0, 0), (0, 1), (1, 1)], (0, 0)),
    ("O", &[(0, 0), (0, -1), (1, 0), (1, -1)], (0, 0)),
    ("V3", &[(0, 0), (0, -1), (1, 0)], (0, 0)),
    ("I3", &[(0, -1), (0, 0), (0, 1)], (0, 0)),
    ("2", &[(0, 0), (1, 0)], (0, 0)),
    ("1", &[(0, 0)], (0, 0)),
];

const JUNIOR_SHAPES: [ShapeDef; 12] = [
    ("L5", &[(0, 1), (1, 1), (0, 0), (0, -1), (0, -2)], (0, 0)),
    ("P", &[(0, 1), (0, 0), (0, -1), (1, 0), (1, -1)], (0, 0)),
    ("I5", &[(0, 2), (0, 1), (0, 0), (0, -1), (0, -2)], (0, 0)),
    ("O", &[(0, 0), (0, -1), (1, 0), (1, -1)], (0, 0)),
    ("T4", &[(-1, 0), (0, 0), (1, 0), (0, 1)], (0, 0)),
    ("Z4", &[(-1, 0), (0, 0), (0, 1), (1, 1)], (0, 0)),
    ("L4", &[(0, 1), (0, 0), (0, -1), (1, 1)], (0, 0)),
    ("I4", &[(0, 1), (0, 0), (0, -1), (0, -2)], (0, 0)),
    ("V3", &[(0, 0), (0, -1), (1, 0)], (0, 0)),
    ("I3", &[(0, -1), (0, 0), (0, 1)], (0, 0)),
    ("2", &[(0, 0), (1, 0)], (0, 0)),
    ("1", &[(0, 0)], (0, 0)),
];

// Triangle shapes: (x, y) is an up triangle iff x + y is even.
const TRIGON_SHAPES: [ShapeDef; 22] = [
    ("I6", &[(1, -1), (2, -1), (0, 0), (1, 0), (-1, 1), (0, 1)], (0, 0)),
    ("L6", &[(1, -1), (2, -1), (0, 0), (1, 0), (0, 1), (1, 1)], (1, 0)),
    ("V", &[(-2, -1), (-1, -1), (-1, 0), (0, 0), (1, 0), (2, 0)], (0, 0)),
    ("S", &[(-1, -1), (0, -1), (-1, 0), (0, 0), (-1, 1), (0, 1)], (0, 0)),
    ("P6", &[(1, -1), (0, 0), (1, 0), (2, 0), (-1, 1), (0, 1)], (1, 0)),
    ("F", &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 1), (1, 2)], (0, 1)),
    ("W", &[(1, -1), (-1, 0), (0, 0), (1, 0), (2, 0), (3, 0)], (1, 0)),
    ("A6", &[(1, -1), (0, 0), (1, 0), (2, 0), (0, 1), (2, 1)], (1, 0)),
    ("G", &[(1, -1), (0, 0), (1, 0), (0, 1), (1, 1), (2, 1)], (0, 0)),
    ("Y", &[(-1, -1), (-1, 0), (0, 0), (1, 0), (-1, 1), (0, 1)], (0, 0)),
    ("X", &[(-1, 0), (0, 0), (1, 0), (-1, 1), (0, 1), (1, 1)], (0, 0)),
    ("O", &[(-1, -1), (0, -1), (1, -1), (-1, 0), (0, 0), (1, 0)], (0, 0)),
    ("I5", &[(1, -1), (0, 0), (1, 0), (-1, 1), (0, 1)], (0, 0)),
    ("L5", &[(1, -1), (0, 0), (1, 0), (0, 1), (1, 1)], (0, 0)),
    ("C5", &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 1)], (0, 1)),
    ("P5", &[(1, -1), (0, 0), (1, 0), (2, 0), (0, 1)], (1, 0)),
    ("I4", &[(0, 0), (1, 0), (-1, 1), (0, 1)], (0, 0)),
    ("C4", &[(0, 0), (1, 0), (0, 1), (1, 1)], (0, 0)),
    ("A4", &[(1, -1), (0, 0), (1, 0), (2, 0)], (1, 0)),
    ("I3", &[(1, -1), (0, 0), (1, 0)], (1, 0)),
    ("2", &[(0, 0), (1, 0)], (0, 0)),
    ("1", &[(0, 0)], (0, 0)),
];

// Segment shapes: (0, 0) is a junction; (odd, even) horizontal and
// (even, odd) vertical segments. Inner junctions are part of the piece.
const NEXOS_SHAPES: [ShapeDef; 24] = [
    ("I4", &[(0, -3), (0, -2), (0, -1), (0, 0), (0, 1), (0, 2), (0, 3)], (0, 1)),
    ("L4", &[(0, -3), (0, -2), (0, -1), (0, 0), (0, 1), (1, 2)], (0, 1)),
    ("Y", &[(0, -1), (-1, 0), (0, 1), (0, 2), (0, 3)], (0, 1)),
    ("N", &[(-2, -1), (-1, 0), (0, 1), (0, 2), (0, 3)], (0, 1)),
    ("V4", &[(-3, 0), (-2, 0), (-1, 0), (0, -1), (0, -2), (0, -3)], (-1, 0)),
    ("W", &[(-2, -1), (-1, 0), (0, 1), (1, 2)], (-1, 0)),
    ("Z4", &[(-1, -2), (0, -1), (0, 0), (0, 1), (1, 2)], (0, 1)),
    ("T4", &[(-1, 0), (1, 0), (0, 1), (0, 2), (0, 3)], (0, 1)),
    ("E", &[(0, -1), (1, 0), (0, 1), (-1, 2)], (0, 1)),
    ("U4", &[(-2, -1), (-1, 0), (0, 0), (1, 0), (2, -1)], (-1, 0)),
    ("X", &[(0, -1), (-1, 0), (1, 0), (0, 1)], (0, -1)),
    ("F", &[(1, -2), (0, -1), (1, 0), (0, 1)], (0, -1)),
    ("H", &[(0, -1), (1, 0), (0, 1), (2, 1)], (0, 1)),
    ("J", &[(0, -3), (0, -2), (0, -1), (-1, 0), (-2, -1)], (-1, 0)),
    ("G", &[(2, -1), (1, 0), (0, 1), (1, 2)], (1, 0)),
    ("O", &[(1, 0), (2, 1), (0, 1), (1, 2)], (0, 1)),
    ("I3", &[(0, -1), (0, 0), (0, 1), (0, 2), (0, 3)], (0, 1)),
    ("L3", &[(0, -1), (0, 0), (0, 1), (1, 2)], (0, 1)),
    ("T3", &[(-1, 0), (1, 0), (0, 1)], (0, 1)),
    ("Z3", &[(-1, 0), (0, 1), (1, 2)], (0, 1)),
    ("U3", &[(0, -1), (1, 0), (2, -1)], (1, 0)),
    ("V2", &[(-1, 0), (0, -1)], (-1, 0)),
    ("I2", &[(0, -1), (0, 0), (0, 1)], (0, 1)),
    ("1", &[(1, 0)], (1, 0)),
];

fn shapes(piece_set: PieceSet) -> &'static [ShapeDef] {
    match piece_set {
        PieceSet::Classic => &CLASSIC_SHAPES,
        PieceSet::Junior => &JUNIOR_SHAPES,
        PieceSet::Trigon => &TRIGON_SHAPES,
        PieceSet::Nexos => &NEXOS_SHAPES,
    }
}

// ============================================================================
// PieceInfo
// ============================================================================

/// Translate a shape next to the origin (keeping point types) and sort it
/// bottom row first, left to right.
pub fn normalize_shape(kind: GeometryKind, points: &[CoordPoint]) -> Vec<CoordPoint> {
    let min_x = points.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
    let shift = kind.normalizing_shift(min_x, min_y);
    let mut result: Vec<CoordPoint> = points.iter().map(|&p| p - shift).collect();
    result.sort_unstable_by_key(|p| (-p.y, p.x));
    result
}

/// One shape of a catalog.
#[derive(Debug)]
pub struct PieceInfo {
    name: &'static str,
    points: Vec<CoordPoint>,
    label_pos: CoordPoint,
    uniq_transforms: Vec<Transform>,
    /// Indexed by `Transform::index`.
    equivalent: Vec<Transform>,
}

impl PieceInfo {
    /// Build a piece and its list of unique transforms.
    pub fn new(
        name: &'static str,
        points: Vec<CoordPoint>,
        label_pos: CoordPoint,
        kind: GeometryKind,
    ) -> PieceInfo {
        assert!(!points.is_empty() && points.len() <= MAX_PIECE_SIZE, "piece {} size", name);
        let mut uniq_transforms: Vec<Transform> = Vec::new();
        let mut uniq_shapes: Vec<Vec<CoordPoint>> = Vec::new();
        let mut equivalent = Vec::new();
        for &t in Transform::all(kind) {
            let image: Vec<CoordPoint> = points.iter().map(|&p| t.apply(p)).collect();
            let shape = normalize_shape(kind, &image);
            match uniq_shapes.iter().position(|s| *s == shape) {
                Some(i) => equivalent.push(uniq_transforms[i]),
                None => {
                    uniq_shapes.push(shape);
                    uniq_transforms.push(t);
                    equivalent.push(t);
                }
            }
        }
        PieceInfo {
            name,
            points,
            label_pos,
            uniq_transforms,
            equivalent,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Shape coordinates as declared.
    #[inline]
    pub fn points(&self) -> &[CoordPoint] {
        &self.points
    }

    #[inline]
    pub fn label_pos(&self) -> CoordPoint {
        self.label_pos
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Transforms producing distinct placements, in canonical order.
    #[inline]
    pub fn transforms(&self) -> &[Transform] {
        &self.uniq_transforms
    }

    /// The unique transform producing the same shape as `t`.
    #[inline]
    pub fn equivalent_transform(&self, t: Transform) -> Transform {
        self.equivalent[t.index()]
    }

    /// Next unique transform (cyclic).
    pub fn next_transform(&self, t: Transform) -> Transform {
        let t = self.equivalent_transform(t);
        let i = self.uniq_position(t);
        self.uniq_transforms[(i + 1) % self.uniq_transforms.len()]
    }

    /// Previous unique transform (cyclic).
    pub fn previous_transform(&self, t: Transform) -> Transform {
        let t = self.equivalent_transform(t);
        let i = self.uniq_position(t);
        let n = self.uniq_transforms.len();
        self.uniq_transforms[(i + n - 1) % n]
    }

    /// Whether some rotation yields a different shape.
    pub fn can_rotate(&self) -> bool {
        self.uniq_transforms.len() > 1
    }

    fn uniq_position(&self, t: Transform) -> usize {
        self.uniq_transforms
            .iter()
            .position(|&u| u == t)
            .unwrap_or(0)
    }
}

// ============================================================================
// PieceCatalog
// ============================================================================

/// All pieces of a piece set on one grid kind.
#[derive(Debug)]
pub struct PieceCatalog {
    piece_set: PieceSet,
    pieces: Vec<PieceInfo>,
    by_name: FxHashMap<&'static str, Piece>,
    max_size: usize,
}

impl PieceCatalog {
    /// Build the catalog. Panics if the shape table does not have the
    /// expected number of distinct pieces.
    pub fn new(piece_set: PieceSet, kind: GeometryKind) -> PieceCatalog {
        let pieces: Vec<PieceInfo> = shapes(piece_set)
            .iter()
            .map(|&(name, points, (lx, ly))| {
                let points = points.iter().map(|&(x, y)| CoordPoint::new(x, y)).collect();
                PieceInfo::new(name, points, CoordPoint::new(lx, ly), kind)
            })
            .collect();
        assert_eq!(
            pieces.len(),
            piece_set.expected_size(),
            "catalog size mismatch for {:?}",
            piece_set
        );
        assert!(pieces.len() <= MAX_PIECES);
        let by_name: FxHashMap<&'static str, Piece> = pieces
            .iter()
            .enumerate()
            .map(|(i, info)| (info.name(), Piece(i as u8)))
            .collect();
        assert_eq!(by_name.len(), pieces.len(), "duplicate piece name");
        let max_size = pieces.iter().map(PieceInfo::size).max().unwrap_or(0);
        PieceCatalog {
            piece_set,
            pieces,
            by_name,
            max_size,
        }
    }

    #[inline]
    pub fn piece_set(&self) -> PieceSet {
        self.piece_set
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[inline]
    pub fn info(&self, piece: Piece) -> &PieceInfo {
        &self.pieces[piece.index()]
    }

    /// Iterate over all pieces in catalog order.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> {
        (0..self.pieces.len() as u8).map(Piece)
    }

    /// Look up a piece by its short name (case-sensitive, as in game records).
    pub fn piece_by_name(&self, name: &str) -> Option<Piece> {
        self.by_name.get(name).copied()
    }

    /// Size of the largest piece.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniq_counts(piece_set: PieceSet, kind: GeometryKind) -> Vec<(&'static str, usize)> {
        let catalog = PieceCatalog::new(piece_set, kind);
        catalog
            .pieces()
            .map(|p| (catalog.info(p).name(), catalog.info(p).transforms().len()))
            .collect()
    }

    #[test]
    fn test_classic_unique_transforms() {
        let counts = uniq_counts(PieceSet::Classic, GeometryKind::Rect);
        let expected = [
            ("V5", 4), ("L5", 8), ("Z5", 4), ("N", 8), ("W", 4), ("X", 1), ("F", 8),
            ("I5", 2), ("T5", 4), ("Y", 8), ("P", 8), ("U", 4), ("L4", 8), ("I4", 2),
            ("T4", 4), ("Z4", 4), ("O", 1), ("V3", 4), ("I3", 2), ("2", 2), ("1", 1),
        ];
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_trigon_unique_transforms() {
        let counts = uniq_counts(PieceSet::Trigon, GeometryKind::Trigon { edge: 9 });
        let expected = [
            ("I6", 6), ("L6", 12), ("V", 6), ("S", 6), ("P6", 12), ("F", 12), ("W", 6),
            ("A6", 6), ("G", 12), ("Y", 12), ("X", 3), ("O", 1), ("I5", 6), ("L5", 12),
            ("C5", 6), ("P5", 12), ("I4", 6), ("C4", 6), ("A4", 2), ("I3", 6), ("2", 3),
            ("1", 2),
        ];
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_nexos_unique_transforms() {
        let counts = uniq_counts(PieceSet::Nexos, GeometryKind::Nexos);
        let total: usize = counts.iter().map(|c| c.1).sum();
        assert_eq!(counts[0], ("I4", 2));
        assert_eq!(counts[10], ("X", 1));
        assert_eq!(counts[23], ("1", 2));
        assert_eq!(total, 118);
    }

    #[test]
    fn test_catalog_sizes() {
        for (set, kind) in [
            (PieceSet::Classic, GeometryKind::Rect),
            (PieceSet::Junior, GeometryKind::Rect),
            (PieceSet::Trigon, GeometryKind::Trigon { edge: 8 }),
            (PieceSet::Nexos, GeometryKind::Nexos),
        ] {
            let catalog = PieceCatalog::new(set, kind);
            assert_eq!(catalog.len(), set.expected_size());
        }
    }

    #[test]
    fn test_piece_by_name_and_max_size() {
        let catalog = PieceCatalog::new(PieceSet::Classic, GeometryKind::Rect);
        assert_eq!(catalog.piece_by_name("V5"), Some(Piece(0)));
        assert_eq!(catalog.piece_by_name("1"), Some(Piece(20)));
        assert_eq!(catalog.piece_by_name("v5"), None);
        assert_eq!(catalog.max_size(), 5);
        let nexos = PieceCatalog::new(PieceSet::Nexos, GeometryKind::Nexos);
        assert_eq!(nexos.max_size(), MAX_PIECE_SIZE);
    }

    #[test]
    fn test_transform_navigation() {
        let catalog = PieceCatalog::new(PieceSet::Classic, GeometryKind::Rect);
        let i5 = catalog.info(catalog.piece_by_name("I5").unwrap());
        let uniq = i5.transforms();
        assert_eq!(uniq.len(), 2);
        assert_eq!(i5.next_transform(uniq[0]), uniq[1]);
        assert_eq!(i5.next_transform(uniq[1]), uniq[0]);
        assert_eq!(i5.previous_transform(uniq[0]), uniq[1]);
        // Rotating I5 by 180° gives the same shape as the identity.
        let rot180 = Transform::Rect { rot: 2, mirror: false };
        assert_eq!(i5.equivalent_transform(rot180), uniq[0]);
        let x = catalog.info(catalog.piece_by_name("X").unwrap());
        assert!(!x.can_rotate());
        for &t in Transform::all(GeometryKind::Rect) {
            assert_eq!(x.equivalent_transform(t), x.transforms()[0]);
        }
    }

    #[test]
    fn test_piece_mask() {
        let mut mask = PieceMask::all(21);
        assert_eq!(mask.len(), 21);
        mask.remove(Piece(3));
        assert!(!mask.contains(Piece(3)));
        assert!(mask.contains(Piece(20)));
        assert!(!mask.contains(Piece(21)));
        mask.insert(Piece(3));
        assert_eq!(mask, PieceMask::all(21));
        assert_eq!(PieceMask::default().iter().count(), 0);
        assert_eq!(PieceMask::all(32).len(), 32);
    }
}
