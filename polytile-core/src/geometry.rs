//! Board geometries: point numbering, coordinates, neighbors and labels.
//!
//! Points are numbered densely in row-major scan order over the on-board
//! coordinates, so every per-point table is a plain `Vec` indexed by
//! `Point::index()`.
//!
//! Coordinates have `y` growing downwards. Labels count rows from the
//! bottom, so on a 20x20 board `a20` is the top-left point `(0, 0)`.

use std::ops::{Add, Sub};

use crate::variant::BoardType;

/// A board point. Dense index into the geometry's point tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Point(pub u16);

impl Point {
    /// Sentinel for "no point" (padding in fixed-size neighbor lists).
    pub const NULL: Point = Point(u16::MAX);

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == u16::MAX
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A point in unbounded grid coordinates (piece shapes, transforms).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CoordPoint {
    pub x: i32,
    pub y: i32,
}

impl CoordPoint {
    #[inline]
    pub const fn new(x: i32, y: i32) -> CoordPoint {
        CoordPoint { x, y }
    }
}

impl Add for CoordPoint {
    type Output = CoordPoint;

    #[inline]
    fn add(self, o: CoordPoint) -> CoordPoint {
        CoordPoint::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for CoordPoint {
    type Output = CoordPoint;

    #[inline]
    fn sub(self, o: CoordPoint) -> CoordPoint {
        CoordPoint::new(self.x - o.x, self.y - o.y)
    }
}

/// Grid family of a geometry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GeometryKind {
    /// Square cells, one point type.
    Rect,
    /// Triangles in a hexagon with the given edge length.
    /// Point type 0 = pointing up, 1 = pointing down.
    Trigon { edge: u32 },
    /// Segments and junctions. Point type 0 = junction,
    /// 1 = horizontal segment, 2 = vertical segment.
    Nexos,
}

impl GeometryKind {
    /// Point type of arbitrary coordinates (need not be on the board).
    #[inline]
    pub fn point_type_at(self, x: i32, y: i32) -> u8 {
        match self {
            GeometryKind::Rect => 0,
            GeometryKind::Trigon { edge } => (x + y + edge as i32 + 1).rem_euclid(2) as u8,
            GeometryKind::Nexos => match (x.rem_euclid(2), y.rem_euclid(2)) {
                (0, 0) => 0,
                (1, 0) => 1,
                (0, 1) => 2,
                _ => 3,
            },
        }
    }

    /// Translation that moves a shape with the given minimum corner next to
    /// the origin without changing any point type.
    pub fn normalizing_shift(self, min_x: i32, min_y: i32) -> CoordPoint {
        match self {
            GeometryKind::Rect => CoordPoint::new(min_x, min_y),
            GeometryKind::Trigon { .. } => {
                // Shape coordinates use the plain lattice (up iff x + y even),
                // so only shifts with an even coordinate sum keep types.
                if (min_x + min_y).rem_euclid(2) == 0 {
                    CoordPoint::new(min_x, min_y)
                } else {
                    CoordPoint::new(min_x - 1, min_y)
                }
            }
            GeometryKind::Nexos => {
                CoordPoint::new(min_x - min_x.rem_euclid(2), min_y - min_y.rem_euclid(2))
            }
        }
    }
}

/// Immutable description of one board.
#[derive(Debug)]
pub struct Geometry {
    kind: GeometryKind,
    width: u32,
    height: u32,
    /// width * height grid -> point (NULL when off-board)
    grid: Vec<Point>,
    coords: Vec<CoordPoint>,
    point_types: Vec<u8>,
    adj: Vec<Vec<Point>>,
    diag: Vec<Vec<Point>>,
    compare_val: Vec<u32>,
    symmetric: Vec<Point>,
}

impl Geometry {
    /// Build the geometry for a board type.
    pub fn new(board_type: BoardType) -> Geometry {
        match board_type {
            BoardType::Classic => Geometry::rect(20, 20),
            BoardType::Duo => Geometry::rect(14, 14),
            BoardType::Trigon => Geometry::trigon(9),
            BoardType::Trigon3 => Geometry::trigon(8),
            BoardType::Nexos => Geometry::nexos(13),
        }
    }

    /// Rectangular board of squares.
    pub fn rect(width: u32, height: u32) -> Geometry {
        Geometry::build(GeometryKind::Rect, width, height, |_, _| true)
    }

    /// Hexagonal board of triangles with the given edge length.
    pub fn trigon(edge: u32) -> Geometry {
        let width = 4 * edge - 1;
        let height = 2 * edge;
        Geometry::build(GeometryKind::Trigon { edge }, width, height, |x, y| {
            let dy = y.min(height - y - 1);
            let min_x = edge - 1 - dy;
            let max_x = width - min_x - 1;
            x >= min_x && x <= max_x
        })
    }

    /// Segment grid with `junctions` junctions per row and column.
    pub fn nexos(junctions: u32) -> Geometry {
        let size = 2 * junctions - 1;
        Geometry::build(GeometryKind::Nexos, size, size, |x, y| x % 2 == 0 || y % 2 == 0)
    }

    fn build(
        kind: GeometryKind,
        width: u32,
        height: u32,
        is_onboard: impl Fn(u32, u32) -> bool,
    ) -> Geometry {
        let mut grid = vec![Point::NULL; (width * height) as usize];
        let mut coords = Vec::new();
        let mut point_types = Vec::new();
        for y in 0..height {
            for x in 0..width {
                if is_onboard(x, y) {
                    grid[(y * width + x) as usize] = Point(coords.len() as u16);
                    coords.push(CoordPoint::new(x as i32, y as i32));
                    point_types.push(kind.point_type_at(x as i32, y as i32));
                }
            }
        }
        assert!(coords.len() < u16::MAX as usize, "too many points");

        let mut geo = Geometry {
            kind,
            width,
            height,
            grid,
            coords,
            point_types,
            adj: Vec::new(),
            diag: Vec::new(),
            compare_val: Vec::new(),
            symmetric: Vec::new(),
        };

        let nu_points = geo.coords.len();
        let mut adj = Vec::with_capacity(nu_points);
        let mut diag = Vec::with_capacity(nu_points);
        let mut compare_val = Vec::with_capacity(nu_points);
        let mut symmetric = Vec::with_capacity(nu_points);
        for i in 0..nu_points {
            let c = geo.coords[i];
            let (adj_offsets, diag_offsets) = geo.neighbor_offsets(c.x, c.y);
            adj.push(geo.collect_onboard(c, adj_offsets));
            diag.push(geo.collect_onboard(c, diag_offsets));
            compare_val.push((height - c.y as u32 - 1) * width + c.x as u32);
            symmetric.push(
                geo.point(width as i32 - 1 - c.x, height as i32 - 1 - c.y)
                    .unwrap_or(Point::NULL),
            );
        }
        geo.adj = adj;
        geo.diag = diag;
        geo.compare_val = compare_val;
        geo.symmetric = symmetric;
        geo
    }

    /// Offsets of edge neighbors and corner-only neighbors, each list in
    /// top-to-bottom, left-to-right order.
    fn neighbor_offsets(&self, x: i32, y: i32) -> (&'static [(i32, i32)], &'static [(i32, i32)]) {
        const RECT_ADJ: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
        const RECT_DIAG: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
        const UP_ADJ: [(i32, i32); 3] = [(-1, 0), (1, 0), (0, 1)];
        const UP_DIAG: [(i32, i32); 9] = [
            (-1, -1), (0, -1), (1, -1),
            (-2, 0), (2, 0),
            (-2, 1), (-1, 1), (1, 1), (2, 1),
        ];
        const DOWN_ADJ: [(i32, i32); 3] = [(0, -1), (-1, 0), (1, 0)];
        const DOWN_DIAG: [(i32, i32); 9] = [
            (-2, -1), (-1, -1), (1, -1), (2, -1),
            (-2, 0), (2, 0),
            (-1, 1), (0, 1), (1, 1),
        ];
        const HORIZONTAL_DIAG: [(i32, i32); 6] =
            [(-1, -1), (1, -1), (-2, 0), (2, 0), (-1, 1), (1, 1)];
        const VERTICAL_DIAG: [(i32, i32); 6] =
            [(0, -2), (-1, -1), (1, -1), (-1, 1), (1, 1), (0, 2)];

        match self.kind {
            GeometryKind::Rect => (&RECT_ADJ, &RECT_DIAG),
            GeometryKind::Trigon { .. } => {
                if self.kind.point_type_at(x, y) == 0 {
                    (&UP_ADJ, &UP_DIAG)
                } else {
                    (&DOWN_ADJ, &DOWN_DIAG)
                }
            }
            GeometryKind::Nexos => match self.kind.point_type_at(x, y) {
                1 => (&[], &HORIZONTAL_DIAG),
                2 => (&[], &VERTICAL_DIAG),
                _ => (&[], &[]),
            },
        }
    }

    fn collect_onboard(&self, c: CoordPoint, offsets: &[(i32, i32)]) -> Vec<Point> {
        offsets
            .iter()
            .filter_map(|&(dx, dy)| self.point(c.x + dx, c.y + dy))
            .collect()
    }

    #[inline]
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn nu_points(&self) -> usize {
        self.coords.len()
    }

    /// Iterate over all points in scan order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.coords.len() as u16).map(Point)
    }

    /// Point at coordinates, or None if off-board.
    #[inline]
    pub fn point(&self, x: i32, y: i32) -> Option<Point> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let p = self.grid[(y as u32 * self.width + x as u32) as usize];
        if p.is_null() { None } else { Some(p) }
    }

    #[inline]
    pub fn is_onboard(&self, c: CoordPoint) -> bool {
        self.point(c.x, c.y).is_some()
    }

    #[inline]
    pub fn coord(&self, p: Point) -> CoordPoint {
        self.coords[p.index()]
    }

    #[inline]
    pub fn x(&self, p: Point) -> i32 {
        self.coords[p.index()].x
    }

    #[inline]
    pub fn y(&self, p: Point) -> i32 {
        self.coords[p.index()].y
    }

    #[inline]
    pub fn point_type(&self, p: Point) -> u8 {
        self.point_types[p.index()]
    }

    /// Points sharing an edge with `p` (none for nexos).
    #[inline]
    pub fn adj(&self, p: Point) -> &[Point] {
        &self.adj[p.index()]
    }

    /// Points touching `p` only at a corner (nexos: segments meeting `p`
    /// at one of its end junctions).
    #[inline]
    pub fn diag(&self, p: Point) -> &[Point] {
        &self.diag[p.index()]
    }

    /// Sort key of the game-record point order: bottom row first, then
    /// left to right.
    #[inline]
    pub fn compare_val(&self, p: Point) -> u32 {
        self.compare_val[p.index()]
    }

    /// Sort points into canonical (game-record) order.
    pub fn sort_points(&self, points: &mut [Point]) {
        points.sort_unstable_by_key(|&p| self.compare_val(p));
    }

    /// Image of `p` under a half-turn about the board center.
    #[inline]
    pub fn symmetric_point(&self, p: Point) -> Point {
        self.symmetric[p.index()]
    }

    /// Text label of a point, e.g. `a20`, `t1`, `ai9`.
    pub fn to_label(&self, p: Point) -> String {
        let c = self.coord(p);
        let mut s = String::with_capacity(4);
        if c.x >= 26 {
            s.push((b'a' + (c.x / 26 - 1) as u8) as char);
        }
        s.push((b'a' + (c.x % 26) as u8) as char);
        s.push_str(&(self.height as i32 - c.y).to_string());
        s
    }

    /// Parse a point label. Case-insensitive; None if malformed or off-board.
    pub fn from_label(&self, label: &str) -> Option<Point> {
        let label = label.trim().to_ascii_lowercase();
        let split = label.find(|c: char| !c.is_ascii_lowercase())?;
        let (letters, digits) = label.split_at(split);
        let letters = letters.as_bytes();
        let x = match letters.len() {
            1 => (letters[0] - b'a') as i32,
            2 => (letters[0] - b'a' + 1) as i32 * 26 + (letters[1] - b'a') as i32,
            _ => return None,
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let row: i32 = digits.parse().ok()?;
        if row < 1 || row > self.height as i32 {
            return None;
        }
        self.point(x, self.height as i32 - row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric_relation(geo: &Geometry) {
        for p in geo.points() {
            for &q in geo.adj(p) {
                assert!(geo.adj(q).contains(&p), "adj not symmetric");
            }
            for &q in geo.diag(p) {
                assert!(geo.diag(q).contains(&p), "diag not symmetric");
                assert!(!geo.adj(p).contains(&q), "diag overlaps adj");
            }
        }
    }

    #[test]
    fn test_rect_basics() {
        let geo = Geometry::new(BoardType::Classic);
        assert_eq!(geo.nu_points(), 400);
        let p = geo.point(0, 0).unwrap();
        assert_eq!(geo.adj(p).len(), 2);
        assert_eq!(geo.diag(p).len(), 1);
        let q = geo.point(5, 5).unwrap();
        assert_eq!(geo.adj(q).len(), 4);
        assert_eq!(geo.diag(q).len(), 4);
        assert_eq!(geo.adj(q)[0], geo.point(5, 4).unwrap());
        assert_symmetric_relation(&geo);
    }

    #[test]
    fn test_rect_labels() {
        let geo = Geometry::new(BoardType::Classic);
        assert_eq!(geo.to_label(geo.point(0, 0).unwrap()), "a20");
        assert_eq!(geo.to_label(geo.point(19, 19).unwrap()), "t1");
        assert_eq!(geo.from_label("A20"), geo.point(0, 0));
        assert_eq!(geo.from_label("t1"), geo.point(19, 19));
        assert_eq!(geo.from_label("u1"), None);
        assert_eq!(geo.from_label("a21"), None);
        assert_eq!(geo.from_label("a0"), None);
        assert_eq!(geo.from_label("a"), None);
        assert_eq!(geo.from_label("5"), None);
        assert_eq!(geo.from_label("a1x"), None);
        for p in geo.points() {
            assert_eq!(geo.from_label(&geo.to_label(p)), Some(p));
        }
    }

    #[test]
    fn test_compare_val_order() {
        let geo = Geometry::new(BoardType::Duo);
        let mut points = vec![
            geo.point(3, 0).unwrap(),
            geo.point(1, 13).unwrap(),
            geo.point(0, 0).unwrap(),
            geo.point(0, 13).unwrap(),
        ];
        geo.sort_points(&mut points);
        let labels: Vec<String> = points.iter().map(|&p| geo.to_label(p)).collect();
        assert_eq!(labels, vec!["a1", "b1", "a14", "d14"]);
    }

    #[test]
    fn test_trigon_shape() {
        let geo = Geometry::new(BoardType::Trigon);
        assert_eq!(geo.width(), 35);
        assert_eq!(geo.height(), 18);
        assert_eq!(geo.nu_points(), 486);
        assert_eq!(Geometry::new(BoardType::Trigon3).nu_points(), 384);
        // Leftmost triangle of the top row points up.
        let p = geo.point(8, 0).unwrap();
        assert_eq!(geo.point_type(p), 0);
        assert_eq!(geo.point(7, 0), None);
        for p in geo.points() {
            assert!(geo.adj(p).len() <= 3);
            assert!(geo.diag(p).len() <= 9);
        }
        let inner = geo.point(17, 8).unwrap();
        assert_eq!(geo.adj(inner).len(), 3);
        assert_eq!(geo.diag(inner).len(), 9);
        assert_symmetric_relation(&geo);
    }

    #[test]
    fn test_trigon_labels_two_letters() {
        let geo = Geometry::new(BoardType::Trigon);
        let p = geo.point(34, 8).unwrap();
        assert_eq!(geo.to_label(p), "ai10");
        assert_eq!(geo.from_label("ai10"), Some(p));
        for p in geo.points() {
            assert_eq!(geo.from_label(&geo.to_label(p)), Some(p));
        }
    }

    #[test]
    fn test_nexos_shape() {
        let geo = Geometry::new(BoardType::Nexos);
        assert_eq!(geo.width(), 25);
        // 13x13 junctions + 2 * 13 * 12 segments
        assert_eq!(geo.nu_points(), 169 + 312);
        let junction = geo.point(4, 4).unwrap();
        assert_eq!(geo.point_type(junction), 0);
        assert!(geo.adj(junction).is_empty());
        assert!(geo.diag(junction).is_empty());
        let seg = geo.point(5, 4).unwrap();
        assert_eq!(geo.point_type(seg), 1);
        assert_eq!(geo.diag(seg).len(), 6);
        assert_eq!(geo.point(5, 5), None);
        assert_symmetric_relation(&geo);
    }

    #[test]
    fn test_symmetric_point_involution() {
        for bt in BoardType::ALL {
            let geo = Geometry::new(bt);
            for p in geo.points() {
                let q = geo.symmetric_point(p);
                assert!(!q.is_null());
                assert_eq!(geo.symmetric_point(q), p);
                if let GeometryKind::Trigon { .. } = geo.kind() {
                    assert_ne!(geo.point_type(p), geo.point_type(q));
                }
            }
        }
    }

    #[test]
    fn test_normalizing_shift_keeps_types() {
        for kind in [GeometryKind::Rect, GeometryKind::Trigon { edge: 9 }, GeometryKind::Nexos] {
            for (mx, my) in [(-3, -2), (-1, 0), (0, -1), (2, 5)] {
                let s = kind.normalizing_shift(mx, my);
                assert!(s.x <= mx && s.y <= my);
                let lattice = |x: i32, y: i32| match kind {
                    GeometryKind::Trigon { .. } => (x + y).rem_euclid(2) as u8,
                    _ => kind.point_type_at(x, y),
                };
                assert_eq!(lattice(mx, my), lattice(mx - s.x, my - s.y));
            }
        }
    }
}
