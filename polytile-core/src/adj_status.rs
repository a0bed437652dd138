//! Adjacency-status table: per point, which neighbor points a status
//! bitmask marks as blocked.
//!
//! Each point has up to `ADJ_STATUS_NU_ADJ` neighbor slots (edge neighbors
//! first, then corner neighbors, truncated). Bit `i` of a status means slot
//! `i` is blocked. Bits without a real slot behind them are ignored, so every
//! status value is valid for every point.

use crate::geometry::{Geometry, Point};

/// Number of neighbor slots per point.
pub const ADJ_STATUS_NU_ADJ: usize = 6;

/// Number of distinct status values.
pub const NU_ADJ_STATUS: usize = 1 << ADJ_STATUS_NU_ADJ;

/// Bitmask over a point's neighbor slots.
pub type AdjStatus = u8;

/// A short fixed-capacity list of points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjList {
    points: [Point; ADJ_STATUS_NU_ADJ],
    len: u8,
}

impl AdjList {
    pub const fn new() -> AdjList {
        AdjList {
            points: [Point::NULL; ADJ_STATUS_NU_ADJ],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, p: Point) {
        debug_assert!((self.len as usize) < ADJ_STATUS_NU_ADJ);
        self.points[self.len as usize] = p;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Point] {
        &self.points[..self.len as usize]
    }

    /// All slots including the NULL padding.
    #[inline]
    pub fn padded(&self) -> &[Point; ADJ_STATUS_NU_ADJ] {
        &self.points
    }
}

impl Default for AdjList {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot lists and blocked-point lists for every point of a geometry.
#[derive(Debug)]
pub struct AdjStatusTable {
    slots: Vec<AdjList>,
    /// Indexed by `point * NU_ADJ_STATUS + status`.
    blocked: Vec<AdjList>,
}

impl AdjStatusTable {
    pub fn new(geo: &Geometry) -> AdjStatusTable {
        let nu_points = geo.nu_points();
        let mut slots = Vec::with_capacity(nu_points);
        let mut blocked = Vec::with_capacity(nu_points * NU_ADJ_STATUS);
        for p in geo.points() {
            let mut l = AdjList::new();
            for &q in geo.adj(p).iter().chain(geo.diag(p)) {
                if l.len() == ADJ_STATUS_NU_ADJ {
                    break;
                }
                l.push(q);
            }
            for status in 0..NU_ADJ_STATUS {
                let mut b = AdjList::new();
                for (i, &q) in l.as_slice().iter().enumerate() {
                    if status & (1 << i) != 0 {
                        b.push(q);
                    }
                }
                blocked.push(b);
            }
            slots.push(l);
        }
        AdjStatusTable { slots, blocked }
    }

    /// Neighbor slots of a point (without padding).
    #[inline]
    pub fn slots(&self, p: Point) -> &[Point] {
        self.slots[p.index()].as_slice()
    }

    /// Neighbor slots including the NULL padding.
    #[inline]
    pub fn padded_slots(&self, p: Point) -> &[Point; ADJ_STATUS_NU_ADJ] {
        self.slots[p.index()].padded()
    }

    /// Points a status marks as blocked around `p`.
    #[inline]
    pub fn blocked(&self, p: Point, status: AdjStatus) -> &[Point] {
        debug_assert!((status as usize) < NU_ADJ_STATUS, "adj status out of range");
        self.blocked[p.index() * NU_ADJ_STATUS + status as usize].as_slice()
    }

    /// Status with every real slot of `p` blocked.
    #[inline]
    pub fn all_blocked(&self, p: Point) -> AdjStatus {
        ((1u32 << self.slots[p.index()].len()) - 1) as AdjStatus
    }

    /// Compute the status of `p` from a blocked-point predicate.
    #[inline]
    pub fn status_of(&self, p: Point, mut is_blocked: impl FnMut(Point) -> bool) -> AdjStatus {
        let mut status = 0;
        for (i, &q) in self.slots(p).iter().enumerate() {
            if is_blocked(q) {
                status |= 1 << i;
            }
        }
        status
    }
}

/// Check if `status_new` can follow `status_old` in the same line of play
/// (blocked slots never become free again).
#[inline]
pub fn is_followup_adj_status(status_new: AdjStatus, status_old: AdjStatus) -> bool {
    status_new & status_old == status_old
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::BoardType;

    #[test]
    fn test_slot_order() {
        let geo = Geometry::new(BoardType::Classic);
        let table = AdjStatusTable::new(&geo);
        let p = geo.point(5, 5).unwrap();
        let slots = table.slots(p);
        assert_eq!(slots.len(), 6);
        assert_eq!(&slots[..4], geo.adj(p));
        assert_eq!(&slots[4..], &geo.diag(p)[..2]);
        let corner = geo.point(0, 0).unwrap();
        assert_eq!(table.slots(corner).len(), 3);
        assert!(table.padded_slots(corner)[3..].iter().all(|q| q.is_null()));
    }

    #[test]
    fn test_blocked_lists() {
        let geo = Geometry::new(BoardType::Trigon);
        let table = AdjStatusTable::new(&geo);
        for p in geo.points() {
            assert!(table.blocked(p, 0).is_empty());
            assert_eq!(table.blocked(p, table.all_blocked(p)), table.slots(p));
            assert_eq!(table.blocked(p, (NU_ADJ_STATUS - 1) as AdjStatus), table.slots(p));
            let slots = table.slots(p);
            if slots.len() >= 3 {
                assert_eq!(table.blocked(p, 0b101), &[slots[0], slots[2]]);
            }
        }
    }

    #[test]
    fn test_nexos_junction_has_no_slots() {
        let geo = Geometry::new(BoardType::Nexos);
        let table = AdjStatusTable::new(&geo);
        let junction = geo.point(2, 2).unwrap();
        assert!(table.slots(junction).is_empty());
        assert_eq!(table.all_blocked(junction), 0);
        let segment = geo.point(3, 2).unwrap();
        assert_eq!(table.slots(segment), geo.diag(segment));
    }

    #[test]
    fn test_status_of_and_followup() {
        let geo = Geometry::new(BoardType::Duo);
        let table = AdjStatusTable::new(&geo);
        let p = geo.point(3, 3).unwrap();
        let left = geo.point(2, 3).unwrap();
        let status = table.status_of(p, |q| q == left);
        assert_eq!(status, 0b10);
        assert!(is_followup_adj_status(0b11, status));
        assert!(is_followup_adj_status(status, status));
        assert!(!is_followup_adj_status(0b01, status));
    }
}
