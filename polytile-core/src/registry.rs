//! Lazily built, process-lifetime move tables.
//!
//! One slot per (board type, piece set); each is built at most once, even
//! under concurrent first requests, and read without locking afterwards. The
//! geometry and adjacency-status table of a board type are built once and
//! shared by all piece sets played on it.

use std::sync::{Arc, OnceLock};

use crate::adj_status::AdjStatusTable;
use crate::board_const::BoardConst;
use crate::geometry::Geometry;
use crate::variant::{BoardType, PieceSet, Variant};

type SharedGeometry = (Arc<Geometry>, Arc<AdjStatusTable>);

const NU_BOARD_TYPES: usize = BoardType::ALL.len();
const NU_PIECE_SETS: usize = PieceSet::ALL.len();

#[derive(Debug)]
pub struct Registry {
    geometries: [OnceLock<SharedGeometry>; NU_BOARD_TYPES],
    tables: [[OnceLock<Arc<BoardConst>>; NU_PIECE_SETS]; NU_BOARD_TYPES],
}

impl Registry {
    pub const fn new() -> Registry {
        #[allow(clippy::declare_interior_mutable_const)]
        const GEO: OnceLock<SharedGeometry> = OnceLock::new();
        #[allow(clippy::declare_interior_mutable_const)]
        const TABLE: OnceLock<Arc<BoardConst>> = OnceLock::new();
        #[allow(clippy::declare_interior_mutable_const)]
        const ROW: [OnceLock<Arc<BoardConst>>; NU_PIECE_SETS] = [TABLE; NU_PIECE_SETS];
        Registry {
            geometries: [GEO; NU_BOARD_TYPES],
            tables: [ROW; NU_BOARD_TYPES],
        }
    }

    /// Geometry and adjacency-status table of a board type.
    pub fn geometry(&self, board_type: BoardType) -> &SharedGeometry {
        self.geometries[board_type.index()].get_or_init(|| {
            let geo = Arc::new(Geometry::new(board_type));
            let adj_status = Arc::new(AdjStatusTable::new(&geo));
            (geo, adj_status)
        })
    }

    /// Move tables for a board type and piece set. Panics if the piece set
    /// cannot be played on the board.
    pub fn get(&self, board_type: BoardType, piece_set: PieceSet) -> &Arc<BoardConst> {
        assert!(
            piece_set.fits(board_type),
            "piece set {:?} cannot be played on {:?}",
            piece_set,
            board_type
        );
        self.tables[board_type.index()][piece_set.index()].get_or_init(|| {
            let (geo, adj_status) = self.geometry(board_type);
            Arc::new(BoardConst::with_geometry(
                board_type,
                piece_set,
                Arc::clone(geo),
                Arc::clone(adj_status),
            ))
        })
    }

    /// Move tables of a variant.
    pub fn for_variant(&self, variant: Variant) -> &Arc<BoardConst> {
        self.get(variant.board_type(), variant.piece_set())
    }

    /// Check whether the tables for a pair have been built already.
    pub fn is_built(&self, board_type: BoardType, piece_set: PieceSet) -> bool {
        self.tables[board_type.index()][piece_set.index()].get().is_some()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_instance() {
        let registry = Registry::new();
        assert!(!registry.is_built(BoardType::Duo, PieceSet::Junior));
        let a = Arc::clone(registry.for_variant(Variant::Junior));
        let b = Arc::clone(registry.get(BoardType::Duo, PieceSet::Junior));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(registry.is_built(BoardType::Duo, PieceSet::Junior));
        assert!(!registry.is_built(BoardType::Duo, PieceSet::Classic));
    }

    #[test]
    fn test_geometry_shared_between_piece_sets() {
        let registry = Registry::new();
        let junior = registry.for_variant(Variant::Junior);
        let duo = registry.for_variant(Variant::Duo);
        let (geo_a, adj_a) = junior.shared_geometry();
        let (geo_b, adj_b) = duo.shared_geometry();
        assert!(Arc::ptr_eq(&geo_a, &geo_b));
        assert!(Arc::ptr_eq(&adj_a, &adj_b));
    }

    #[test]
    fn test_concurrent_first_build() {
        let registry = Registry::new();
        let ptrs: Vec<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| Arc::as_ptr(registry.for_variant(Variant::Junior)) as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    #[should_panic(expected = "cannot be played")]
    fn test_incompatible_pair_panics() {
        Registry::new().get(BoardType::Classic, PieceSet::Trigon);
    }
}
