//! Precomputed placement tables for Blokus-style games on square, triangle
//! and segment boards, plus an incremental per-color index of legal moves.
//!
//! # Layers
//!
//! ```text
//! Geometry ─┬─ AdjStatusTable            shared per board type
//!           └─ PieceCatalog ── BoardConst  one per (board type, piece set)
//!                                │
//!                                └─ PrecompMoves   (point, status, piece) -> [Move]
//!                                      │
//!              PositionView ── LegalMoveIndex      per color, per line of play
//! ```
//!
//! # Adjacency status
//!
//! Each point has up to `ADJ_STATUS_NU_ADJ` neighbor slots (edge neighbors
//! first, then corner neighbors). A status is a bitmask over these slots; bit
//! `i` set means slot `i` is forbidden for the color. The static tables list a
//! move under (p, s) only if it occupies none of the slots `s` blocks, so a
//! single lookup with the live status of an attach point yields candidate
//! moves that already avoid its forbidden neighborhood.
//!
//! # Move ids
//!
//! Moves are dense `u16` ids starting at 1; 0 is the null move. Creation order
//! is piece, then anchor point, then unique transform.

pub mod adj_status;
pub mod board_const;
pub mod considered;
pub mod error;
pub mod geometry;
pub mod legal_index;
pub mod move_info;
pub mod piece;
pub mod position;
pub mod precomp;
pub mod registry;
pub mod transform;
pub mod variant;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use adj_status::{AdjStatus, AdjStatusTable, ADJ_STATUS_NU_ADJ, NU_ADJ_STATUS};
pub use board_const::{BoardConst, MoveRecord, TableSummary};
pub use considered::{pieces_considered, PieceConsideredCache};
pub use error::MoveTextError;
pub use geometry::{Geometry, Point};
pub use legal_index::LegalMoveIndex;
pub use move_info::{Move, MoveInfo};
pub use piece::{Piece, PieceCatalog, PieceInfo, PieceMask};
pub use position::{Position, PositionView};
pub use precomp::PrecompMoves;
pub use registry::Registry;
pub use transform::Transform;
pub use variant::{BoardType, Color, PieceSet, Variant};
