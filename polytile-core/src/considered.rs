//! Which pieces a search looks at in the opening.
//!
//! Early in the game only large pieces are worth trying; the size limit
//! loosens every few plies until all pieces are considered. Masks depend only
//! on the board type, the number of colors and the number of pieces on the
//! board, so a `PieceConsideredCache` computes them once per line of play.

use crate::board_const::BoardConst;
use crate::piece::{Piece, PieceMask};
use crate::variant::BoardType;

fn filter_min_size(bc: &BoardConst, min_size: usize, mask: &mut PieceMask) {
    for piece in bc.catalog().pieces() {
        if bc.piece_info(piece).size() < min_size {
            mask.remove(piece);
        }
    }
}

fn set_considered(bc: &BoardConst, name: &str, mask: &mut PieceMask, is_considered: bool) {
    let piece = bc.piece_by_name(name);
    debug_assert!(piece.is_some(), "no piece named {}", name);
    if let Some(piece) = piece {
        if is_considered {
            mask.insert(piece);
        } else {
            mask.remove(piece);
        }
    }
}

/// Pieces considered when `nu_moves` pieces are already on the board.
pub fn pieces_considered(bc: &BoardConst, nu_colors: usize, nu_moves: usize) -> PieceMask {
    let nc = nu_colors;
    let mut mask = PieceMask::all(bc.nu_pieces());
    match bc.board_type() {
        BoardType::Duo => {
            if nu_moves < 2 * nc {
                filter_min_size(bc, 5, &mut mask);
            } else if nu_moves < 3 * nc {
                filter_min_size(bc, 4, &mut mask);
            } else if nu_moves < 5 * nc {
                filter_min_size(bc, 3, &mut mask);
            }
        }
        BoardType::Classic => {
            if nu_moves < nc {
                mask = PieceMask::default();
                set_considered(bc, "V5", &mut mask, true);
                set_considered(bc, "Z5", &mut mask, true);
            } else if nu_moves < 2 * nc {
                filter_min_size(bc, 5, &mut mask);
                for name in ["F", "P", "T5", "U", "X"] {
                    set_considered(bc, name, &mut mask, false);
                }
            } else if nu_moves < 3 * nc {
                filter_min_size(bc, 5, &mut mask);
                set_considered(bc, "P", &mut mask, false);
                set_considered(bc, "U", &mut mask, false);
            } else if nu_moves < 5 * nc {
                filter_min_size(bc, 4, &mut mask);
            } else if nu_moves < 7 * nc {
                filter_min_size(bc, 3, &mut mask);
            }
        }
        BoardType::Trigon | BoardType::Trigon3 => {
            if nu_moves < nc {
                mask = PieceMask::default();
                set_considered(bc, "V", &mut mask, true);
                set_considered(bc, "I6", &mut mask, true);
            }
            // Not an else branch: the size filter also applies to the
            // first ply.
            if nu_moves < 4 * nc {
                filter_min_size(bc, 6, &mut mask);
                set_considered(bc, "O", &mut mask, false);
            } else if nu_moves < 5 * nc {
                filter_min_size(bc, 5, &mut mask);
            } else if nu_moves < 7 * nc {
                filter_min_size(bc, 4, &mut mask);
            } else if nu_moves < 9 * nc {
                filter_min_size(bc, 3, &mut mask);
            }
        }
        BoardType::Nexos => {
            if nu_moves < 3 * nc {
                filter_min_size(bc, 4, &mut mask);
            } else if nu_moves < 5 * nc {
                filter_min_size(bc, 3, &mut mask);
            }
        }
    }
    mask
}

/// Masks for every ply of a game, with equal masks stored once.
#[derive(Clone, Debug)]
pub struct PieceConsideredCache {
    /// Distinct masks in order of first use.
    masks: Vec<PieceMask>,
    /// Index into `masks` per ply, up to the first all-considered ply.
    by_ply: Vec<usize>,
    min_move_all_considered: usize,
    all: PieceMask,
}

impl PieceConsideredCache {
    /// Compute the masks from the first ply on until every piece is
    /// considered.
    pub fn new(bc: &BoardConst, nu_colors: usize) -> PieceConsideredCache {
        let all = PieceMask::all(bc.nu_pieces());
        let max_game_moves = nu_colors * bc.nu_pieces() * bc.piece_set().nu_instances() as usize;
        let mut masks: Vec<PieceMask> = Vec::new();
        let mut by_ply = Vec::new();
        let mut min_move_all_considered = max_game_moves;
        for ply in 0..max_game_moves {
            let mask = pieces_considered(bc, nu_colors, ply);
            if mask == all {
                min_move_all_considered = ply;
                break;
            }
            let i = match masks.iter().position(|&m| m == mask) {
                Some(i) => i,
                None => {
                    masks.push(mask);
                    masks.len() - 1
                }
            };
            by_ply.push(i);
        }
        debug_assert_eq!(by_ply.len(), min_move_all_considered);
        PieceConsideredCache {
            masks,
            by_ply,
            min_move_all_considered,
            all,
        }
    }

    /// Mask for a ply.
    pub fn get(&self, ply: usize) -> PieceMask {
        match self.by_ply.get(ply) {
            Some(&i) if ply < self.min_move_all_considered => self.masks[i],
            _ => self.all,
        }
    }

    #[inline]
    pub fn is_considered(&self, ply: usize, piece: Piece) -> bool {
        self.get(ply).contains(piece)
    }

    /// First ply from which on every piece is considered.
    #[inline]
    pub fn min_move_all_considered(&self) -> usize {
        self.min_move_all_considered
    }

    /// Number of distinct masks stored.
    #[inline]
    pub fn nu_distinct(&self) -> usize {
        self.masks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::variant::Variant;

    static REGISTRY: Registry = Registry::new();

    fn names(bc: &BoardConst, mask: PieceMask) -> Vec<&'static str> {
        mask.iter().map(|p| bc.piece_info(p).name()).collect()
    }

    #[test]
    fn test_classic_opening() {
        let bc = REGISTRY.for_variant(Variant::Classic);
        let first = pieces_considered(bc, 4, 0);
        let mut got = names(bc, first);
        got.sort_unstable();
        assert_eq!(got, vec!["V5", "Z5"]);
        let second = pieces_considered(bc, 4, 4);
        assert!(!second.contains(bc.piece_by_name("X").unwrap()));
        assert!(second.contains(bc.piece_by_name("L5").unwrap()));
        assert!(!second.contains(bc.piece_by_name("T4").unwrap()));
        assert_eq!(pieces_considered(bc, 4, 28), PieceMask::all(21));
    }

    #[test]
    fn test_trigon_first_ply() {
        let bc = REGISTRY.for_variant(Variant::Trigon);
        let mut got = names(bc, pieces_considered(bc, 4, 0));
        got.sort_unstable();
        assert_eq!(got, vec!["I6", "V"]);
        let later = pieces_considered(bc, 4, 4);
        assert!(!later.contains(bc.piece_by_name("O").unwrap()));
        assert!(later.iter().all(|p| bc.piece_info(p).size() == 6));
    }

    #[test]
    fn test_cache() {
        let bc = REGISTRY.for_variant(Variant::Duo);
        let cache = PieceConsideredCache::new(bc, 2);
        assert_eq!(cache.min_move_all_considered(), 10);
        // Plies 0..4, 4..6 and 6..10 share masks.
        assert_eq!(cache.nu_distinct(), 3);
        assert_eq!(cache.get(0), cache.get(3));
        assert_ne!(cache.get(3), cache.get(4));
        assert_eq!(cache.get(10), PieceMask::all(bc.nu_pieces()));
        assert_eq!(cache.get(500), PieceMask::all(bc.nu_pieces()));
        for ply in 0..12 {
            assert_eq!(cache.get(ply), pieces_considered(bc, 2, ply));
        }
    }

    #[test]
    fn test_cache_every_ply_classic() {
        let bc = REGISTRY.for_variant(Variant::Classic);
        let cache = PieceConsideredCache::new(bc, 4);
        assert_eq!(cache.min_move_all_considered(), 28);
        for ply in [0, 9, 10, 27, 28, 40, 84, 1000] {
            assert_eq!(cache.get(ply), pieces_considered(bc, 4, ply), "ply {}", ply);
        }
        assert!(cache.is_considered(30, bc.piece_by_name("1").unwrap()));
        assert!(!cache.is_considered(10, bc.piece_by_name("1").unwrap()));
    }

    #[test]
    fn test_nexos_all_considered_early() {
        let bc = REGISTRY.for_variant(Variant::Nexos);
        let cache = PieceConsideredCache::new(bc, 4);
        assert_eq!(cache.min_move_all_considered(), 20);
    }
}
