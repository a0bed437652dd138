//! Game variants, board types and piece sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of colors in any variant.
pub const MAX_COLORS: usize = 4;

/// A color (one piece inventory on the board). Players may own several colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Color(pub u8);

impl Color {
    /// Index for per-color arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over the first `nu_colors` colors.
    pub fn all(nu_colors: usize) -> impl Iterator<Item = Color> {
        debug_assert!(nu_colors <= MAX_COLORS);
        (0..nu_colors as u8).map(Color)
    }
}

/// Board geometry. Several variants can share one board type.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum BoardType {
    /// 20x20 squares.
    Classic,
    /// 14x14 squares.
    Duo,
    /// Hexagon of triangles with edge length 9.
    Trigon,
    /// Hexagon of triangles with edge length 8.
    Trigon3,
    /// Segment grid with junctions.
    Nexos,
}

impl BoardType {
    pub const ALL: [BoardType; 5] = [
        BoardType::Classic,
        BoardType::Duo,
        BoardType::Trigon,
        BoardType::Trigon3,
        BoardType::Nexos,
    ];

    /// Dense index for per-board-type tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the board is point-symmetric and played by two sides in a
    /// way that makes symmetric replies a drawing strategy.
    pub const fn has_symmetry_info(self) -> bool {
        matches!(self, BoardType::Duo | BoardType::Trigon)
    }
}

/// Catalog of piece shapes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum PieceSet {
    Classic,
    Junior,
    Trigon,
    Nexos,
}

impl PieceSet {
    pub const ALL: [PieceSet; 4] = [
        PieceSet::Classic,
        PieceSet::Junior,
        PieceSet::Trigon,
        PieceSet::Nexos,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Number of distinct shapes the catalog must contain.
    pub const fn expected_size(self) -> usize {
        match self {
            PieceSet::Classic => 21,
            PieceSet::Junior => 12,
            PieceSet::Trigon => 22,
            PieceSet::Nexos => 24,
        }
    }

    /// Number of copies of each shape a color starts with.
    pub const fn nu_instances(self) -> u8 {
        match self {
            PieceSet::Junior => 2,
            _ => 1,
        }
    }

    /// Check whether a piece set can be played on a board type.
    pub const fn fits(self, board_type: BoardType) -> bool {
        matches!(
            (board_type, self),
            (BoardType::Classic, PieceSet::Classic)
                | (BoardType::Duo, PieceSet::Classic)
                | (BoardType::Duo, PieceSet::Junior)
                | (BoardType::Trigon, PieceSet::Trigon)
                | (BoardType::Trigon3, PieceSet::Trigon)
                | (BoardType::Nexos, PieceSet::Nexos)
        )
    }
}

/// A playable game variant.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Variant {
    Classic,
    Classic2,
    Classic3,
    Duo,
    Junior,
    Trigon,
    Trigon2,
    Trigon3,
    Nexos,
    Nexos2,
}

impl Variant {
    pub const ALL: [Variant; 10] = [
        Variant::Classic,
        Variant::Classic2,
        Variant::Classic3,
        Variant::Duo,
        Variant::Junior,
        Variant::Trigon,
        Variant::Trigon2,
        Variant::Trigon3,
        Variant::Nexos,
        Variant::Nexos2,
    ];

    pub const fn board_type(self) -> BoardType {
        match self {
            Variant::Classic | Variant::Classic2 | Variant::Classic3 => BoardType::Classic,
            Variant::Duo | Variant::Junior => BoardType::Duo,
            Variant::Trigon | Variant::Trigon2 => BoardType::Trigon,
            Variant::Trigon3 => BoardType::Trigon3,
            Variant::Nexos | Variant::Nexos2 => BoardType::Nexos,
        }
    }

    pub const fn piece_set(self) -> PieceSet {
        match self {
            Variant::Classic | Variant::Classic2 | Variant::Classic3 | Variant::Duo => {
                PieceSet::Classic
            }
            Variant::Junior => PieceSet::Junior,
            Variant::Trigon | Variant::Trigon2 | Variant::Trigon3 => PieceSet::Trigon,
            Variant::Nexos | Variant::Nexos2 => PieceSet::Nexos,
        }
    }

    /// Number of colors on the board.
    pub const fn nu_colors(self) -> usize {
        match self {
            Variant::Duo | Variant::Junior => 2,
            Variant::Trigon3 => 3,
            _ => 4,
        }
    }

    /// Number of players. Two-player classic/trigon/nexos give each player
    /// two colors; three-player classic shares the fourth color.
    pub const fn nu_players(self) -> usize {
        match self {
            Variant::Classic | Variant::Trigon | Variant::Nexos => 4,
            Variant::Classic3 | Variant::Trigon3 => 3,
            _ => 2,
        }
    }

    /// Name as written in game records.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Classic2 => "classic_2",
            Variant::Classic3 => "classic_3",
            Variant::Duo => "duo",
            Variant::Junior => "junior",
            Variant::Trigon => "trigon",
            Variant::Trigon2 => "trigon_2",
            Variant::Trigon3 => "trigon_3",
            Variant::Nexos => "nexos",
            Variant::Nexos2 => "nexos_2",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unknown variant name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}
