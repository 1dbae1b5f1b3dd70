use serde::{Deserialize, Serialize};

/// Closed set of values a tile can hold.
///
/// `Unknown` only exists before mine placement; `ExplodedMine` and
/// `MismarkedMine` are display-only states assigned by the loss sweep.
/// During active play a tile is always `Mine` or `Count`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileValue {
    #[default]
    Unknown,
    Count(u8),
    Mine,
    ExplodedMine,
    MismarkedMine,
}

impl TileValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine | Self::ExplodedMine)
    }

    /// Adjacent-mine count for safe tiles, `None` otherwise.
    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Count(n) => Some(n),
            _ => None,
        }
    }
}

/// Smallest unit of board state: a value plus the per-tile flags the
/// rendering layer draws from. `held` is the transient pressed look used
/// while a chord gesture is in flight; it never affects game logic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub value: TileValue,
    pub revealed: bool,
    pub flagged: bool,
    pub held: bool,
}

impl Tile {
    /// Whether the tile still counts as closed for the win check.
    pub const fn is_closed(self) -> bool {
        !self.revealed
    }
}
