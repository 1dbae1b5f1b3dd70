use core::ops::BitOr;
use std::collections::{HashSet, VecDeque};

use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::generator::{MinePlacer, RandomPlacer};
use crate::tile::{Tile, TileValue};
use crate::types::{neighbors, total_tiles, Coord, Coord2, TileCount, ToNdIndex};

/// Validated board dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: TileCount,
}

impl BoardConfig {
    /// Deferred placement keeps the clicked tile and its 8 neighbors
    /// mine-free, so the board must have at least 9 tiles of headroom.
    pub fn new(width: Coord, height: Coord, mines: TileCount) -> Result<Self> {
        let total = total_tiles(width, height);
        if total <= 9 || mines > total - 9 {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self {
            width,
            height,
            mines,
        })
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_tiles(&self) -> TileCount {
        total_tiles(self.width, self.height)
    }
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Terminal states only leave via [`Board::reset`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Result of a reveal action, after merging any cascade.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Exploded,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merge rule for multi-tile reveals: an explosion outranks a win outranks
/// a plain reveal.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (Exploded, _) | (_, Exploded) => Exploded,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Result of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Placed,
    Removed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// The new flag state, if the toggle changed anything.
    pub const fn placed(self) -> Option<bool> {
        match self {
            Self::Placed => Some(true),
            Self::Removed => Some(false),
            Self::NoChange => None,
        }
    }
}

/// Everything a caller needs after a reveal: the merged outcome plus every
/// tile this call transitioned to revealed, with its adjacent-mine count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub opened: Vec<(Coord2, u8)>,
}

impl RevealReport {
    fn none() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            opened: Vec::new(),
        }
    }
}

/// Result of releasing the chord gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChordOutcome {
    /// Flagged-neighbor count matched the tile's count; neighbors were
    /// revealed.
    Performed(RevealReport),
    /// Mismatch (or finished game): the gesture degraded to an unchord and
    /// nothing was revealed.
    Cancelled,
}

/// The playing field: a 2D grid of [`Tile`]s with deferred first-click-safe
/// mine placement, flood-fill reveal, flag and chord handling, and win/loss
/// tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    tiles: Array2<Tile>,
    generated: bool,
    flags_placed: TileCount,
    outcome: Outcome,
    seed: u64,
}

impl Board {
    /// Entropy-seeded board; mines are placed on the first reveal.
    pub fn new(width: Coord, height: Coord, mines: TileCount) -> Result<Self> {
        let config = BoardConfig::new(width, height, mines)?;
        Ok(Self::from_config(config, rand::rng().random()))
    }

    /// Board with a fixed placement seed, for reproducible layouts.
    pub fn with_seed(width: Coord, height: Coord, mines: TileCount, seed: u64) -> Result<Self> {
        let config = BoardConfig::new(width, height, mines)?;
        Ok(Self::from_config(config, seed))
    }

    /// Pre-generated board with mines at the given coordinates.
    ///
    /// No deferred placement happens, so the first-click headroom rule does
    /// not apply; only bounds are validated.
    pub fn with_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidConfiguration);
        }

        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &pos in mine_coords {
            if pos.0 >= size.0 || pos.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mask[pos.to_nd_index()] = true;
        }

        let mines = mask.iter().filter(|&&m| m).count() as TileCount;
        let config = BoardConfig {
            width: size.0,
            height: size.1,
            mines,
        };
        let mut board = Self::from_config(config, 0);
        board.assign_values(&mask);
        board.generated = true;
        Ok(board)
    }

    fn from_config(config: BoardConfig, seed: u64) -> Self {
        Self {
            tiles: Array2::default(config.size().to_nd_index()),
            config,
            generated: false,
            flags_placed: 0,
            outcome: Outcome::InProgress,
            seed,
        }
    }

    /// Starts a new game with the same configuration. The next layout seed
    /// is derived from the current one, so seeded boards stay reproducible
    /// across resets.
    pub fn reset(&mut self) {
        self.seed = SmallRng::seed_from_u64(self.seed).random();
        self.tiles = Array2::default(self.config.size().to_nd_index());
        self.generated = false;
        self.flags_placed = 0;
        self.outcome = Outcome::InProgress;
        log::debug!("board reset");
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// False until the first reveal triggers mine placement.
    pub fn generated(&self) -> bool {
        self.generated
    }

    pub fn mine_count(&self) -> TileCount {
        self.config.mines
    }

    pub fn flags_placed(&self) -> TileCount {
        self.flags_placed
    }

    /// Mines minus flags, for the sidebar counter. Goes negative when the
    /// player over-flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flags_placed)
    }

    pub fn tile_at(&self, pos: Coord2) -> Result<Tile> {
        let pos = self.validate(pos)?;
        Ok(self.tiles[pos.to_nd_index()])
    }

    /// All tiles with their positions, for whole-board rendering.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.tiles
            .indexed_iter()
            .map(|((x, y), &tile)| ((x as Coord, y as Coord), tile))
    }

    /// Reveals a tile, expanding zero-count regions by flood fill.
    ///
    /// Silent no-op when the tile is flagged or already revealed, or when
    /// the game is over. The first reveal places the mines, keeping this
    /// tile and its neighbors clear.
    pub fn reveal(&mut self, pos: Coord2) -> Result<RevealReport> {
        let pos = self.validate(pos)?;

        let tile = self.tiles[pos.to_nd_index()];
        if self.outcome.is_over() || tile.flagged || tile.revealed {
            return Ok(RevealReport::none());
        }

        if !self.generated {
            self.generate(pos);
        }

        let mut opened = Vec::new();
        let outcome = self.reveal_tile(pos, &mut opened);
        Ok(RevealReport { outcome, opened })
    }

    /// Toggles the flag on a closed tile. Silent no-op on revealed tiles
    /// and finished games. Flags may exceed the mine count.
    pub fn flag(&mut self, pos: Coord2) -> Result<FlagOutcome> {
        let pos = self.validate(pos)?;

        if self.outcome.is_over() || self.tiles[pos.to_nd_index()].revealed {
            return Ok(FlagOutcome::NoChange);
        }

        let tile = &mut self.tiles[pos.to_nd_index()];
        tile.flagged = !tile.flagged;
        Ok(if tile.flagged {
            self.flags_placed += 1;
            FlagOutcome::Placed
        } else {
            self.flags_placed -= 1;
            FlagOutcome::Removed
        })
    }

    /// Paints the pressed look on every closed, unflagged neighbor of `pos`.
    /// Purely visual; cleared by [`Board::unchord`] or by revealing.
    pub fn chord(&mut self, pos: Coord2) -> Result<()> {
        let pos = self.validate(pos)?;
        if self.outcome.is_over() {
            return Ok(());
        }

        for n in neighbors(pos, self.size()) {
            let tile = &mut self.tiles[n.to_nd_index()];
            if !tile.revealed && !tile.flagged {
                tile.held = true;
            }
        }
        Ok(())
    }

    /// Clears the pressed look around `pos`, cancelling the gesture.
    pub fn unchord(&mut self, pos: Coord2) -> Result<()> {
        let pos = self.validate(pos)?;
        for n in neighbors(pos, self.size()) {
            self.tiles[n.to_nd_index()].held = false;
        }
        Ok(())
    }

    /// Releases the chord gesture on `pos`.
    ///
    /// When the flagged-neighbor count equals the tile's own count (and that
    /// count is positive), every closed unflagged neighbor is revealed in
    /// turn; an explosion does not stop the sweep. On a mismatch the call
    /// degrades to [`Board::unchord`].
    pub fn chord_reveal(&mut self, pos: Coord2) -> Result<ChordOutcome> {
        let pos = self.validate(pos)?;
        if self.outcome.is_over() {
            return Ok(ChordOutcome::Cancelled);
        }

        let flagged = neighbors(pos, self.size())
            .filter(|&n| self.tiles[n.to_nd_index()].flagged)
            .count() as u8;
        let matched = match self.tiles[pos.to_nd_index()].value {
            TileValue::Count(count) => count > 0 && count == flagged,
            _ => false,
        };

        if !matched {
            self.unchord(pos)?;
            return Ok(ChordOutcome::Cancelled);
        }

        let mut opened = Vec::new();
        let mut outcome = RevealOutcome::NoChange;
        for n in neighbors(pos, self.size()) {
            self.tiles[n.to_nd_index()].held = false;
            outcome = outcome | self.reveal_tile(n, &mut opened);
        }
        Ok(ChordOutcome::Performed(RevealReport { outcome, opened }))
    }

    fn validate(&self, pos: Coord2) -> Result<Coord2> {
        if pos.0 < self.config.width && pos.1 < self.config.height {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// One-time mine placement, triggered by the first reveal. Values are
    /// assigned in place, so flags placed before the first click stay put.
    fn generate(&mut self, clicked: Coord2) {
        let mask = RandomPlacer::new(self.seed).place(self.size(), self.config.mines, clicked);
        self.assign_values(&mask);
        self.generated = true;
        log::debug!(
            "generated {}x{} board with {} mines, first click {:?}",
            self.config.width,
            self.config.height,
            self.config.mines,
            clicked
        );
    }

    fn assign_values(&mut self, mask: &Array2<bool>) {
        let size = self.size();
        for x in 0..size.0 {
            for y in 0..size.1 {
                let pos = (x, y);
                let value = if mask[pos.to_nd_index()] {
                    TileValue::Mine
                } else {
                    let count = neighbors(pos, size)
                        .filter(|&n| mask[n.to_nd_index()])
                        .count() as u8;
                    TileValue::Count(count)
                };
                self.tiles[pos.to_nd_index()].value = value;
            }
        }
    }

    /// Reveals a single tile, cascading on zeros and sweeping the board on
    /// an explosion. No terminal-state gate here: a chord sweep keeps
    /// revealing the remaining neighbors after one of them explodes.
    fn reveal_tile(&mut self, pos: Coord2, opened: &mut Vec<(Coord2, u8)>) -> RevealOutcome {
        let tile = self.tiles[pos.to_nd_index()];
        if tile.flagged || tile.revealed {
            return RevealOutcome::NoChange;
        }

        match tile.value {
            TileValue::Mine => {
                self.explode(pos);
                RevealOutcome::Exploded
            }
            TileValue::Count(count) => {
                self.open(pos, count, opened);
                if count == 0 {
                    self.flood_fill(pos, opened);
                }

                if self.outcome == Outcome::InProgress
                    && self.unrevealed_count() == self.config.mines
                {
                    self.outcome = Outcome::Won;
                    log::debug!("all safe tiles revealed, game won");
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
            // Unknown exists only before generation, the terminal variants
            // only after a loss; neither reaches this path.
            _ => RevealOutcome::NoChange,
        }
    }

    fn open(&mut self, pos: Coord2, count: u8, opened: &mut Vec<(Coord2, u8)>) {
        let tile = &mut self.tiles[pos.to_nd_index()];
        tile.revealed = true;
        tile.held = false;
        opened.push((pos, count));
        log::trace!("opened {:?}, adjacent mines: {}", pos, count);
    }

    /// Worklist expansion of a zero-count region: reveals every connected
    /// zero tile plus the non-zero border. Mines and flagged tiles are
    /// never auto-revealed.
    fn flood_fill(&mut self, start: Coord2, opened: &mut Vec<(Coord2, u8)>) {
        let size = self.size();
        let mut visited = HashSet::from([start]);
        let mut to_visit: VecDeque<Coord2> = neighbors(start, size)
            .filter(|&pos| !self.tiles[pos.to_nd_index()].revealed)
            .collect();

        while let Some(pos) = to_visit.pop_front() {
            if !visited.insert(pos) {
                continue;
            }

            let tile = self.tiles[pos.to_nd_index()];
            if tile.revealed || tile.flagged {
                continue;
            }

            let TileValue::Count(count) = tile.value else {
                continue;
            };

            self.open(pos, count, opened);

            if count == 0 {
                to_visit.extend(
                    neighbors(pos, size)
                        .filter(|&next| !self.tiles[next.to_nd_index()].revealed)
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
    }

    /// Loss sweep: every mine is revealed, flags sitting on safe tiles are
    /// marked as wrong (they stay flagged and closed), and the hit tile
    /// becomes the exploded mine.
    fn explode(&mut self, hit: Coord2) {
        for tile in self.tiles.iter_mut() {
            match tile.value {
                TileValue::Mine => {
                    tile.revealed = true;
                    tile.held = false;
                }
                TileValue::Count(_) if tile.flagged => {
                    tile.value = TileValue::MismarkedMine;
                }
                _ => {}
            }
        }

        let tile = &mut self.tiles[hit.to_nd_index()];
        tile.value = TileValue::ExplodedMine;
        tile.revealed = true;

        if self.outcome == Outcome::InProgress {
            self.outcome = Outcome::Lost;
            log::debug!("mine hit at {:?}, game lost", hit);
        }
    }

    /// Win check, evaluated rather than maintained incrementally: the game
    /// is won when only the mines remain unrevealed.
    fn unrevealed_count(&self) -> TileCount {
        self.tiles.iter().filter(|tile| tile.is_closed()).count() as TileCount
    }
}
