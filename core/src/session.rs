use crate::board::{Board, ChordOutcome, FlagOutcome, Outcome, RevealOutcome, RevealReport};
use crate::error::Result;
use crate::stats::StatsSink;
use crate::types::Coord2;

/// Drives one playthrough of a [`Board`].
///
/// The session is what an input-handling layer talks to: it forwards
/// reveal/flag intents, tracks the press-and-hold chord gesture, and fans
/// board reports out to the statistics sink.
#[derive(Clone, Debug)]
pub struct GameSession<S> {
    board: Board,
    stats: S,
    chord_target: Option<Coord2>,
}

impl<S: StatsSink> GameSession<S> {
    pub fn new(board: Board, stats: S) -> Self {
        Self {
            board,
            stats,
            chord_target: None,
        }
    }

    /// Read access for rendering.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn into_parts(self) -> (Board, S) {
        (self.board, self.stats)
    }

    /// Whether the next reveal is the one that places the mines.
    pub fn is_first_click(&self) -> bool {
        !self.board.generated()
    }

    pub fn is_over(&self) -> bool {
        self.board.outcome().is_over()
    }

    pub fn has_won(&self) -> bool {
        self.board.outcome() == Outcome::Won
    }

    pub fn has_lost(&self) -> bool {
        self.board.outcome() == Outcome::Lost
    }

    pub fn reveal(&mut self, pos: Coord2) -> Result<RevealOutcome> {
        let report = self.board.reveal(pos)?;
        self.notify(&report);
        Ok(report.outcome)
    }

    pub fn flag(&mut self, pos: Coord2) -> Result<FlagOutcome> {
        let outcome = self.board.flag(pos)?;
        if let Some(placed) = outcome.placed() {
            self.stats.on_flag_toggled(placed);
        }
        Ok(outcome)
    }

    /// Starts (or moves) the chord gesture, painting the pressed look
    /// around `pos`.
    pub fn chord_start(&mut self, pos: Coord2) -> Result<()> {
        if let Some(prev) = self.chord_target.take() {
            self.board.unchord(prev)?;
        }
        self.board.chord(pos)?;
        self.chord_target = Some(pos);
        Ok(())
    }

    /// Cancels the gesture, e.g. when the pointer leaves the grid or one
    /// button is released early.
    pub fn chord_cancel(&mut self) -> Result<()> {
        if let Some(prev) = self.chord_target.take() {
            self.board.unchord(prev)?;
        }
        Ok(())
    }

    /// Releases the gesture, performing the chord reveal on its target.
    pub fn chord_release(&mut self) -> Result<RevealOutcome> {
        let Some(target) = self.chord_target.take() else {
            return Ok(RevealOutcome::NoChange);
        };

        match self.board.chord_reveal(target)? {
            ChordOutcome::Performed(report) => {
                self.stats.on_chord_performed();
                self.notify(&report);
                Ok(report.outcome)
            }
            ChordOutcome::Cancelled => Ok(RevealOutcome::NoChange),
        }
    }

    /// New game with the same configuration.
    pub fn reset(&mut self) {
        self.chord_target = None;
        self.board.reset();
    }

    fn notify(&mut self, report: &RevealReport) {
        for &(_, count) in &report.opened {
            self.stats.on_tile_revealed(count);
        }
        // Terminal outcomes only surface on the transition, so these fire
        // exactly once per game.
        match report.outcome {
            RevealOutcome::Won => self.stats.on_game_won(),
            RevealOutcome::Exploded => self.stats.on_game_lost(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsTally;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession<StatsTally> {
        let board = Board::with_mine_coords(size, mines).unwrap();
        GameSession::new(board, StatsTally::default())
    }

    #[test]
    fn first_click_tracking_mirrors_generation() {
        let board = Board::with_seed(6, 6, 5, 2).unwrap();
        let mut s = GameSession::new(board, StatsTally::default());
        assert!(s.is_first_click());
        s.reveal((3, 3)).unwrap();
        assert!(!s.is_first_click());
    }

    #[test]
    fn winning_cascade_reports_every_opened_tile() {
        // 3x3 with the mine in the corner: the far-corner reveal opens all
        // 8 safe tiles (five zeros, three ones) and wins.
        let mut s = session((3, 3), &[(0, 0)]);
        assert_eq!(s.reveal((2, 2)).unwrap(), RevealOutcome::Won);

        assert!(s.has_won());
        assert!(s.is_over());
        let tally = s.stats();
        assert_eq!(tally.tiles_revealed, 8);
        assert_eq!(tally.reveals_by_count[0], 5);
        assert_eq!(tally.reveals_by_count[1], 3);
        assert_eq!(tally.games_won, 1);
        assert_eq!(tally.games_lost, 0);
    }

    #[test]
    fn losing_counts_once_and_blocks_further_input() {
        let mut s = session((4, 3), &[(0, 0)]);
        assert_eq!(s.reveal((0, 0)).unwrap(), RevealOutcome::Exploded);
        assert!(s.has_lost());
        assert_eq!(s.stats().games_lost, 1);

        // Input after the loss is a silent no-op and counts nothing.
        assert_eq!(s.reveal((2, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(s.flag((2, 2)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(s.stats().games_lost, 1);
        assert_eq!(s.stats().tiles_revealed, 0);
    }

    #[test]
    fn flag_events_only_count_placements() {
        let mut s = session((4, 3), &[(0, 0)]);
        s.flag((1, 1)).unwrap();
        s.flag((1, 1)).unwrap();
        s.flag((2, 1)).unwrap();
        assert_eq!(s.stats().flags_placed, 2);
        assert_eq!(s.board().flags_placed(), 1);
    }

    #[test]
    fn chord_gesture_paints_then_reveals() {
        let mut s = session((3, 3), &[(0, 1), (2, 1)]);
        s.reveal((1, 1)).unwrap();
        s.flag((0, 1)).unwrap();
        s.flag((2, 1)).unwrap();

        s.chord_start((1, 1)).unwrap();
        assert!(s.board().tile_at((1, 0)).unwrap().held);

        assert_eq!(s.chord_release().unwrap(), RevealOutcome::Won);
        assert_eq!(s.stats().times_chorded, 1);
        assert!(s.has_won());
        assert!(s.board().iter_tiles().all(|(_, tile)| !tile.held));
    }

    #[test]
    fn cancelled_chord_leaves_no_trace() {
        let mut s = session((3, 3), &[(0, 1), (2, 1)]);
        s.reveal((1, 1)).unwrap();
        s.flag((0, 1)).unwrap(); // only one of two flags placed

        s.chord_start((1, 1)).unwrap();
        s.chord_cancel().unwrap();
        assert!(s.board().iter_tiles().all(|(_, tile)| !tile.held));

        // Releasing with mismatched flags degrades to an unchord.
        s.chord_start((1, 1)).unwrap();
        assert_eq!(s.chord_release().unwrap(), RevealOutcome::NoChange);
        assert_eq!(s.stats().times_chorded, 0);
        assert!(!s.board().tile_at((1, 0)).unwrap().revealed);
    }

    #[test]
    fn moving_the_gesture_repaints_the_new_target() {
        let mut s = session((4, 4), &[(0, 0)]);
        s.chord_start((1, 1)).unwrap();
        s.chord_start((2, 2)).unwrap();

        // (0, 0) neighbors (1, 1) but not (2, 2).
        assert!(!s.board().tile_at((0, 0)).unwrap().held);
        assert!(s.board().tile_at((3, 3)).unwrap().held);
    }

    #[test]
    fn reset_starts_a_fresh_game_keeping_the_tally() {
        let mut s = session((4, 3), &[(0, 0)]);
        s.reveal((0, 0)).unwrap();
        assert!(s.has_lost());

        s.reset();
        assert!(!s.is_over());
        assert!(s.is_first_click());
        // Lifetime statistics survive the reset.
        assert_eq!(s.stats().games_lost, 1);
    }
}
