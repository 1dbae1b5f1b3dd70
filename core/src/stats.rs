use serde::{Deserialize, Serialize};

/// Receives fire-and-forget notifications about game events.
///
/// Implementations only aggregate: nothing reported here feeds back into
/// game logic, and every hook defaults to a no-op.
pub trait StatsSink {
    /// A safe tile transitioned to revealed with `count` adjacent mines.
    /// Fires once per tile, cascade members included; mines uncovered by
    /// the loss sweep are not reported.
    fn on_tile_revealed(&mut self, count: u8) {
        let _ = count;
    }

    /// A flag was placed (`true`) or removed (`false`).
    fn on_flag_toggled(&mut self, placed: bool) {
        let _ = placed;
    }

    fn on_chord_performed(&mut self) {}

    fn on_game_won(&mut self) {}

    fn on_game_lost(&mut self) {}
}

/// Sink for callers that do not track statistics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NullStats;

impl StatsSink for NullStats {}

/// In-memory tally of gameplay counters across playthroughs. An outer
/// persistence layer can serialize this wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTally {
    pub tiles_revealed: u64,
    /// Reveals broken down by adjacent-mine count, indexed `0..=8`.
    pub reveals_by_count: [u64; 9],
    /// Placements only; removing a flag does not decrement.
    pub flags_placed: u64,
    pub times_chorded: u64,
    pub games_won: u64,
    pub games_lost: u64,
}

impl StatsSink for StatsTally {
    fn on_tile_revealed(&mut self, count: u8) {
        self.tiles_revealed += 1;
        if let Some(slot) = self.reveals_by_count.get_mut(usize::from(count)) {
            *slot += 1;
        }
    }

    fn on_flag_toggled(&mut self, placed: bool) {
        if placed {
            self.flags_placed += 1;
        }
    }

    fn on_chord_performed(&mut self) {
        self.times_chorded += 1;
    }

    fn on_game_won(&mut self) {
        self.games_won += 1;
    }

    fn on_game_lost(&mut self) {
        self.games_lost += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_removal_does_not_decrement() {
        let mut tally = StatsTally::default();
        tally.on_flag_toggled(true);
        tally.on_flag_toggled(false);
        assert_eq!(tally.flags_placed, 1);
    }

    #[test]
    fn tally_serializes_for_persistence() {
        let mut tally = StatsTally::default();
        tally.on_tile_revealed(0);
        tally.on_tile_revealed(3);
        tally.on_game_won();

        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(json["tiles_revealed"], 2);
        assert_eq!(json["reveals_by_count"][3], 1);
        assert_eq!(json["games_won"], 1);
    }
}
