//! Minesweeper board engine.
//!
//! The engine owns the game rules and nothing else: deferred
//! first-click-safe mine placement, neighbor counting, flood-fill reveal,
//! flag state, chord gestures, and win/loss tracking. A presentation layer
//! feeds it input intents and re-renders from the tile state it exposes; a
//! [`StatsSink`] receives fire-and-forget event notifications. No file,
//! network, or timing state lives here.

pub use board::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use stats::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod generator;
mod session;
mod stats;
mod tile;
mod types;
