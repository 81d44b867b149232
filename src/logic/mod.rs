//! Club business logic: standings, the standings board, CSV export.

mod board;
mod export;
mod standings;

pub use board::StandingsBoard;
pub use export::{history_csv, standings_csv, ExportError};
pub use standings::{compute_standings, compute_standings_with};
