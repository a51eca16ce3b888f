//! # Tournament Engine
//!
//! Pairings, result recording and standings for multi-round competitions.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, formats, summaries)
//! - **pairing**: Round pairing strategies (Swiss, Round Robin, Single Elimination, League)
//! - **calculate**: Match points and tiebreaker computation
//! - **tournament**: The orchestrator and its lifecycle state machine
//! - **config**: Configuration loading and validation
//! - **storage**: JSON state and export files for the CLI
//!
//! ## Example
//!
//! ```
//! use tournament_engine::{Format, Tournament, TournamentConfig};
//!
//! let config = TournamentConfig::new("Friday Swiss", Format::Swiss)
//!     .with_rounds(3)
//!     .with_seed(7);
//! let mut tournament = Tournament::new(config).unwrap();
//! for name in ["Ann", "Ben", "Cat", "Dan"] {
//!     tournament.register(name, None).unwrap();
//! }
//! tournament.start().unwrap();
//! assert_eq!(tournament.pending_matches().len(), 2);
//! ```

pub mod calculate;
pub mod config;
pub mod models;
pub mod pairing;
pub mod storage;
pub mod tournament;

pub use config::TournamentConfig;
pub use models::*;
pub use tournament::{
    ErrorKind, RoundOutcome, SharedTournament, Tournament, TournamentError,
};

/// Parse a `won,lost` games pair such as `2,1`.
pub fn parse_games(s: &str) -> Option<[u32; 2]> {
    let (a, b) = s.trim().split_once(',')?;
    Some([a.trim().parse().ok()?, b.trim().parse().ok()?])
}
