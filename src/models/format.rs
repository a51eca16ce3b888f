//! Competition formats and tournament lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Competition format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Format {
    SingleElimination,
    /// Reserved; no pairing strategy exists for it.
    DoubleElimination,
    Swiss,
    RoundRobin,
    League,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::SingleElimination,
        Format::DoubleElimination,
        Format::Swiss,
        Format::RoundRobin,
        Format::League,
    ];

    /// The wire tag, e.g. `SWISS`.
    pub fn tag(&self) -> &'static str {
        match self {
            Format::SingleElimination => "SINGLE_ELIMINATION",
            Format::DoubleElimination => "DOUBLE_ELIMINATION",
            Format::Swiss => "SWISS",
            Format::RoundRobin => "ROUND_ROBIN",
            Format::League => "LEAGUE",
        }
    }

    /// Number of rounds used when none is configured.
    pub fn default_rounds(&self, players: usize) -> u32 {
        let players = players.max(2) as u32;
        match self {
            Format::RoundRobin => {
                if players % 2 == 0 {
                    players - 1
                } else {
                    players
                }
            }
            _ => players.next_power_of_two().trailing_zeros(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Format::ALL
            .into_iter()
            .find(|format| format.tag() == normalized)
            .ok_or_else(|| format!("Unknown format: {}", s))
    }
}

/// Lifecycle state: `NotStarted -> InProgress -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentStatus::NotStarted => write!(f, "not started"),
            TournamentStatus::InProgress => write!(f, "in progress"),
            TournamentStatus::Finished => write!(f, "finished"),
        }
    }
}
