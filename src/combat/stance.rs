//! Stances and the clash outcome matrix
//!
//! Each side commits one stance in secret every turn; the matrix decides
//! the clash. The relation over distinct stances is a complete tournament:
//! every ordered pair has exactly one winner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five stances a side can commit for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    /// Close in and seize the opponent
    Grab,
    /// Clamp a standing hold
    Hold,
    /// Slip around the opponent's action
    Sidestep,
    /// Read an incoming hold and turn it back
    HoldCounter,
    /// Plant and cover up
    Guard,
}

impl Stance {
    /// Every stance, in presentation order
    pub const ALL: [Stance; 5] = [
        Stance::Grab,
        Stance::Hold,
        Stance::Sidestep,
        Stance::HoldCounter,
        Stance::Guard,
    ];
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stance::Grab => "Grab",
            Stance::Hold => "Hold",
            Stance::Sidestep => "Sidestep",
            Stance::HoldCounter => "Hold Counter",
            Stance::Guard => "Guard",
        };
        write!(f, "{}", name)
    }
}

/// Result of a clash, from the first stance's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClashOutcome {
    Win,
    Lose,
    Tie,
}

/// Resolve a clash between two committed stances
///
/// Equal stances tie. Distinct stances always produce a winner; the final
/// Tie arm doubles as a guard rail for pairs the table might miss, and a
/// test proves it is only reached for equal stances.
pub fn clash(a: Stance, b: Stance) -> ClashOutcome {
    use ClashOutcome::*;
    use Stance::*;

    match (a, b) {
        (Grab, Guard) | (Grab, HoldCounter) => Win,
        (Hold, Grab) | (Hold, Guard) => Win,
        (Sidestep, Grab) | (Sidestep, Hold) | (Sidestep, HoldCounter) => Win,
        (HoldCounter, Hold) => Win,
        (Guard, Sidestep) | (Guard, HoldCounter) => Win,

        (Grab, Hold) | (Grab, Sidestep) => Lose,
        (Hold, Sidestep) | (Hold, HoldCounter) => Lose,
        (Sidestep, Guard) => Lose,
        (HoldCounter, Grab) | (HoldCounter, Sidestep) | (HoldCounter, Guard) => Lose,
        (Guard, Grab) | (Guard, Hold) => Lose,

        _ => Tie,
    }
}
