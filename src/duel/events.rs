//! Turn-stamped duel events
//!
//! One event per log line or state change. The log is the stream a
//! rendering layer consumes; descriptions are ready-made narration built
//! from the combatants' display names.

use serde::{Deserialize, Serialize};

use crate::combat::combatant::Posture;
use crate::combat::stance::Stance;
use crate::core::types::{Side, Turn};

/// Log entry for duel events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelEvent {
    pub turn: Turn,
    pub kind: DuelEventKind,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DuelEventKind {
    MatchStarted,
    StanceCommitted { side: Side, stance: Stance },
    ClashTied { stance: Stance },
    ClashWon { winner: Side, winner_stance: Stance, loser_stance: Stance },
    CounterLocked { side: Side },
    TechniqueApplied { attacker: Side, technique: String, damage: u32 },
    FallbackStrike { attacker: Side, damage: u32 },
    HpChanged { side: Side, hp: i32 },
    PostureChanged { side: Side, posture: Posture },
    TraumaInflicted { side: Side, turns: u32 },
    FinisherStarted { attacker: Side },
    ChaseBroken { attacker: Side },
    MatchEnded { winner: Option<Side> },
}

/// Accumulated log of a match
#[derive(Debug, Clone, Default)]
pub struct DuelLog {
    pub events: Vec<DuelEvent>,
}

impl DuelLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: DuelEventKind, description: String, turn: Turn) {
        self.events.push(DuelEvent {
            turn,
            kind,
            description,
        });
    }
}
