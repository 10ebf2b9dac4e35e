//! Duel configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

/// Configuration for a duel
///
/// These values reproduce the reference tuning. Changing them will affect
/// pacing and how quickly matches resolve.
#[derive(Debug, Clone)]
pub struct DuelConfig {
    // === HIT POINTS ===
    /// Hit points both sides start the match with.
    pub starting_hp: i32,

    /// Lower bound of the hp domain. A side at or below this value is out
    /// of the match entirely. The interval (defeat_floor, 0] is "downed":
    /// the side no longer commits stances but keeps absorbing follow-up
    /// attacks until the floor is reached.
    pub defeat_floor: i32,

    /// Flat damage applied when a winning clash produces a cascade whose
    /// total damage is zero (missing table categories, missing combo parts).
    /// Guarantees every decisive clash costs the loser something, so a
    /// tableless match still reaches the defeat floor.
    pub fallback_damage: u32,

    // === STATUS ===
    /// Turns of Hold lockout inflicted on the loser of a counter-hold.
    /// Ticks down once at the top of every turn, so the loser misses
    /// Hold on the next two decision points.
    pub trauma_turns: u32,

    // === SCRIPTED TIERS ===
    /// Probability that the weak cpu tier deliberately throws the clash
    /// when it can see the opponent's committed stance.
    pub weak_blunder_rate: f64,

    /// Success probability of each scripted chase attempt against a downed
    /// opponent, in attempt order. The ladder length caps the number of
    /// attempts; the final 0.0 entry makes the ladder self-terminating.
    pub chase_ladder: [f64; 4],

    // === PRESENTATION ===
    /// Milliseconds front-ends pause between printed events. Pure pacing;
    /// the engine itself never sleeps, and headless runs ignore it.
    pub step_delay_ms: u64,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            starting_hp: 100,
            defeat_floor: -100,
            fallback_damage: 10,
            trauma_turns: 3,
            weak_blunder_rate: 0.30,
            chase_ladder: [0.75, 0.50, 0.25, 0.0],
            step_delay_ms: 500,
        }
    }
}

impl DuelConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.starting_hp <= 0 {
            return Err(format!("starting_hp ({}) must be positive", self.starting_hp));
        }

        if self.defeat_floor >= 0 {
            return Err(format!("defeat_floor ({}) must be negative", self.defeat_floor));
        }

        if self.fallback_damage == 0 {
            return Err("fallback_damage must be positive or matches may never end".into());
        }

        if !(0.0..=1.0).contains(&self.weak_blunder_rate) {
            return Err(format!(
                "weak_blunder_rate ({}) must be a probability",
                self.weak_blunder_rate
            ));
        }

        for (i, p) in self.chase_ladder.iter().enumerate() {
            if !(0.0..=1.0).contains(p) {
                return Err(format!("chase_ladder[{}] ({}) must be a probability", i, p));
            }
        }

        Ok(())
    }
}
