//! Per-side combatant state
//!
//! The duel engine owns both combatants and is the only writer; front-ends
//! observe them through events and read-only accessors.

use serde::{Deserialize, Serialize};

use crate::combat::stance::Stance;
use crate::core::config::DuelConfig;
use crate::policy::ControlPolicy;

/// Standing or knocked-down state
///
/// A grounded posture unlocks the follow-up attack phase and selects which
/// ground techniques are legal against this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    #[default]
    Standing,
    /// On the ground, face up
    Supine,
    /// On the ground, face down
    Prone,
}

impl Posture {
    pub fn grounded(&self) -> bool {
        !matches!(self, Posture::Standing)
    }
}

/// Mutable per-side record, owned by the duel engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    /// Display identity used in narration
    pub name: String,
    pub hp: i32,
    /// Committed choice for the current turn, cleared at turn end
    pub stance: Option<Stance>,
    /// Previous turn's stance, kept for diagnostics
    pub last_stance: Option<Stance>,
    pub sidestep_cooldown: u32,
    pub sidestep_streak: u32,
    pub hold_counter_cooldown: u32,
    /// While above zero, Hold is off the table for this side
    pub trauma: u32,
    pub posture: Posture,
    /// Set only while a counter-hold cascade is in progress
    pub locked: bool,
    pub control: ControlPolicy,
}

impl Combatant {
    pub fn new(name: impl Into<String>, control: ControlPolicy, config: &DuelConfig) -> Self {
        Self {
            name: name.into(),
            hp: config.starting_hp,
            stance: None,
            last_stance: None,
            sidestep_cooldown: 0,
            sidestep_streak: 0,
            hold_counter_cooldown: 0,
            trauma: 0,
            posture: Posture::Standing,
            locked: false,
            control,
        }
    }

    /// Subtract damage, clamped to the legal hp interval
    pub fn apply_damage(&mut self, damage: u32, config: &DuelConfig) {
        self.hp = (self.hp - damage as i32).clamp(config.defeat_floor, config.starting_hp);
    }

    /// hp has dropped to zero or below; this side no longer commits stances
    /// but keeps absorbing follow-up attacks
    pub fn is_downed(&self) -> bool {
        self.hp <= 0
    }

    /// hp has reached the defeat floor; nothing further happens to this side
    pub fn is_out(&self, config: &DuelConfig) -> bool {
        self.hp <= config.defeat_floor
    }

    /// Stances this side may commit this turn
    pub fn legal_stances(&self) -> Vec<Stance> {
        if self.is_downed() {
            return Vec::new();
        }
        Stance::ALL
            .iter()
            .copied()
            .filter(|stance| match stance {
                Stance::Sidestep => self.sidestep_cooldown == 0,
                Stance::HoldCounter => self.hold_counter_cooldown == 0,
                Stance::Hold => self.trauma == 0,
                _ => true,
            })
            .collect()
    }

    /// Top-of-turn decay: cooldowns and trauma tick down before decisions
    pub fn decay_counters(&mut self) {
        self.sidestep_cooldown = self.sidestep_cooldown.saturating_sub(1);
        self.hold_counter_cooldown = self.hold_counter_cooldown.saturating_sub(1);
        self.trauma = self.trauma.saturating_sub(1);
    }

    /// End-of-turn bookkeeping for the stance that was just used
    ///
    /// Consecutive sidesteps build a streak that is copied into the
    /// cooldown, escalating the lockout; any other stance resets the
    /// streak. The committed stance moves into `last_stance`.
    pub fn settle_stance(&mut self) {
        match self.stance {
            Some(Stance::Sidestep) => {
                self.sidestep_streak += 1;
                self.sidestep_cooldown = self.sidestep_streak;
            }
            Some(Stance::HoldCounter) => {
                self.sidestep_streak = 0;
                self.hold_counter_cooldown = 1;
            }
            Some(_) => {
                self.sidestep_streak = 0;
            }
            None => {}
        }
        self.last_stance = self.stance.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(config: &DuelConfig) -> Combatant {
        Combatant::new("Tester", ControlPolicy::CpuMedium, config)
    }

    #[test]
    fn test_damage_is_clamped_to_floor() {
        let config = DuelConfig::default();
        let mut c = fresh(&config);
        c.apply_damage(500, &config);
        assert_eq!(c.hp, config.defeat_floor);
        assert!(c.is_out(&config));
    }

    #[test]
    fn test_downed_side_has_no_legal_stances() {
        let config = DuelConfig::default();
        let mut c = fresh(&config);
        c.hp = 0;
        assert!(c.is_downed());
        assert!(c.legal_stances().is_empty());
    }

    #[test]
    fn test_trauma_excludes_hold() {
        let config = DuelConfig::default();
        let mut c = fresh(&config);
        c.trauma = 2;
        let legal = c.legal_stances();
        assert!(!legal.contains(&Stance::Hold));
        assert_eq!(legal.len(), 4);
    }

    #[test]
    fn test_cooldowns_exclude_their_stances() {
        let config = DuelConfig::default();
        let mut c = fresh(&config);
        c.sidestep_cooldown = 1;
        c.hold_counter_cooldown = 1;
        let legal = c.legal_stances();
        assert!(!legal.contains(&Stance::Sidestep));
        assert!(!legal.contains(&Stance::HoldCounter));
        assert!(legal.contains(&Stance::Grab));
    }

    #[test]
    fn test_sidestep_streak_builds_and_resets() {
        let config = DuelConfig::default();
        let mut c = fresh(&config);

        c.stance = Some(Stance::Sidestep);
        c.settle_stance();
        assert_eq!(c.sidestep_streak, 1);
        assert_eq!(c.sidestep_cooldown, 1);

        c.decay_counters();
        c.stance = Some(Stance::Sidestep);
        c.settle_stance();
        assert_eq!(c.sidestep_streak, 2);
        assert_eq!(c.sidestep_cooldown, 2);

        c.decay_counters();
        assert_eq!(c.sidestep_cooldown, 1);
        assert!(!c.legal_stances().contains(&Stance::Sidestep));

        c.stance = Some(Stance::Grab);
        c.settle_stance();
        assert_eq!(c.sidestep_streak, 0);
        assert_eq!(c.last_stance, Some(Stance::Grab));
        assert_eq!(c.stance, None);
    }

    #[test]
    fn test_decay_never_goes_negative() {
        let config = DuelConfig::default();
        let mut c = fresh(&config);
        for _ in 0..5 {
            c.decay_counters();
        }
        assert_eq!(c.sidestep_cooldown, 0);
        assert_eq!(c.hold_counter_cooldown, 0);
        assert_eq!(c.trauma, 0);
    }
}
