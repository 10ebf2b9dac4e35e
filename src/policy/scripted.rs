//! Scripted stance selection tiers
//!
//! `known` carries the opponent's stance only when that opponent committed
//! earlier in the same turn, which happens exactly when the opponent is
//! human (humans decide before scripted sides are asked). Two scripted
//! sides never see each other's picks.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::combat::combatant::Combatant;
use crate::combat::stance::{clash, ClashOutcome, Stance};
use crate::core::config::DuelConfig;

/// Scripted difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuTier {
    Weak,
    Medium,
    Strong,
}

/// Pick a stance for a scripted side
///
/// Returns None only when the side has no legal stance, which the engine
/// rules out before asking.
pub fn choose_scripted<R: Rng>(
    tier: CpuTier,
    me: &Combatant,
    foe: &Combatant,
    known: Option<Stance>,
    config: &DuelConfig,
    rng: &mut R,
) -> Option<Stance> {
    let legal = me.legal_stances();
    match tier {
        CpuTier::Medium => legal.choose(rng).copied(),
        CpuTier::Weak => choose_weak(&legal, known, config, rng),
        CpuTier::Strong => choose_strong(&legal, foe, known, rng),
    }
}

/// Weak tier: occasionally throws the clash on purpose
fn choose_weak<R: Rng>(
    legal: &[Stance],
    known: Option<Stance>,
    config: &DuelConfig,
    rng: &mut R,
) -> Option<Stance> {
    if legal.is_empty() {
        return None;
    }
    if let Some(theirs) = known {
        if rng.gen_bool(config.weak_blunder_rate) {
            let throwing: Vec<Stance> = legal
                .iter()
                .copied()
                .filter(|stance| clash(*stance, theirs) == ClashOutcome::Lose)
                .collect();
            if let Some(stance) = throwing.choose(rng) {
                return Some(*stance);
            }
        }
    }
    legal.choose(rng).copied()
}

/// Strong tier: prunes dead options and punishes a visible commitment
fn choose_strong<R: Rng>(
    legal: &[Stance],
    foe: &Combatant,
    known: Option<Stance>,
    rng: &mut R,
) -> Option<Stance> {
    let mut pool: Vec<Stance> = legal.to_vec();

    // A traumatized opponent cannot Hold, so a counter aimed at it is wasted.
    if foe.trauma > 0 {
        pool.retain(|stance| *stance != Stance::HoldCounter);
    }

    // An opponent locked out of Sidestep is exposed to committed pressure.
    if foe.sidestep_cooldown > 0 {
        let narrowed: Vec<Stance> = pool
            .iter()
            .copied()
            .filter(|stance| matches!(stance, Stance::Hold | Stance::Sidestep))
            .collect();
        if !narrowed.is_empty() {
            pool = narrowed;
        }
    }

    if pool.is_empty() {
        return legal.choose(rng).copied();
    }

    if let Some(theirs) = known {
        let winning: Vec<Stance> = pool
            .iter()
            .copied()
            .filter(|stance| clash(*stance, theirs) == ClashOutcome::Win)
            .collect();
        if let Some(stance) = winning.choose(rng) {
            return Some(*stance);
        }
    }

    pool.choose(rng).copied()
}
