//! Duel orchestrator
//!
//! Drives the per-turn sequence: counter decay, decision collection, clash
//! resolution, cascade application, the down-state follow-up phase, and
//! end-of-turn bookkeeping. The engine owns both combatants; the only
//! external mutation points are the two submission hooks, and `advance`
//! never mutates state while an input is pending.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat::cascade;
use crate::combat::combatant::Combatant;
use crate::combat::stance::{clash, ClashOutcome, Stance};
use crate::combat::technique::{Category, TechniqueTable};
use crate::core::config::DuelConfig;
use crate::core::error::{ClinchError, Result};
use crate::core::types::{MatchId, Side, Turn};
use crate::duel::events::{DuelEvent, DuelEventKind, DuelLog};
use crate::policy::{choose_scripted, ControlPolicy};

/// One side of the match, as supplied by the caller
#[derive(Debug, Clone)]
pub struct SideSetup {
    pub name: String,
    pub control: ControlPolicy,
}

impl SideSetup {
    pub fn new(name: impl Into<String>, control: ControlPolicy) -> Self {
        Self {
            name: name.into(),
            control,
        }
    }
}

/// Where the engine stands after a call to `advance`
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A human side must call `submit_stance`
    AwaitingStance { side: Side, legal: Vec<Stance> },
    /// A human attacker must call `submit_down_choice`
    AwaitingDownChoice { side: Side, choices: Vec<Category> },
    /// A full turn resolved; call `advance` again for the next
    TurnComplete,
    /// The loop invariant failed; no further state changes
    Finished { winner: Option<Side> },
}

/// Internal turn phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Phase {
    TurnStart,
    Deciding,
    AwaitDownChoice { attacker: Side, forced: bool },
    TurnEnd,
    Finished { winner: Option<Side> },
}

/// A single match between two combatants
pub struct DuelEngine {
    pub(crate) id: MatchId,
    pub(crate) sides: [Combatant; 2],
    pub(crate) table: TechniqueTable,
    pub(crate) config: DuelConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) log: DuelLog,
    pub(crate) turn: Turn,
    pub(crate) phase: Phase,
}

impl DuelEngine {
    pub fn new(
        side1: SideSetup,
        side2: SideSetup,
        table: TechniqueTable,
        config: DuelConfig,
        seed: u64,
    ) -> Self {
        let sides = [
            Combatant::new(side1.name, side1.control, &config),
            Combatant::new(side2.name, side2.control, &config),
        ];
        let mut log = DuelLog::new();
        log.push(
            DuelEventKind::MatchStarted,
            format!("{} squares off against {}.", sides[0].name, sides[1].name),
            0,
        );
        Self {
            id: MatchId::new(),
            sides,
            table,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            log,
            turn: 0,
            phase: Phase::TurnStart,
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.id
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn side(&self, side: Side) -> &Combatant {
        &self.sides[side.index()]
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn events(&self) -> &[DuelEvent] {
        &self.log.events
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    /// The surviving side, once finished; None for a technical draw
    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::Finished { winner } => winner,
            _ => None,
        }
    }

    /// Run until the next suspension point, turn boundary, or match end
    pub fn advance(&mut self) -> Progress {
        loop {
            match self.phase {
                Phase::Finished { winner } => return Progress::Finished { winner },
                Phase::AwaitDownChoice { attacker, forced } => {
                    return Progress::AwaitingDownChoice {
                        side: attacker,
                        choices: self.down_menu(attacker, forced),
                    };
                }
                Phase::TurnStart => self.begin_turn(),
                Phase::Deciding => {
                    if let Some(progress) = self.collect_decisions() {
                        return progress;
                    }
                    self.resolve_clash();
                }
                Phase::TurnEnd => {
                    if let Some(progress) = self.finish_turn() {
                        return progress;
                    }
                    return Progress::TurnComplete;
                }
            }
        }
    }

    /// Supply the stance a human side was suspended on
    ///
    /// Rejects illegal stances and submissions from sides that are not
    /// being waited on; the suspension stays in place either way.
    pub fn submit_stance(&mut self, side: Side, stance: Stance) -> Result<()> {
        if self.phase != Phase::Deciding {
            return Err(ClinchError::NoPendingStance(side));
        }
        let awaited = Side::BOTH.iter().copied().find(|s| {
            let c = &self.sides[s.index()];
            c.control.is_human() && c.stance.is_none()
        });
        if awaited != Some(side) {
            return Err(ClinchError::NoPendingStance(side));
        }
        if !self.sides[side.index()].legal_stances().contains(&stance) {
            return Err(ClinchError::IllegalStance { side, stance });
        }
        self.sides[side.index()].stance = Some(stance);
        Ok(())
    }

    /// Supply the down-attack category a human attacker was suspended on
    pub fn submit_down_choice(&mut self, side: Side, category: Category) -> Result<()> {
        let Phase::AwaitDownChoice { attacker, forced } = self.phase else {
            return Err(ClinchError::NoPendingDownChoice(side));
        };
        if attacker != side {
            return Err(ClinchError::NoPendingDownChoice(side));
        }
        if !self.down_menu(attacker, forced).contains(&category) {
            return Err(ClinchError::IllegalDownChoice(category));
        }
        self.resolve_down_choice(attacker, category, forced);
        Ok(())
    }

    pub(crate) fn name(&self, side: Side) -> &str {
        &self.sides[side.index()].name
    }

    pub(crate) fn push(&mut self, kind: DuelEventKind, description: String) {
        self.log.push(kind, description, self.turn);
    }

    /// Counter decay, then either a normal decision turn or a forced
    /// finisher pass against a downed side
    fn begin_turn(&mut self) {
        self.turn += 1;
        tracing::debug!(turn = self.turn, "turn start");
        for side in Side::BOTH {
            self.sides[side.index()].decay_counters();
        }

        let downed: Vec<Side> = Side::BOTH
            .iter()
            .copied()
            .filter(|s| self.sides[s.index()].is_downed())
            .collect();
        match downed[..] {
            [] => self.phase = Phase::Deciding,
            [only] => {
                let attacker = only.opponent();
                if self.sides[attacker.index()].control.is_human() {
                    self.phase = Phase::AwaitDownChoice {
                        attacker,
                        forced: true,
                    };
                } else {
                    self.scripted_finisher(attacker);
                    self.phase = Phase::TurnEnd;
                }
            }
            _ => {
                // Only the clash loser takes damage, so this cannot happen.
                tracing::warn!("both sides downed at turn start");
                self.phase = Phase::TurnEnd;
            }
        }
    }

    /// Humans commit before scripted sides are asked, which is what lets a
    /// scripted side see a human opponent's pick and never a scripted one's
    fn collect_decisions(&mut self) -> Option<Progress> {
        for side in Side::BOTH {
            let c = &self.sides[side.index()];
            if c.control.is_human() && c.stance.is_none() {
                return Some(Progress::AwaitingStance {
                    side,
                    legal: c.legal_stances(),
                });
            }
        }

        for side in Side::BOTH {
            if self.sides[side.index()].stance.is_some() {
                continue;
            }
            let Some(tier) = self.sides[side.index()].control.cpu_tier() else {
                continue;
            };
            let known = self.visible_stance(side);
            let me = &self.sides[side.index()];
            let foe = &self.sides[side.opponent().index()];
            match choose_scripted(tier, me, foe, known, &self.config, &mut self.rng) {
                Some(stance) => {
                    tracing::debug!(?side, ?stance, "scripted decision");
                    self.sides[side.index()].stance = Some(stance);
                }
                None => tracing::warn!(?side, "scripted side had no legal stance"),
            }
        }
        None
    }

    /// The opponent's committed stance, when this side is allowed to see it
    pub(crate) fn visible_stance(&self, observer: Side) -> Option<Stance> {
        let foe = &self.sides[observer.opponent().index()];
        if foe.control.is_human() {
            foe.stance
        } else {
            None
        }
    }

    fn resolve_clash(&mut self) {
        let (Some(a), Some(b)) = (self.sides[0].stance, self.sides[1].stance) else {
            tracing::warn!("clash reached with an uncommitted side");
            self.phase = Phase::TurnEnd;
            return;
        };

        for side in Side::BOTH {
            let stance = if side == Side::One { a } else { b };
            let desc = format!("{} commits to {}.", self.name(side), stance);
            self.push(DuelEventKind::StanceCommitted { side, stance }, desc);
        }

        match clash(a, b) {
            ClashOutcome::Tie => {
                let desc = format!(
                    "{} and {} mirror each other; neither gains ground.",
                    self.name(Side::One),
                    self.name(Side::Two)
                );
                self.push(DuelEventKind::ClashTied { stance: a }, desc);
                self.phase = Phase::TurnEnd;
            }
            ClashOutcome::Win => self.apply_decisive(Side::One, Side::Two, a, b),
            ClashOutcome::Lose => self.apply_decisive(Side::Two, Side::One, b, a),
        }
    }

    fn apply_decisive(
        &mut self,
        winner: Side,
        loser: Side,
        winner_stance: Stance,
        loser_stance: Stance,
    ) {
        let desc = format!(
            "{}'s {} beats {}'s {}.",
            self.name(winner),
            winner_stance,
            self.name(loser),
            loser_stance
        );
        self.push(
            DuelEventKind::ClashWon {
                winner,
                winner_stance,
                loser_stance,
            },
            desc,
        );

        let counter_hold =
            winner_stance == Stance::HoldCounter && loser_stance == Stance::Hold;
        if counter_hold {
            self.sides[loser.index()].locked = true;
            let desc = format!("{} is caught in the counter and cannot act.", self.name(loser));
            self.push(DuelEventKind::CounterLocked { side: loser }, desc);
        }

        let sequence =
            cascade::resolve_techniques(winner_stance, loser_stance, &self.table, &mut self.rng);
        let mut total = 0u32;
        for technique in &sequence {
            self.apply_technique(winner, technique);
            total += technique.damage;
        }
        if total == 0 {
            self.fallback_strike(winner);
        }

        if counter_hold {
            let turns = self.config.trauma_turns;
            self.sides[loser.index()].trauma = turns;
            self.sides[winner.index()].trauma = 0;
            self.sides[loser.index()].locked = false;
            let desc = format!(
                "{} is left reeling; holds are beyond them for now.",
                self.name(loser)
            );
            self.push(DuelEventKind::TraumaInflicted { side: loser, turns }, desc);
        }

        self.enter_followup(winner, loser);
    }

    /// Route into the follow-up phase when the clash left the loser downed
    /// or grounded; a loser at zero or below goes straight to the finisher
    fn enter_followup(&mut self, attacker: Side, defender: Side) {
        if self.sides[defender.index()].is_downed() {
            if self.sides[attacker.index()].control.is_human() {
                self.phase = Phase::AwaitDownChoice {
                    attacker,
                    forced: true,
                };
            } else {
                self.scripted_finisher(attacker);
                self.phase = Phase::TurnEnd;
            }
        } else if self.sides[defender.index()].posture.grounded() {
            if self.sides[attacker.index()].control.is_human() {
                self.phase = Phase::AwaitDownChoice {
                    attacker,
                    forced: false,
                };
            } else {
                if self.run_scripted_chase(attacker) {
                    self.scripted_finisher(attacker);
                }
                self.phase = Phase::TurnEnd;
            }
        } else {
            self.phase = Phase::TurnEnd;
        }
    }

    fn finish_turn(&mut self) -> Option<Progress> {
        for side in Side::BOTH {
            self.sides[side.index()].settle_stance();
        }

        let out = [
            self.sides[0].is_out(&self.config),
            self.sides[1].is_out(&self.config),
        ];
        if out[0] || out[1] {
            let winner = match (out[0], out[1]) {
                (true, false) => Some(Side::Two),
                (false, true) => Some(Side::One),
                _ => None,
            };
            let desc = match winner {
                Some(side) => format!("{} stands victorious.", self.name(side)),
                None => "Neither side can continue.".to_string(),
            };
            self.push(DuelEventKind::MatchEnded { winner }, desc);
            self.phase = Phase::Finished { winner };
            return Some(Progress::Finished { winner });
        }

        self.phase = Phase::TurnStart;
        None
    }
}
