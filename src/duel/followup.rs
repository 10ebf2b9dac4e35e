//! Down-state follow-up phase
//!
//! Runs between a decisive clash and the end of the turn whenever the
//! loser is grounded or downed. Scripted attackers climb a descending
//! probability ladder; human attackers pick one category from a one-shot
//! menu. A downed defender always receives the forced last hit.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::combat::combatant::Posture;
use crate::combat::technique::{Category, Technique};
use crate::core::types::Side;
use crate::duel::engine::{DuelEngine, Phase};
use crate::duel::events::DuelEventKind;

impl DuelEngine {
    /// Down-attack categories offered to a human attacker
    ///
    /// A live grounded defender offers the posture's ground category plus
    /// the finisher trio (picking a finisher is the explicit request); a
    /// downed defender offers the finishers only.
    pub(crate) fn down_menu(&self, attacker: Side, forced: bool) -> Vec<Category> {
        let defender = attacker.opponent();
        let mut menu = Vec::new();
        if !forced {
            if let Some(ground) = Category::ground_for(self.sides[defender.index()].posture) {
                menu.push(ground);
            }
        }
        menu.extend(Category::FINISHERS);
        menu
    }

    /// Apply a human attacker's validated down-attack choice
    pub(crate) fn resolve_down_choice(&mut self, attacker: Side, category: Category, forced: bool) {
        let defender = attacker.opponent();
        let finishing = forced || category.is_finisher();
        if finishing {
            let desc = format!(
                "{} moves in to finish {}.",
                self.name(attacker),
                self.name(defender)
            );
            self.push(DuelEventKind::FinisherStarted { attacker }, desc);
        }

        match self.table.pick(category, &mut self.rng).cloned() {
            Some(technique) => self.apply_technique(attacker, &technique),
            None => self.fallback_strike(attacker),
        }

        if !finishing {
            if self.sides[defender.index()].is_downed() {
                // The ground hit dropped them; the last hit is still owed.
                self.phase = Phase::AwaitDownChoice {
                    attacker,
                    forced: true,
                };
                return;
            }
            if self.sides[defender.index()].posture.grounded() {
                self.set_posture(defender, Posture::Standing);
            }
        }
        self.phase = Phase::TurnEnd;
    }

    /// Scripted chase against a live grounded defender
    ///
    /// Each rung of the ladder is an independent draw; the first miss ends
    /// the chase and the defender stands back up if still in the fight.
    /// Returns true when a chase hit downed the defender.
    pub(crate) fn run_scripted_chase(&mut self, attacker: Side) -> bool {
        let defender = attacker.opponent();
        for chance in self.config.chase_ladder {
            if !self.rng.gen_bool(chance) {
                let desc = format!(
                    "{} scrambles clear of the follow-up.",
                    self.name(defender)
                );
                self.push(DuelEventKind::ChaseBroken { attacker }, desc);
                break;
            }
            let Some(category) = Category::ground_for(self.sides[defender.index()].posture)
            else {
                break;
            };
            if let Some(technique) = self.table.pick(category, &mut self.rng).cloned() {
                self.apply_technique(attacker, &technique);
            }
            if self.sides[defender.index()].is_downed() {
                return true;
            }
        }

        if self.sides[defender.index()].posture.grounded() {
            self.set_posture(defender, Posture::Standing);
        }
        false
    }

    /// The forced last hit from a scripted attacker
    pub(crate) fn scripted_finisher(&mut self, attacker: Side) {
        let defender = attacker.opponent();
        let desc = format!(
            "{} moves in to finish {}.",
            self.name(attacker),
            self.name(defender)
        );
        self.push(DuelEventKind::FinisherStarted { attacker }, desc);

        let open: Vec<Category> = Category::FINISHERS
            .iter()
            .copied()
            .filter(|c| !self.table.category(*c).is_empty())
            .collect();
        let category = open.choose(&mut self.rng).copied();
        let technique = category
            .and_then(|c| self.table.category(c).choose(&mut self.rng))
            .cloned();
        match technique {
            Some(technique) => self.apply_technique(attacker, &technique),
            None => self.fallback_strike(attacker),
        }
    }

    /// Apply one technique: posture first, then clamped damage
    pub(crate) fn apply_technique(&mut self, attacker: Side, technique: &Technique) {
        let defender = attacker.opponent();
        let desc = format!(
            "{} {} ({} damage).",
            self.name(attacker),
            technique.description,
            technique.damage
        );
        self.push(
            DuelEventKind::TechniqueApplied {
                attacker,
                technique: technique.name.clone(),
                damage: technique.damage,
            },
            desc,
        );

        if let Some(posture) = technique.posture {
            if posture != self.sides[defender.index()].posture {
                self.set_posture(defender, posture);
            }
        }
        self.deal_damage(defender, technique.damage);
    }

    /// Flat strike applied when a cascade or follow-up found no technique
    pub(crate) fn fallback_strike(&mut self, attacker: Side) {
        let damage = self.config.fallback_damage;
        let desc = format!(
            "{} forces through with a plain strike ({} damage).",
            self.name(attacker),
            damage
        );
        self.push(DuelEventKind::FallbackStrike { attacker, damage }, desc);
        self.deal_damage(attacker.opponent(), damage);
    }

    pub(crate) fn set_posture(&mut self, side: Side, posture: Posture) {
        self.sides[side.index()].posture = posture;
        let desc = match posture {
            Posture::Standing => format!("{} gets back to their feet.", self.name(side)),
            Posture::Supine => format!("{} is flat on the mat, face up.", self.name(side)),
            Posture::Prone => format!("{} is face down on the mat.", self.name(side)),
        };
        self.push(DuelEventKind::PostureChanged { side, posture }, desc);
    }

    fn deal_damage(&mut self, defender: Side, damage: u32) {
        self.sides[defender.index()].apply_damage(damage, &self.config);
        let hp = self.sides[defender.index()].hp;
        let desc = format!("{} is down to {} hp.", self.name(defender), hp);
        self.push(DuelEventKind::HpChanged { side: defender, hp }, desc);
    }
}
