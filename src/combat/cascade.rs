//! Technique cascade resolution for a decisive clash
//!
//! The winning stance pair selects a table category; the counter-hold pair
//! builds a multi-step combo instead. An empty result means the table had
//! nothing for the pair, and the caller applies the flat fallback damage.

use rand::Rng;

use crate::combat::stance::Stance;
use crate::combat::technique::{Category, ComboVariant, Technique, TechniqueTable};

/// Ordered techniques to apply after a decisive clash
pub fn resolve_techniques<R: Rng>(
    attacker: Stance,
    defender: Stance,
    table: &TechniqueTable,
    rng: &mut R,
) -> Vec<Technique> {
    if attacker == Stance::HoldCounter && defender == Stance::Hold {
        let variant = if rng.gen_bool(0.5) {
            ComboVariant::Spiral
        } else {
            ComboVariant::Cradle
        };
        let pursuits = rng.gen_range(1..=3);
        return combo_sequence(table, variant, pursuits).unwrap_or_default();
    }

    single_category(attacker, defender)
        .and_then(|category| table.pick(category, rng).cloned())
        .map(|technique| vec![technique])
        .unwrap_or_default()
}

/// Category consulted for a non-combo winning pair
///
/// A grab from the front and a guard that catches a sidestep both land in
/// the frontal grab bucket; sidestep wins re-key to the rear variants.
pub fn single_category(attacker: Stance, defender: Stance) -> Option<Category> {
    use Stance::*;

    match (attacker, defender) {
        (Grab, _) => Some(Category::FrontalGrab),
        (Guard, Sidestep) => Some(Category::FrontalGrab),
        (Sidestep, Grab) => Some(Category::RearGrab),
        (Sidestep, Hold) => Some(Category::RearHold),
        (Sidestep, HoldCounter) => Some(Category::UppercutFrontal),
        (Guard, HoldCounter) => Some(Category::UppercutRear),
        (Hold, _) => Some(Category::FrontalHold),
        _ => None,
    }
}

/// Build a counter-hold combo: opener, pursuit repeated, ender
///
/// All three parts must exist in the table or nothing is emitted.
pub fn combo_sequence(
    table: &TechniqueTable,
    variant: ComboVariant,
    pursuits: u32,
) -> Option<Vec<Technique>> {
    let opener = table.category(variant.opener()).first()?;
    let pursuit = table.category(variant.pursuit()).first()?;
    let ender = table.category(variant.ender()).first()?;

    let mut sequence = Vec::with_capacity(pursuits as usize + 2);
    sequence.push(opener.clone());
    for _ in 0..pursuits {
        sequence.push(pursuit.clone());
    }
    sequence.push(ender.clone());
    Some(sequence)
}
