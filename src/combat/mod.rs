pub mod cascade;
pub mod combatant;
pub mod stance;
pub mod technique;

pub use combatant::{Combatant, Posture};
pub use stance::{clash, ClashOutcome, Stance};
pub use technique::{Category, ComboVariant, Technique, TechniqueTable};
