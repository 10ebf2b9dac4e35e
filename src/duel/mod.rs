pub mod engine;
pub mod events;
pub mod followup;

pub use engine::{DuelEngine, Progress, SideSetup};
pub use events::{DuelEvent, DuelEventKind, DuelLog};
