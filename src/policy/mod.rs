//! Stance decision policies
//!
//! A human side suspends the turn until input arrives through the engine's
//! submission hooks; scripted tiers pick from the legal set with
//! tier-specific shaping.

pub mod scripted;

pub use scripted::{choose_scripted, CpuTier};

use serde::{Deserialize, Serialize};

/// Who decides a side's stances, fixed for the whole match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPolicy {
    Human,
    CpuWeak,
    CpuMedium,
    CpuStrong,
}

impl ControlPolicy {
    pub fn is_human(&self) -> bool {
        matches!(self, ControlPolicy::Human)
    }

    pub fn cpu_tier(&self) -> Option<CpuTier> {
        match self {
            ControlPolicy::Human => None,
            ControlPolicy::CpuWeak => Some(CpuTier::Weak),
            ControlPolicy::CpuMedium => Some(CpuTier::Medium),
            ControlPolicy::CpuStrong => Some(CpuTier::Strong),
        }
    }
}
