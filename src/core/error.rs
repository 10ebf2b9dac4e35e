use thiserror::Error;

use crate::combat::stance::Stance;
use crate::combat::technique::Category;
use crate::core::types::Side;

#[derive(Error, Debug)]
pub enum ClinchError {
    #[error("stance {stance:?} is not legal for side {side:?}")]
    IllegalStance { side: Side, stance: Stance },

    #[error("no stance decision is pending for side {0:?}")]
    NoPendingStance(Side),

    #[error("no down-attack choice is pending for side {0:?}")]
    NoPendingDownChoice(Side),

    #[error("category {0:?} is not among the offered down-attack choices")]
    IllegalDownChoice(Category),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("technique table parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ClinchError>;
