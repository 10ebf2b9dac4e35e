//! Techniques and the category-keyed technique table
//!
//! The table file keys every technique by an explicit category tag and is
//! bucketed into a map once at load time; lookups never rescan the file.
//! Absent categories are not an error: callers degrade to fallback damage.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::combat::combatant::Posture;
use crate::core::error::Result;

/// The two counter-hold combo chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboVariant {
    Spiral,
    Cradle,
}

impl ComboVariant {
    pub const ALL: [ComboVariant; 2] = [ComboVariant::Spiral, ComboVariant::Cradle];

    pub fn opener(&self) -> Category {
        match self {
            ComboVariant::Spiral => Category::SpiralOpener,
            ComboVariant::Cradle => Category::CradleOpener,
        }
    }

    pub fn pursuit(&self) -> Category {
        match self {
            ComboVariant::Spiral => Category::SpiralPursuit,
            ComboVariant::Cradle => Category::CradlePursuit,
        }
    }

    pub fn ender(&self) -> Category {
        match self {
            ComboVariant::Spiral => Category::SpiralEnder,
            ComboVariant::Cradle => Category::CradleEnder,
        }
    }
}

/// Technique category tags
///
/// Clash cascades consult the first six; ground categories feed the chase
/// phase; the finisher trio is reserved for the forced last hit; the combo
/// parts belong to the counter-hold chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FrontalGrab,
    RearGrab,
    FrontalHold,
    RearHold,
    UppercutFrontal,
    UppercutRear,
    GroundSupine,
    GroundProne,
    HeadSideHold,
    FootSideHold,
    Reversal,
    SpiralOpener,
    SpiralPursuit,
    SpiralEnder,
    CradleOpener,
    CradlePursuit,
    CradleEnder,
}

impl Category {
    /// The three categories a finisher is drawn from
    pub const FINISHERS: [Category; 3] = [
        Category::HeadSideHold,
        Category::FootSideHold,
        Category::Reversal,
    ];

    /// Non-finishing ground category usable against a downed posture
    pub fn ground_for(posture: Posture) -> Option<Category> {
        match posture {
            Posture::Supine => Some(Category::GroundSupine),
            Posture::Prone => Some(Category::GroundProne),
            Posture::Standing => None,
        }
    }

    pub fn is_finisher(&self) -> bool {
        Category::FINISHERS.contains(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::FrontalGrab => "frontal grab",
            Category::RearGrab => "rear grab",
            Category::FrontalHold => "frontal hold",
            Category::RearHold => "rear hold",
            Category::UppercutFrontal => "frontal uppercut",
            Category::UppercutRear => "rear uppercut",
            Category::GroundSupine => "ground attack (supine)",
            Category::GroundProne => "ground attack (prone)",
            Category::HeadSideHold => "head-side hold",
            Category::FootSideHold => "foot-side hold",
            Category::Reversal => "reversal",
            Category::SpiralOpener => "spiral opener",
            Category::SpiralPursuit => "spiral pursuit",
            Category::SpiralEnder => "spiral ender",
            Category::CradleOpener => "cradle opener",
            Category::CradlePursuit => "cradle pursuit",
            Category::CradleEnder => "cradle ender",
        };
        write!(f, "{}", name)
    }
}

/// Immutable technique record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    pub name: String,
    pub damage: u32,
    /// Narration clause, e.g. "wrenches the arm up behind the back"
    pub description: String,
    /// Posture forced onto the defender, if any
    #[serde(default)]
    pub posture: Option<Posture>,
}

/// One entry of the table file
#[derive(Debug, Deserialize)]
struct TableEntry {
    category: Category,
    name: String,
    damage: u32,
    description: String,
    #[serde(default)]
    posture: Option<Posture>,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    techniques: Vec<TableEntry>,
}

/// Read-only category → techniques lookup
#[derive(Debug, Clone, Default)]
pub struct TechniqueTable {
    buckets: AHashMap<Category, Vec<Technique>>,
}

impl TechniqueTable {
    /// A table with no techniques; every cascade degrades to fallback damage
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and bucket a TOML table file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(contents)?;
        let mut table = Self::empty();
        for entry in file.techniques {
            table.insert(
                entry.category,
                Technique {
                    name: entry.name,
                    damage: entry.damage,
                    description: entry.description,
                    posture: entry.posture,
                },
            );
        }
        Ok(table)
    }

    pub fn insert(&mut self, category: Category, technique: Technique) {
        self.buckets.entry(category).or_default().push(technique);
    }

    /// All techniques in a category (empty slice when absent)
    pub fn category(&self, category: Category) -> &[Technique] {
        self.buckets
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Uniform random pick within a category; None when the category is absent
    pub fn pick<R: Rng>(&self, category: Category, rng: &mut R) -> Option<&Technique> {
        self.category(category).choose(rng)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
