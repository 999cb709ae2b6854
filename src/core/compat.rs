//! Resolves compatibility between avatar bases, and between assets and avatars.
//!
//! The resolver is a pure function over an injected [`CompatibilityMatrix`].
//! Overall status is worst-wins across the rated aspects: a pair is only as
//! compatible as its weakest dimension.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;

/// Ordered compatibility scale. `No < Partial < Mostly < Yes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    No,
    Partial,
    Mostly,
    Yes,
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Rating::No => "no",
                Rating::Partial => "partial",
                Rating::Mostly => "mostly",
                Rating::Yes => "yes",
            }
        )
    }
}

/// Per-aspect ratings recorded for an ordered pair of avatar bases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityFact {
    pub bone_structure: Rating,
    pub materials: Rating,
    pub animations: Rating,
    #[serde(default)]
    pub notes: String,
}

/// A matrix entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub fact: CompatibilityFact,
}

/// Sparse, directional table of compatibility facts keyed by
/// `source base -> target base`. A fact for `(A, B)` says nothing about `(B, A)`.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMatrix {
    facts: HashMap<String, HashMap<String, CompatibilityFact>>,
}

impl CompatibilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fact. A later entry for the same pair replaces the earlier one.
    pub fn insert(&mut self, source: &str, target: &str, fact: CompatibilityFact) {
        self.facts
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string(), fact);
    }

    pub fn get(&self, source: &str, target: &str) -> Option<&CompatibilityFact> {
        self.facts.get(source).and_then(|targets| targets.get(target))
    }

    pub fn len(&self) -> usize {
        self.facts.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<MatrixEntry> for CompatibilityMatrix {
    fn from_iter<I: IntoIterator<Item = MatrixEntry>>(iter: I) -> Self {
        let mut matrix = CompatibilityMatrix::new();
        for entry in iter {
            matrix.insert(&entry.source, &entry.target, entry.fact);
        }
        matrix
    }
}

/// What to resolve. The variant carries the mode.
#[derive(Debug, Clone, Copy)]
pub enum CompatQuery<'a> {
    AssetToAvatar {
        compatible_with: &'a [String],
        avatar_base: &'a str,
    },
    AvatarToAvatar {
        source_base: &'a str,
        target_base: &'a str,
    },
}

/// Status of one aspect in a result. Informational aspects never affect the overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectStatus {
    Rated(Rating),
    Info,
}

impl Display for AspectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AspectStatus::Rated(rating) => write!(f, "{rating}"),
            AspectStatus::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aspect {
    pub name: &'static str,
    pub status: AspectStatus,
    pub detail: String,
}

impl Aspect {
    fn rated(name: &'static str, rating: Rating, detail: impl Into<String>) -> Self {
        Aspect {
            name,
            status: AspectStatus::Rated(rating),
            detail: detail.into(),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Aspect {
            name,
            status: AspectStatus::Info,
            detail: detail.into(),
        }
    }
}

/// Overall status for a pair. `Unknown` means the matrix has no data and is
/// never the same as `Known(Rating::No)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overall {
    Known(Rating),
    Unknown,
}

impl Display for Overall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Overall::Known(rating) => write!(f, "{rating}"),
            Overall::Unknown => write!(f, "unknown"),
        }
    }
}

/// Confidence label used when scaling reference tables by the overall status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceLevel {
    High,
    Medium,
    Low,
}

impl Display for ReferenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ReferenceLevel::High => "High",
                ReferenceLevel::Medium => "Medium",
                ReferenceLevel::Low => "Low",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityResult {
    pub overall: Overall,
    pub aspects: Vec<Aspect>,
}

impl CompatibilityResult {
    pub fn reference_level(&self) -> ReferenceLevel {
        match self.overall {
            Overall::Known(Rating::Yes) => ReferenceLevel::High,
            Overall::Known(Rating::Mostly) => ReferenceLevel::Medium,
            _ => ReferenceLevel::Low,
        }
    }
}

/// Worst rating among the given ones, `Yes` when there are none.
pub fn worst_of(ratings: impl IntoIterator<Item = Rating>) -> Rating {
    ratings.into_iter().min().unwrap_or(Rating::Yes)
}

pub fn resolve(matrix: &CompatibilityMatrix, query: CompatQuery<'_>) -> CompatibilityResult {
    match query {
        CompatQuery::AssetToAvatar {
            compatible_with,
            avatar_base,
        } => resolve_asset(compatible_with, avatar_base),
        CompatQuery::AvatarToAvatar {
            source_base,
            target_base,
        } => resolve_avatars(matrix, source_base, target_base),
    }
}

fn resolve_asset(compatible_with: &[String], avatar_base: &str) -> CompatibilityResult {
    let direct = compatible_with.iter().any(|base| base == avatar_base);
    debug!("Asset compatibility with {avatar_base}: direct match = {direct}");

    // Package format and materials are treated as universally compatible.
    let (rating, base_detail, rigging_detail) = if direct {
        (
            Rating::Yes,
            format!("Made for {avatar_base}"),
            "Rigged for this base".to_string(),
        )
    } else {
        (
            Rating::Partial,
            format!("Not listed for {avatar_base}; may work with adjustments"),
            "May need re-rigging or weight painting".to_string(),
        )
    };

    CompatibilityResult {
        overall: Overall::Known(rating),
        aspects: vec![
            Aspect::rated("Avatar base", rating, base_detail),
            Aspect::rated("File format", Rating::Yes, "Standard package format"),
            Aspect::rated("Animation rigging", rating, rigging_detail),
            Aspect::rated("Material system", Rating::Yes, "Standard shaders"),
        ],
    }
}

fn resolve_avatars(
    matrix: &CompatibilityMatrix,
    source_base: &str,
    target_base: &str,
) -> CompatibilityResult {
    if let Some(fact) = matrix.get(source_base, target_base) {
        debug!("Found compatibility fact for {source_base} -> {target_base}");
        return from_fact(fact);
    }

    if source_base == target_base {
        debug!("No fact for {source_base}, identical bases resolve to yes");
        return CompatibilityResult {
            overall: Overall::Known(Rating::Yes),
            aspects: vec![
                Aspect::rated("Bone structure", Rating::Yes, "Same base"),
                Aspect::rated("Materials", Rating::Yes, "Same base"),
                Aspect::rated("Animations", Rating::Yes, "Same base"),
            ],
        };
    }

    debug!("No compatibility data for {source_base} -> {target_base}");
    CompatibilityResult {
        overall: Overall::Unknown,
        aspects: vec![Aspect::info(
            "No data",
            format!(
                "No compatibility data for {source_base} -> {target_base}. Test assets manually before relying on them."
            ),
        )],
    }
}

fn from_fact(fact: &CompatibilityFact) -> CompatibilityResult {
    let overall = worst_of([fact.bone_structure, fact.materials, fact.animations]);

    let mut aspects = vec![
        Aspect::rated("Bone structure", fact.bone_structure, describe(fact.bone_structure)),
        Aspect::rated("Materials", fact.materials, describe(fact.materials)),
        Aspect::rated("Animations", fact.animations, describe(fact.animations)),
    ];
    if !fact.notes.is_empty() {
        aspects.push(Aspect::info("Notes", fact.notes.clone()));
    }

    CompatibilityResult {
        overall: Overall::Known(overall),
        aspects,
    }
}

fn describe(rating: Rating) -> &'static str {
    match rating {
        Rating::Yes => "Fully compatible",
        Rating::Mostly => "Minor adjustments needed",
        Rating::Partial => "Significant adjustments needed",
        Rating::No => "Not compatible",
    }
}
