//! Trait scores, aggregates and the score audit history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest score a single trait can receive for one answer.
pub const MAX_TRAIT_SCORE: u8 = 5;

/// Errors raised while building trait scores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraitScoreError {
    #[error("score for {trait_name} out of range: {value} (must be 0-5)")]
    OutOfRange { trait_name: TraitKind, value: i64 },

    #[error("unknown trait: {0}")]
    UnknownTrait(String),
}

/// One of the four scored dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    Perseverance,
    Passion,
    GoalOrientation,
    Resilience,
}

impl TraitKind {
    /// All traits in display order.
    pub const ALL: [Self; 4] = [
        Self::Perseverance,
        Self::Passion,
        Self::GoalOrientation,
        Self::Resilience,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Perseverance => "perseverance",
            Self::Passion => "passion",
            Self::GoalOrientation => "goal_orientation",
            Self::Resilience => "resilience",
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraitKind {
    type Err = TraitScoreError;

    /// Accepts `goal_orientation`, `goal orientation`, `goal-orientation` and
    /// `goalOrientation`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "perseverance" => Ok(Self::Perseverance),
            "passion" => Ok(Self::Passion),
            "goalorientation" => Ok(Self::GoalOrientation),
            "resilience" => Ok(Self::Resilience),
            _ => Err(TraitScoreError::UnknownTrait(s.to_string())),
        }
    }
}

/// Absolute per-answer score: every field is an integer in `[0, 5]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTraitScore")]
pub struct TraitScore {
    perseverance: u8,
    passion: u8,
    goal_orientation: u8,
    resilience: u8,
}

/// Unchecked wire shape; negative and oversized values are rejected on conversion.
/// All four traits are required and nothing else is allowed.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTraitScore {
    perseverance: i64,
    passion: i64,
    goal_orientation: i64,
    resilience: i64,
}

impl TryFrom<RawTraitScore> for TraitScore {
    type Error = TraitScoreError;

    fn try_from(raw: RawTraitScore) -> Result<Self, Self::Error> {
        Self::new(raw.perseverance, raw.passion, raw.goal_orientation, raw.resilience)
    }
}

fn checked(trait_name: TraitKind, value: i64) -> Result<u8, TraitScoreError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_TRAIT_SCORE)
        .ok_or(TraitScoreError::OutOfRange { trait_name, value })
}

impl TraitScore {
    /// Builds a score, rejecting any value outside `[0, 5]`.
    pub fn new(
        perseverance: i64,
        passion: i64,
        goal_orientation: i64,
        resilience: i64,
    ) -> Result<Self, TraitScoreError> {
        Ok(Self {
            perseverance: checked(TraitKind::Perseverance, perseverance)?,
            passion: checked(TraitKind::Passion, passion)?,
            goal_orientation: checked(TraitKind::GoalOrientation, goal_orientation)?,
            resilience: checked(TraitKind::Resilience, resilience)?,
        })
    }

    pub const fn get(&self, kind: TraitKind) -> u8 {
        match kind {
            TraitKind::Perseverance => self.perseverance,
            TraitKind::Passion => self.passion,
            TraitKind::GoalOrientation => self.goal_orientation,
            TraitKind::Resilience => self.resilience,
        }
    }

    pub fn is_zero(&self) -> bool {
        TraitKind::ALL.iter().all(|kind| self.get(*kind) == 0)
    }

    /// Traits that received a non-zero score.
    pub fn nonzero_traits(&self) -> BTreeSet<TraitKind> {
        TraitKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind) > 0)
            .collect()
    }
}

/// Per-trait running mean of accepted scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitAggregate {
    pub perseverance: f64,
    pub passion: f64,
    pub goal_orientation: f64,
    pub resilience: f64,
}

impl TraitAggregate {
    pub const fn get(&self, kind: TraitKind) -> f64 {
        match kind {
            TraitKind::Perseverance => self.perseverance,
            TraitKind::Passion => self.passion,
            TraitKind::GoalOrientation => self.goal_orientation,
            TraitKind::Resilience => self.resilience,
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            perseverance: f(self.perseverance),
            passion: f(self.passion),
            goal_orientation: f(self.goal_orientation),
            resilience: f(self.resilience),
        }
    }

    /// Display form, rounded to one decimal place.
    #[must_use]
    pub fn rounded(self) -> Self {
        self.map(round_one_decimal)
    }

    /// `self - previous`, per trait.
    #[must_use]
    pub fn minus(self, previous: Self) -> Self {
        Self {
            perseverance: self.perseverance - previous.perseverance,
            passion: self.passion - previous.passion,
            goal_orientation: self.goal_orientation - previous.goal_orientation,
            resilience: self.resilience - previous.resilience,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Audit record for one accepted answer. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    /// Transcript position of the accepted answer turn.
    pub turn_index: usize,
    pub answer_text: String,
    pub related_factors: BTreeSet<TraitKind>,
    pub score: TraitScore,
    /// Set when the answer was force-accepted after a failed retry.
    #[serde(default)]
    pub low_confidence: bool,
}

impl ScoreHistoryEntry {
    /// Builds an entry. An all-zero score never carries related factors.
    pub fn new(
        turn_index: usize,
        answer_text: impl Into<String>,
        related_factors: BTreeSet<TraitKind>,
        score: TraitScore,
        low_confidence: bool,
    ) -> Self {
        let related_factors = if score.is_zero() {
            BTreeSet::new()
        } else {
            related_factors
        };

        Self {
            turn_index,
            answer_text: answer_text.into(),
            related_factors,
            score,
            low_confidence,
        }
    }
}
