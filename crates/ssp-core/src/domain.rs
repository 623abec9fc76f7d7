//! # Compliance Vocabulary — Tiers, Profile Kinds, Statuses
//!
//! Closed vocabularies shared by the resolver, the document store and the
//! validator. Each is a single enum with an exhaustive `as_str()` and a
//! `FromStr` that is the only place caller text is interpreted.
//!
//! Parsing is case-insensitive. Implementation statuses additionally accept
//! `-` or a space in place of `_` (`partially-implemented`).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SspError;

/// Normalize caller text for vocabulary matching.
fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Security categorization tier of a baseline.
///
/// | Tier | Adverse effect of compromise |
/// |------|------------------------------|
/// | LOW | limited |
/// | MODERATE | serious |
/// | HIGH | severe or catastrophic |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Limited adverse effect.
    Low,
    /// Serious adverse effect.
    Moderate,
    /// Severe or catastrophic adverse effect.
    High,
}

impl Tier {
    /// All tiers, lowest first.
    pub fn all() -> &'static [Tier] {
        &[Self::Low, Self::Moderate, Self::High]
    }

    /// Canonical uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }

    /// Lowercase keyword searched for in profile document names.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = SspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "LOW" => Ok(Self::Low),
            "MODERATE" => Ok(Self::Moderate),
            "HIGH" => Ok(Self::High),
            _ => Err(SspError::InvalidTier {
                input: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ProfileKind
// ---------------------------------------------------------------------------

/// Which family of profile documents a baseline is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    /// Published reference baselines.
    #[default]
    Standard,
    /// Agency-tailored overlays of the reference baselines.
    AgencySpecific,
}

impl ProfileKind {
    /// All profile kinds.
    pub fn all() -> &'static [ProfileKind] {
        &[Self::Standard, Self::AgencySpecific]
    }

    /// Canonical kebab-case name, also the profile directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::AgencySpecific => "agency-specific",
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = SspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "STANDARD" => Ok(Self::Standard),
            "AGENCY_SPECIFIC" | "AGENCY" => Ok(Self::AgencySpecific),
            _ => Err(SspError::InvalidProfileKind {
                input: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ImplementationStatus
// ---------------------------------------------------------------------------

/// Implementation state of one control within a compliance document.
///
/// Only [`Implemented`](Self::Implemented) and
/// [`PartiallyImplemented`](Self::PartiallyImplemented) earn credit in the
/// completion score; see [`score_weight`](Self::score_weight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImplementationStatus {
    /// Fully in place.
    Implemented,
    /// Partly in place.
    PartiallyImplemented,
    /// Not yet in place. Every seeded record starts here.
    Planned,
    /// Satisfied by a compensating control.
    AlternativeImplementation,
    /// Excluded for this system.
    NotApplicable,
}

impl ImplementationStatus {
    /// All statuses in canonical order.
    pub fn all() -> &'static [ImplementationStatus] {
        &[
            Self::Implemented,
            Self::PartiallyImplemented,
            Self::Planned,
            Self::AlternativeImplementation,
            Self::NotApplicable,
        ]
    }

    /// Canonical SCREAMING_SNAKE_CASE name, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Implemented => "IMPLEMENTED",
            Self::PartiallyImplemented => "PARTIALLY_IMPLEMENTED",
            Self::Planned => "PLANNED",
            Self::AlternativeImplementation => "ALTERNATIVE_IMPLEMENTATION",
            Self::NotApplicable => "NOT_APPLICABLE",
        }
    }

    /// Numerator weight in the completion score.
    pub fn score_weight(&self) -> f64 {
        match self {
            Self::Implemented => 1.0,
            Self::PartiallyImplemented => 0.5,
            Self::Planned | Self::AlternativeImplementation | Self::NotApplicable => 0.0,
        }
    }
}

impl std::fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImplementationStatus {
    type Err = SspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == token)
            .ok_or_else(|| SspError::InvalidStatus {
                input: s.to_string(),
            })
    }
}
