//! Canonical artwork model
//!
//! Every provider reports image sizes in its own vocabulary. They all end up
//! as an [`ArtworkResult`]: one optional URL per [`SizeTier`] plus a `default`
//! URL that is always set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic image size, ordered smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Tiny,
    Small,
    Medium,
    Large,
    ExtraLarge,
    Mega,
}

impl SizeTier {
    /// All tiers, largest first.
    pub const DESCENDING: [SizeTier; 6] = [
        SizeTier::Mega,
        SizeTier::ExtraLarge,
        SizeTier::Large,
        SizeTier::Medium,
        SizeTier::Small,
        SizeTier::Tiny,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::Tiny => "tiny",
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
            SizeTier::ExtraLarge => "extra_large",
            SizeTier::Mega => "mega",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized artwork URLs for one album, artist or track.
///
/// Tiers a provider does not supply stay `None`. `default` is never empty: it
/// is the URL of the largest populated tier or, when no descriptor mapped to a
/// tier, the first untiered candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkResult {
    pub tiny: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub extra_large: Option<String>,
    pub mega: Option<String>,
    pub default: String,
}

impl ArtworkResult {
    /// URL stored for `tier`, if any
    pub fn get(&self, tier: SizeTier) -> Option<&str> {
        match tier {
            SizeTier::Tiny => self.tiny.as_deref(),
            SizeTier::Small => self.small.as_deref(),
            SizeTier::Medium => self.medium.as_deref(),
            SizeTier::Large => self.large.as_deref(),
            SizeTier::ExtraLarge => self.extra_large.as_deref(),
            SizeTier::Mega => self.mega.as_deref(),
        }
    }

    /// Populated tiers, smallest first
    pub fn populated_tiers(&self) -> Vec<SizeTier> {
        let mut tiers: Vec<SizeTier> = SizeTier::DESCENDING
            .iter()
            .copied()
            .filter(|tier| self.get(*tier).is_some())
            .collect();
        tiers.reverse();
        tiers
    }
}

/// How a provider identifies the size of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeIndicator {
    /// Size label or field name (`"extralarge"`, `"artworkUrl100"`)
    Label(String),
    /// Position in a largest-first array
    Position(usize),
}

/// One raw `(size, url)` pair as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImageDescriptor {
    pub indicator: SizeIndicator,
    pub url: String,
    /// Pixel dimensions when the provider reports them
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl RawImageDescriptor {
    pub fn labeled(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            indicator: SizeIndicator::Label(label.into()),
            url: url.into(),
            width: None,
            height: None,
        }
    }

    pub fn positioned(position: usize, url: impl Into<String>) -> Self {
        Self {
            indicator: SizeIndicator::Position(position),
            url: url.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// What the normalizer does with one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierMapping {
    Tier(SizeTier),
    /// No tier, but usable as `default` when nothing else is populated
    Fallback,
    Skip,
}

/// Provider-specific mapping from size indicator to tier.
#[derive(Debug, Clone, Copy)]
pub enum TierTable {
    /// Exact label match; unknown labels are skipped.
    Labels(&'static [(&'static str, SizeTier)]),
    /// Index into a largest-first array; positions past the table are
    /// fallback candidates.
    Positional(&'static [SizeTier]),
}

impl TierTable {
    pub fn map(&self, indicator: &SizeIndicator) -> TierMapping {
        match (self, indicator) {
            (TierTable::Labels(labels), SizeIndicator::Label(label)) => labels
                .iter()
                .find(|(name, _)| *name == label)
                .map(|(_, tier)| TierMapping::Tier(*tier))
                .unwrap_or(TierMapping::Skip),
            (TierTable::Positional(tiers), SizeIndicator::Position(index)) => tiers
                .get(*index)
                .map(|tier| TierMapping::Tier(*tier))
                .unwrap_or(TierMapping::Fallback),
            _ => TierMapping::Skip,
        }
    }
}
