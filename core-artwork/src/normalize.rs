//! Descriptor normalization
//!
//! `normalize` is the one algorithm shared by every provider. Providers differ
//! only in how they turn a response into descriptors and in the
//! [`TierTable`] they pass.

use crate::artwork::{ArtworkResult, RawImageDescriptor, SizeTier, TierMapping, TierTable};
use crate::error::{ArtworkError, Result};
use tracing::trace;

/// Build an [`ArtworkResult`] from raw descriptors.
///
/// - Descriptors with an empty URL, or whose indicator the table skips, are
///   ignored.
/// - When two descriptors map to the same tier the later one wins.
/// - `default` is the largest populated tier, else the first fallback
///   candidate in input order.
///
/// # Errors
///
/// [`ArtworkError::NotFound`] when no descriptor yields a usable URL.
pub fn normalize(descriptors: &[RawImageDescriptor], table: &TierTable) -> Result<ArtworkResult> {
    let mut tiers: [Option<String>; 6] = Default::default();
    let mut fallback: Option<&str> = None;

    for descriptor in descriptors {
        if descriptor.url.is_empty() {
            trace!(indicator = ?descriptor.indicator, "Skipping image with empty URL");
            continue;
        }

        match table.map(&descriptor.indicator) {
            TierMapping::Tier(tier) => tiers[tier as usize] = Some(descriptor.url.clone()),
            TierMapping::Fallback => {
                fallback.get_or_insert(descriptor.url.as_str());
            }
            TierMapping::Skip => {
                trace!(indicator = ?descriptor.indicator, "Skipping image with unknown size");
            }
        }
    }

    let default = SizeTier::DESCENDING
        .iter()
        .find_map(|tier| tiers[*tier as usize].clone())
        .or_else(|| fallback.map(str::to_string))
        .ok_or(ArtworkError::NotFound)?;

    let [tiny, small, medium, large, extra_large, mega] = tiers;

    Ok(ArtworkResult {
        tiny,
        small,
        medium,
        large,
        extra_large,
        mega,
        default,
    })
}
