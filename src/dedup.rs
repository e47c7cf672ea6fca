//! Duplicate detection for candidate colors
//!
//! Two tiers:
//! - exact: the candidate's normalized string already exists (manual input)
//! - perceptual: the candidate is within a Euclidean RGB distance of an
//!   existing color (palette extraction), alpha ignored
//!
//! For extraction batches the [`DedupPolicy`] decides whether accepted
//! candidates join the comparison set.

use crate::collection::ColorCollection;
use crate::color::ColorValue;
use crate::config::DedupPolicy;
use crate::constants::dedup::DEFAULT_DISTANCE_THRESHOLD;

/// Perceptual duplicate filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deduplicator {
    threshold: f64,
    policy: DedupPolicy,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DISTANCE_THRESHOLD, DedupPolicy::default())
    }
}

impl Deduplicator {
    pub fn new(threshold: f64, policy: DedupPolicy) -> Self {
        Self { threshold, policy }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Exact tier: is this normalized string already in the collection?
    pub fn is_exact_duplicate(&self, normalized: &str, existing: &ColorCollection) -> bool {
        existing.contains(normalized)
    }

    /// Perceptual tier: is any existing color closer than the threshold?
    pub fn is_perceptual_duplicate<'a, I>(&self, candidate: &ColorValue, existing: I) -> bool
    where
        I: IntoIterator<Item = &'a ColorValue>,
    {
        existing
            .into_iter()
            .any(|color| candidate.distance(color) < self.threshold)
    }

    /// Filter an extraction batch against the collection
    ///
    /// Returns the surviving candidates in their original order.
    pub fn filter_batch(
        &self,
        candidates: &[ColorValue],
        existing: &ColorCollection,
    ) -> Vec<ColorValue> {
        let baseline: Vec<ColorValue> = existing.values().copied().collect();
        let mut survivors: Vec<ColorValue> = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let against_batch = match self.policy {
                DedupPolicy::Incremental => survivors.as_slice(),
                DedupPolicy::Snapshot => &[],
            };
            if self.is_perceptual_duplicate(candidate, baseline.iter().chain(against_batch)) {
                continue;
            }
            survivors.push(*candidate);
        }

        tracing::debug!(
            candidates = candidates.len(),
            survivors = survivors.len(),
            policy = ?self.policy,
            "filtered extraction batch"
        );
        survivors
    }
}
