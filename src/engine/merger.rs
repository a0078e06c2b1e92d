//! Merging of adjacent qualifying ranges.
//!
//! A single pass over ranges in station order. Each range either extends the
//! current run or closes it and starts a new one, which yields the maximal
//! contiguous runs of mutually mergeable ranges.

use super::range::{MergedRange, Payload};
use crate::config::MergePolicy;
use tracing::debug;

/// Merges spatially adjacent ranges under a mergeability policy
#[derive(Debug, Clone, Copy)]
pub struct RangeMerger {
    tolerance: f64,
    policy: MergePolicy,
}

impl RangeMerger {
    pub fn new(tolerance: f64, policy: MergePolicy) -> Self {
        Self { tolerance, policy }
    }

    /// Whether `next` continues the run ending with `current`
    pub fn is_linked<P: Payload>(&self, current: &MergedRange<P>, next: &MergedRange<P>) -> bool {
        if (current.front_edge - next.back_edge).abs() > self.tolerance {
            return false;
        }
        match self.policy {
            MergePolicy::Always => true,
            MergePolicy::SameDescription => current.value.describe() == next.value.describe(),
            MergePolicy::Payload => current.value.is_mergeable(&next.value),
        }
    }

    /// Collapse runs of linked ranges; input must be in ascending station order
    pub fn merge<P: Payload>(&self, ranges: Vec<MergedRange<P>>) -> Vec<MergedRange<P>> {
        let input_count = ranges.len();
        let mut merged: Vec<MergedRange<P>> = Vec::new();
        let mut iter = ranges.into_iter();

        let Some(mut current) = iter.next() else {
            return merged;
        };

        for next in iter {
            if self.is_linked(&current, &next) {
                current.value.merge(&next.value);
                current.front_edge = next.front_edge;
                current.stations.extend(next.stations);
            } else {
                merged.push(current);
                current = next;
            }
        }
        merged.push(current);

        debug!(
            "Merged {} ranges into {} rows ({:?} policy)",
            input_count,
            merged.len(),
            self.policy
        );
        merged
    }
}
