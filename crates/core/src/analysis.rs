//! Conflict analysis for bulk assignments.
//!
//! Classifies every target into exactly one [`ConflictBucket`] based on its
//! current value, the requested value and the selector's cardinality. The
//! classification is a pure function of those three inputs, so a preview
//! call and the subsequent apply always agree on unchanged data.

use serde::Serialize;

use crate::assignment::{AssignmentRequest, AssignmentValue};
use crate::selector::Cardinality;
use crate::target::{CurrentValue, Target};
use crate::types::TargetId;

/// How a target's existing value relates to the requested value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictBucket {
    /// The field is empty.
    WithoutExisting,
    /// The field holds something other than the request (single), or lacks
    /// at least one requested member (multi).
    WithExisting,
    /// The field already equals the request (single), or already contains
    /// every requested member (multi).
    WithSameValue,
}

impl ConflictBucket {
    pub const ALL: [ConflictBucket; 3] = [
        Self::WithoutExisting,
        Self::WithExisting,
        Self::WithSameValue,
    ];
}

/// Classification of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedTarget {
    pub target_id: TargetId,
    pub bucket: ConflictBucket,
    pub current: CurrentValue,
}

/// Per-bucket totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub without_existing: usize,
    pub with_existing: usize,
    pub with_same_value: usize,
    pub total: usize,
}

/// Result of [`analyze`], one entry per input target in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictAnalysis {
    pub cardinality: Cardinality,
    pub entries: Vec<AnalyzedTarget>,
}

impl ConflictAnalysis {
    /// Targets classified into `bucket`, in input order.
    pub fn bucket(&self, bucket: ConflictBucket) -> Vec<&TargetId> {
        self.entries
            .iter()
            .filter(|e| e.bucket == bucket)
            .map(|e| &e.target_id)
            .collect()
    }

    pub fn counts(&self) -> BucketCounts {
        let mut counts = BucketCounts {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.bucket {
                ConflictBucket::WithoutExisting => counts.without_existing += 1,
                ConflictBucket::WithExisting => counts.with_existing += 1,
                ConflictBucket::WithSameValue => counts.with_same_value += 1,
            }
        }
        counts
    }
}

/// Classify every target against the request.
pub fn analyze(targets: &[Target], request: &AssignmentRequest) -> ConflictAnalysis {
    let entries = targets
        .iter()
        .map(|target| {
            let current = target.current_value(request.selector);
            AnalyzedTarget {
                target_id: target.id.clone(),
                bucket: classify(&current, &request.value),
                current,
            }
        })
        .collect();

    ConflictAnalysis {
        cardinality: request.selector.cardinality(),
        entries,
    }
}

/// Bucket for a single normalized value.
pub fn classify(current: &CurrentValue, requested: &AssignmentValue) -> ConflictBucket {
    match current {
        CurrentValue::Single(None) => ConflictBucket::WithoutExisting,
        CurrentValue::Single(Some(existing)) => {
            let same = match requested {
                AssignmentValue::Single(value) => existing == value.trim(),
                AssignmentValue::Multi(set) => set.len() == 1 && set.contains(existing),
            };
            if same {
                ConflictBucket::WithSameValue
            } else {
                ConflictBucket::WithExisting
            }
        }
        CurrentValue::Multi(set) if set.is_empty() => ConflictBucket::WithoutExisting,
        CurrentValue::Multi(set) => {
            if requested.members().iter().all(|m| set.contains(m)) {
                ConflictBucket::WithSameValue
            } else {
                ConflictBucket::WithExisting
            }
        }
    }
}
