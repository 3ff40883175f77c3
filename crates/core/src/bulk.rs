//! Bulk assignment entry points: dry-run preview and apply.
//!
//! Both paths validate the batch before doing anything. A batch that fails
//! validation never reaches the writer.

use std::collections::HashSet;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::analysis::{analyze, BucketCounts, ConflictAnalysis, ConflictBucket};
use crate::assignment::AssignmentRequest;
use crate::error::CoreError;
use crate::executor::{BulkExecutor, BulkResult};
use crate::plan::{plan, MutationPlan, PlanEntry};
use crate::store::TargetWriter;
use crate::target::Target;
use crate::types::TargetId;

/// Maximum number of targets per bulk assignment.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Minimum number of targets per bulk assignment.
pub const MIN_BATCH_SIZE: usize = 1;

/// Validate batch size is within allowed bounds.
pub fn validate_batch_size(count: usize) -> Result<(), CoreError> {
    if count < MIN_BATCH_SIZE {
        return Err(CoreError::Validation(format!(
            "Batch size must be at least {MIN_BATCH_SIZE}"
        )));
    }
    if count > MAX_BATCH_SIZE {
        return Err(CoreError::Validation(format!(
            "Batch size {count} exceeds maximum of {MAX_BATCH_SIZE}"
        )));
    }
    Ok(())
}

/// Reject target lists that name the same id twice.
pub fn validate_unique_ids<'a>(
    ids: impl IntoIterator<Item = &'a TargetId>,
) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CoreError::Validation(format!(
                "Target '{id}' appears more than once"
            )));
        }
    }
    Ok(())
}

fn validate_targets(targets: &[Target]) -> Result<(), CoreError> {
    validate_batch_size(targets.len())?;
    validate_unique_ids(targets.iter().map(|t| &t.id))
}

/// Dry-run outcome shown to the user before committing.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentPreview {
    pub request: AssignmentRequest,
    pub counts: BucketCounts,
    pub without_existing: Vec<TargetId>,
    pub with_existing: Vec<TargetId>,
    pub with_same_value: Vec<TargetId>,
    pub planned_writes: usize,
    pub entries: Vec<PlanEntry>,
}

impl AssignmentPreview {
    fn build(
        request: &AssignmentRequest,
        analysis: &ConflictAnalysis,
        plan: &MutationPlan,
    ) -> Self {
        let ids = |bucket: ConflictBucket| -> Vec<TargetId> {
            analysis.bucket(bucket).into_iter().cloned().collect()
        };
        Self {
            request: request.clone(),
            counts: analysis.counts(),
            without_existing: ids(ConflictBucket::WithoutExisting),
            with_existing: ids(ConflictBucket::WithExisting),
            with_same_value: ids(ConflictBucket::WithSameValue),
            planned_writes: plan.write_count(),
            entries: plan.entries().to_vec(),
        }
    }
}

/// Analyze and plan without writing anything.
pub fn preview(
    targets: &[Target],
    request: &AssignmentRequest,
) -> Result<AssignmentPreview, CoreError> {
    validate_targets(targets)?;
    let analysis = analyze(targets, request);
    let plan = plan(&analysis, request);
    Ok(AssignmentPreview::build(request, &analysis, &plan))
}

/// Analyze, plan and apply an assignment to `targets`, one write at a time.
///
/// Returns `Err` only when the batch is rejected up front. Once writing
/// starts, per-target failures are collected in the returned
/// [`BulkResult`].
pub async fn assign<W: TargetWriter + ?Sized>(
    targets: &[Target],
    request: &AssignmentRequest,
    writer: &W,
    cancel: Option<CancellationToken>,
) -> Result<BulkResult, CoreError> {
    validate_targets(targets)?;

    let analysis = analyze(targets, request);
    let plan = plan(&analysis, request);

    let mut executor = BulkExecutor::new(writer);
    if let Some(token) = cancel {
        executor = executor.with_cancellation(token);
    }
    Ok(executor.execute(&plan).await)
}
