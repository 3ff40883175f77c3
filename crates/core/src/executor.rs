//! Sequential bulk executor.
//!
//! Applies a [`MutationPlan`] one target at a time through an injected
//! [`TargetWriter`]. Writes are never issued concurrently: multi-valued
//! appends are computed from a single read and written back whole, so
//! overlapping writes to the same row would lose members.
//!
//! A failed write is recorded and the batch moves on. An optional
//! [`CancellationToken`] is checked before each write; cancelling keeps
//! everything collected so far.

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::plan::MutationPlan;
use crate::store::TargetWriter;
use crate::types::{TargetId, Timestamp};

/// How a bulk run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Completed,
    Cancelled,
}

/// A failed write for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetError {
    pub target_id: TargetId,
    pub message: String,
}

/// Aggregate outcome of one bulk run. Built fresh per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub operation_id: Uuid,
    pub updated_count: usize,
    pub updated_targets: Vec<TargetId>,
    pub skipped_targets: Vec<TargetId>,
    pub errors: Vec<TargetError>,
    pub state: RunState,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

impl BulkResult {
    /// True when the run completed and no write failed.
    pub fn is_complete_success(&self) -> bool {
        self.state == RunState::Completed && self.errors.is_empty()
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} updated, {} skipped, {} failed",
            self.updated_count,
            self.skipped_targets.len(),
            self.errors.len()
        );
        if self.state == RunState::Cancelled {
            line.push_str(" (cancelled)");
        }
        line
    }
}

/// Applies mutation plans through a [`TargetWriter`].
pub struct BulkExecutor<'a, W: TargetWriter + ?Sized> {
    writer: &'a W,
    cancel: Option<CancellationToken>,
}

impl<'a, W: TargetWriter + ?Sized> BulkExecutor<'a, W> {
    pub fn new(writer: &'a W) -> Self {
        Self {
            writer,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| c.is_cancelled())
    }

    /// Run every write in the plan, in input order.
    pub async fn execute(&self, plan: &MutationPlan) -> BulkResult {
        let operation_id = Uuid::now_v7();
        let started_at = Utc::now();
        let selector = plan.selector();

        tracing::info!(
            %operation_id,
            selector = selector.as_str(),
            mode = plan.mode().as_str(),
            planned_writes = plan.write_count(),
            skipped = plan.noop_count(),
            "Bulk assignment started"
        );

        let mut updated_targets = Vec::new();
        let mut errors = Vec::new();
        let mut state = RunState::Completed;

        for (target_id, patch) in plan.writes() {
            if self.is_cancelled() {
                tracing::warn!(
                    %operation_id,
                    completed = updated_targets.len() + errors.len(),
                    "Bulk assignment cancelled"
                );
                state = RunState::Cancelled;
                break;
            }

            match self.writer.update_target_field(target_id, &patch).await {
                Ok(()) => {
                    tracing::debug!(
                        %operation_id,
                        %target_id,
                        value = %patch.value,
                        "Target updated"
                    );
                    updated_targets.push(target_id.clone());
                }
                Err(e) => {
                    tracing::warn!(%operation_id, %target_id, error = %e, "Target update failed");
                    errors.push(TargetError {
                        target_id: target_id.clone(),
                        message: e.message,
                    });
                }
            }
        }

        let result = BulkResult {
            operation_id,
            updated_count: updated_targets.len(),
            updated_targets,
            skipped_targets: plan.skipped().cloned().collect(),
            errors,
            state,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            %operation_id,
            selector = selector.as_str(),
            updated = result.updated_count,
            failed = result.errors.len(),
            state = ?result.state,
            "Bulk assignment finished"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::analysis::analyze;
    use crate::assignment::{AssignmentRequest, FieldPatch};
    use crate::plan::plan;
    use crate::selector::{AssignmentMode, FieldSelector};
    use crate::store::WriteError;
    use crate::target::Target;

    /// Records every call; fails for ids in `fail_for`. Optionally cancels
    /// a token after `cancel_after` successful calls.
    #[derive(Default)]
    struct RecordingWriter {
        calls: Mutex<Vec<(String, String)>>,
        fail_for: HashSet<String>,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    #[async_trait]
    impl TargetWriter for RecordingWriter {
        async fn update_target_field(
            &self,
            target_id: &TargetId,
            patch: &FieldPatch,
        ) -> Result<(), WriteError> {
            let count = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((target_id.to_string(), patch.value.clone()));
                calls.len()
            };
            if let Some((after, token)) = &self.cancel_after {
                if count >= *after {
                    token.cancel();
                }
            }
            if self.fail_for.contains(target_id.as_str()) {
                return Err(WriteError::new(format!("rejected {target_id}")));
            }
            Ok(())
        }
    }

    fn build_plan(
        targets: &[Target],
        selector: FieldSelector,
        values: &[&str],
        mode: AssignmentMode,
    ) -> MutationPlan {
        let raw: Vec<String> = values.iter().map(|s| s.to_string()).collect();
        let req = AssignmentRequest::new(selector, &raw, mode).unwrap();
        plan(&analyze(targets, &req), &req)
    }

    fn three_targets() -> Vec<Target> {
        vec![Target::new("m1"), Target::new("m2"), Target::new("m3")]
    }

    #[tokio::test]
    async fn partial_failure_is_isolated() {
        let writer = RecordingWriter {
            fail_for: HashSet::from(["m2".to_string()]),
            ..Default::default()
        };
        let p = build_plan(
            &three_targets(),
            FieldSelector::Studio,
            &["Acme"],
            AssignmentMode::Replace,
        );

        let result = BulkExecutor::new(&writer).execute(&p).await;

        assert_eq!(result.updated_count, 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].target_id.as_str(), "m2");
        assert_eq!(result.errors[0].message, "rejected m2");
        assert_eq!(
            result.updated_targets,
            vec![TargetId::from("m1"), TargetId::from("m3")]
        );
        assert_eq!(result.state, RunState::Completed);
        assert!(!result.is_complete_success());
    }

    #[tokio::test]
    async fn all_failures_still_return_result() {
        let writer = RecordingWriter {
            fail_for: HashSet::from(["m1".into(), "m2".into(), "m3".into()]),
            ..Default::default()
        };
        let p = build_plan(
            &three_targets(),
            FieldSelector::Tag,
            &["X"],
            AssignmentMode::Append,
        );

        let result = BulkExecutor::new(&writer).execute(&p).await;

        assert_eq!(result.updated_count, 0);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.summary(), "0 updated, 0 skipped, 3 failed");
    }

    #[tokio::test]
    async fn writes_follow_input_order() {
        let writer = RecordingWriter::default();
        let targets = vec![Target::new("c"), Target::new("a"), Target::new("b")];
        let p = build_plan(
            &targets,
            FieldSelector::Label,
            &["L"],
            AssignmentMode::Replace,
        );

        BulkExecutor::new(&writer).execute(&p).await;

        let ids: Vec<String> = writer.calls.lock().unwrap().iter().map(|c| c.0.clone()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn noop_entries_issue_no_write() {
        let writer = RecordingWriter::default();
        let targets = vec![Target::new("m1").with_field(FieldSelector::Director, "Jane")];
        let p = build_plan(
            &targets,
            FieldSelector::Director,
            &["John"],
            AssignmentMode::Append,
        );

        let result = BulkExecutor::new(&writer).execute(&p).await;

        assert!(writer.calls.lock().unwrap().is_empty());
        assert_eq!(result.updated_count, 0);
        assert_eq!(result.skipped_targets, vec![TargetId::from("m1")]);
        assert!(result.is_complete_success());
    }

    #[tokio::test]
    async fn cancellation_stops_remaining_writes() {
        let token = CancellationToken::new();
        let writer = RecordingWriter {
            fail_for: HashSet::from(["m1".to_string()]),
            cancel_after: Some((2, token.clone())),
            ..Default::default()
        };
        let p = build_plan(
            &three_targets(),
            FieldSelector::Series,
            &["S"],
            AssignmentMode::Replace,
        );

        let result = BulkExecutor::new(&writer)
            .with_cancellation(token)
            .execute(&p)
            .await;

        assert_eq!(writer.calls.lock().unwrap().len(), 2);
        assert_eq!(result.state, RunState::Cancelled);
        assert_eq!(result.updated_targets, vec![TargetId::from("m2")]);
        assert_eq!(result.errors.len(), 1);
        assert!(result.summary().ends_with("(cancelled)"));
    }

    #[tokio::test]
    async fn cancelled_before_start_writes_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let writer = RecordingWriter::default();
        let p = build_plan(
            &three_targets(),
            FieldSelector::Type,
            &["Feature"],
            AssignmentMode::Replace,
        );

        let result = BulkExecutor::new(&writer)
            .with_cancellation(token)
            .execute(&p)
            .await;

        assert!(writer.calls.lock().unwrap().is_empty());
        assert_eq!(result.state, RunState::Cancelled);
        assert_eq!(result.updated_count, 0);
    }
}
