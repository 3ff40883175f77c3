//! Mutation planning: turns a [`ConflictAnalysis`] and an assignment mode
//! into the exact value to write for each target.
//!
//! Every input target gets exactly one [`PlanEntry`], either a concrete
//! write or an explicit no-op with the reason it was skipped.

use indexmap::IndexSet;
use serde::Serialize;

use crate::analysis::{ConflictAnalysis, ConflictBucket};
use crate::assignment::{AssignmentRequest, AssignmentValue, FieldPatch};
use crate::selector::{AssignmentMode, FieldSelector};
use crate::target::{join_value_set, CurrentValue};
use crate::types::TargetId;

/// Why a target needs no write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The target already holds the requested value(s).
    AlreadySet,
    /// Append on a single-valued field that is already filled.
    HasExistingValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum PlannedAction {
    Write(String),
    NoOp(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub target_id: TargetId,
    pub bucket: ConflictBucket,
    pub action: PlannedAction,
}

impl PlanEntry {
    pub fn is_write(&self) -> bool {
        matches!(self.action, PlannedAction::Write(_))
    }
}

/// Per-target plan for one assignment invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationPlan {
    selector: FieldSelector,
    mode: AssignmentMode,
    entries: Vec<PlanEntry>,
}

impl MutationPlan {
    pub fn selector(&self) -> FieldSelector {
        self.selector
    }

    pub fn mode(&self) -> AssignmentMode {
        self.mode
    }

    /// All entries in the order targets were supplied.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Write entries as `(target, patch)` pairs, in input order.
    pub fn writes(&self) -> impl Iterator<Item = (&TargetId, FieldPatch)> + '_ {
        self.entries.iter().filter_map(|entry| match &entry.action {
            PlannedAction::Write(value) => Some((
                &entry.target_id,
                FieldPatch {
                    selector: self.selector,
                    value: value.clone(),
                },
            )),
            PlannedAction::NoOp(_) => None,
        })
    }

    /// Targets that will not be written, in input order.
    pub fn skipped(&self) -> impl Iterator<Item = &TargetId> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.is_write())
            .map(|e| &e.target_id)
    }

    pub fn write_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_write()).count()
    }

    pub fn noop_count(&self) -> usize {
        self.entries.len() - self.write_count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the mutation plan for an analyzed request.
pub fn plan(analysis: &ConflictAnalysis, request: &AssignmentRequest) -> MutationPlan {
    let entries = analysis
        .entries
        .iter()
        .map(|entry| PlanEntry {
            target_id: entry.target_id.clone(),
            bucket: entry.bucket,
            action: plan_action(entry.bucket, &entry.current, request),
        })
        .collect();

    MutationPlan {
        selector: request.selector,
        mode: request.mode,
        entries,
    }
}

fn plan_action(
    bucket: ConflictBucket,
    current: &CurrentValue,
    request: &AssignmentRequest,
) -> PlannedAction {
    match (&request.value, request.mode) {
        (AssignmentValue::Single(value), AssignmentMode::Replace) => match bucket {
            ConflictBucket::WithSameValue => PlannedAction::NoOp(SkipReason::AlreadySet),
            _ => PlannedAction::Write(value.clone()),
        },
        (AssignmentValue::Single(value), AssignmentMode::Append) => match bucket {
            ConflictBucket::WithoutExisting => PlannedAction::Write(value.clone()),
            ConflictBucket::WithExisting => PlannedAction::NoOp(SkipReason::HasExistingValue),
            ConflictBucket::WithSameValue => PlannedAction::NoOp(SkipReason::AlreadySet),
        },
        (AssignmentValue::Multi(requested), AssignmentMode::Replace) => {
            PlannedAction::Write(join_value_set(requested))
        }
        (AssignmentValue::Multi(requested), AssignmentMode::Append) => match bucket {
            ConflictBucket::WithSameValue => PlannedAction::NoOp(SkipReason::AlreadySet),
            _ => {
                let mut union: IndexSet<String> = match current {
                    CurrentValue::Multi(existing) => existing.clone(),
                    CurrentValue::Single(existing) => existing.iter().cloned().collect(),
                };
                union.extend(requested.iter().cloned());
                PlannedAction::Write(join_value_set(&union))
            }
        },
    }
}
