//! Movie record snapshots and value-set normalization.
//!
//! A [`Target`] is a read-only snapshot of the fields bulk assignment cares
//! about. Multi-valued fields arrive from the hosted store as
//! comma-separated strings; [`parse_value_set`] turns them into an ordered
//! set of trimmed, non-empty members.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::selector::{Cardinality, FieldSelector};
use crate::types::TargetId;

/// Separator used when writing multi-valued fields back to the store.
pub const VALUE_SEPARATOR: &str = ", ";

/// Snapshot of a movie record's assignable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default, rename = "type")]
    pub movie_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub actress: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
}

/// A target's current value for one selector, shaped by its cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cardinality", content = "value", rename_all = "snake_case")]
pub enum CurrentValue {
    Single(Option<String>),
    Multi(IndexSet<String>),
}

impl CurrentValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(v) => v.is_none(),
            Self::Multi(set) => set.is_empty(),
        }
    }
}

impl Target {
    pub fn new(id: impl Into<TargetId>) -> Self {
        Self {
            id: id.into(),
            studio: None,
            series: None,
            movie_type: None,
            label: None,
            director: None,
            tags: None,
            actress: None,
            actors: None,
        }
    }

    /// Builder used by stores and tests to populate a field.
    pub fn with_field(mut self, selector: FieldSelector, value: impl Into<String>) -> Self {
        self.set_field(selector, Some(value.into()));
        self
    }

    /// Raw stored value for a selector.
    pub fn field(&self, selector: FieldSelector) -> Option<&str> {
        let slot = match selector {
            FieldSelector::Studio => &self.studio,
            FieldSelector::Series => &self.series,
            FieldSelector::Type => &self.movie_type,
            FieldSelector::Label => &self.label,
            FieldSelector::Director => &self.director,
            FieldSelector::Tag => &self.tags,
            FieldSelector::Actress => &self.actress,
            FieldSelector::Actors => &self.actors,
        };
        slot.as_deref()
    }

    pub fn set_field(&mut self, selector: FieldSelector, value: Option<String>) {
        let slot = match selector {
            FieldSelector::Studio => &mut self.studio,
            FieldSelector::Series => &mut self.series,
            FieldSelector::Type => &mut self.movie_type,
            FieldSelector::Label => &mut self.label,
            FieldSelector::Director => &mut self.director,
            FieldSelector::Tag => &mut self.tags,
            FieldSelector::Actress => &mut self.actress,
            FieldSelector::Actors => &mut self.actors,
        };
        *slot = value;
    }

    /// Normalized current value. Blank single values become `None`; multi
    /// values that contain nothing but separators become the empty set.
    pub fn current_value(&self, selector: FieldSelector) -> CurrentValue {
        let raw = self.field(selector);
        match selector.cardinality() {
            Cardinality::Single => CurrentValue::Single(
                raw.map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            ),
            Cardinality::Multi => CurrentValue::Multi(raw.map(parse_value_set).unwrap_or_default()),
        }
    }
}

/// Split a comma-separated field into trimmed, non-empty, de-duplicated
/// members in first-seen order.
pub fn parse_value_set(raw: &str) -> IndexSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join set members back into the stored comma-separated form.
pub fn join_value_set<'a>(members: impl IntoIterator<Item = &'a String>) -> String {
    members
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(VALUE_SEPARATOR)
}
