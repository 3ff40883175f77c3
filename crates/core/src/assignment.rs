//! Assignment values, requests, and the field patches sent to the store.

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::CoreError;
use crate::selector::{AssignmentMode, Cardinality, FieldSelector};
use crate::target::parse_value_set;

/// The value being assigned, tagged by the selector's cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cardinality", content = "value", rename_all = "snake_case")]
pub enum AssignmentValue {
    Single(String),
    Multi(IndexSet<String>),
}

impl AssignmentValue {
    /// Build the variant matching `selector`'s cardinality from raw user
    /// input. Values are trimmed; blanks are dropped. Multi-valued input is
    /// split on the stored separator so request members compare equal to
    /// stored members.
    pub fn for_selector(selector: FieldSelector, raw: &[String]) -> Result<Self, CoreError> {
        let cleaned: IndexSet<String> = match selector.cardinality() {
            Cardinality::Single => raw
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
            Cardinality::Multi => raw.iter().flat_map(|v| parse_value_set(v)).collect(),
        };

        if cleaned.is_empty() {
            return Err(CoreError::Validation(format!(
                "A value is required for '{}'",
                selector.as_str()
            )));
        }

        match selector.cardinality() {
            Cardinality::Single => {
                if cleaned.len() > 1 {
                    return Err(CoreError::Validation(format!(
                        "'{}' holds a single value, got {}",
                        selector.as_str(),
                        cleaned.len()
                    )));
                }
                let value = cleaned.into_iter().next().unwrap_or_default();
                Ok(Self::Single(value))
            }
            Cardinality::Multi => Ok(Self::Multi(cleaned)),
        }
    }

    /// Requested members as a set. A single value is a one-member set.
    pub fn members(&self) -> IndexSet<String> {
        match self {
            Self::Single(v) => IndexSet::from([v.clone()]),
            Self::Multi(set) => set.clone(),
        }
    }
}

/// A validated bulk assignment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRequest {
    pub selector: FieldSelector,
    pub value: AssignmentValue,
    pub mode: AssignmentMode,
}

impl AssignmentRequest {
    pub fn new(
        selector: FieldSelector,
        raw_values: &[String],
        mode: AssignmentMode,
    ) -> Result<Self, CoreError> {
        let value = AssignmentValue::for_selector(selector, raw_values)?;
        Ok(Self {
            selector,
            value,
            mode,
        })
    }
}

/// Minimal update for one target: a single field and its new stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPatch {
    pub selector: FieldSelector,
    pub value: String,
}

impl FieldPatch {
    /// JSON body with only the changed field, e.g. `{"tags": "A, B"}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            self.selector.field_name().to_string(),
            serde_json::Value::String(self.value.clone()),
        );
        serde_json::Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_selector_takes_one_value() {
        let v = AssignmentValue::for_selector(FieldSelector::Studio, &raw(&[" Acme "])).unwrap();
        assert_eq!(v, AssignmentValue::Single("Acme".into()));
    }

    #[test]
    fn single_selector_rejects_many() {
        let result = AssignmentValue::for_selector(FieldSelector::Studio, &raw(&["A", "B"]));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn duplicate_single_values_collapse() {
        let v = AssignmentValue::for_selector(FieldSelector::Label, &raw(&["X", " X"])).unwrap();
        assert_eq!(v, AssignmentValue::Single("X".into()));
    }

    #[test]
    fn multi_selector_builds_set() {
        let v = AssignmentValue::for_selector(FieldSelector::Tag, &raw(&["B", "C", "B", ""]))
            .unwrap();
        assert_eq!(v.members().into_iter().collect::<Vec<_>>(), vec!["B", "C"]);
    }

    #[test]
    fn multi_member_split_on_separator() {
        let v = AssignmentValue::for_selector(FieldSelector::Tag, &raw(&["A, B", "B ,C", ","]))
            .unwrap();
        assert_eq!(v.members().into_iter().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn separator_only_multi_value_rejected() {
        let result = AssignmentValue::for_selector(FieldSelector::Actress, &raw(&[" , ,"]));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_value_rejected() {
        let result = AssignmentValue::for_selector(FieldSelector::Tag, &raw(&["", "  "]));
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("tag"));
    }

    #[test]
    fn patch_contains_only_field() {
        let patch = FieldPatch {
            selector: FieldSelector::Tag,
            value: "A, B".into(),
        };
        assert_eq!(patch.to_json(), serde_json::json!({ "tags": "A, B" }));
    }
}
