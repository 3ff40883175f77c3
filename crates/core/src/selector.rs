//! Field selectors and assignment modes for bulk metadata edits.
//!
//! A [`FieldSelector`] names the movie relation being assigned. Each selector
//! has a fixed [`Cardinality`] which drives both conflict analysis and
//! planning.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SEL_STUDIO: &str = "studio";
pub const SEL_SERIES: &str = "series";
pub const SEL_TYPE: &str = "type";
pub const SEL_LABEL: &str = "label";
pub const SEL_TAG: &str = "tag";
pub const SEL_ACTRESS: &str = "actress";
pub const SEL_ACTORS: &str = "actors";
pub const SEL_DIRECTOR: &str = "director";

/// All valid selector strings.
pub const VALID_SELECTORS: &[&str] = &[
    SEL_STUDIO,
    SEL_SERIES,
    SEL_TYPE,
    SEL_LABEL,
    SEL_TAG,
    SEL_ACTRESS,
    SEL_ACTORS,
    SEL_DIRECTOR,
];

pub const MODE_REPLACE: &str = "replace";
pub const MODE_APPEND: &str = "append";

// ---------------------------------------------------------------------------
// Cardinality
// ---------------------------------------------------------------------------

/// Whether a selector holds one value or a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Single,
    Multi,
}

// ---------------------------------------------------------------------------
// FieldSelector
// ---------------------------------------------------------------------------

/// The movie relation targeted by a bulk assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSelector {
    Studio,
    Series,
    Type,
    Label,
    Tag,
    Actress,
    Actors,
    Director,
}

impl FieldSelector {
    pub const ALL: [FieldSelector; 8] = [
        Self::Studio,
        Self::Series,
        Self::Type,
        Self::Label,
        Self::Tag,
        Self::Actress,
        Self::Actors,
        Self::Director,
    ];

    /// Convert from a request string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            SEL_STUDIO => Ok(Self::Studio),
            SEL_SERIES => Ok(Self::Series),
            SEL_TYPE => Ok(Self::Type),
            SEL_LABEL => Ok(Self::Label),
            SEL_TAG => Ok(Self::Tag),
            SEL_ACTRESS => Ok(Self::Actress),
            SEL_ACTORS => Ok(Self::Actors),
            SEL_DIRECTOR => Ok(Self::Director),
            _ => Err(format!(
                "Invalid selector '{s}'. Must be one of: {}",
                VALID_SELECTORS.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Studio => SEL_STUDIO,
            Self::Series => SEL_SERIES,
            Self::Type => SEL_TYPE,
            Self::Label => SEL_LABEL,
            Self::Tag => SEL_TAG,
            Self::Actress => SEL_ACTRESS,
            Self::Actors => SEL_ACTORS,
            Self::Director => SEL_DIRECTOR,
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::Tag | Self::Actress | Self::Actors => Cardinality::Multi,
            Self::Studio | Self::Series | Self::Type | Self::Label | Self::Director => {
                Cardinality::Single
            }
        }
    }

    /// Name of the movie record field written by a patch.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Tag => "tags",
            other => other.as_str(),
        }
    }

    /// Name of the master-data collection holding the selectable values.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Studio => "studios",
            Self::Series => "series",
            Self::Type => "types",
            Self::Label => "labels",
            Self::Tag => "tags",
            Self::Actress => "actresses",
            Self::Actors => "actors",
            Self::Director => "directors",
        }
    }
}

// ---------------------------------------------------------------------------
// AssignmentMode
// ---------------------------------------------------------------------------

/// How a new value combines with what a target already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    /// Overwrite the field.
    Replace,
    /// Add members to a multi-valued field; fill an empty single-valued field.
    Append,
}

impl AssignmentMode {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            MODE_REPLACE => Ok(Self::Replace),
            MODE_APPEND => Ok(Self::Append),
            _ => Err(format!(
                "Invalid assignment mode '{s}'. Must be one of: {MODE_REPLACE}, {MODE_APPEND}"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => MODE_REPLACE,
            Self::Append => MODE_APPEND,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_from_str_invalid() {
        let result = FieldSelector::from_str_value("genre");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid selector"));
    }

    #[test]
    fn selector_round_trip() {
        for sel in FieldSelector::ALL {
            assert_eq!(FieldSelector::from_str_value(sel.as_str()).unwrap(), sel);
        }
    }

    #[test]
    fn multi_selectors() {
        let multi: Vec<_> = FieldSelector::ALL
            .into_iter()
            .filter(|s| s.cardinality() == Cardinality::Multi)
            .collect();
        assert_eq!(
            multi,
            vec![FieldSelector::Tag, FieldSelector::Actress, FieldSelector::Actors]
        );
    }

    #[test]
    fn director_is_single() {
        assert_eq!(FieldSelector::Director.cardinality(), Cardinality::Single);
    }

    #[test]
    fn tag_writes_tags_field() {
        assert_eq!(FieldSelector::Tag.field_name(), "tags");
        assert_eq!(FieldSelector::Studio.field_name(), "studio");
    }

    #[test]
    fn collections_are_plural() {
        assert_eq!(FieldSelector::Actress.collection(), "actresses");
        assert_eq!(FieldSelector::Series.collection(), "series");
    }

    #[test]
    fn selector_serde_snake_case() {
        let json = serde_json::to_string(&FieldSelector::Actress).unwrap();
        assert_eq!(json, "\"actress\"");
    }

    #[test]
    fn mode_round_trip() {
        for mode in [AssignmentMode::Replace, AssignmentMode::Append] {
            assert_eq!(AssignmentMode::from_str_value(mode.as_str()).unwrap(), mode);
        }
    }

    #[test]
    fn mode_from_str_invalid() {
        assert!(AssignmentMode::from_str_value("merge").is_err());
    }

    #[test]
    fn selectors_count() {
        assert_eq!(VALID_SELECTORS.len(), FieldSelector::ALL.len());
    }
}
