//! Cover and gallery URL template engine.
//!
//! Templates use two placeholders:
//!
//! - `*` is replaced by the movie code verbatim.
//! - a run of `#` characters is replaced by the 1-based image index,
//!   left-padded with zeros to the run length (`##` with index 3 gives `03`).
//!
//! Expansion is pure and total; [`validate`] reports advisory violations
//! without failing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the movie code.
pub const CODE_PLACEHOLDER: char = '*';

/// Placeholder character for the image index.
pub const INDEX_PLACEHOLDER: char = '#';

/// Index used when none is supplied.
pub const DEFAULT_IMAGE_INDEX: u32 = 1;

static INDEX_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new("#+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// Expand a template into a concrete URL.
///
/// # Examples
///
/// ```
/// use cinedex_core::template::expand;
///
/// assert_eq!(expand("*/*-cover.jpg", "ABC123", None), "ABC123/ABC123-cover.jpg");
/// assert_eq!(expand("img-##.jpg", "X", Some(1)), "img-01.jpg");
/// assert_eq!(expand("img-##.jpg", "X", Some(123)), "img-123.jpg");
/// ```
pub fn expand(template: &str, code: &str, image_index: Option<u32>) -> String {
    let index = image_index.unwrap_or(DEFAULT_IMAGE_INDEX);
    // Index runs are expanded between code placeholders so a '#' inside the
    // code itself is emitted verbatim.
    template
        .split(CODE_PLACEHOLDER)
        .map(|part| expand_index_runs(part, index))
        .collect::<Vec<_>>()
        .join(code)
}

fn expand_index_runs(text: &str, index: u32) -> String {
    INDEX_RUN
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let width = caps[0].len();
            format!("{index:0width$}")
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Which template slot is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Cover,
    Gallery,
}

/// An advisory problem with a template string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateViolation {
    /// The cover template is empty.
    Empty { template: TemplateKind },
    /// The cover template has no `*` placeholder.
    MissingCodePlaceholder { template: TemplateKind },
    /// The gallery template has neither `*` nor `#`.
    MissingPlaceholder { template: TemplateKind },
}

impl TemplateViolation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "Cover template must not be empty",
            Self::MissingCodePlaceholder { .. } => {
                "Cover template must contain at least one '*' placeholder"
            }
            Self::MissingPlaceholder { .. } => {
                "Gallery template must contain at least one '*' or '#' placeholder"
            }
        }
    }
}

/// Check a single template. An empty gallery template counts as absent.
pub fn validate(kind: TemplateKind, template: &str) -> Vec<TemplateViolation> {
    let mut violations = Vec::new();
    match kind {
        TemplateKind::Cover => {
            if template.trim().is_empty() {
                violations.push(TemplateViolation::Empty { template: kind });
            } else if !template.contains(CODE_PLACEHOLDER) {
                violations.push(TemplateViolation::MissingCodePlaceholder { template: kind });
            }
        }
        TemplateKind::Gallery => {
            if !template.trim().is_empty()
                && !template.contains(CODE_PLACEHOLDER)
                && !template.contains(INDEX_PLACEHOLDER)
            {
                violations.push(TemplateViolation::MissingPlaceholder { template: kind });
            }
        }
    }
    violations
}

/// Check a cover template together with an optional gallery template.
pub fn validate_group(cover: &str, gallery: Option<&str>) -> Vec<TemplateViolation> {
    let mut violations = validate(TemplateKind::Cover, cover);
    if let Some(gallery) = gallery {
        violations.extend(validate(TemplateKind::Gallery, gallery));
    }
    violations
}

// ---------------------------------------------------------------------------
// Template groups
// ---------------------------------------------------------------------------

/// A named pair of cover/gallery templates from the template registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub template_url: String,
    #[serde(default)]
    pub gallery_template: Option<String>,
    #[serde(default)]
    pub applicable_types: Vec<String>,
    #[serde(default)]
    pub applicable_studios: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl TemplateGroup {
    pub fn cover_url(&self, code: &str) -> String {
        expand(&self.template_url, code, None)
    }

    /// Gallery URLs for images `1..=count`. Empty without a gallery template.
    pub fn gallery_urls(&self, code: &str, count: u32) -> Vec<String> {
        match self.gallery_template.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(template) => (1..=count)
                .map(|index| expand(template, code, Some(index)))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn violations(&self) -> Vec<TemplateViolation> {
        validate_group(&self.template_url, self.gallery_template.as_deref())
    }

    fn is_unrestricted(&self) -> bool {
        self.applicable_types.is_empty() && self.applicable_studios.is_empty()
    }

    fn applies_to(&self, movie_type: Option<&str>, studio: Option<&str>) -> bool {
        fn matches(list: &[String], value: Option<&str>) -> bool {
            list.is_empty()
                || value.is_some_and(|v| list.iter().any(|item| item.trim() == v.trim()))
        }
        !self.is_unrestricted()
            && matches(&self.applicable_types, movie_type)
            && matches(&self.applicable_studios, studio)
    }
}

/// Pick the template group for a movie: the first group restricted to a
/// matching type and studio, otherwise the first default group.
pub fn select_group<'a>(
    groups: &'a [TemplateGroup],
    movie_type: Option<&str>,
    studio: Option<&str>,
) -> Option<&'a TemplateGroup> {
    groups
        .iter()
        .find(|g| g.applies_to(movie_type, studio))
        .or_else(|| groups.iter().find(|g| g.is_default))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
