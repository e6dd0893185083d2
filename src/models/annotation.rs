use serde::{Deserialize, Serialize};

/// Query flavor stamped onto every migrated target, regardless of any legacy
/// value that may have been persisted for `queryType`.
pub const QUERY_TYPE_TAGS: &str = "tags";

/// Annotation record shape, determined by the nested `target.query` field
///
/// Persisted dashboards carry annotation entries in one of three states:
/// - Current: `target` is present and its `query` is truthy
/// - Legacy: `target` is present but its `query` is falsy or absent
/// - Empty: `target` is absent or falsy (pre-target flat layout, or nothing)
///
/// Legacy and Empty differ only in where the four target sub-fields
/// (`limit`, `matchAny`, `tags`, `type`) come from during migration: Legacy
/// keeps the existing sub-field values, Empty defaults all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationShape {
    Current,
    Legacy,
    Empty,
}

impl AnnotationShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationShape::Current => "current",
            AnnotationShape::Legacy => "legacy",
            AnnotationShape::Empty => "empty",
        }
    }

    /// Whether a record of this shape must be rewritten before downstream
    /// code can assume the current nested-target layout
    pub fn needs_migration(&self) -> bool {
        !matches!(self, Self::Current)
    }
}

/// Current annotation query configuration (the nested `target` object)
///
/// After migration every field is populated: legacy values carry over where
/// they existed, everything else takes its default. `queryType` and
/// `fromAnnotations` are forced on construction and never read from legacy
/// data. Field names serialize in camelCase to match the persisted JSON
/// contract; `kind` serializes as `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationTarget {
    pub query: String,
    pub query_type: String,
    pub from_annotations: bool,
    pub tags_column: String,
    pub text_column: String,
    pub time_end_column: String,
    pub title_column: String,
    pub name: String,
    pub limit: i64,
    pub match_any: bool,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for AnnotationTarget {
    fn default() -> Self {
        Self {
            query: String::new(),
            query_type: QUERY_TYPE_TAGS.to_string(),
            from_annotations: true,
            tags_column: String::new(),
            text_column: String::new(),
            time_end_column: String::new(),
            title_column: String::new(),
            name: String::new(),
            limit: 0,
            match_any: false,
            tags: Vec::new(),
            kind: String::new(),
        }
    }
}
