use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::migrate::annotation::{classify, prepare_annotation};
use crate::models::AnnotationShape;

/// A dashboard document the walker cannot work with
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("dashboard root must be a JSON object, found {0}")]
    RootNotAnObject(&'static str),
    #[error("annotations.list must be an array, found {0}")]
    ListNotAnArray(&'static str),
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Classification of one entry in a dashboard's annotation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    /// Position in `annotations.list`
    pub index: usize,
    /// The entry's display name, or "" when absent
    pub name: String,
    pub shape: AnnotationShape,
}

/// Outcome counts for one pass over a dashboard's annotation list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub total: usize,
    pub migrated: usize,
    pub unchanged: usize,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        self.migrated > 0
    }

    pub fn from_statuses(statuses: &[EntryStatus]) -> Self {
        let migrated = statuses.iter().filter(|s| s.shape.needs_migration()).count();
        Self {
            total: statuses.len(),
            migrated,
            unchanged: statuses.len() - migrated,
        }
    }
}

fn annotation_list(doc: &Value) -> Result<Option<&Vec<Value>>, DocumentError> {
    if !doc.is_object() {
        return Err(DocumentError::RootNotAnObject(value_kind(doc)));
    }
    match doc.get("annotations").and_then(|a| a.get("list")) {
        None => Ok(None),
        Some(Value::Array(list)) => Ok(Some(list)),
        Some(other) => Err(DocumentError::ListNotAnArray(value_kind(other))),
    }
}

/// Classify every annotation entry without rewriting anything
///
/// A document with no `annotations.list` is valid and yields no entries.
pub fn inspect_dashboard(doc: &Value) -> Result<Vec<EntryStatus>, DocumentError> {
    let Some(list) = annotation_list(doc)? else {
        return Ok(Vec::new());
    };

    Ok(list
        .iter()
        .enumerate()
        .map(|(index, entry)| EntryStatus {
            index,
            name: entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            shape: classify(entry),
        })
        .collect())
}

/// Migrate every annotation entry in a persisted dashboard document
///
/// Rewrites `annotations.list` in place so each entry is in the current
/// nested-target shape. Entries already current are left exactly as given.
/// Per-entry migration never fails; the only errors are structural (a root
/// or list of the wrong JSON kind).
pub fn migrate_dashboard(doc: &mut Value) -> Result<MigrationReport, DocumentError> {
    // Validate shape up front so a bad document is rejected before any rewrite
    annotation_list(doc)?;

    let mut report = MigrationReport::default();
    let Some(list) = doc
        .get_mut("annotations")
        .and_then(|a| a.get_mut("list"))
        .and_then(Value::as_array_mut)
    else {
        return Ok(report);
    };

    for (index, entry) in list.iter_mut().enumerate() {
        report.total += 1;
        let shape = classify(entry);
        if shape.needs_migration() {
            debug!("migrating {} annotation entry at index {}", shape.as_str(), index);
            *entry = prepare_annotation(entry);
            report.migrated += 1;
        } else {
            report.unchanged += 1;
        }
    }

    Ok(report)
}
