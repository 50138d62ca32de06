//! Recursive field values and dot-path addressing.
//!
//! A member record is a [`Record`]: an ordered map from field name to
//! [`Field`]. Nested groups (`address`, `health`, `school`, ...) are records
//! themselves, so `health.allergies` names the `allergies` key inside the
//! `health` group.

use crate::error::{Result, StoreError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Record = IndexMap<String, Field>;

/// Key prefix for annotations (`_note`, `_comment`) that are never gaps.
pub const ANNOTATION_PREFIX: char = '_';

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    /// `null` placeholder for a value not yet known.
    Empty,
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<Field>),
    Group(Record),
}

impl Field {
    pub fn text(value: impl Into<String>) -> Self {
        Field::Text(value.into())
    }

    /// True for values that still need to be filled in: `null`, blank text,
    /// or an empty list.
    pub fn is_placeholder(&self) -> bool {
        match self {
            Field::Empty => true,
            Field::Text(s) => s.trim().is_empty(),
            Field::List(items) => items.is_empty(),
            Field::Flag(_) | Field::Number(_) | Field::Group(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Field::Empty => "null",
            Field::Flag(_) => "boolean",
            Field::Number(_) => "number",
            Field::Text(_) => "string",
            Field::List(_) => "list",
            Field::Group(_) => "object",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Empty => f.write_str("(empty)"),
            Field::Flag(b) => write!(f, "{b}"),
            Field::Number(n) => write!(f, "{n}"),
            Field::Text(s) => f.write_str(s),
            Field::List(_) | Field::Group(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FieldPath
// ---------------------------------------------------------------------------

/// A validated dot-path such as `health.allergies`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(StoreError::invalid_path(raw, "path is empty"));
        }
        let mut segments = Vec::new();
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(StoreError::invalid_path(raw, "empty segment"));
            }
            if segment.trim() != segment {
                return Err(StoreError::invalid_path(
                    raw,
                    format!("segment '{segment}' has surrounding whitespace"),
                ));
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Parse a comma-separated list, skipping blank entries.
    pub fn parse_list(csv: &str) -> Result<Vec<Self>> {
        let paths = csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>>>()?;
        if paths.is_empty() {
            return Err(StoreError::invalid_path(csv, "no field paths given"));
        }
        Ok(paths)
    }

    /// The first `depth` segments joined back into a dot-path.
    pub fn prefix(&self, depth: usize) -> String {
        self.segments[..depth.min(self.segments.len())].join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of looking up a dot-path in a record.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Field),
    /// Nothing at the path; `update` would create it.
    Missing,
    /// A non-object value sits on the way, at the given prefix.
    Blocked { at: String, found: &'static str },
}

pub fn lookup<'a>(record: &'a Record, path: &FieldPath) -> Lookup<'a> {
    let Some((leaf, parents)) = path.segments.split_last() else {
        return Lookup::Missing;
    };
    let mut current = record;
    for (depth, key) in parents.iter().enumerate() {
        match current.get(key) {
            None | Some(Field::Empty) => return Lookup::Missing,
            Some(Field::Group(inner)) => current = inner,
            Some(other) => {
                return Lookup::Blocked {
                    at: path.prefix(depth + 1),
                    found: other.type_name(),
                }
            }
        }
    }
    match current.get(leaf) {
        Some(field) => Lookup::Found(field),
        None => Lookup::Missing,
    }
}

/// Set the value at `path`, creating intermediate groups as needed.
///
/// A `null` placeholder on the way becomes a group. Any other non-object value
/// on the way is an `InvalidPath`, as is replacing an existing group with a
/// non-group value. Returns the previous value at the leaf.
pub fn set(record: &mut Record, path: &FieldPath, value: Field) -> Result<Option<Field>> {
    let Some((leaf, parents)) = path.segments.split_last() else {
        return Err(StoreError::invalid_path("", "path is empty"));
    };
    let mut current = record;
    for (depth, key) in parents.iter().enumerate() {
        let slot = current.entry(key.clone()).or_insert(Field::Empty);
        if matches!(slot, Field::Empty) {
            *slot = Field::Group(Record::new());
        }
        current = match slot {
            Field::Group(inner) => inner,
            other => {
                return Err(StoreError::invalid_path(
                    path.to_string(),
                    format!(
                        "'{}' holds a {}, not an object",
                        path.prefix(depth + 1),
                        other.type_name()
                    ),
                ))
            }
        };
    }
    if let Some(Field::Group(_)) = current.get(leaf) {
        if !matches!(value, Field::Group(_)) {
            return Err(StoreError::invalid_path(
                path.to_string(),
                "holds an object; set its sub-fields instead",
            ));
        }
    }
    Ok(current.insert(leaf.clone(), value))
}

/// Insert a `null` placeholder at a dotted path unless something is already there.
pub(crate) fn ensure_placeholder(record: &mut Record, dotted: &str) {
    let mut segments = dotted.split('.').peekable();
    let mut current = record;
    while let Some(key) = segments.next() {
        if segments.peek().is_none() {
            current.entry(key.to_string()).or_insert(Field::Empty);
            return;
        }
        current = match current
            .entry(key.to_string())
            .or_insert_with(|| Field::Group(Record::new()))
        {
            Field::Group(inner) => inner,
            _ => return,
        };
    }
}

/// Every placeholder leaf under `record`, in document order, as dot-paths
/// rooted at `prefix`. Annotation keys are skipped.
pub fn placeholder_leaves(record: &Record, prefix: &str) -> Vec<String> {
    let mut out = Vec::new();
    collect_placeholders(record, prefix, &mut out);
    out
}

fn collect_placeholders(record: &Record, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in record {
        if key.starts_with(ANNOTATION_PREFIX) {
            continue;
        }
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Field::Group(inner) => collect_placeholders(inner, &full, out),
            v if v.is_placeholder() => out.push(full),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
