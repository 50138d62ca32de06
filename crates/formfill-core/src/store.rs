//! Operations over the data file.
//!
//! Each operation is one transaction: load the document, read or mutate it in
//! memory, and for writes persist it once with an atomic rename. A failed
//! operation never writes, so the file on disk is left exactly as it was.
//! Concurrent writers are not coordinated; the last rename wins.

use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::field::{self, Field, FieldPath, Record};
use crate::gaps;
use crate::paths;
use crate::role::{Role, ROLE_KEY};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// One applied field assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub member: String,
    pub field: String,
    pub previous: Option<Field>,
    pub value: Field,
}

/// A parsed `batch-update` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub path: FieldPath,
    pub value: Field,
}

/// What `show` returns: the whole document or a single member record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    Document(Document),
    Member(Record),
}

/// Parse the `--updates` argument: a JSON object from dot-path to value.
///
/// Strings are stored verbatim, numbers and booleans as their text, and `null`
/// resets a field to a placeholder. Lists and objects are rejected.
pub fn parse_updates(json: &str) -> Result<Vec<Update>> {
    let raw: IndexMap<String, serde_json::Value> = serde_json::from_str(json).map_err(|e| {
        StoreError::InvalidUpdates(format!("expected a JSON object of field paths: {e}"))
    })?;
    if raw.is_empty() {
        return Err(StoreError::InvalidUpdates("no updates given".to_string()));
    }
    raw.into_iter()
        .map(|(key, value)| {
            let path = FieldPath::parse(&key)?;
            let value = match value {
                serde_json::Value::Null => Field::Empty,
                serde_json::Value::String(s) => Field::Text(s),
                serde_json::Value::Number(n) => Field::Text(n.to_string()),
                serde_json::Value::Bool(b) => Field::Text(b.to_string()),
                other => {
                    let kind = if other.is_array() { "a list" } else { "an object" };
                    return Err(StoreError::InvalidUpdates(format!(
                        "value for '{key}' must be a string, got {kind}"
                    )));
                }
            };
            Ok(Update { path, value })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the location given by [`paths::resolve_data_file`].
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Ok(Self::new(paths::resolve_data_file(explicit)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Document> {
        Document::load(&self.path)
    }

    fn persist(&self, doc: &mut Document) -> Result<()> {
        doc.touch();
        doc.save(&self.path)
    }

    // ---------------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------------

    /// Create the data file, empty or seeded from a template document.
    pub fn init(&self, template: Option<&Path>) -> Result<Document> {
        if self.exists() {
            return Err(StoreError::DataFileExists(self.path.clone()));
        }
        let mut doc = match template {
            None => Document::new(),
            Some(t) => {
                if !t.exists() {
                    return Err(StoreError::TemplateNotFound(t.to_path_buf()));
                }
                let mut seeded = Document::load(t)?;
                seeded.template = Some(std::fs::canonicalize(t)?);
                seeded
            }
        };
        doc.touch();
        doc.create(&self.path)?;
        tracing::info!(path = %self.path.display(), members = doc.members.len(), "initialized data file");
        Ok(doc)
    }

    pub fn show(&self, member: Option<&str>) -> Result<Snapshot> {
        let doc = self.load()?;
        match member {
            Some(id) => Ok(Snapshot::Member(doc.member(id)?.clone())),
            None => Ok(Snapshot::Document(doc)),
        }
    }

    /// Set one field. The value is stored as text.
    pub fn update(&self, member: &str, path: &FieldPath, value: &str) -> Result<FieldChange> {
        let mut changes = self.apply(
            member,
            &[Update {
                path: path.clone(),
                value: Field::text(value),
            }],
        )?;
        changes
            .pop()
            .ok_or_else(|| StoreError::invalid_path(path.to_string(), "nothing was applied"))
    }

    /// Apply every update to one loaded document and persist once.
    /// The first failing path aborts the batch without writing.
    pub fn batch_update(&self, member: &str, updates: &[Update]) -> Result<Vec<FieldChange>> {
        self.apply(member, updates)
    }

    fn apply(&self, member: &str, updates: &[Update]) -> Result<Vec<FieldChange>> {
        let mut doc = self.load()?;
        let record = doc.member_mut(member)?;
        let mut changes = Vec::with_capacity(updates.len());
        for update in updates {
            let previous = field::set(record, &update.path, update.value.clone())?;
            tracing::debug!(member, field = %update.path, "applied update");
            changes.push(FieldChange {
                member: member.to_string(),
                field: update.path.to_string(),
                previous,
                value: update.value.clone(),
            });
        }
        self.persist(&mut doc)?;
        Ok(changes)
    }

    /// Insert a new member seeded for `role`.
    ///
    /// The seed is the first member with the same role in the document's
    /// template, if it has one, otherwise the built-in skeleton for the role.
    pub fn add_member(&self, id: &str, role: &str) -> Result<Record> {
        paths::validate_member_id(id)?;
        let mut doc = self.load()?;
        if doc.members.contains_key(id) {
            return Err(StoreError::MemberExists(id.to_string()));
        }
        let record = match template_member(&doc, role)? {
            Some(seed) => seed,
            None => Role::from_tag(role).skeleton(role),
        };
        doc.members.insert(id.to_string(), record.clone());
        self.persist(&mut doc)?;
        tracing::info!(id, role, "added member");
        Ok(record)
    }

    pub fn find_gaps(&self, member: &str, fields: Option<&[FieldPath]>) -> Result<Vec<String>> {
        let doc = self.load()?;
        gaps::find_gaps(doc.member(member)?, fields)
    }
}

fn template_member(doc: &Document, role: &str) -> Result<Option<Record>> {
    let Some(template) = doc.template.as_deref() else {
        return Ok(None);
    };
    if !template.exists() {
        tracing::warn!(
            template = %template.display(),
            "template referenced by the data file is missing; using built-in fields"
        );
        return Ok(None);
    }
    let seeded = Document::load(template)?
        .members
        .into_values()
        .find(|r| r.get(ROLE_KEY).and_then(Field::as_text) == Some(role));
    Ok(seeded.map(|r| with_role_first(r, role)))
}

fn with_role_first(mut record: Record, role: &str) -> Record {
    record.shift_remove(ROLE_KEY);
    let mut out = Record::with_capacity(record.len() + 1);
    out.insert(ROLE_KEY.to_string(), Field::text(role));
    out.extend(record);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
