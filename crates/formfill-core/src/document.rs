use crate::error::{Result, StoreError};
use crate::field::Record;
use crate::migrations;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The whole persisted store: metadata plus every member record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Template this document was seeded from; consulted by `add-member`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "migrations::deserialize_members")]
    pub members: IndexMap<String, Record>,
    /// Top-level keys this tool does not interpret, kept as-is.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl Document {
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            template: None,
            updated_at: None,
            members: IndexMap::new(),
            extra: IndexMap::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StoreError::DataFileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let doc = Self::parse(&data, path)?;
        tracing::debug!(path = %path.display(), members = doc.members.len(), "loaded document");
        Ok(doc)
    }

    /// Parse document text; `origin` names the file in error messages.
    pub fn parse(data: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(data).map_err(|source| StoreError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Pretty JSON with a trailing newline. Non-ASCII text is written verbatim.
    pub fn to_json(&self) -> Result<String> {
        let mut data = serde_json::to_string_pretty(self)?;
        data.push('\n');
        Ok(data)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        crate::io::atomic_write(path, data.as_bytes())?;
        tracing::debug!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Write the document to a path that must not exist yet.
    pub fn create(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        crate::io::atomic_create(path, data.as_bytes()).map_err(|e| match e {
            StoreError::Io(io) if io.kind() == std::io::ErrorKind::AlreadyExists => {
                StoreError::DataFileExists(path.to_path_buf())
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "created document");
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    // ---------------------------------------------------------------------------
    // Member access
    // ---------------------------------------------------------------------------

    pub fn member(&self, id: &str) -> Result<&Record> {
        self.members.get(id).ok_or_else(|| self.member_not_found(id))
    }

    pub fn member_mut(&mut self, id: &str) -> Result<&mut Record> {
        if !self.members.contains_key(id) {
            return Err(self.member_not_found(id));
        }
        Ok(&mut self.members[id])
    }

    fn member_not_found(&self, id: &str) -> StoreError {
        let available = if self.members.is_empty() {
            "none".to_string()
        } else {
            self.members
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        StoreError::MemberNotFound {
            id: id.to_string(),
            available,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
