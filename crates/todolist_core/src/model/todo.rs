//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record and its priority scale.
//! - Own name/identity validation shared by all write paths.
//!
//! # Invariants
//! - `uuid` is stable, non-nil and never reused for another todo.
//! - `name` is non-empty for every validated todo and immutable after
//!   creation (no rename operation exists).
//!
//! # See also
//! - docs/architecture/data-model.md

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a to-do item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = Uuid;

/// Priority scale for to-do items.
///
/// Drives display color only; list order is always by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Everyday work.
    #[default]
    Normal,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Returns the user-facing label (`Low`, `Normal`, `High`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }

    /// Parses a user-facing or wire label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Validation failures for todo construction and persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// `name` is the empty string.
    EmptyName,
    /// Caller-provided id is the nil UUID.
    NilUuid,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "todo name must not be empty"),
            Self::NilUuid => write!(f, "todo id must not be the nil uuid"),
        }
    }
}

impl Error for TodoValidationError {}

/// Canonical to-do record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable global ID used for targeting deletes and auditing.
    pub uuid: TodoId,
    /// Display name. Non-empty; duplicates are allowed.
    pub name: String,
    /// Priority bucket, defaults to `Normal`.
    pub priority: Priority,
    /// Unix epoch milliseconds, stamped by the storage layer on insert.
    pub created_at: i64,
}

impl Todo {
    /// Creates a new todo with a generated stable ID.
    ///
    /// The name is taken as-is; emptiness is caught by `validate()` on the
    /// write path, so construction itself cannot fail.
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            priority,
            created_at: 0,
        }
    }

    /// Creates a todo with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    ///
    /// # Errors
    /// - `TodoValidationError::NilUuid` when `uuid` is nil.
    pub fn with_id(
        uuid: TodoId,
        name: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, TodoValidationError> {
        if uuid.is_nil() {
            return Err(TodoValidationError::NilUuid);
        }
        Ok(Self {
            uuid,
            name: name.into(),
            priority,
            created_at: 0,
        })
    }

    /// Checks the persistence invariants for this record.
    ///
    /// Every repository write path calls this before touching SQL, so an
    /// empty name can never reach storage regardless of what the
    /// presentation layer checked.
    ///
    /// Only emptiness is rejected; whitespace-only names are allowed, there
    /// is deliberately no further name validation.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.uuid.is_nil() {
            return Err(TodoValidationError::NilUuid);
        }
        if self.name.is_empty() {
            return Err(TodoValidationError::EmptyName);
        }
        Ok(())
    }
}
