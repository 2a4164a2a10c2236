//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the add/list/remove entry points consumed by presentation
//!   layers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - `list` returns a fresh snapshot per call; consumers re-fetch after each
//!   mutation instead of observing live state.
//! - Storage failures propagate to the caller; they are logged, never
//!   swallowed.

use crate::model::todo::{Priority, Todo, TodoId, TodoValidationError};
use crate::repo::todo_repo::{BatchDeleteOutcome, RepoError, TodoRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Input failed domain validation (empty name).
    Validation(TodoValidationError),
    /// Target todo does not exist.
    TodoNotFound(TodoId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::TodoNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// Use-case facade over a todo repository.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a todo from user input and returns the persisted record.
    ///
    /// # Contract
    /// - `priority = None` defaults to `Priority::Normal`.
    /// - An empty `name` fails with `Validation` and persists nothing; the
    ///   store re-checks even when the caller validated already.
    pub fn add(&self, name: impl Into<String>, priority: Option<Priority>) -> ServiceResult<Todo> {
        let todo = Todo::new(name, priority.unwrap_or_default());
        let id = self.repo.create_todo(&todo)?;

        // Names are user text; log lengths, not content.
        info!(
            "event=todo_create module=service status=ok todo_id={id} priority={} name_len={}",
            todo.priority.label(),
            todo.name.len()
        );

        // Read back so callers see storage-stamped fields (created_at).
        match self.repo.get_todo(id)? {
            Some(persisted) => Ok(persisted),
            None => Err(TodoServiceError::TodoNotFound(id)),
        }
    }

    /// Reads one todo by id.
    pub fn get(&self, id: TodoId) -> ServiceResult<Option<Todo>> {
        Ok(self.repo.get_todo(id)?)
    }

    /// Returns the full list as a fresh snapshot in canonical name order.
    pub fn list(&self) -> ServiceResult<Vec<Todo>> {
        Ok(self.repo.list_todos()?)
    }

    /// Removes one todo permanently.
    ///
    /// # Contract
    /// - A missing id fails with `TodoNotFound` (explicit-not-found policy);
    ///   repeating a delete reports the error instead of crashing.
    pub fn remove(&self, id: TodoId) -> ServiceResult<()> {
        match self.repo.delete_todo(id) {
            Ok(()) => {
                info!("event=todo_delete module=service status=ok todo_id={id}");
                Ok(())
            }
            Err(err) => {
                warn!("event=todo_delete module=service status=error todo_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Removes a set of todos best-effort (one user gesture, many rows).
    ///
    /// Per-id failures do not stop the batch; the outcome reports which ids
    /// were deleted, already missing, or failed on storage errors.
    pub fn remove_many(&self, ids: &[TodoId]) -> ServiceResult<BatchDeleteOutcome> {
        let outcome = self.repo.delete_todos(ids);
        info!(
            "event=todo_delete_batch module=service status={} requested={} deleted={} missing={} failed={}",
            if outcome.is_complete() { "ok" } else { "partial" },
            ids.len(),
            outcome.deleted.len(),
            outcome.missing.len(),
            outcome.failed.len()
        );
        Ok(outcome)
    }
}
