//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable create/read/delete APIs over the `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Todo::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `list_todos` is ordered by `name COLLATE NOCASE ASC, uuid ASC`, the
//!   one canonical ordering every view consumes.
//! - Deletes are hard deletes; a removed row is gone for good.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::DbError;
use crate::model::todo::{Priority, Todo, TodoId, TodoValidationError};
use log::warn;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    priority,
    created_at
FROM todos";

const REQUIRED_COLUMNS: &[&str] = &["uuid", "name", "priority", "created_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
    /// Connection has not gone through `open_db` migration bootstrap.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} has not been migrated to {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl std::error::Error for RepoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of a best-effort batch delete.
///
/// The batch is not atomic: every requested id is attempted, and each one
/// lands in exactly one of the three buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteOutcome {
    /// Ids whose rows were removed.
    pub deleted: Vec<TodoId>,
    /// Ids that had no matching row (already gone).
    pub missing: Vec<TodoId>,
    /// Ids whose delete failed on a storage error; details are logged.
    pub failed: Vec<TodoId>,
}

impl BatchDeleteOutcome {
    /// True when every requested id resulted in a removed row.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Repository interface for todo store operations.
///
/// Deliberately narrow: there is no update. A todo's name and priority are
/// fixed at creation, and the only mutations are create and delete.
pub trait TodoRepository {
    /// Persists a new todo and returns its stable id.
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId>;
    /// Reads one todo by id.
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Returns all todos as a fresh snapshot in canonical name order.
    fn list_todos(&self) -> RepoResult<Vec<Todo>>;
    /// Removes one todo permanently. Missing ids fail with `NotFound`.
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
    /// Removes a set of todos best-effort, continuing past per-id failures.
    fn delete_todos(&self, ids: &[TodoId]) -> BatchDeleteOutcome;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Wraps a migrated connection, verifying the schema contract first.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not the
    ///   version this binary migrates to.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the physical
    ///   schema diverges from the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = crate::db::migrations::latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'todos'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable("todos"));
        }

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('todos');")?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(row.get::<_, String>(0)?);
        }
        for &required in REQUIRED_COLUMNS {
            if !columns.iter().any(|column| column == required) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "todos",
                    column: required,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &Todo) -> RepoResult<TodoId> {
        todo.validate()?;

        self.conn.execute(
            "INSERT INTO todos (uuid, name, priority) VALUES (?1, ?2, ?3);",
            params![
                todo.uuid.to_string(),
                todo.name.as_str(),
                priority_to_db(todo.priority),
            ],
        )?;

        Ok(todo.uuid)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_todos(&self) -> RepoResult<Vec<Todo>> {
        // NOCASE is ASCII case folding: "apple" sorts before "Banana".
        // uuid breaks ties between equal names deterministically.
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_todos(&self, ids: &[TodoId]) -> BatchDeleteOutcome {
        let mut outcome = BatchDeleteOutcome::default();

        for &id in ids {
            match self.delete_todo(id) {
                Ok(()) => outcome.deleted.push(id),
                Err(RepoError::NotFound(_)) => {
                    warn!("event=todo_delete module=repo status=missing todo_id={id}");
                    outcome.missing.push(id);
                }
                Err(err) => {
                    warn!("event=todo_delete module=repo status=error todo_id={id} error={err}");
                    outcome.failed.push(id);
                }
            }
        }

        outcome
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_db_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority value `{priority_text}` in todos.priority"
        ))
    })?;

    let todo = Todo {
        uuid,
        name: row.get("name")?,
        priority,
        created_at: row.get("created_at")?,
    };
    todo.validate()?;
    Ok(todo)
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Normal => "normal",
        Priority::High => "high",
    }
}

fn parse_db_priority(value: &str) -> Option<Priority> {
    match value {
        "low" => Some(Priority::Low),
        "normal" => Some(Priority::Normal),
        "high" => Some(Priority::High),
        _ => None,
    }
}
