use rusqlite::Connection;
use todolist_core::db::migrations::latest_version;
use todolist_core::db::open_db_in_memory;
use todolist_core::{
    Priority, RepoError, SqliteTodoRepository, Todo, TodoRepository, TodoService,
    TodoServiceError, TodoValidationError,
};
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let todo = Todo::new("buy milk", Priority::Normal);
    let id = repo.create_todo(&todo).unwrap();

    let loaded = repo.get_todo(id).unwrap().unwrap();
    assert_eq!(loaded.uuid, todo.uuid);
    assert_eq!(loaded.name, "buy milk");
    assert_eq!(loaded.priority, Priority::Normal);
    assert!(loaded.created_at > 0, "created_at is stamped by storage");
}

#[test]
fn every_priority_survives_a_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    for priority in [Priority::Low, Priority::Normal, Priority::High] {
        let todo = Todo::new(format!("item {}", priority.label()), priority);
        let id = repo.create_todo(&todo).unwrap();
        let loaded = repo.get_todo(id).unwrap().unwrap();
        assert_eq!(loaded.priority, priority);
    }

    assert_eq!(repo.list_todos().unwrap().len(), 3);
}

#[test]
fn create_rejects_empty_name_and_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let invalid = Todo::new("", Priority::High);
    let err = repo.create_todo(&invalid).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TodoValidationError::EmptyName)
    ));

    assert!(repo.list_todos().unwrap().is_empty());
}

#[test]
fn duplicate_names_are_allowed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    repo.create_todo(&Todo::new("call mom", Priority::Normal))
        .unwrap();
    repo.create_todo(&Todo::new("call mom", Priority::High))
        .unwrap();

    assert_eq!(repo.list_todos().unwrap().len(), 2);
}

#[test]
fn list_is_sorted_by_name_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    repo.create_todo(&Todo::new("Banana", Priority::Normal))
        .unwrap();
    repo.create_todo(&Todo::new("apple", Priority::Normal))
        .unwrap();
    repo.create_todo(&Todo::new("Cherry", Priority::Normal))
        .unwrap();

    let names: Vec<String> = repo
        .list_todos()
        .unwrap()
        .into_iter()
        .map(|todo| todo.name)
        .collect();

    // NOCASE collation: ASCII case-insensitive ascending.
    assert_eq!(names, ["apple", "Banana", "Cherry"]);
}

#[test]
fn equal_names_tie_break_by_uuid() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let second = todo_with_fixed_id("00000000-0000-4000-8000-000000000002", "same");
    let first = todo_with_fixed_id("00000000-0000-4000-8000-000000000001", "same");
    repo.create_todo(&second).unwrap();
    repo.create_todo(&first).unwrap();

    let listed = repo.list_todos().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].uuid, first.uuid);
    assert_eq!(listed[1].uuid, second.uuid);
}

#[test]
fn delete_removes_exactly_the_targeted_todo() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let keep = Todo::new("keep", Priority::Low);
    let doomed = Todo::new("doomed", Priority::High);
    repo.create_todo(&keep).unwrap();
    repo.create_todo(&doomed).unwrap();

    repo.delete_todo(doomed.uuid).unwrap();

    let remaining = repo.list_todos().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].uuid, keep.uuid);
    assert!(repo.get_todo(doomed.uuid).unwrap().is_none());
}

#[test]
fn deleting_a_missing_todo_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let todo = Todo::new("ephemeral", Priority::Normal);
    repo.create_todo(&todo).unwrap();
    repo.delete_todo(todo.uuid).unwrap();

    // Explicit-not-found policy: the second delete is an error, never a
    // crash, and the store state is unchanged.
    let err = repo.delete_todo(todo.uuid).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == todo.uuid));
    assert!(repo.list_todos().unwrap().is_empty());
}

#[test]
fn batch_delete_is_best_effort_across_missing_members() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let first = Todo::new("first", Priority::Low);
    let second = Todo::new("second", Priority::High);
    repo.create_todo(&first).unwrap();
    repo.create_todo(&second).unwrap();

    let bogus = Uuid::parse_str("00000000-0000-4000-8000-00000000dead").unwrap();
    let outcome = repo.delete_todos(&[first.uuid, bogus, second.uuid]);

    assert_eq!(outcome.deleted, vec![first.uuid, second.uuid]);
    assert_eq!(outcome.missing, vec![bogus]);
    assert!(outcome.failed.is_empty());
    assert!(!outcome.is_complete());
    assert!(repo.list_todos().unwrap().is_empty());
}

#[test]
fn batch_delete_of_nothing_is_complete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let outcome = repo.delete_todos(&[]);
    assert!(outcome.is_complete());
}

#[test]
fn service_defaults_priority_to_normal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let service = TodoService::new(repo);

    let created = service.add("pay rent", None).unwrap();
    assert_eq!(created.priority, Priority::Normal);
    assert!(created.created_at > 0);

    let explicit = service.add("file taxes", Some(Priority::High)).unwrap();
    assert_eq!(explicit.priority, Priority::High);
}

#[test]
fn service_rejects_empty_name_before_anything_persists() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let service = TodoService::new(repo);

    let err = service.add("", Some(Priority::Low)).unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(TodoValidationError::EmptyName)
    ));
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn service_remove_maps_missing_ids_to_todo_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let service = TodoService::new(repo);

    let created = service.add("one-shot", None).unwrap();
    service.remove(created.uuid).unwrap();

    let err = service.remove(created.uuid).unwrap_err();
    assert!(matches!(err, TodoServiceError::TodoNotFound(id) if id == created.uuid));
}

#[test]
fn service_remove_many_reports_partial_outcomes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let service = TodoService::new(repo);

    let kept = service.add("kept", None).unwrap();
    let removed = service.add("removed", None).unwrap();
    let bogus = Uuid::parse_str("00000000-0000-4000-8000-00000000beef").unwrap();

    let outcome = service.remove_many(&[removed.uuid, bogus]).unwrap();
    assert_eq!(outcome.deleted, vec![removed.uuid]);
    assert_eq!(outcome.missing, vec![bogus]);

    let names: Vec<String> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|todo| todo.name)
        .collect();
    assert_eq!(names, ["kept"]);
    assert_eq!(service.get(kept.uuid).unwrap().unwrap().name, "kept");
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteTodoRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_todos_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("todos"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_todos_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todos (
            uuid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            priority TEXT NOT NULL DEFAULT 'normal'
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "todos",
            column: "created_at"
        })
    ));
}

#[test]
fn read_back_rejects_corrupt_priority_values() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO todos (uuid, name, priority)
         VALUES ('00000000-0000-4000-8000-0000000000aa', 'tampered', 'URGENT');",
        [],
    )
    .unwrap();

    let err = repo.list_todos().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("URGENT")));
}

fn todo_with_fixed_id(id: &str, name: &str) -> Todo {
    Todo::with_id(Uuid::parse_str(id).unwrap(), name, Priority::Normal).unwrap()
}
