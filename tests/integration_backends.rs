//! Backend integration tests
//!
//! Drives the task service end to end against both stores and checks the
//! observable differences between them (id recycling, ordering, search case).

use std::collections::HashSet;
use std::fs;

use tempfile::TempDir;
use todos::command::{Command, Response};
use todos::domain::Item;
use todos::error::{Result, TodoError};
use todos::id::IdPolicy;
use todos::service::TaskService;
use todos::store::{RecordStore, SnapshotStore, SqliteStore};

fn snapshot(temp: &TempDir, policy: IdPolicy) -> TaskService<SnapshotStore> {
    TaskService::new(SnapshotStore::new(temp.path().join("todos.json"), policy))
}

fn sqlite(temp: &TempDir) -> Result<TaskService<SqliteStore>> {
    Ok(TaskService::new(SqliteStore::open(temp.path().join("todos.db"))?))
}

fn all_services(temp: &TempDir) -> Result<Vec<TaskService<Box<dyn RecordStore>>>> {
    let gap = temp.path().join("gap.json");
    let max = temp.path().join("max.json");
    Ok(vec![
        TaskService::new(Box::new(SnapshotStore::new(gap, IdPolicy::GapFilling)) as Box<dyn RecordStore>),
        TaskService::new(Box::new(SnapshotStore::new(max, IdPolicy::MonotonicMax)) as Box<dyn RecordStore>),
        TaskService::new(Box::new(SqliteStore::open(temp.path().join("todos.db"))?) as Box<dyn RecordStore>),
    ])
}

/// Pass through success and title collisions; anything else fails the test.
fn accepted_or_duplicate(result: Result<()>) -> Result<()> {
    match result {
        Ok(()) | Err(TodoError::DuplicateTitle(_)) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Scenario: empty store, add "Buy milk" twice.
#[test]
fn test_add_then_duplicate_on_every_backend() -> Result<()> {
    let temp = TempDir::new()?;
    for service in all_services(&temp)? {
        let item = service.add("Buy milk")?;
        assert_eq!(item, Item::new(1, "Buy milk"));

        let err = service.add("Buy milk").unwrap_err();
        assert!(matches!(err, TodoError::DuplicateTitle(_)));
        assert_eq!(service.list()?, vec![Item::new(1, "Buy milk")]);
    }
    Ok(())
}

/// Titles and ids stay unique across a mixed operation sequence.
#[test]
fn test_titles_and_ids_stay_unique() -> Result<()> {
    let temp = TempDir::new()?;
    for service in all_services(&temp)? {
        for title in ["A", "B", "C", "A", "D", "B"] {
            accepted_or_duplicate(service.add(title).map(|_| ()))?;
        }
        service.delete(2)?;
        service.add("E")?;
        accepted_or_duplicate(service.edit(1, "C").map(|_| ()))?;
        service.edit(3, "F")?;
        service.bulk_insert(3)?;
        accepted_or_duplicate(service.add("Bulk item #1").map(|_| ()))?;

        let items = service.list()?;
        let titles: HashSet<_> = items.iter().map(|i| i.title.clone()).collect();
        let ids: HashSet<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(titles.len(), items.len());
        assert_eq!(ids.len(), items.len());
        assert!(items.iter().all(|i| i.id > 0));
    }
    Ok(())
}

#[test]
fn test_gap_filling_recycles_deleted_id() -> Result<()> {
    let temp = TempDir::new()?;
    let service = snapshot(&temp, IdPolicy::GapFilling);
    service.add("A")?;
    let b = service.add("B")?;
    service.add("C")?;

    service.delete(b.id)?;
    let d = service.add("D")?;
    assert_eq!(d.id, b.id);
    Ok(())
}

#[test]
fn test_autoincrement_never_recycles() -> Result<()> {
    let temp = TempDir::new()?;
    let service = sqlite(&temp)?;
    service.add("A")?;
    let b = service.add("B")?;
    let c = service.add("C")?;

    service.delete(b.id)?;
    let d = service.add("D")?;
    assert!(d.id > c.id);

    // Deleting the highest row does not let the counter regress
    service.delete(d.id)?;
    let e = service.add("E")?;
    assert!(e.id > d.id);
    Ok(())
}

#[test]
fn test_monotonic_max_skips_interior_gap() -> Result<()> {
    let temp = TempDir::new()?;
    let service = snapshot(&temp, IdPolicy::MonotonicMax);
    service.add("A")?;
    let b = service.add("B")?;
    let c = service.add("C")?;

    service.delete(b.id)?;
    let d = service.add("D")?;
    assert!(d.id > c.id);
    Ok(())
}

#[test]
fn test_snapshot_save_of_load_is_a_no_op() -> Result<()> {
    let temp = TempDir::new()?;
    let service = snapshot(&temp, IdPolicy::GapFilling);
    service.add("A")?;
    service.add("B")?;
    service.toggle(2)?;

    let store = service.store();
    let before: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.location())?)?;
    store.save(&store.load()?)?;
    let after: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.location())?)?;
    assert_eq!(before, after);
    Ok(())
}

#[test]
fn test_load_reflects_committed_mutation() -> Result<()> {
    let temp = TempDir::new()?;
    let service = snapshot(&temp, IdPolicy::GapFilling);
    service.add("A")?;
    service.edit(1, "A2")?;

    // A fresh store on the same file sees the edit
    let reopened = SnapshotStore::new(temp.path().join("todos.json"), IdPolicy::GapFilling);
    assert_eq!(reopened.load()?, vec![Item::new(1, "A2")]);
    Ok(())
}

/// Scenario: toggle(2) flips item 2, toggle(99) is not found.
#[test]
fn test_toggle_pairs_and_missing_id() -> Result<()> {
    let temp = TempDir::new()?;
    for service in all_services(&temp)? {
        service.add("A")?;
        service.add("B")?;

        service.toggle(2)?;
        let b = service.list()?.into_iter().find(|i| i.id == 2).unwrap();
        assert!(b.done);

        service.toggle(2)?;
        let b = service.list()?.into_iter().find(|i| i.id == 2).unwrap();
        assert!(!b.done);

        assert!(matches!(service.toggle(99), Err(TodoError::NotFound(99))));
    }
    Ok(())
}

#[test]
fn test_operations_on_missing_id_never_mutate() -> Result<()> {
    let temp = TempDir::new()?;
    for service in all_services(&temp)? {
        service.add("A")?;
        let before = service.list()?;

        assert!(matches!(service.toggle(42), Err(TodoError::NotFound(42))));
        assert!(matches!(service.edit(42, "Z"), Err(TodoError::NotFound(42))));
        assert!(matches!(service.delete(42), Err(TodoError::NotFound(42))));
        assert_eq!(service.list()?, before);
    }
    Ok(())
}

#[test]
fn test_list_ordering_differs_by_backend() -> Result<()> {
    let temp = TempDir::new()?;

    let json = snapshot(&temp, IdPolicy::GapFilling);
    let db = sqlite(&temp)?;
    for service_titles in ["A", "B", "C"] {
        json.add(service_titles)?;
        db.add(service_titles)?;
    }
    json.toggle(1)?;
    db.toggle(1)?;

    let json_ids: Vec<_> = json.list()?.into_iter().map(|i| i.id).collect();
    let db_ids: Vec<_> = db.list()?.into_iter().map(|i| i.id).collect();
    assert_eq!(json_ids, vec![1, 2, 3]);
    assert_eq!(db_ids, vec![2, 3, 1]);
    Ok(())
}

#[test]
fn test_search_case_asymmetry() -> Result<()> {
    let temp = TempDir::new()?;

    let json = snapshot(&temp, IdPolicy::GapFilling);
    let db = sqlite(&temp)?;
    for title in ["Buy Milk", "milk tea", "Bread"] {
        json.add(title)?;
        db.add(title)?;
    }

    assert_eq!(json.search("MILK")?.len(), 2);
    assert_eq!(db.search("MILK")?.len(), 0);
    assert_eq!(db.search("milk")?, vec![Item::new(2, "milk tea")]);
    Ok(())
}

/// Scenario: bulk_insert(5) on an empty SQLite store.
#[test]
fn test_bulk_insert_commits_ids_one_to_five() -> Result<()> {
    let temp = TempDir::new()?;
    let service = sqlite(&temp)?;

    match service.dispatch(Command::BulkInsert(5))? {
        Response::BulkAdded { items, .. } => {
            let ids: Vec<_> = items.iter().map(|i| i.id).collect();
            assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        }
        other => panic!("Expected bulk result, got {:?}", other),
    }
    assert_eq!(service.list()?.len(), 5);
    Ok(())
}

/// Scenario: a colliding third title rolls the whole batch back.
#[test]
fn test_bulk_insert_collision_rolls_back() -> Result<()> {
    let temp = TempDir::new()?;
    let service = sqlite(&temp)?;
    service.add("Bulk item #3")?;

    let err = service.bulk_insert(5).unwrap_err();
    assert!(matches!(err, TodoError::BatchFailure(_)));
    assert_eq!(service.list()?, vec![Item::new(1, "Bulk item #3")]);
    Ok(())
}

#[test]
fn test_snapshot_bulk_insert_is_one_document() -> Result<()> {
    let temp = TempDir::new()?;
    let service = snapshot(&temp, IdPolicy::GapFilling);
    service.bulk_insert(4)?;

    let raw = fs::read_to_string(service.store().location())?;
    let items: Vec<Item> = serde_json::from_str(&raw)?;
    assert_eq!(items.len(), 4);
    assert_eq!(items[3], Item::new(4, "Bulk item #4"));
    Ok(())
}

#[test]
fn test_unreadable_snapshot_is_storage_failure() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("todos.json");
    fs::write(&path, "[{\"id\": \"one\"}]")?;

    let service = TaskService::new(SnapshotStore::new(&path, IdPolicy::GapFilling));
    let err = service.list().unwrap_err();
    assert!(err.is_storage_failure());

    // The operation is lost but the file is left as it was
    assert!(service.add("A").unwrap_err().is_storage_failure());
    assert_eq!(fs::read_to_string(&path)?, "[{\"id\": \"one\"}]");
    Ok(())
}

#[test]
fn test_monotonic_add_at_largest_id_fails_cleanly() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("todos.json");
    fs::write(&path, format!("[{{\"id\": {}, \"title\": \"last\", \"done\": false}}]", i64::MAX))?;

    let service = TaskService::new(SnapshotStore::new(&path, IdPolicy::MonotonicMax));
    let err = service.add("next").unwrap_err();
    assert!(err.is_storage_failure());
    assert_eq!(service.list()?, vec![Item::new(i64::MAX, "last")]);
    Ok(())
}
