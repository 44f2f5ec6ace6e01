use std::collections::HashSet;
use taskdeck_core::{
    CompleteOutcome, Confirmation, DeleteOutcome, RegistryError, Statistics, TaskRegistry,
    TaskValidationError,
};

fn registry_with(titles: &[&str]) -> TaskRegistry {
    let mut registry = TaskRegistry::default();
    for title in titles {
        registry.add(title, "").unwrap();
    }
    registry
}

fn titles(registry: &TaskRegistry) -> Vec<&str> {
    registry
        .tasks()
        .iter()
        .map(|task| task.title.as_str())
        .collect()
}

#[test]
fn add_appends_in_insertion_order_with_unique_ids() {
    let registry = registry_with(&["one", "two", "three", "four", "five"]);

    assert_eq!(titles(&registry), vec!["one", "two", "three", "four", "five"]);
    let ids: HashSet<_> = registry.tasks().iter().map(|task| task.id.clone()).collect();
    assert_eq!(ids.len(), 5);
    assert!(registry.tasks().iter().all(|task| !task.completed));
}

#[test]
fn add_returns_the_task_it_appended() {
    let mut registry = registry_with(&["one", "two"]);

    let added = registry.add(" three ", " notes ").unwrap().clone();

    assert_eq!(added.title, "three");
    assert_eq!(added.description, "notes");
    assert_eq!(registry.tasks().last(), Some(&added));
}

#[test]
fn add_with_blank_title_leaves_collection_unchanged() {
    let mut registry = registry_with(&["keep"]);
    let before = registry.clone();

    let err = registry.add("   ", "description").unwrap_err();

    assert_eq!(err, RegistryError::Validation(TaskValidationError::EmptyTitle));
    assert_eq!(registry, before);
}

#[test]
fn complete_sets_only_target_and_is_idempotent() {
    let mut registry = registry_with(&["a", "b", "c"]);

    let id = registry.resolve("2").unwrap();
    let first = registry.complete(&id).unwrap();
    let CompleteOutcome::Completed(task) = first else {
        panic!("expected completion");
    };
    let stamped = task.completed_at.expect("completed_at should be set");

    let flags: Vec<bool> = registry.tasks().iter().map(|task| task.completed).collect();
    assert_eq!(flags, vec![false, true, false]);
    assert!(registry.tasks()[0].completed_at.is_none());
    assert!(registry.tasks()[2].completed_at.is_none());

    let before = registry.clone();
    let again = registry.complete(&id).unwrap();
    assert!(matches!(again, CompleteOutcome::AlreadyCompleted(_)));
    assert_eq!(registry, before);
    assert_eq!(registry.tasks()[1].completed_at, Some(stamped));
}

#[test]
fn resolve_rejects_out_of_range_and_non_numeric_input() {
    let registry = registry_with(&["a", "b"]);

    assert_eq!(
        registry.resolve("0"),
        Err(RegistryError::IndexOutOfRange { index: 0, len: 2 })
    );
    assert_eq!(
        registry.resolve("3"),
        Err(RegistryError::IndexOutOfRange { index: 3, len: 2 })
    );
    assert_eq!(
        registry.resolve("-1"),
        Err(RegistryError::IndexOutOfRange { index: -1, len: 2 })
    );
    assert_eq!(
        registry.resolve("two"),
        Err(RegistryError::NonNumericIndex("two".to_string()))
    );
    assert_eq!(registry.resolve("2nd"), Ok(registry.tasks()[1].id.clone()));
}

#[test]
fn delete_on_decline_leaves_collection_unchanged() {
    let mut registry = registry_with(&["a", "b", "c"]);
    let before = registry.clone();

    let id = registry.resolve("2").unwrap();
    let outcome = registry
        .delete(&id, Confirmation::from_answer("nope"))
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(registry, before);
}

#[test]
fn delete_on_confirm_removes_target_and_shifts_later_tasks() {
    let mut registry = registry_with(&["a", "b", "c", "d"]);
    let later_ids: Vec<_> = registry.tasks()[2..]
        .iter()
        .map(|task| task.id.clone())
        .collect();

    let id = registry.resolve("2").unwrap();
    let outcome = registry
        .delete(&id, Confirmation::from_answer("Yes"))
        .unwrap();

    let DeleteOutcome::Removed(removed) = outcome else {
        panic!("expected removal");
    };
    assert_eq!(removed.title, "b");
    assert_eq!(titles(&registry), vec!["a", "c", "d"]);
    assert_eq!(registry.resolve("2").unwrap(), later_ids[0]);
    assert_eq!(registry.resolve("3").unwrap(), later_ids[1]);
    assert!(registry.get(&id).is_none());
}

#[test]
fn stale_id_reports_not_found() {
    let mut registry = registry_with(&["a"]);
    let id = registry.resolve("1").unwrap();
    registry.delete(&id, Confirmation::Accepted).unwrap();

    assert_eq!(
        registry.complete(&id),
        Err(RegistryError::NotFound(id.clone()))
    );
    assert_eq!(
        registry.delete(&id, Confirmation::Accepted),
        Err(RegistryError::NotFound(id))
    );
}

#[test]
fn statistics_on_empty_collection_has_no_percentage() {
    let stats = TaskRegistry::default().statistics();

    assert_eq!(
        stats,
        Statistics {
            total: 0,
            completed: 0,
            pending: 0,
            progress_percent: None,
        }
    );
}

#[test]
fn statistics_reports_rounded_progress() {
    let mut registry = registry_with(&["a", "b", "c", "d"]);
    let id = registry.resolve("3").unwrap();
    registry.complete(&id).unwrap();

    let stats = registry.statistics();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.progress_percent, Some(25));
}
