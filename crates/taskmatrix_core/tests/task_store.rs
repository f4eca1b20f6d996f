use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use taskmatrix_core::{
    Category, Clock, ManualClock, MemoryKvStore, NewTask, Priority, Quadrant, StoreConfig, TaskFilter,
    TaskPatch, TaskSortBy, TaskStore,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
}

fn open_store() -> (TaskStore<MemoryKvStore, ManualClock>, ManualClock) {
    let clock = ManualClock::new(start());
    let store = TaskStore::open(MemoryKvStore::new(), clock.clone(), StoreConfig::default());
    (store, clock)
}

fn new_task(title: &str, priority: Priority, due_in: Duration) -> NewTask {
    NewTask::new(title, start() + due_in, priority, Category::Work)
}

#[test]
fn add_then_get_returns_identical_task() {
    let (mut store, _) = open_store();

    let created = store.add(
        new_task("write report", Priority::High, Duration::days(1)).with_description("Q1 numbers"),
    );

    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, start());
    assert_eq!(created.updated_at, start());
    assert!(!created.is_complete);
    assert_eq!(store.get(&created.id), Some(&created));
    assert_eq!(store.len(), 1);
}

#[test]
fn add_assigns_unique_ids_and_keeps_insertion_order() {
    let (mut store, _) = open_store();

    let ids: Vec<String> = (0..5)
        .map(|n| {
            store
                .add(new_task(&format!("task {n}"), Priority::Low, Duration::days(n)))
                .id
        })
        .collect();

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5);

    let stored: Vec<&str> = store.all().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(stored, ids.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn update_merges_fields_in_place_and_bumps_updated_at() {
    let (mut store, clock) = open_store();
    let first = store.add(new_task("first", Priority::Low, Duration::days(3)));
    let second = store.add(new_task("second", Priority::Low, Duration::days(3)));

    clock.advance(Duration::minutes(5));
    let updated = store
        .update(
            &first.id,
            TaskPatch {
                title: Some("first, renamed".to_string()),
                priority: Some(Priority::High),
                ..TaskPatch::default()
            },
        )
        .expect("task exists");

    assert_eq!(updated.title, "first, renamed");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.description, first.description);
    assert_eq!(updated.due_date, first.due_date);
    assert_eq!(updated.created_at, first.created_at);
    assert_eq!(updated.updated_at, start() + Duration::minutes(5));

    assert_eq!(store.all()[0], updated);
    assert_eq!(store.all()[1], second);
}

#[test]
fn update_unknown_id_returns_none_without_side_effects() {
    let (mut store, _) = open_store();
    store.add(new_task("only", Priority::Medium, Duration::days(1)));
    store.flush();
    let revision = store.revision();

    let result = store.update(
        "missing",
        TaskPatch {
            title: Some("ghost".to_string()),
            ..TaskPatch::default()
        },
    );

    assert!(result.is_none());
    assert_eq!(store.revision(), revision);
    assert!(!store.has_pending_write());
}

#[test]
fn delete_reports_whether_a_task_was_removed() {
    let (mut store, _) = open_store();
    let keep = store.add(new_task("keep", Priority::Low, Duration::days(1)));
    let drop = store.add(new_task("drop", Priority::Low, Duration::days(1)));

    assert!(!store.delete("missing"));
    assert_eq!(store.len(), 2);

    assert!(store.delete(&drop.id));
    assert_eq!(store.len(), 1);
    assert!(store.get(&drop.id).is_none());
    assert_eq!(store.get(&keep.id), Some(&keep));

    assert!(!store.delete(&drop.id));
    assert_eq!(store.len(), 1);
}

#[test]
fn toggle_twice_restores_completion_and_moves_updated_at_forward() {
    let (mut store, clock) = open_store();
    let task = store.add(new_task("toggle me", Priority::Medium, Duration::days(2)));

    clock.advance(Duration::seconds(1));
    store.toggle_complete(&task.id);
    let once = store.get(&task.id).unwrap().clone();
    assert!(once.is_complete);
    assert_eq!(once.updated_at, start() + Duration::seconds(1));

    clock.advance(Duration::seconds(1));
    store.toggle_complete(&task.id);
    let twice = store.get(&task.id).unwrap();
    assert!(!twice.is_complete);
    assert_eq!(twice.created_at, task.created_at);
    assert!(twice.updated_at >= once.updated_at);
    assert!(twice.created_at <= twice.updated_at);
}

#[test]
fn toggle_unknown_id_is_a_no_op() {
    let (mut store, _) = open_store();
    store.add(new_task("a", Priority::Low, Duration::days(1)));
    let revision = store.revision();

    store.toggle_complete("missing");

    assert_eq!(store.revision(), revision);
    assert!(store.all().iter().all(|task| !task.is_complete));
}

#[test]
fn updated_at_never_precedes_created_at_when_clock_goes_back() {
    let (mut store, clock) = open_store();
    let task = store.add(new_task("a", Priority::Low, Duration::days(1)));

    clock.set(start() - Duration::hours(2));
    store.toggle_complete(&task.id);
    let updated = store
        .update(
            &task.id,
            TaskPatch {
                description: Some("edited".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.created_at, task.created_at);
    assert!(updated.updated_at >= updated.created_at);
}

#[test]
fn clear_and_import_replace_the_collection() {
    let (mut store, _) = open_store();
    let a = store.add(new_task("a", Priority::Low, Duration::days(1)));
    let b = store.add(new_task("b", Priority::High, Duration::days(1)));

    store.clear();
    assert!(store.is_empty());

    store.import(vec![b.clone(), a.clone()]);
    assert_eq!(store.all(), &[b, a][..]);
}

#[test]
fn subscribers_see_initial_snapshot_and_every_mutation() {
    let (mut store, _) = open_store();
    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    let subscription = store.subscribe(move |tasks| sink.borrow_mut().push(tasks.len()));

    let task = store.add(new_task("a", Priority::Low, Duration::days(1)));
    store.add(new_task("b", Priority::Low, Duration::days(1)));
    store.toggle_complete(&task.id);
    store.delete(&task.id);
    store.delete("missing");
    assert_eq!(*seen.borrow(), vec![0, 1, 2, 2, 1]);

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.clear();
    assert_eq!(seen.borrow().len(), 5);
}

#[test]
fn revision_counts_effective_mutations() {
    let (mut store, _) = open_store();
    assert_eq!(store.revision(), 0);

    let task = store.add(new_task("a", Priority::Low, Duration::days(1)));
    store.toggle_complete(&task.id);
    store.update(&task.id, TaskPatch::default());
    store.delete("missing");
    assert_eq!(store.revision(), 3);
}

#[test]
fn matrix_view_excludes_completed_tasks() {
    let (mut store, _) = open_store();
    let done = store.add(new_task("done", Priority::High, Duration::hours(24)));
    store.add(new_task("do first", Priority::High, Duration::hours(24)));
    store.add(new_task("schedule", Priority::High, Duration::days(7)));
    store.add(new_task("delegate", Priority::Low, Duration::hours(12)));
    store.add(new_task("eliminate", Priority::Low, Duration::days(10)));
    store.toggle_complete(&done.id);

    let matrix = store.matrix();
    let titles = |quadrant| {
        matrix
            .get(quadrant)
            .iter()
            .map(|classified| classified.task.title.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(titles(Quadrant::UrgentImportant), vec!["do first"]);
    assert_eq!(titles(Quadrant::NotUrgentImportant), vec!["schedule"]);
    assert_eq!(titles(Quadrant::UrgentNotImportant), vec!["delegate"]);
    assert_eq!(titles(Quadrant::NotUrgentNotImportant), vec!["eliminate"]);
    assert_eq!(matrix.len(), 4);
}

#[test]
fn views_follow_the_clock_without_mutation() {
    let (mut store, clock) = open_store();
    store.add(new_task("later", Priority::High, Duration::days(5)));
    let revision = store.revision();

    assert_eq!(store.matrix().count(Quadrant::NotUrgentImportant), 1);
    assert!(store.overdue().is_empty());

    clock.advance(Duration::days(4));
    assert_eq!(store.matrix().count(Quadrant::UrgentImportant), 1);

    clock.advance(Duration::days(2));
    assert_eq!(store.clock().now(), start() + Duration::days(6));
    assert_eq!(store.overdue().len(), 1);
    assert_eq!(store.revision(), revision);
}

#[test]
fn stats_report_totals_and_mixed_scopes() {
    let (mut store, _) = open_store();
    let a = store.add(new_task("a", Priority::High, Duration::hours(2)));
    let b = store.add(new_task("b", Priority::High, Duration::days(9)));
    store.add(new_task("c", Priority::Low, Duration::hours(3)));
    store.add(
        NewTask::new("d", start() + Duration::days(20), Priority::Medium, Category::Health),
    );
    store.toggle_complete(&a.id);
    store.toggle_complete(&b.id);

    let stats = store.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.completion_percentage, 50);

    assert_eq!(stats.category_count(Category::Work), 3);
    assert_eq!(stats.category_count(Category::Health), 1);
    assert_eq!(stats.category_count(Category::Finance), 0);
    assert_eq!(stats.priority_count(Priority::High), 2);

    assert_eq!(stats.by_quadrant.len(), 4);
    assert_eq!(stats.quadrant_count(Quadrant::UrgentImportant), 0);
    assert_eq!(stats.quadrant_count(Quadrant::NotUrgentImportant), 1);
    assert_eq!(stats.quadrant_count(Quadrant::UrgentNotImportant), 1);
    assert_eq!(stats.quadrant_count(Quadrant::NotUrgentNotImportant), 0);
}

#[test]
fn empty_store_stats_are_zero() {
    let (store, _) = open_store();
    let stats = store.stats();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.completion_percentage, 0);
    assert!(stats.by_category.is_empty());
    assert_eq!(stats.by_quadrant.values().sum::<usize>(), 0);
}

#[test]
fn filtered_view_and_combines_criteria() {
    let (mut store, _) = open_store();
    let urgent = store.add(new_task("urgent high", Priority::High, Duration::hours(6)));
    store.add(new_task("later high", Priority::High, Duration::days(6)));
    store.add(new_task("urgent low", Priority::Low, Duration::hours(6)));
    let personal = store.add(NewTask::new(
        "gym",
        start() + Duration::hours(6),
        Priority::Medium,
        Category::Personal,
    ));
    store.toggle_complete(&personal.id);

    let by_quadrant = store.filtered(&TaskFilter {
        quadrant: Some(Quadrant::UrgentImportant),
        ..TaskFilter::default()
    });
    let titles: Vec<&str> = by_quadrant.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["urgent high", "gym"]);

    let open_work_high = store.filtered(&TaskFilter {
        category: Some(Category::Work),
        priority: Some(Priority::High),
        is_complete: Some(false),
        quadrant: Some(Quadrant::UrgentImportant),
    });
    assert_eq!(open_work_high.len(), 1);
    assert_eq!(open_work_high[0].id, urgent.id);

    let completed = store.filtered(&TaskFilter {
        is_complete: Some(true),
        ..TaskFilter::default()
    });
    assert_eq!(completed.len(), 1);
    assert_eq!(store.filtered(&TaskFilter::default()).len(), 4);
}

#[test]
fn upcoming_and_overdue_are_sorted_by_due_date() {
    let (mut store, _) = open_store();
    store.add(new_task("in 5 days", Priority::Low, Duration::days(5)));
    store.add(new_task("in 1 hour", Priority::Low, Duration::hours(1)));
    store.add(new_task("in 7 days", Priority::Low, Duration::days(7)));
    store.add(new_task("in 8 days", Priority::Low, Duration::days(8)));
    store.add(new_task("1 hour ago", Priority::Low, -Duration::hours(1)));
    store.add(new_task("3 days ago", Priority::Low, -Duration::days(3)));
    let finished = store.add(new_task("done soon", Priority::Low, Duration::days(1)));
    store.toggle_complete(&finished.id);

    let upcoming: Vec<&str> = store
        .upcoming()
        .iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(upcoming, vec!["in 1 hour", "in 5 days", "in 7 days"]);

    let overdue: Vec<&str> = store
        .overdue()
        .iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(overdue, vec!["3 days ago", "1 hour ago"]);
}

#[test]
fn category_completion_tracks_toggles() {
    let (mut store, _) = open_store();
    let a = store.add(new_task("a", Priority::Low, Duration::days(1)));
    store.add(new_task("b", Priority::Low, Duration::days(1)));
    store.add(new_task("c", Priority::Low, Duration::days(1)));

    assert_eq!(store.category_completion_percentage(Category::Work), 0);
    store.toggle_complete(&a.id);
    assert_eq!(store.category_completion_percentage(Category::Work), 33);
    assert_eq!(store.category_completion_percentage(Category::Finance), 0);
}

#[test]
fn sorted_view_leaves_collection_order_alone() {
    let (mut store, _) = open_store();
    store.add(new_task("low", Priority::Low, Duration::days(1)));
    store.add(new_task("high", Priority::High, Duration::days(3)));
    store.add(new_task("medium", Priority::Medium, Duration::days(2)));

    let by_priority: Vec<&str> = store
        .sorted(TaskSortBy::Priority)
        .iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(by_priority, vec!["high", "medium", "low"]);

    let by_due: Vec<&str> = store
        .sorted(TaskSortBy::DueDate)
        .iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(by_due, vec!["low", "medium", "high"]);

    assert_eq!(store.all()[0].title, "low");
}
