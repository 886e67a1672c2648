use chrono::NaiveDate;
use lazytask_core::db::open_db_in_memory;
use lazytask_core::{
    NewTask, ReconcileSummary, RecurrenceRule, SqliteTaskRepository, SundayOrdinal, Task,
    TaskCategory, TaskEdit, TaskListQuery, TaskPriority, TaskRepository, TaskService,
    TaskServiceError, TaskStatus,
};
use rusqlite::Connection;
use uuid::Uuid;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>> {
    TaskService::new(SqliteTaskRepository::new(conn))
}

fn one_time(title: &str, due: NaiveDate) -> NewTask {
    NewTask {
        due_date: Some(due),
        ..NewTask::new(title, RecurrenceRule::OneTime)
    }
}

#[test]
fn reconcile_on_load_advances_only_lapsed_recurring_tasks() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let weekly = Task::new("water plants", ymd(2024, 1, 7), RecurrenceRule::WeeklySunday);
    let old_one_time = Task::new("renew permit", ymd(2023, 9, 1), RecurrenceRule::OneTime);
    let future_monthly = Task::new(
        "book club",
        ymd(2024, 3, 17),
        RecurrenceRule::MonthlyNthSunday(SundayOrdinal::Third),
    );
    repo.save_tasks(&[weekly.clone(), old_one_time.clone(), future_monthly.clone()])
        .unwrap();

    let service = service(&conn);
    let today = ymd(2024, 3, 1);
    let summary = service.reconcile_on_load(today).unwrap();
    assert_eq!(summary, ReconcileSummary { total: 3, advanced: 1 });

    let stored = service.export_tasks().unwrap();
    assert_eq!(stored[0].id, weekly.id);
    assert_eq!(stored[0].due_date, ymd(2024, 3, 3));
    assert_eq!(stored[1], old_one_time);
    assert_eq!(stored[2], future_monthly);

    let second = service.reconcile_on_load(today).unwrap();
    assert_eq!(second, ReconcileSummary { total: 3, advanced: 0 });
    assert_eq!(service.export_tasks().unwrap(), stored);
}

#[test]
fn create_recurring_task_computes_due_date() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let request = NewTask {
        // A user-entered date is ignored for recurring tasks.
        due_date: Some(ymd(2020, 1, 1)),
        category: TaskCategory::House,
        ..NewTask::new(
            "  deep clean  ",
            RecurrenceRule::MonthlyNthSunday(SundayOrdinal::Second),
        )
    };
    let task = service.create_task(request, ymd(2024, 1, 15)).unwrap();

    assert_eq!(task.title, "deep clean");
    assert_eq!(task.category, TaskCategory::House);
    assert_eq!(task.due_date, ymd(2024, 2, 11));
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(service.get_task(task.id).unwrap(), Some(task));
}

#[test]
fn create_one_time_task_keeps_past_date() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let task = service
        .create_task(one_time("backfill invoice", ymd(2023, 12, 1)), ymd(2024, 1, 15))
        .unwrap();
    assert_eq!(task.due_date, ymd(2023, 12, 1));
}

#[test]
fn create_rejects_missing_date_and_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let today = ymd(2024, 1, 15);

    let missing_date = service
        .create_task(NewTask::new("no date", RecurrenceRule::OneTime), today)
        .unwrap_err();
    assert!(matches!(missing_date, TaskServiceError::InvalidInput(_)));

    let blank = service
        .create_task(one_time("   ", ymd(2024, 2, 1)), today)
        .unwrap_err();
    assert!(matches!(blank, TaskServiceError::InvalidInput(_)));

    assert!(service.export_tasks().unwrap().is_empty());
}

#[test]
fn metadata_edit_does_not_move_due_date() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service
        .create_task(
            NewTask::new("sweep porch", RecurrenceRule::WeeklySunday),
            ymd(2024, 1, 8),
        )
        .unwrap();
    assert_eq!(created.due_date, ymd(2024, 1, 14));

    let edit = TaskEdit {
        title: Some("sweep porch and steps".to_string()),
        priority: Some(TaskPriority::High),
        ..TaskEdit::default()
    };
    let edited = service.edit_task(created.id, edit, ymd(2024, 1, 10)).unwrap();

    assert_eq!(edited.title, "sweep porch and steps");
    assert_eq!(edited.priority, TaskPriority::High);
    assert_eq!(edited.due_date, created.due_date);
}

#[test]
fn schedule_edit_recomputes_recurring_due_date() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service
        .create_task(
            NewTask::new("mow lawn", RecurrenceRule::WeeklySunday),
            ymd(2024, 1, 8),
        )
        .unwrap();

    let edit = TaskEdit {
        recurrence: Some(RecurrenceRule::MonthlyNthSunday(SundayOrdinal::First)),
        ..TaskEdit::default()
    };
    let edited = service.edit_task(created.id, edit, ymd(2024, 1, 8)).unwrap();

    assert_eq!(
        edited.recurrence,
        RecurrenceRule::MonthlyNthSunday(SundayOrdinal::First)
    );
    assert_eq!(edited.due_date, ymd(2024, 2, 4));
    assert_eq!(service.get_task(created.id).unwrap(), Some(edited));
}

#[test]
fn switching_to_one_time_keeps_submitted_date() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service
        .create_task(
            NewTask::new("inspect roof", RecurrenceRule::WeeklySunday),
            ymd(2024, 1, 8),
        )
        .unwrap();

    let edit = TaskEdit {
        recurrence: Some(RecurrenceRule::OneTime),
        due_date: Some(ymd(2024, 6, 12)),
        ..TaskEdit::default()
    };
    let edited = service.edit_task(created.id, edit, ymd(2024, 1, 8)).unwrap();

    assert_eq!(edited.recurrence, RecurrenceRule::OneTime);
    assert_eq!(edited.due_date, ymd(2024, 6, 12));
}

#[test]
fn completed_one_time_task_made_recurring_is_pending_again() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let today = ymd(2024, 1, 8);
    let created = service
        .create_task(one_time("oil hinges", ymd(2024, 1, 9)), today)
        .unwrap();
    let completed = service.toggle_completion(created.id, today).unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);

    let edit = TaskEdit {
        recurrence: Some(RecurrenceRule::WeeklySunday),
        ..TaskEdit::default()
    };
    let edited = service.edit_task(created.id, edit, today).unwrap();

    assert_eq!(edited.recurrence, RecurrenceRule::WeeklySunday);
    assert_eq!(edited.status, TaskStatus::Pending);
    assert_eq!(edited.due_date, ymd(2024, 1, 14));
    assert_eq!(service.get_task(created.id).unwrap(), Some(edited));
}

#[test]
fn edit_rejects_empty_edit_and_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let today = ymd(2024, 1, 8);
    let created = service
        .create_task(one_time("call bank", ymd(2024, 1, 9)), today)
        .unwrap();

    assert!(matches!(
        service.edit_task(created.id, TaskEdit::default(), today).unwrap_err(),
        TaskServiceError::InvalidInput(_)
    ));

    let rename = TaskEdit {
        title: Some("call bank again".to_string()),
        ..TaskEdit::default()
    };
    let missing = Uuid::new_v4();
    assert!(matches!(
        service.edit_task(missing, rename, today).unwrap_err(),
        TaskServiceError::TaskNotFound(id) if id == missing
    ));
}

#[test]
fn toggle_recurring_task_advances_and_stays_pending() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let today = ymd(2024, 1, 10);
    let created = service
        .create_task(NewTask::new("weekly review", RecurrenceRule::WeeklySunday), today)
        .unwrap();
    assert_eq!(created.due_date, ymd(2024, 1, 14));

    let toggled = service.toggle_completion(created.id, today).unwrap();
    assert_eq!(toggled.status, TaskStatus::Pending);
    assert_eq!(toggled.due_date, ymd(2024, 1, 21));
    assert_eq!(service.get_task(created.id).unwrap(), Some(toggled));
}

#[test]
fn toggle_one_time_task_flips_status() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let today = ymd(2024, 1, 10);
    let created = service
        .create_task(one_time("pick up parcel", ymd(2024, 1, 11)), today)
        .unwrap();

    let completed = service.toggle_completion(created.id, today).unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);
    assert_eq!(completed.due_date, created.due_date);

    let reopened = service.toggle_completion(created.id, today).unwrap();
    assert_eq!(reopened.status, TaskStatus::Pending);
}

#[test]
fn delete_removes_task_and_reports_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service
        .create_task(one_time("shred papers", ymd(2024, 2, 2)), ymd(2024, 1, 1))
        .unwrap();

    service.delete_task(created.id).unwrap();
    assert_eq!(service.get_task(created.id).unwrap(), None);
    assert!(matches!(
        service.delete_task(created.id).unwrap_err(),
        TaskServiceError::TaskNotFound(_)
    ));
}

#[test]
fn list_applies_query() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let today = ymd(2024, 1, 1);

    for (title, day, category) in [
        ("prune hedge", 20, TaskCategory::Gardening),
        ("plant bulbs", 5, TaskCategory::Gardening),
        ("file report", 2, TaskCategory::Office),
    ] {
        let request = NewTask {
            category,
            ..one_time(title, ymd(2024, 1, day))
        };
        service.create_task(request, today).unwrap();
    }

    let query = TaskListQuery {
        category: Some(TaskCategory::Gardening),
        ..TaskListQuery::default()
    };
    let titles: Vec<String> = service
        .list_tasks(&query)
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(titles, vec!["plant bulbs", "prune hedge"]);
}

#[test]
fn import_replaces_collection_and_reconciles() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let today = ymd(2024, 3, 1);
    service
        .create_task(one_time("to be replaced", ymd(2024, 3, 5)), today)
        .unwrap();

    let exported = serde_json::to_string(&vec![
        Task::new("stale weekly", ymd(2024, 1, 7), RecurrenceRule::WeeklySunday),
        Task::new("one-off", ymd(2024, 1, 2), RecurrenceRule::OneTime),
    ])
    .unwrap();
    let tasks: Vec<Task> = serde_json::from_str(&exported).unwrap();

    let summary = service.import_tasks(tasks, today).unwrap();
    assert_eq!(summary, ReconcileSummary { total: 2, advanced: 1 });

    let stored = service.export_tasks().unwrap();
    let titles: Vec<&str> = stored.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["stale weekly", "one-off"]);
    assert_eq!(stored[0].due_date, ymd(2024, 3, 3));
    assert_eq!(stored[1].due_date, ymd(2024, 1, 2));
}
