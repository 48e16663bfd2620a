//! Task log and settings records on an on-disk store.

use cosmos_focus_core::storage::{KeyValueStore, SETTINGS_KEY, TASKS_KEY};
use cosmos_focus_core::{Database, TaskStore, TimerMode, TimerSettings};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Database {
    Database::open_at(&dir.path().join("cosmos-focus.db")).unwrap()
}

#[test]
fn task_list_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let written = {
        let db = open(&dir);
        let mut store = TaskStore::load(&db);
        store.add("Calibrate sensors").unwrap();
        store.add("Plot course").unwrap();
        let id = store.tasks()[0].id.clone();
        store.toggle(&id).unwrap();
        let tasks = store.tasks().to_vec();
        tasks
    };

    let db = open(&dir);
    let reloaded = TaskStore::load(&db);
    assert_eq!(reloaded.tasks(), written.as_slice());
    assert!(reloaded.tasks()[0].completed);
    assert_eq!(reloaded.remaining(), 1);
}

#[test]
fn blank_add_is_a_no_op_and_text_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let mut store = TaskStore::load(&db);

    assert!(store.add("   ").unwrap().is_none());
    assert!(store.is_empty());
    assert_eq!(db.get(TASKS_KEY).unwrap(), None);

    let task = store.add("Review telemetry").unwrap().cloned().unwrap();
    assert_eq!(task.text, "Review telemetry");
    assert!(!task.completed);
    assert_eq!(store.len(), 1);
    assert_eq!(store.tasks().last(), Some(&task));
}

#[test]
fn unknown_id_leaves_the_record_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    let mut store = TaskStore::load(&db);
    store.add("Stow gear").unwrap();
    let before = db.get(TASKS_KEY).unwrap();

    assert!(!store.toggle("not-an-id").unwrap());
    assert!(!store.remove("not-an-id").unwrap());
    assert_eq!(db.get(TASKS_KEY).unwrap(), before);
}

#[test]
fn corrupt_records_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir);
    db.set(TASKS_KEY, "{not json").unwrap();
    db.set(SETTINGS_KEY, r#"{"Focus":"soon"}"#).unwrap();

    assert!(TaskStore::load(&db).is_empty());
    assert_eq!(TimerSettings::load(&db), TimerSettings::default());
}

#[test]
fn settings_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = TimerSettings::default();
    settings.set_duration_secs(TimerMode::LongBreak, 30 * 60);
    settings.save(&open(&dir)).unwrap();

    let raw = open(&dir).get(SETTINGS_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["Long Break"], 1800);
    assert_eq!(TimerSettings::load(&open(&dir)), settings);
}
