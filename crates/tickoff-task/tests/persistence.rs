use std::fs;

use tickoff_core::{
    storage::KeyValueStore,
    tasks::{Filter, Theme, TASKS_SLOT, THEME_SLOT},
};
use tickoff_storage::FileStore;
use tickoff_task::{EditCommand, TaskBoard};

#[test]
fn board_survives_restart_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");

    let (milk, bread) = {
        let mut board = TaskBoard::open(FileStore::new(dir.path()));
        let milk = board.add("Buy milk").expect("milk");
        let bread = board.add("Buy bread").expect("bread");
        board.toggle_complete(milk);
        board.toggle_important(bread);
        board.start_edit(bread);
        board.edit_change("Buy sourdough");
        board.apply_edit_command(EditCommand::Accept);
        board.toggle_theme();
        board.set_filter(Filter::Completed);
        (milk, bread)
    };

    let board = TaskBoard::open(FileStore::new(dir.path()));
    assert_eq!(board.theme(), Theme::Dark);
    assert_eq!(board.filter(), Filter::All);
    assert!(board.edit_session().is_none());

    let milk = board.task(milk).expect("milk persisted");
    assert!(milk.completed);
    let bread = board.task(bread).expect("bread persisted");
    assert_eq!(bread.text, "Buy sourdough");
    assert!(bread.is_important);
}

#[test]
fn tasks_slot_uses_camel_case_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut board = TaskBoard::open(FileStore::new(dir.path()));
    let id = board.add("Stretch").expect("added");

    let raw = fs::read_to_string(dir.path().join("tasks.json")).expect("slot file");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(
        json,
        serde_json::json!([{
            "id": id.0,
            "text": "Stretch",
            "completed": false,
            "isImportant": false
        }])
    );
}

#[test]
fn corrupt_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path());
    store.set(TASKS_SLOT, "[{\"id\": ").expect("seed tasks");
    store.set(THEME_SLOT, "\"neon\"").expect("seed theme");

    let mut board = TaskBoard::open(store.clone());
    assert!(board.tasks().is_empty());
    assert_eq!(board.theme(), Theme::Light);

    // The next write replaces the corrupt contents.
    board.add("Fresh start").expect("added");
    let reopened = TaskBoard::open(store);
    assert_eq!(reopened.tasks().len(), 1);
}

#[test]
fn toggled_theme_reads_back_as_opposite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path());
    let mut board = TaskBoard::open(store.clone());
    let before = board.theme();
    board.toggle_theme();

    let raw = store.get(THEME_SLOT).expect("theme slot");
    let persisted: Theme = serde_json::from_str(&raw).expect("theme json");
    assert_eq!(persisted, before.toggled());
}
