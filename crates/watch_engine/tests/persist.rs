use std::fs;

use tempfile::TempDir;
use watch_core::{Category, WatermarkState};
use watch_engine::{ensure_dir, AtomicFileWriter, StateStore};

fn state_with(eo: &str, proc_url: &str) -> WatermarkState {
    let mut state = WatermarkState::new();
    state.set(Category::ExecutiveOrder, eo);
    state.set(Category::Proclamation, proc_url);
    state
}

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("nested").join("state");
    assert!(!new_dir.exists());
    ensure_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn missing_file_loads_empty() {
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().join("eo_state.json"));
    assert!(store.load().is_empty());
}

#[test]
fn corrupt_file_loads_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("eo_state.json");
    fs::write(&path, "{\"executive_order\": \"https://x/1\"").unwrap();

    let store = StateStore::new(&path);
    assert!(store.load().is_empty());
}

#[test]
fn save_then_load_restores_every_category() {
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().join("deep").join("eo_state.json"));
    let state = state_with("https://x/eo/2", "https://x/proc/7");

    store.save(&state).unwrap();
    assert_eq!(store.load(), state);

    let text = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        text,
        "{\n  \"executive_order\": \"https://x/eo/2\",\n  \"proclamation\": \"https://x/proc/7\"\n}\n"
    );
}

#[test]
fn uncommitted_stage_leaves_previous_state_intact() {
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().join("eo_state.json"));
    let before = state_with("https://x/eo/1", "https://x/proc/1");
    store.save(&before).unwrap();

    let staged = store
        .stage(&state_with("https://x/eo/2", "https://x/proc/2"))
        .unwrap();
    let temp_path = staged.temp_path().to_path_buf();
    assert!(temp_path.exists());
    assert_eq!(temp_path.parent(), store.path().parent());

    // Process dies before the rename.
    drop(staged);

    assert!(!temp_path.exists());
    assert_eq!(store.load(), before);
    let leftovers: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn committed_stage_replaces_previous_state() {
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().join("eo_state.json"));
    store.save(&state_with("https://x/eo/1", "https://x/proc/1")).unwrap();

    let after = state_with("https://x/eo/2", "https://x/proc/1");
    store.stage(&after).unwrap().commit().unwrap();
    assert_eq!(store.load(), after);
}

#[test]
fn no_partial_file_when_parent_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let writer = AtomicFileWriter::new(blocker.join("eo_state.json"));
    assert!(writer.write("{}").is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
