//! Integration tests for the persistence gateway over real and failing slots.

use std::sync::atomic::Ordering;

use hero_db::models::AppData;
use hero_db::slot::{FileSlot, SlotBackend};
use hero_db::{PersistenceGateway, STORAGE_KEY, StorageError};
use hero_test_utils::{FlakySlot, sample_image, sample_snapshot, stub_days, temp_gateway};

#[test]
fn save_then_load_returns_identical_snapshot() {
    let (gw, _dir) = temp_gateway();
    let mut snapshot = sample_snapshot();
    snapshot
        .plan
        .set_task_completion(4, "day-5-eveningTask", true)
        .expect("task exists");

    gw.try_save(&snapshot).unwrap();
    let loaded = gw.try_load().unwrap().expect("snapshot present");
    assert_eq!(loaded, snapshot);
}

#[test]
fn persisted_text_uses_documented_field_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let slot = FileSlot::new(dir.path());
    let gw = PersistenceGateway::new(slot.clone());
    gw.try_save(&sample_snapshot()).unwrap();

    let text = std::fs::read_to_string(slot.path_for(STORAGE_KEY)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for field in ["profile", "plan", "startDate", "generatedImages"] {
        assert!(value.get(field).is_some(), "missing top-level field {field}");
    }
    let first_task = &value["plan"][0]["tasks"][0];
    assert_eq!(first_task["type"], "quran_morning");
    assert_eq!(first_task["isCompleted"], false);
    assert_eq!(value["plan"][0]["dayNumber"], 1);
    assert_eq!(value["profile"]["level"], "PRIMARY");
}

#[test]
fn load_accepts_snapshot_from_first_release() {
    // Arabic level label, millisecond ISO date, no generatedImages field.
    let mut value = serde_json::to_value(sample_snapshot()).unwrap();
    value["profile"]["level"] = "ابتدائي".into();
    value["startDate"] = "2025-06-01T08:30:00.000Z".into();
    value.as_object_mut().unwrap().remove("generatedImages");

    let gw = PersistenceGateway::new(FlakySlot::with_contents(&value.to_string()));
    let loaded: AppData = gw.load().expect("legacy snapshot loads");
    assert!(loaded.generated_images.is_empty());
    assert_eq!(loaded.start_date, sample_snapshot().start_date);
}

#[test]
fn load_treats_malformed_records_as_absent() {
    let truncated_plan = {
        let mut value = serde_json::to_value(sample_snapshot()).unwrap();
        value["plan"] = serde_json::to_value(&stub_days()[..10]).unwrap();
        value.to_string()
    };
    let invalid_profile = {
        let mut value = serde_json::to_value(sample_snapshot()).unwrap();
        value["profile"] = serde_json::json!({
            "name": "",
            "age": 0,
            "level": "PRIMARY",
            "languages": ["  ", ""],
        });
        value.to_string()
    };
    let too_many_images = {
        let mut value = serde_json::to_value(sample_snapshot()).unwrap();
        let images: Vec<_> = (1..=4).map(sample_image).collect();
        value["generatedImages"] = serde_json::to_value(images).unwrap();
        value.to_string()
    };
    let cases = [
        "".to_string(),
        "null".to_string(),
        "[1, 2, 3]".to_string(),
        "{\"profile\": null}".to_string(),
        "{not json".to_string(),
        truncated_plan,
        invalid_profile,
        too_many_images,
    ];

    for text in cases {
        let gw = PersistenceGateway::new(FlakySlot::with_contents(&text));
        assert!(gw.load().is_none(), "expected absent for {text:?}");
    }
}

#[test]
fn load_treats_read_failure_as_absent() {
    let slot = FlakySlot::with_contents(&serde_json::to_string(&sample_snapshot()).unwrap());
    slot.controls.fail_reads.store(true, Ordering::SeqCst);
    let gw = PersistenceGateway::new(slot);
    assert!(matches!(gw.try_load(), Err(StorageError::Io(_))));
    assert!(gw.load().is_none());
}

#[test]
fn save_failure_is_reported_by_try_save_and_absorbed_by_save() {
    let slot = FlakySlot::failing_writes();
    let gw = PersistenceGateway::new(slot.clone());

    assert!(matches!(gw.try_save(&sample_snapshot()), Err(StorageError::Io(_))));
    gw.save(&sample_snapshot());
    assert_eq!(slot.writes_attempted(), 2);
    assert!(slot.contents().is_none());
}

#[test]
fn clear_removes_slot_and_is_idempotent() {
    let (gw, _dir) = temp_gateway();
    gw.save(&sample_snapshot());
    assert!(gw.load().is_some());

    gw.clear();
    assert!(gw.load().is_none());
    gw.try_clear().expect("clearing an absent slot is not an error");
}

#[test]
fn other_keys_are_left_alone() {
    let dir = tempfile::TempDir::new().unwrap();
    let slot = FileSlot::new(dir.path());
    slot.write("holiday_hero_data_v0", "old format").unwrap();

    let gw = PersistenceGateway::new(slot.clone());
    assert!(gw.load().is_none());
    gw.save(&sample_snapshot());
    gw.clear();

    assert_eq!(
        slot.read("holiday_hero_data_v0").unwrap().as_deref(),
        Some("old format")
    );
}
