use workout_core::db::open_db_in_memory;
use workout_core::{
    Activity, ActivityKind, ActivityRecord, ActivityRepository, ActivityService, Coordinates,
    MemorySlotRepository, NewActivity, RepoError, SlotRepository, SqliteSlotRepository,
};

fn sample_collection() -> Vec<Activity> {
    let mut paced = Activity::paced(Coordinates::new(39.0, -12.0), 5.2, 24.0, 178.0).unwrap();
    paced.record_interaction();
    let elevation =
        Activity::elevation(Coordinates::new(38.7, -9.1), 27.0, 95.0, 523.0).unwrap();
    vec![paced, elevation]
}

#[test]
fn load_without_stored_slot_is_empty() {
    let repo = ActivityRepository::new(MemorySlotRepository::new());
    assert!(repo.load_records().unwrap().is_empty());
    assert!(repo.load().unwrap().is_empty());
}

#[test]
fn round_trip_preserves_every_stored_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = ActivityRepository::new(SqliteSlotRepository::new(&conn));
    let original = sample_collection();

    repo.save(&original).unwrap();
    let records = repo.load_records().unwrap();

    assert_eq!(records.len(), 2);
    for (record, activity) in records.iter().zip(&original) {
        assert_eq!(&record.id, activity.id());
        assert_eq!(record.timestamp, activity.timestamp());
        assert_eq!(record.coords, activity.coordinates());
        assert_eq!(record.distance_km, activity.distance_km());
        assert_eq!(record.duration_min, activity.duration_min());
        assert_eq!(record.kind, activity.kind());
        assert_eq!(record.label, activity.label());
        assert_eq!(record.interaction_count, activity.interaction_count());
    }
    assert_eq!(records[0].cadence_spm, Some(178.0));
    assert_eq!(records[0].pace_min_per_km, original[0].pace_min_per_km());
    assert_eq!(records[1].elevation_gain_m, Some(523.0));
    assert_eq!(records[1].speed_km_per_h, original[1].speed_km_per_h());
}

#[test]
fn restored_records_are_plain_data_until_rebuilt_from_kind() {
    let repo = ActivityRepository::new(MemorySlotRepository::new());
    let original = sample_collection();
    repo.save(&original).unwrap();

    let records: Vec<ActivityRecord> = repo.load_records().unwrap();
    assert_eq!(records[0].kind, ActivityKind::Paced);
    assert_eq!(records[0].speed_km_per_h, None);
    assert_ne!(records[0], ActivityRecord::from(&original[1]));

    let rebuilt = repo.load().unwrap();
    assert_eq!(rebuilt, original);
}

#[test]
fn stored_json_uses_expected_wire_fields() {
    let slots = MemorySlotRepository::new();
    let repo = ActivityRepository::new(&slots);
    let original = sample_collection();
    repo.save(&original).unwrap();

    let payload = slots.read_slot("workouts").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
    let first = &json[0];
    assert_eq!(first["id"], original[0].id().as_str());
    assert_eq!(first["kind"], "paced");
    assert_eq!(first["coords"], serde_json::json!([39.0, -12.0]));
    assert_eq!(first["cadence_spm"], 178.0);
    assert_eq!(first["interaction_count"], 1);
    assert!(first.get("elevation_gain_m").is_none());
    assert_eq!(json[1]["kind"], "elevation");
}

#[test]
fn malformed_slot_is_reported_not_masked() {
    let slots = MemorySlotRepository::new();
    slots.write_slot("workouts", "{not json").unwrap();

    let err = ActivityRepository::new(&slots).load().unwrap_err();
    assert!(matches!(err, RepoError::Serialization(_)));
}

#[test]
fn record_with_mismatched_kind_fields_is_invalid_data() {
    let slots = MemorySlotRepository::new();
    let repo = ActivityRepository::new(&slots);
    repo.save(&sample_collection()).unwrap();

    let payload = slots.read_slot("workouts").unwrap().unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&payload).unwrap();
    json[0]["kind"] = serde_json::json!("elevation");
    slots.write_slot("workouts", &json.to_string()).unwrap();

    assert_eq!(repo.load_records().unwrap().len(), 2);
    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn reset_all_then_load_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ActivityService::new(ActivityRepository::new(SqliteSlotRepository::new(
        &conn,
    )));
    service
        .create(NewActivity::paced(Coordinates::new(39.0, -12.0), 5.2, 24.0, 178.0))
        .unwrap();
    assert_eq!(service.repository().load().unwrap().len(), 1);

    service.reset_all().unwrap();

    assert!(service.is_empty());
    assert!(service.repository().load().unwrap().is_empty());
    assert_eq!(service.rehydrate().unwrap(), 0);
}

#[test]
fn custom_storage_key_is_isolated() {
    let slots = MemorySlotRepository::new();
    let main = ActivityRepository::new(&slots);
    let other = ActivityRepository::with_key(&slots, "trail-log");

    other.save(&sample_collection()).unwrap();

    assert_eq!(other.key(), "trail-log");
    assert!(main.load().unwrap().is_empty());
    assert_eq!(other.load().unwrap().len(), 2);
}
