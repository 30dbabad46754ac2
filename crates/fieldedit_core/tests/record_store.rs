use fieldedit_core::db::open_db_in_memory;
use fieldedit_core::{Field, RecordStore, SqliteRecordStore, StoreError};

fn fields() -> Vec<Field> {
    vec![Field::new("Front", "question"), Field::new("Back", "answer")]
}

#[test]
fn create_and_get_preserves_field_order_and_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::new(&mut conn);

    let id = store
        .create_record(&fields(), &["Work".to_string(), "home".to_string()])
        .unwrap();
    let record = store.get_record(id).unwrap();

    assert_eq!(record.id, id);
    assert_eq!(record.fields, fields());
    assert_eq!(record.tags, vec!["home".to_string(), "Work".to_string()]);
    assert_eq!(record.revision, 0);
}

#[test]
fn missing_record_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::new(&mut conn);

    assert!(matches!(store.get_record(404), Err(StoreError::NotFound(404))));
    assert!(matches!(
        store.delete_record(404),
        Err(StoreError::NotFound(404))
    ));
}

#[test]
fn update_bumps_revision_and_rejects_deleted_records() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::new(&mut conn);
    let id = store.create_record(&fields(), &[]).unwrap();

    let mut record = store.get_record(id).unwrap();
    record.set_field("Back", "new answer");
    store.update_record(&record, None).unwrap();

    let reloaded = store.get_record(id).unwrap();
    assert_eq!(reloaded.field("Back"), Some("new answer"));
    assert_eq!(reloaded.revision, 1);

    store.delete_record(id).unwrap();
    assert!(matches!(
        store.update_record(&reloaded, None),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn duplicate_field_names_are_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::new(&mut conn);

    let err = store
        .create_record(&[Field::new("Front", "a"), Field::new("Front", "b")], &[])
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn canonicalize_adopts_registered_case_and_dedupes() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::new(&mut conn);
    store
        .create_record(&fields(), &["Grammar".to_string()])
        .unwrap();

    let tokens = ["grammar", "GRAMMAR", "verbs", "\"quoted\"", "Verbs"]
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>();
    let canonical = store.canonicalize_tags(&tokens).unwrap();

    assert_eq!(
        canonical,
        vec![
            "Grammar".to_string(),
            "quoted".to_string(),
            "verbs".to_string()
        ]
    );
}

#[test]
fn checkpoints_are_recorded_in_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::new(&mut conn);
    let id = store.create_record(&fields(), &[]).unwrap();
    let mut record = store.get_record(id).unwrap();

    record.set_field("Front", "one");
    store.update_record(&record, Some("first")).unwrap();
    record.set_field("Front", "two");
    store.update_record(&record, Some("second")).unwrap();
    record.set_field("Front", "three");
    store.update_record(&record, None).unwrap();

    assert_eq!(
        store.checkpoint_labels().unwrap(),
        vec!["first".to_string(), "second".to_string()]
    );
}

#[test]
fn failed_write_leaves_no_checkpoint() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::new(&mut conn);
    let id = store.create_record(&fields(), &[]).unwrap();
    let mut record = store.get_record(id).unwrap();
    store.delete_record(id).unwrap();

    record.set_field("Front", "late edit");
    assert!(matches!(
        store.update_record(&record, Some("Edit Field")),
        Err(StoreError::NotFound(_))
    ));

    let other = store.create_record(&fields(), &[]).unwrap();
    let mut widened = store.get_record(other).unwrap();
    widened.fields.push(Field::new("Extra", "x"));
    assert!(matches!(
        store.update_record(&widened, Some("Edit Field")),
        Err(StoreError::InvalidData(_))
    ));

    assert!(store.checkpoint_labels().unwrap().is_empty());
    assert_eq!(store.get_record(other).unwrap().revision, 0);
}
