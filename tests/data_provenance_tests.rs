//! Dataset files and the registry that records where each one came from.

use akchars::data::character::{load_characters, save_characters, Character};
use akchars::data::owned::{load_owned, save_owned, MergePolicy};
use akchars::data::registry::{load_registry, record_dataset, REGISTRY_FILE};
use akchars::data::DataError;

#[test]
fn characters_round_trip_through_the_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chars.json");
    let chars = vec![
        Character::new("char_002_amiya", "Amiya"),
        Character {
            rarity: Some("TIER_6".into()),
            ..Character::new("char_003_kalts", "Kal'tsit")
        },
    ];
    save_characters(&path, &chars).unwrap();
    assert_eq!(load_characters(&path).unwrap(), chars);
}

#[test]
fn unreadable_datasets_report_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chars.json");
    assert!(matches!(load_characters(&path), Err(DataError::Read { .. })));

    std::fs::write(&path, "{ not json").unwrap();
    match load_characters(&path) {
        Err(err @ DataError::Parse { .. }) => assert!(err.to_string().contains("chars.json")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn owned_import_history_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let owned_path = dir.path().join("owned.json");
    let registry_path = dir.path().join(REGISTRY_FILE);

    let mut owned = load_owned(&owned_path).unwrap();
    owned.apply(["char_002_amiya"], MergePolicy::Replace, "krooster:first");
    save_owned(&owned_path, &owned).unwrap();
    record_dataset(&registry_path, "owned", "krooster:first", "owned.json").unwrap();

    let mut owned = load_owned(&owned_path).unwrap();
    owned.apply(["char_003_kalts"], MergePolicy::Union, "krooster:second");
    save_owned(&owned_path, &owned).unwrap();
    record_dataset(&registry_path, "owned", "krooster:second", "owned.json").unwrap();

    let reloaded = load_owned(&owned_path).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.source.as_deref(), Some("krooster:second"));

    let registry = load_registry(&registry_path).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry["owned"].source, "krooster:second");
}
