/// Loading and saving the souls document
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

use soulkeeper::souls::{Category, LedgerStore, SoulsDocument};
use soulkeeper::storage::{read_document, write_document};

fn doc_from(value: serde_json::Value) -> SoulsDocument {
    serde_json::from_value(value).expect("document")
}

#[test]
fn test_malformed_keys_are_skipped() {
    let good_a = Uuid::new_v4();
    let good_b = Uuid::new_v4();
    let doc = doc_from(json!({
        "players": {
            good_a.to_string(): { "Minerals": 12, "Crops": 3, "Assassination": 0, "Hunting": 7 },
            "not-a-uuid": { "Minerals": 999 },
            good_b.to_string(): { "Hunting": 40 }
        }
    }));

    let mut store = LedgerStore::new();
    let report = store.load_all(&doc);
    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.len(), 2);

    let a = store.get(&good_a).expect("a loaded");
    assert_eq!(a.balance(Category::Minerals), 12);
    assert_eq!(a.balance(Category::Hunting), 7);

    // Missing categories load as zero
    let b = store.get(&good_b).expect("b loaded");
    assert_eq!(b.balance(Category::Hunting), 40);
    assert_eq!(b.balance(Category::Crops), 0);
}

#[test]
fn test_bad_values_load_as_zero_and_negatives_clamp() {
    let id = Uuid::new_v4();
    let doc = doc_from(json!({
        "players": {
            id.to_string(): { "Minerals": "lots", "Crops": -20, "Hunting": 1.5, "Assassination": 9 }
        }
    }));
    let mut store = LedgerStore::new();
    store.load_all(&doc);
    let souls = store.get(&id).expect("loaded");
    assert_eq!(souls.balance(Category::Minerals), 0);
    assert_eq!(souls.balance(Category::Crops), 0);
    assert_eq!(souls.balance(Category::Hunting), 0);
    assert_eq!(souls.balance(Category::Assassination), 9);
}

#[test]
fn test_save_then_load_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("souls.json");

    let mut store = LedgerStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    store.get_or_create(alice).credit(Category::Crops, 14);
    store.get_or_create(bob).credit(Category::Assassination, 100);
    write_document(&path, &store.save_all()).unwrap();

    let mut reloaded = LedgerStore::new();
    let report = reloaded.load_all(&read_document(&path).unwrap());
    assert_eq!(report.loaded, 2);
    assert_eq!(reloaded.get(&alice), store.get(&alice));
    assert_eq!(reloaded.get(&bob), store.get(&bob));
}

#[test]
fn test_saved_snapshot_replaces_stale_players() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("souls.json");
    let stale = Uuid::new_v4();
    let kept = Uuid::new_v4();

    let mut first = LedgerStore::new();
    first.get_or_create(stale).credit(Category::Minerals, 1);
    first.get_or_create(kept).credit(Category::Minerals, 2);
    write_document(&path, &first.save_all()).unwrap();

    let mut second = LedgerStore::new();
    second.get_or_create(kept).credit(Category::Minerals, 5);
    write_document(&path, &second.save_all()).unwrap();

    let doc = read_document(&path).unwrap();
    assert_eq!(doc.players.len(), 1);
    assert!(!doc.players.contains_key(&stale.to_string()));
    assert_eq!(doc.balance_of(&kept.to_string(), Category::Minerals), 5);
}

#[test]
fn test_load_replaces_in_memory_state() {
    let mut store = LedgerStore::new();
    let old = Uuid::new_v4();
    store.get_or_create(old).credit(Category::Hunting, 3);

    store.load_all(&SoulsDocument::default());
    assert!(store.is_empty());
    assert!(!store.contains(&old));
}

#[test]
fn test_missing_file_creates_empty_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("souls.json");
    let doc = read_document(&path).unwrap();
    assert!(doc.players.is_empty());
    assert!(path.exists());
}

#[test]
fn test_get_never_creates_entries() {
    let mut store = LedgerStore::new();
    let id = Uuid::new_v4();
    assert!(store.get(&id).is_none());
    assert!(store.is_empty());
    store.get_or_create(id);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&id).map(|s| s.total()), Some(0));
}
