//! Tests for RedbEpochStore
//!
//! These tests verify:
//! - Empty result for never-saved epochs (missing table and missing key)
//! - Byte-exact persistence and overwrite
//! - Alignment rejection before any write
//! - Delete and epoch listing
//! - Durability across reopen

use spandb::config::{Config, SyncStrategy};
use spandb::store::{EpochSpanStore, RedbEpochStore};
use spandb::{EpochSpanBuffer, Span, SpanDbError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn test_config(temp_dir: &TempDir) -> Config {
    Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::Immediate)
        .cache_size_bytes(1024 * 1024)
        .build()
}

fn setup_temp_store() -> (TempDir, RedbEpochStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = RedbEpochStore::open(&test_config(&temp_dir)).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("slasher");
    let config = Config::builder().data_dir(&data_dir).build();

    let _store = RedbEpochStore::open(&config).unwrap();

    assert!(data_dir.join("spans.redb").exists());
}

#[test]
fn test_open_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .db_filename("")
        .build();

    let result = RedbEpochStore::open(&config);
    assert!(matches!(result, Err(SpanDbError::Config(_))));
}

// =============================================================================
// Load / Save Tests
// =============================================================================

#[test]
fn test_load_before_any_save_is_empty() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.epoch_spans(0).unwrap(), Vec::<u8>::new());
    assert_eq!(store.epoch_spans(u64::MAX).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_load_unsaved_epoch_is_empty() {
    let (_temp, store) = setup_temp_store();
    store.save_epoch_spans(1, &[0u8; 7]).unwrap();

    assert!(store.epoch_spans(2).unwrap().is_empty());
    assert!(!store.has_epoch_spans(2).unwrap());
    assert!(store.has_epoch_spans(1).unwrap());
}

#[test]
fn test_save_load_byte_exact() {
    let (_temp, store) = setup_temp_store();
    let blob: Vec<u8> = (0..70u8).collect();

    store.save_epoch_spans(9, &blob).unwrap();

    assert_eq!(store.epoch_spans(9).unwrap(), blob);
}

#[test]
fn test_save_overwrites_previous_blob() {
    let (_temp, store) = setup_temp_store();

    store.save_epoch_spans(3, &[1u8; 21]).unwrap();
    store.save_epoch_spans(3, &[2u8; 7]).unwrap();

    assert_eq!(store.epoch_spans(3).unwrap(), vec![2u8; 7]);
}

#[test]
fn test_save_empty_blob() {
    let (_temp, store) = setup_temp_store();

    store.save_epoch_spans(4, &[]).unwrap();

    assert!(store.epoch_spans(4).unwrap().is_empty());
    assert_eq!(store.stored_epochs().unwrap(), vec![4]);
    assert!(store.has_epoch_spans(4).unwrap());
    assert!(!store.has_epoch_spans(5).unwrap());
}

#[test]
fn test_save_rejects_misaligned_blob() {
    let (_temp, store) = setup_temp_store();

    let err = store.save_epoch_spans(1, &[0u8; 10]).unwrap_err();

    assert!(matches!(err, SpanDbError::MalformedBuffer { len: 10 }));
    assert!(store.epoch_spans(1).unwrap().is_empty());
    assert!(store.stored_epochs().unwrap().is_empty());
}

#[test]
fn test_load_returns_stored_bytes_as_is() {
    let (_temp, store) = setup_temp_store();
    store.save_epoch_spans(2, &[0xEE; 14]).unwrap();

    // Decoding is left to the buffer
    let buffer = EpochSpanBuffer::from_bytes(store.epoch_spans(2).unwrap());
    assert_eq!(buffer.get(1).unwrap(), Span::new(0xEEEE, 0xEEEE, [0xEE, 0xEE], true));
}

// =============================================================================
// Delete / Listing Tests
// =============================================================================

#[test]
fn test_delete_epoch_spans() {
    let (_temp, store) = setup_temp_store();
    store.save_epoch_spans(5, &[1u8; 7]).unwrap();

    assert!(store.delete_epoch_spans(5).unwrap());
    assert!(!store.delete_epoch_spans(5).unwrap());
    assert!(store.epoch_spans(5).unwrap().is_empty());
}

#[test]
fn test_delete_without_table() {
    let (_temp, store) = setup_temp_store();

    assert!(!store.has_epoch_spans(1).unwrap());
    assert!(!store.delete_epoch_spans(1).unwrap());
}

#[test]
fn test_stored_epochs_ascending() {
    let (_temp, store) = setup_temp_store();

    for epoch in [300, 2, 256, 1, 70_000] {
        store.save_epoch_spans(epoch, &[0u8; 7]).unwrap();
    }

    assert_eq!(store.stored_epochs().unwrap(), vec![1, 2, 256, 300, 70_000]);
}

// =============================================================================
// Durability Tests
// =============================================================================

#[test]
fn test_spans_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let blob = vec![3, 0, 10, 0, 1, 2, 1, 0, 0, 0, 0, 0, 0, 0];

    {
        let store = RedbEpochStore::open(&test_config(&temp_dir)).unwrap();
        store.save_epoch_spans(5, &blob).unwrap();
    }

    let store = RedbEpochStore::open(&test_config(&temp_dir)).unwrap();
    assert_eq!(store.epoch_spans(5).unwrap(), blob);
}

#[test]
fn test_eventual_durability_visible_in_process() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::Eventual)
        .build();
    let store = RedbEpochStore::open(&config).unwrap();

    store.save_epoch_spans(8, &[9u8; 7]).unwrap();

    assert_eq!(store.epoch_spans(8).unwrap(), vec![9u8; 7]);
}
