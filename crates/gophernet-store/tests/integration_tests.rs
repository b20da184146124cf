//! Integration tests for gophernet-store
//!
//! These tests exercise the catalog against real files on disk and from
//! several threads at once.

use gophernet_domain::Burrow;
use gophernet_store::{BurrowRepository, MemoryStore, StatefulRepository, StoreError};
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn setup_store(dir: &TempDir) -> MemoryStore {
    MemoryStore::new(dir.path().join("state.json"), dir.path().join("report.txt"))
}

fn sample_burrows() -> Vec<Burrow> {
    vec![
        Burrow::new("Burrow1", 1.5, 1.0, false, 100),
        Burrow::new("Burrow2", 2.0, 1.2, true, 50),
    ]
}

#[test]
fn test_load_state() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);

    let data = serde_json::to_vec(&sample_burrows()).unwrap();
    fs::write(store.state_file(), data).unwrap();

    store.load_state().unwrap();

    let loaded = store.list_all();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].name, "Burrow1");
    assert_eq!(loaded[1].name, "Burrow2");
    assert_eq!(loaded, sample_burrows());
}

#[test]
fn test_load_state_replaces_catalog() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);
    store.add(Burrow::new("Stale", 1.0, 1.0, false, 0));

    fs::write(
        store.state_file(),
        r#"[{"name":"Fresh","depth":3.0,"width":1.0,"occupied":false,"age":0}]"#,
    )
    .unwrap();
    store.load_state().unwrap();

    let loaded = store.list_all();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Fresh");
    assert!(matches!(store.rent("Stale"), Err(StoreError::NotFound { .. })));
}

#[test]
fn test_load_state_missing_file() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);
    store.add(Burrow::new("Keep", 1.0, 1.0, false, 0));

    let result = store.load_state();

    assert!(matches!(result, Err(StoreError::Io { .. })));
    assert_eq!(store.list_all().len(), 1, "failed load must not touch the catalog");
}

#[test]
fn test_load_state_malformed_file() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);
    store.add(Burrow::new("Keep", 1.0, 1.0, false, 0));

    fs::write(
        store.state_file(),
        r#"[{"name":"Half","depth":1.0,"width":1.0,"occupied":false,"age":1}, {"name":"#,
    )
    .unwrap();
    let result = store.load_state();

    assert!(matches!(result, Err(StoreError::Decode(_))));
    let burrows = store.list_all();
    assert_eq!(burrows.len(), 1);
    assert_eq!(burrows[0].name, "Keep");
}

#[test]
fn test_save_state() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);
    for burrow in sample_burrows() {
        store.add(burrow);
    }

    store.save_state().unwrap();

    let data = fs::read_to_string(store.state_file()).unwrap();
    assert!(data.starts_with("[\n  {\n    \"name\": \"Burrow1\""));
    assert!(data.ends_with("]\n"));

    let saved: Vec<Burrow> = serde_json::from_str(&data).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].name, "Burrow1");
    assert_eq!(saved[1].name, "Burrow2");
}

#[cfg(unix)]
#[test]
fn test_save_state_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);
    store.save_state().unwrap();

    let mode = fs::metadata(store.state_file()).unwrap().permissions().mode();
    // umask can only clear bits
    assert_eq!(mode & 0o7133, 0);
    assert_eq!(mode & 0o600, 0o600);
}

#[test]
fn test_save_state_creates_parent_directory() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(
        dir.path().join("nested").join("state.json"),
        dir.path().join("report.txt"),
    );
    store.add(Burrow::new("Burrow1", 1.0, 1.0, false, 0));

    store.save_state().unwrap();
    assert!(store.state_file().exists());
}

#[test]
fn test_save_state_unwritable_path() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should be
    let store = MemoryStore::new(dir.path(), dir.path().join("report.txt"));

    let result = store.save_state();
    assert!(matches!(result, Err(StoreError::Io { .. })));
}

#[test]
fn test_round_trip_preserves_order() {
    let dir = TempDir::new().unwrap();
    let file_a = dir.path().join("a.json");
    let file_b = dir.path().join("b.json");

    let burrows = vec![
        Burrow::new("Zeta", 1.25, 0.5, false, 10),
        Burrow::new("Alpha", 0.0, 2.0, true, 36_000),
        Burrow::new("Mid", 1.009, 1.1, true, 7),
    ];
    fs::write(&file_a, serde_json::to_vec_pretty(&burrows).unwrap()).unwrap();

    let first = MemoryStore::new(&file_a, dir.path().join("report.txt"));
    first.load_state().unwrap();

    let second = MemoryStore::new(&file_b, dir.path().join("report.txt"));
    for burrow in first.list_all() {
        second.add(burrow);
    }
    second.save_state().unwrap();

    let third = MemoryStore::new(&file_b, dir.path().join("report.txt"));
    third.load_state().unwrap();

    assert_eq!(first.list_all(), third.list_all());
    assert_eq!(third.list_all(), burrows);
}

#[test]
fn test_rent_burrow() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);
    store.add(Burrow::new("Burrow1", 1.5, 1.0, false, 100));

    store.rent("Burrow1").unwrap();
    assert!(store.list_all()[0].occupied);

    let again = store.rent("Burrow1");
    assert!(matches!(again, Err(StoreError::Unavailable { .. })));
    assert_eq!(again.unwrap_err().to_string(), "burrow not available");
}

#[test]
fn test_concurrent_rent_single_winner() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(setup_store(&dir));
    store.add(Burrow::new("Contested", 1.0, 1.0, false, 0));

    let contenders = 8;
    let barrier = Arc::new(Barrier::new(contenders));

    let handles: Vec<_> = (0..contenders)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.rent("Contested")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let losers = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::Unavailable { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(losers, contenders - 1);
}

#[test]
fn test_tick_all() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);
    store.add(Burrow::new("B", 1.0, 1.0, true, 10));
    store.add(Burrow::new("C", 2.0, 1.2, false, 20));

    store.tick_all();

    let burrows = store.list_all();
    assert!((burrows[0].depth - 1.009).abs() < 1e-9);
    assert_eq!(burrows[0].age, 11);
    assert_eq!(burrows[1].depth, 2.0);
    assert_eq!(burrows[1].age, 21);
}

#[test]
fn test_tick_all_concurrent_with_readers() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(setup_store(&dir));
    for i in 0..16 {
        store.add(Burrow::new(format!("B{i}"), 1.0, 1.0, false, 0));
    }

    let ticker = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..100 {
                store.tick_all();
            }
        })
    };

    // Every snapshot is a serialization point: all burrows share one age
    for _ in 0..100 {
        let snapshot = store.list_all();
        let first_age = snapshot[0].age;
        assert!(snapshot.iter().all(|b| b.age == first_age));
    }

    ticker.join().unwrap();
    assert!(store.list_all().iter().all(|b| b.age == 100));
}

#[test]
fn test_save_report() {
    let dir = TempDir::new().unwrap();
    let store = setup_store(&dir);

    let report = "Test Report Content";
    store.save_report(report).unwrap();

    let data = fs::read_to_string(store.report_file()).unwrap();
    assert_eq!(data, report);
}
