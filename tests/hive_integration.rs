//! Integration tests for hive persistence.
//!
//! These tests drive the public API the way an embedding application
//! would: load a hive, open settings, edit, save, and load it back from
//! a fresh manager.

use std::fs;

use tempfile::TempDir;

use hivework::core::codec::{self, CodecError, FORMAT_MINOR};
use hivework::core::entry::Entry;
use hivework::core::path::{ensure_key, get_by_path, place_at_path};
use hivework::core::types::HiveName;
use hivework::hive::{Flow, HiveError, HiveEvent, HiveManager, SaveOutcome};
use hivework::schema::MigrationOutcome;
use hivework::settings::{DatabaseKind, Settings};

// =============================================================================
// Test Helpers
// =============================================================================

struct TestHives {
    dir: TempDir,
}

impl TestHives {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn manager(&self) -> HiveManager {
        HiveManager::new(self.dir.path(), "integration-test")
    }

    fn hive_file(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(format!("{}.hive", name))
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn first_run_init_save_and_reload() {
    let hives = TestHives::new();
    let manager = hives.manager();

    let registry = manager.load_default().unwrap();
    assert!(registry.lock().is_empty());

    let (_, reports) = Settings::open(&registry).unwrap();
    assert_eq!(reports[1].path, "HKS/sockets");
    assert_eq!(
        reports[1].outcome,
        MigrationOutcome::Initialized { to: 2 }
    );
    assert!(matches!(
        manager.save(&registry).unwrap(),
        SaveOutcome::Saved { .. }
    ));

    let reloaded = hives.manager().load_default().unwrap();
    assert_eq!(*reloaded.lock(), *registry.lock());

    let (settings, reports) = Settings::open(&reloaded).unwrap();
    assert!(reports.iter().all(|r| !r.outcome.changed()));
    let tree = reloaded.lock();
    assert_eq!(settings.sockets.http.get(&tree).unwrap(), 7790);
    assert_eq!(settings.database.dbname.get(&tree).unwrap(), "Harbinger");
    assert_eq!(
        settings.database.kind(&tree).unwrap(),
        Some(DatabaseKind::Registry)
    );
    assert_eq!(settings.discord.token.get(&tree).unwrap(), "0123");
}

#[test]
fn edits_survive_and_upgrades_keep_values() {
    let hives = TestHives::new();
    let manager = hives.manager();

    // An old hive: sockets at v1 with a customised port.
    let registry = manager.load_default().unwrap();
    {
        let mut tree = registry.lock();
        let root = tree.root();
        let key = ensure_key(&mut tree, root, "HKS/sockets").unwrap();
        tree.add(key, Entry::leaf("version", 1i32).unwrap()).unwrap();
        tree.add(key, Entry::leaf("port", 9000i32).unwrap()).unwrap();
    }
    manager.save(&registry).unwrap();

    let registry = manager.load_default().unwrap();
    let (settings, reports) = Settings::open(&registry).unwrap();
    let sockets = reports.iter().find(|r| r.path == "HKS/sockets").unwrap();
    assert_eq!(sockets.outcome, MigrationOutcome::Upgraded { from: 1, to: 2 });
    manager.save(&registry).unwrap();

    let reloaded = manager.load_default().unwrap();
    let tree = reloaded.lock();
    let root = tree.root();
    let http = get_by_path(&tree, root, "HKS/sockets/http").unwrap();
    assert_eq!(tree.int32(http).unwrap(), 9000);
    assert!(get_by_path(&tree, root, "HKS/sockets/port").is_none());
    drop(tree);
    let tree = registry.lock();
    assert_eq!(settings.sockets.udp.get(&tree).unwrap(), 7792);
}

#[test]
fn nested_paths_round_trip() {
    let hives = TestHives::new();
    let manager = hives.manager();
    let registry = manager.open("plugins").unwrap();
    {
        let mut tree = registry.lock();
        let root = tree.root();
        place_at_path(
            &mut tree,
            root,
            "a/b/c",
            Entry::leaf("big", i64::MIN).unwrap(),
        )
        .unwrap();
        place_at_path(&mut tree, root, "a", Entry::leaf("word", "héllo").unwrap()).unwrap();
    }
    manager.save(&registry).unwrap();

    let loaded = manager.open("plugins").unwrap();
    let tree = loaded.lock();
    let big = get_by_path(&tree, tree.root(), "a/b/c/big").unwrap();
    assert_eq!(tree.int64(big).unwrap(), i64::MIN);
    let word = get_by_path(&tree, tree.root(), "a/word").unwrap();
    assert_eq!(tree.word(word).unwrap(), "héllo");
    assert_eq!(tree.path_of(big).as_deref(), Some("a/b/c/big"));
}

// =============================================================================
// Format compatibility
// =============================================================================

#[test]
fn older_minor_loads_and_is_upgraded_on_save() {
    let hives = TestHives::new();
    let manager = hives.manager();
    let registry = manager.load_default().unwrap();
    Settings::open(&registry).unwrap();
    manager.save(&registry).unwrap();

    let path = hives.hive_file("main");
    let mut bytes = fs::read(&path).unwrap();
    bytes[1] = 0;
    fs::write(&path, &bytes).unwrap();

    let decoded = codec::decode_hive(&bytes).unwrap();
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].found_minor, 0);

    let loaded = manager.load_default().unwrap();
    assert_eq!(*loaded.lock(), *registry.lock());
    manager.save(&loaded).unwrap();

    let info = manager.inspect(&HiveName::default_hive()).unwrap();
    assert_eq!(info.header.minor, FORMAT_MINOR);
    assert_eq!(info.header.creator, "integration-test");
}

#[test]
fn hand_written_v1_0_file_loads_with_warning() {
    let hives = TestHives::new();

    let mut bytes = vec![1u8, 0, 12];
    bytes.extend_from_slice(b"Tara Piccari");
    bytes.extend_from_slice(&[0; 16]);
    // root Key holding one Word and one little-endian Int32
    bytes.extend_from_slice(&[6, 4]);
    bytes.extend_from_slice(b"root");
    bytes.push(2);
    bytes.extend_from_slice(&[0, 8]);
    bytes.extend_from_slice(b"greeting");
    bytes.extend_from_slice(&[2]);
    bytes.extend_from_slice(b"hi");
    bytes.extend_from_slice(&[2, 4]);
    bytes.extend_from_slice(b"port");
    bytes.extend_from_slice(&7790i32.to_le_bytes());
    fs::write(hives.hive_file("main"), &bytes).unwrap();

    let decoded = codec::decode_hive(&bytes).unwrap();
    assert_eq!(decoded.header.creator, "Tara Piccari");
    assert_eq!(decoded.warnings.len(), 1);

    let registry = hives.manager().load_default().unwrap();
    let tree = registry.lock();
    let greeting = get_by_path(&tree, tree.root(), "greeting").unwrap();
    assert_eq!(tree.word(greeting).unwrap(), "hi");
    let port = get_by_path(&tree, tree.root(), "port").unwrap();
    assert_eq!(tree.int32(port).unwrap(), 7790);
}

#[test]
fn newer_major_is_refused() {
    let hives = TestHives::new();
    let manager = hives.manager();
    let registry = manager.load_default().unwrap();
    manager.save(&registry).unwrap();

    let path = hives.hive_file("main");
    let mut bytes = fs::read(&path).unwrap();
    bytes[0] = 2;
    fs::write(&path, &bytes).unwrap();

    let err = manager.load_default().unwrap_err();
    assert!(matches!(
        err,
        HiveError::Codec {
            source: CodecError::IncompatibleFormat { found: 2, .. },
            ..
        }
    ));
}

#[test]
fn truncated_file_is_corrupt_and_reload_keeps_tree() {
    let hives = TestHives::new();
    let manager = hives.manager();
    let registry = manager.load_default().unwrap();
    Settings::open(&registry).unwrap();
    manager.save(&registry).unwrap();
    let before = registry.lock().clone();

    let path = hives.hive_file("main");
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 5]).unwrap();

    let err = manager.reload(&registry).unwrap_err();
    assert!(matches!(
        err,
        HiveError::Codec {
            source: CodecError::CorruptData { .. },
            ..
        }
    ));
    assert_eq!(*registry.lock(), before);
}

// =============================================================================
// Events
// =============================================================================

#[test]
fn saving_subscriber_flushes_before_write() {
    let hives = TestHives::new();
    let mut manager = hives.manager();
    manager.subscribe(10, |event| {
        if let HiveEvent::Saving { registry, .. } = event {
            let mut tree = registry.lock();
            let root = tree.root();
            if tree.get_named(root, "flushed").is_none() {
                tree.add(root, Entry::leaf("flushed", true).unwrap()).unwrap();
            }
        }
        Flow::Continue
    });

    let registry = manager.load_default().unwrap();
    manager.save(&registry).unwrap();

    let loaded = hives.manager().load_default().unwrap();
    let tree = loaded.lock();
    assert!(get_by_path(&tree, tree.root(), "flushed").is_some());
}

#[test]
fn cancelled_save_writes_nothing() {
    let hives = TestHives::new();
    let mut manager = hives.manager();
    manager.subscribe(0, |event| match event {
        HiveEvent::Saving { .. } => Flow::Cancel,
        _ => Flow::Continue,
    });

    let registry = manager.load_default().unwrap();
    assert_eq!(manager.save(&registry).unwrap(), SaveOutcome::Cancelled);
    assert!(!hives.hive_file("main").exists());
}
