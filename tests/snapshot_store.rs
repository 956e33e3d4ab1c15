use tempfile::TempDir;
use zonestat::{
    GeoBounds, HeightClass, SnapshotZoneStore, Zone, ZoneCorners, ZoneError, ZoneStore,
    persist_zones,
};

fn zone(id: &str, min_lon: f64) -> Zone {
    let mut zone = Zone::new(id, ZoneCorners::from_bounds(min_lon, 0.0, min_lon + 0.01, 0.01));
    zone.stats.record("residential", HeightClass::LowRise, 250.0);
    zone.recalculate_needed = false;
    zone
}

#[test]
fn test_open_missing_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = SnapshotZoneStore::open(dir.path().join("zones.snapshot")).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.stats().unwrap().zone_count, 0);
}

#[test]
fn test_upserts_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zones.snapshot");

    {
        let mut store = SnapshotZoneStore::open(&path).unwrap();
        store.upsert_zones(&[zone("a", 0.0), zone("b", 0.01)]).unwrap();
    }

    let store = SnapshotZoneStore::open(&path).unwrap();
    assert_eq!(store.len(), 2);
    let a = store.get("a").unwrap();
    assert_eq!(a.stats.area_of("residential"), 250.0);
    assert!(!a.recalculate_needed);
    assert!(a.geometry().is_none());
}

#[test]
fn test_deletes_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zones.snapshot");

    {
        let mut store = SnapshotZoneStore::open(&path).unwrap();
        store.upsert_zones(&[zone("a", 0.0), zone("b", 0.01)]).unwrap();
        let removed = store
            .delete_zones(&["a".to_string(), "missing".to_string()])
            .unwrap();
        assert_eq!(removed, 1);
    }

    let store = SnapshotZoneStore::open(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.get("a").is_none());
    assert!(store.get("b").is_some());
}

#[test]
fn test_rejects_foreign_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zones.snapshot");
    std::fs::write(&path, b"NOT_A_ZONE_SNAPSHOT_AT_ALL").unwrap();

    assert!(matches!(
        SnapshotZoneStore::open(&path),
        Err(ZoneError::InvalidFormat)
    ));
}

#[test]
fn test_persist_replaces_split_zones() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zones.snapshot");

    let mut store = SnapshotZoneStore::open(&path).unwrap();
    store.upsert_zones(&[zone("root", 0.0)]).unwrap();

    let children = vec![zone("root_tl", 0.0), zone("root_tr", 0.005)];
    persist_zones(&mut store, &["root".to_string()], &children).unwrap();

    let store = SnapshotZoneStore::open(&path).unwrap();
    let loaded = store
        .load_initial_zones(&GeoBounds::new(-1.0, -1.0, 1.0, 1.0))
        .unwrap();
    let mut ids: Vec<&str> = loaded.iter().map(|z| z.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["root_tl", "root_tr"]);
}
