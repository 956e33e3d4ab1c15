//! Snapshot-backed zone store.
//!
//! The whole zone set is held in memory and rewritten to disk after every
//! mutating call. Snapshots are written to a temporary file and atomically
//! renamed over the previous one.

use crate::error::{Result, ZoneError};
use crate::storage::{MemoryZoneStore, StoreStats, ZoneStore};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use zonestat_types::{GeoBounds, Zone};

const SNAPSHOT_MAGIC: &[u8] = b"ZONESTAT_SNAPSHOT";
const SNAPSHOT_VERSION: u8 = 1;

pub struct SnapshotZoneStore {
    path: PathBuf,
    memory: MemoryZoneStore,
}

impl SnapshotZoneStore {
    /// Open a snapshot, starting empty when the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let zones = load_snapshot(&path)?;
        log::debug!("Opened zone snapshot {} with {} zones", path.display(), zones.len());
        Ok(Self {
            path,
            memory: MemoryZoneStore::with_zones(zones),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.memory.get(id)
    }

    /// Write the current zone set to disk.
    pub fn save(&self) -> Result<()> {
        let temp_path = self.temp_path();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;

        let zones: Vec<&Zone> = self.memory.zones().collect();
        bincode::serialize_into(&mut writer, &zones)?;

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }
}

impl ZoneStore for SnapshotZoneStore {
    fn load_initial_zones(&self, bounds: &GeoBounds) -> Result<Vec<Zone>> {
        self.memory.load_initial_zones(bounds)
    }

    fn delete_zones(&mut self, ids: &[String]) -> Result<usize> {
        let removed = self.memory.delete_zones(ids)?;
        self.save()?;
        Ok(removed)
    }

    fn upsert_zones(&mut self, zones: &[Zone]) -> Result<()> {
        self.memory.upsert_zones(zones)?;
        self.save()
    }

    fn stats(&self) -> Result<StoreStats> {
        self.memory.stats()
    }
}

fn load_snapshot(path: &Path) -> Result<Vec<Zone>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }

    let mut reader = BufReader::new(file);

    let mut magic = vec![0u8; SNAPSHOT_MAGIC.len()];
    reader.read_exact(&mut magic)?;
    if magic != SNAPSHOT_MAGIC {
        return Err(ZoneError::InvalidFormat);
    }

    let mut version = [0u8; 1];
    reader.read_exact(&mut version)?;
    if version[0] != SNAPSHOT_VERSION {
        return Err(ZoneError::InvalidFormat);
    }

    let zones: Vec<Zone> = bincode::deserialize_from(&mut reader)?;
    Ok(zones)
}
