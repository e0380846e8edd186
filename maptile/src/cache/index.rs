//! SQLite metadata index.
//!
//! One row per cached tile, keyed by `(vendor, key)` where `key` is
//! [`Tile::cache_key`](crate::tile::Tile::cache_key). The value is the write
//! time as 8 big-endian bytes of Unix seconds.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::traits::CacheError;

/// File name of the index database inside the cache root.
pub const INDEX_FILE: &str = "index.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tile_index (
    vendor  TEXT NOT NULL,
    key     TEXT NOT NULL,
    written BLOB NOT NULL,
    PRIMARY KEY (vendor, key)
)";

/// Encode a write time as 8 big-endian bytes of Unix seconds.
pub fn encode_timestamp(at: SystemTime) -> [u8; 8] {
    let secs = at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_be_bytes()
}

/// Decode a stored timestamp. Anything other than 8 bytes is malformed.
pub fn decode_timestamp(raw: &[u8]) -> Option<SystemTime> {
    let bytes: [u8; 8] = raw.try_into().ok()?;
    UNIX_EPOCH.checked_add(Duration::from_secs(u64::from_be_bytes(bytes)))
}

/// Persistent `(vendor, key) -> write time` map.
pub struct MetadataIndex {
    conn: Mutex<Connection>,
}

impl MetadataIndex {
    /// Open (or create) the index database at `path`.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory index, only used by tests.
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Write time recorded for the entry, if any.
    ///
    /// A row whose value is not exactly 8 bytes reads as absent.
    pub fn get(&self, vendor: &str, key: &str) -> Result<Option<SystemTime>, CacheError> {
        let conn = self.conn.lock();
        let raw: Option<Vec<u8>> = conn
            .query_row(
                "SELECT written FROM tile_index WHERE vendor = ?1 AND key = ?2",
                params![vendor, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|raw| decode_timestamp(&raw)))
    }

    /// Record (or overwrite) the write time for an entry.
    pub fn put(&self, vendor: &str, key: &str, at: SystemTime) -> Result<(), CacheError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO tile_index (vendor, key, written) VALUES (?1, ?2, ?3)",
            params![vendor, key, encode_timestamp(at).to_vec()],
        )?;
        Ok(())
    }

    /// Number of rows per vendor, sorted by vendor.
    pub fn counts(&self) -> Result<Vec<(String, u64)>, CacheError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT vendor, COUNT(*) FROM tile_index GROUP BY vendor ORDER BY vendor",
        )?;
        let rows = stmt.query_map([], |row| {
            let vendor: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((vendor, count.max(0) as u64))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Delete every row. Returns the number removed.
    pub fn clear(&self) -> Result<u64, CacheError> {
        let conn = self.conn.lock();
        let removed = conn.execute("DELETE FROM tile_index", [])?;
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_eight_bytes_big_endian() {
        let at = UNIX_EPOCH + Duration::from_secs(0x0102_0304);
        assert_eq!(encode_timestamp(at), [0, 0, 0, 0, 1, 2, 3, 4]);
        assert_eq!(decode_timestamp(&[0, 0, 0, 0, 1, 2, 3, 4]), Some(at));
    }

    #[test]
    fn test_malformed_timestamp_is_absent() {
        assert_eq!(decode_timestamp(&[1, 2, 3]), None);
        assert_eq!(decode_timestamp(&[0; 9]), None);
    }

    #[test]
    fn test_put_get_overwrite() {
        let index = MetadataIndex::in_memory().unwrap();
        assert_eq!(index.get("arcgis", "1_2_3").unwrap(), None);

        let first = UNIX_EPOCH + Duration::from_secs(100);
        let second = UNIX_EPOCH + Duration::from_secs(200);
        index.put("arcgis", "1_2_3", first).unwrap();
        assert_eq!(index.get("arcgis", "1_2_3").unwrap(), Some(first));

        index.put("arcgis", "1_2_3", second).unwrap();
        assert_eq!(index.get("arcgis", "1_2_3").unwrap(), Some(second));
    }

    #[test]
    fn test_vendors_are_separate_namespaces() {
        let index = MetadataIndex::in_memory().unwrap();
        let at = UNIX_EPOCH + Duration::from_secs(42);
        index.put("arcgis", "1_2_3", at).unwrap();

        assert_eq!(index.get("google", "1_2_3").unwrap(), None);
        assert_eq!(index.get("arcgis", "1_2_3").unwrap(), Some(at));
    }

    #[test]
    fn test_malformed_row_reads_as_absent() {
        let index = MetadataIndex::in_memory().unwrap();
        index
            .conn
            .lock()
            .execute(
                "INSERT INTO tile_index (vendor, key, written) VALUES ('v', 'k', ?1)",
                params![vec![1u8, 2, 3]],
            )
            .unwrap();
        assert_eq!(index.get("v", "k").unwrap(), None);
    }

    #[test]
    fn test_counts_and_clear() {
        let index = MetadataIndex::in_memory().unwrap();
        let at = SystemTime::now();
        index.put("osm", "0_0_1", at).unwrap();
        index.put("arcgis", "0_0_1", at).unwrap();
        index.put("arcgis", "1_0_1", at).unwrap();

        assert_eq!(
            index.counts().unwrap(),
            vec![("arcgis".to_string(), 2), ("osm".to_string(), 1)]
        );
        assert_eq!(index.clear().unwrap(), 3);
        assert!(index.counts().unwrap().is_empty());
    }
}
