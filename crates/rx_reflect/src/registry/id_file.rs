//! Export and import of the `name -> id` table.
//!
//! Ids are assigned in registration order, so two builds that register types
//! differently disagree on them. Persisted binary data stores ids, and the
//! id file lets a later build adopt the ids of an earlier one.
//!
//! Layout, little-endian:
//!
//! ```text
//! version: i32           DATABASE_VERSION
//! count:   u32
//! count * { id: u32, name: [u8], 0u8 }
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use rx_utils::hash::HashMap;

use super::database::id_after;
use super::{DatabaseFileError, TypeInfoDatabase};
use crate::info::{INVALID_REFLECTABLE_ID, ReflectableId};

/// Version written at the start of every id file.
///
/// Files with another version are rejected.
pub const DATABASE_VERSION: i32 = 0;

// -----------------------------------------------------------------------------
// Parsing

struct Entry {
    id: ReflectableId,
    name: String,
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DatabaseFileError> {
        let end = self.offset + len;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(DatabaseFileError::Truncated { offset: self.offset })?;
        self.offset = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, DatabaseFileError> {
        let mut buf = [0; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_name(&mut self) -> Result<String, DatabaseFileError> {
        let start = self.offset;
        let rest = self.bytes.get(start..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(DatabaseFileError::Truncated { offset: self.bytes.len() })?;
        let name = core::str::from_utf8(&rest[..len])
            .map_err(|_| DatabaseFileError::InvalidName { offset: start })?;
        self.offset = start + len + 1;
        Ok(String::from(name))
    }
}

fn parse(bytes: &[u8]) -> Result<Vec<Entry>, DatabaseFileError> {
    let mut cursor = Cursor { bytes, offset: 0 };

    let version = cursor.read_u32()? as i32;
    if version != DATABASE_VERSION {
        return Err(DatabaseFileError::VersionMismatch {
            expected: DATABASE_VERSION,
            found: version,
        });
    }

    let count = cursor.read_u32()?;
    let mut entries = Vec::new();
    for _ in 0..count {
        let offset = cursor.offset;
        let id = cursor.read_u32()?;
        if id == INVALID_REFLECTABLE_ID {
            return Err(DatabaseFileError::InvalidId { offset });
        }
        let name = cursor.read_name()?;
        entries.push(Entry { id, name });
    }
    Ok(entries)
}

// -----------------------------------------------------------------------------
// Database

impl TypeInfoDatabase {
    /// Serializes the `name -> id` table in registration order.
    pub fn binary_export(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&DATABASE_VERSION.to_le_bytes());
        bytes.extend_from_slice(&(self.len() as u32).to_le_bytes());
        for info in self.iter() {
            bytes.extend_from_slice(&info.id().to_le_bytes());
            bytes.extend_from_slice(info.name().as_bytes());
            bytes.push(0);
        }
        bytes
    }

    /// Adopts the ids of an exported table.
    ///
    /// A local type named in the table takes the table's id. The others get
    /// fresh ids above the highest id of the table, in registration order.
    /// The whole table is validated first, so on error nothing changes.
    pub fn import_binary(&mut self, bytes: &[u8]) -> Result<(), DatabaseFileError> {
        let entries = parse(bytes)?;

        let by_name: HashMap<&str, ReflectableId> = entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.id))
            .collect();
        let mut next = match entries.iter().map(|entry| entry.id).max() {
            Some(max) => id_after(max),
            None => Some(0),
        };

        let mut mapping: HashMap<ReflectableId, ReflectableId> = HashMap::default();
        let mut matched = 0usize;
        for info in self.iter() {
            let id = match by_name.get(info.name()) {
                Some(&id) => {
                    matched += 1;
                    id
                }
                None => {
                    let id = next.ok_or(DatabaseFileError::IdsExhausted { name: info.name() })?;
                    next = id_after(id);
                    id
                }
            };
            if id != info.id() {
                log::debug!("reflectable `{}` reassigned from id {} to {id}", info.name(), info.id());
            }
            mapping.insert(info.id(), id);
        }

        self.remap_ids(|id| mapping.get(&id).copied().unwrap_or(id));

        log::info!(
            "imported {} reflectable ids: {matched} matched, {} fresh",
            entries.len(),
            self.len() - matched
        );
        Ok(())
    }
}

crate::cfg::std! {
    use std::path::Path;

    impl TypeInfoDatabase {
        /// Writes [`binary_export`](Self::binary_export) to `path`.
        pub fn export_to_binary_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
            std::fs::write(path, self.binary_export())
        }

        /// Reads the raw bytes of an id file.
        pub fn binary_import(path: impl AsRef<Path>) -> std::io::Result<Vec<u8>> {
            std::fs::read(path)
        }

        /// Reads `path` and passes it to [`import_binary`](Self::import_binary).
        pub fn import_from_binary_file(
            &mut self,
            path: impl AsRef<Path>,
        ) -> Result<(), DatabaseFileError> {
            let bytes = Self::binary_import(path)?;
            self.import_binary(&bytes)
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
