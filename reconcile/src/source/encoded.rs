//! Loaders for the ID-encoded side of a dataset.
//!
//! The upstream pipeline ships an entity table (`URI → integer ID`) and one
//! edge table per split. Both are read from JSON.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{ReconcileError, Result};
use crate::model::EncodedEdge;

/// Inverse of the upstream entity table: integer ID → entity URI.
#[derive(Debug, Default, Clone)]
pub struct EntityIds {
    by_id: HashMap<u64, String>,
}

impl EntityIds {
    /// Builds the table from `(URI, ID)` pairs as stored upstream.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::DuplicateEntityId`] if two URIs carry the
    /// same ID.
    pub fn from_uri_ids<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut by_id: HashMap<u64, String> = HashMap::new();
        for (uri, id) in pairs {
            let uri = uri.into();
            if let Some(first) = by_id.get(&id) {
                if *first != uri {
                    return Err(ReconcileError::DuplicateEntityId {
                        id,
                        first: first.clone(),
                        second: uri,
                    });
                }
                continue;
            }
            by_id.insert(id, uri);
        }
        Ok(Self { by_id })
    }

    /// Reads a JSON object `{ "<uri>": <id>, ... }`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error naming `path`, or
    /// [`ReconcileError::DuplicateEntityId`].
    pub fn read_file(path: &Path) -> Result<Self> {
        let table: BTreeMap<String, u64> = decode(open(path)?, path)?;
        Self::from_uri_ids(table)
    }

    /// URI of entity `id`.
    #[must_use]
    pub fn uri(&self, id: u64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Number of entities in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Reads one split's edge table: a JSON array of wire edges.
///
/// # Errors
///
/// Returns an I/O or JSON error naming `path`.
pub fn read_edges(path: &Path) -> Result<Vec<EncodedEdge>> {
    parse_edges(open(path)?, path)
}

/// Decodes an edge table from any reader. `origin` is only used in errors.
///
/// # Errors
///
/// Returns a JSON error naming `origin`.
pub fn parse_edges<R: Read>(reader: R, origin: &Path) -> Result<Vec<EncodedEdge>> {
    decode(reader, origin)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ReconcileError::io(path, e))
}

fn decode<T: serde::de::DeserializeOwned, R: Read>(reader: R, origin: &Path) -> Result<T> {
    serde_json::from_reader(reader).map_err(|source| ReconcileError::Json {
        path: origin.to_path_buf(),
        source,
    })
}
