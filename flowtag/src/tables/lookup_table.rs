use std::{collections::HashMap, fmt, io::Read, path::Path};

use log::{debug, info, warn};
use serde::Deserialize;

use super::{deserialize_rows, open_reference, parse_number};
use crate::error::FlowTagError;

/// The (destination port, lowercase protocol name) pair used both to find a
/// record's tag and to count port/protocol occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassificationKey {
    pub dstport: i64,
    pub protocol: String,
}

impl ClassificationKey {
    pub fn new(dstport: i64, protocol: impl Into<String>) -> Self {
        ClassificationKey {
            dstport,
            protocol: protocol.into(),
        }
    }
}

impl fmt::Display for ClassificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dstport, self.protocol)
    }
}

#[derive(Debug, Deserialize)]
struct LookupRow {
    dstport: String,
    protocol: String,
    tag: String,
}

/// Maps a classification key to a user supplied tag.
///
/// Protocol names are lowercased on insertion; tags are kept verbatim,
/// surrounding whitespace included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupTable {
    tags: HashMap<ClassificationKey, String>,
}

impl LookupTable {
    /// Loads the table from a `dstport,protocol,tag` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowTagError> {
        let path = path.as_ref();
        info!("Creating lookup table from {}", path.display());
        let file = open_reference(path)?;
        let table = Self::from_reader(file, path)?;
        if table.is_empty() {
            warn!(
                "No lookup entries loaded from {}, every record will be untagged",
                path.display()
            );
        } else {
            info!("Loaded {} lookup entries", table.len());
        }
        Ok(table)
    }

    /// Builds the table from any reader; `path` is only used in diagnostics.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, FlowTagError> {
        let mut table = LookupTable::default();
        for row in deserialize_rows(reader, path) {
            let (row, record): (u64, LookupRow) = row?;
            let dstport = parse_number(path, row, "dstport", &record.dstport)?;
            if let Some(previous) = table.insert(dstport, &record.protocol, &record.tag) {
                // Last row wins.
                debug!(
                    "Lookup entry {}/{} redefined at row {}: {} replaces {}",
                    dstport, record.protocol, row, record.tag, previous
                );
            }
        }
        Ok(table)
    }

    /// Inserts an entry. Returns the replaced tag, if any.
    pub fn insert(&mut self, dstport: i64, protocol: &str, tag: &str) -> Option<String> {
        self.tags.insert(
            ClassificationKey::new(dstport, protocol.to_lowercase()),
            tag.to_string(),
        )
    }

    pub fn get(&self, key: &ClassificationKey) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<P: AsRef<str>, T: AsRef<str>> FromIterator<(i64, P, T)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (i64, P, T)>>(iter: I) -> Self {
        let mut table = LookupTable::default();
        for (dstport, protocol, tag) in iter {
            table.insert(dstport, protocol.as_ref(), tag.as_ref());
        }
        table
    }
}
