use std::{collections::HashMap, io::Read, path::Path};

use log::{debug, info, warn};
use serde::Deserialize;

use super::{deserialize_rows, open_reference, parse_number};
use crate::error::FlowTagError;

#[derive(Debug, Deserialize)]
struct ProtocolRow {
    number: String,
    name: String,
}

/// IANA protocol number to lowercase protocol name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProtocolTable {
    names: HashMap<i64, String>,
}

impl ProtocolTable {
    /// Loads the table from a `number,name` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowTagError> {
        let path = path.as_ref();
        info!("Loading protocols from {}", path.display());
        let file = open_reference(path)?;
        let table = Self::from_reader(file, path)?;
        if table.is_empty() {
            warn!("No protocols loaded from {}", path.display());
        } else {
            info!("Loaded {} protocols", table.len());
        }
        Ok(table)
    }

    /// Builds the table from any reader; `path` is only used in diagnostics.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, FlowTagError> {
        let mut table = ProtocolTable::default();
        for row in deserialize_rows(reader, path) {
            let (row, record): (u64, ProtocolRow) = row?;
            let number = parse_number(path, row, "number", &record.number)?;
            if let Some(previous) = table.insert(number, &record.name) {
                debug!(
                    "Protocol {} redefined at row {}: {} replaces {}",
                    number, row, record.name, previous
                );
            }
        }
        Ok(table)
    }

    /// Inserts a protocol, lowercasing its name. Returns the replaced name, if any.
    pub fn insert(&mut self, number: i64, name: &str) -> Option<String> {
        self.names.insert(number, name.to_lowercase())
    }

    pub fn name(&self, number: i64) -> Option<&str> {
        self.names.get(&number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(i64, S)> for ProtocolTable {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        let mut table = ProtocolTable::default();
        for (number, name) in iter {
            table.insert(number, name.as_ref());
        }
        table
    }
}
