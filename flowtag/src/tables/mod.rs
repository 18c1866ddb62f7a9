pub mod lookup_table;
pub mod protocol_table;

use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;

use crate::error::FlowTagError;

pub use lookup_table::{ClassificationKey, LookupTable};
pub use protocol_table::ProtocolTable;

/// Opens a reference table, reporting a missing file as `SourceNotFound`.
pub(crate) fn open_reference(path: &Path) -> Result<File, FlowTagError> {
    File::open(path).map_err(|e| FlowTagError::from_open(path, e))
}

/// Deserializes the data rows of a headed, comma-separated reference table.
///
/// Columns are matched by header name; only the header is trimmed, data fields
/// are passed on as written. Each item carries the 1-based data row number so
/// callers can report where a value failed to parse.
pub(crate) fn deserialize_rows<'p, R, T>(
    reader: R,
    path: &'p Path,
) -> impl Iterator<Item = Result<(u64, T), FlowTagError>> + 'p
where
    R: Read + 'p,
    T: DeserializeOwned + 'p,
{
    let rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(reader);

    rdr.into_deserialize::<T>()
        .enumerate()
        .map(move |(index, result)| {
            let row = index as u64 + 1;
            result
                .map(|record| (row, record))
                .map_err(|err| csv_error(path, row, err))
        })
}

/// Parses a required integer column, ignoring surrounding whitespace.
pub(crate) fn parse_number(
    path: &Path,
    row: u64,
    column: &str,
    value: &str,
) -> Result<i64, FlowTagError> {
    value.trim().parse::<i64>().map_err(|e| FlowTagError::Parse {
        path: path.to_path_buf(),
        line: row,
        reason: format!("column `{}` has non-numeric value {:?} ({})", column, value, e),
    })
}

fn csv_error(path: &Path, row: u64, err: csv::Error) -> FlowTagError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => FlowTagError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => FlowTagError::Parse {
            path: path.to_path_buf(),
            line: row,
            reason,
        },
    }
}
