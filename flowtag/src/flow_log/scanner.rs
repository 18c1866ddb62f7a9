use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    num::{IntErrorKind, ParseIntError},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::error::{FlowTagError, MalformedReason, MalformedRecord};

/// Minimum number of whitespace separated fields in a usable flow log line.
pub const MIN_FIELDS_IN_LOG: usize = 14;

const DSTPORT_FIELD: usize = 6;
const PROTOCOL_FIELD: usize = 7;

/// The two fields of a flow log line that classification needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRecord {
    pub line_number: u64,
    pub dstport: i64,
    /// `None` when the field is an integer too large for any protocol table key;
    /// such a record classifies as an unknown protocol.
    pub protocol_number: Option<i64>,
}

/// Either a parsed record or the reason the line was skipped.
pub type LineOutcome = Result<FlowRecord, MalformedRecord>;

/// Parses a decimal integer field. `Ok(None)` means the text is a well-formed
/// integer outside the `i64` range.
fn parse_integer(text: &str) -> Result<Option<i64>, ParseIntError> {
    match text.parse::<i64>() {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Parses one flow log line. `line_number` is 1-based.
///
/// Only the field count and the destination port / protocol number fields are
/// checked; every other field is ignored.
pub fn parse_line(line_number: u64, line: &str) -> LineOutcome {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() < MIN_FIELDS_IN_LOG {
        return Err(MalformedRecord {
            line_number,
            reason: MalformedReason::TooFewFields {
                found: fields.len(),
            },
        });
    }

    let dstport = fields[DSTPORT_FIELD]
        .parse::<i64>()
        .map_err(|_| MalformedRecord {
            line_number,
            reason: MalformedReason::InvalidPort(fields[DSTPORT_FIELD].to_string()),
        })?;
    let protocol_number = parse_integer(fields[PROTOCOL_FIELD]).map_err(|_| MalformedRecord {
        line_number,
        reason: MalformedReason::InvalidProtocol(fields[PROTOCOL_FIELD].to_string()),
    })?;

    Ok(FlowRecord {
        line_number,
        dstport,
        protocol_number,
    })
}

/// Single pass, line by line reader over a flow log.
///
/// Yields one `LineOutcome` per input line. A read failure part way through the
/// source (e.g. invalid UTF-8) is yielded as a fatal `FlowTagError` and ends the
/// scan.
pub struct FlowLogScanner<R> {
    lines: Lines<R>,
    line_number: u64,
    path: PathBuf,
    failed: bool,
}

impl FlowLogScanner<BufReader<File>> {
    /// Opens a flow log file. A missing file is `SourceNotFound`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FlowTagError> {
        let path = path.as_ref();
        info!("Parsing flow logs from {}", path.display());
        let file = File::open(path).map_err(|e| FlowTagError::from_open(path, e))?;
        Ok(FlowLogScanner::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> FlowLogScanner<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        FlowLogScanner {
            lines: reader.lines(),
            line_number: 0,
            path: path.into(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for FlowLogScanner<R> {
    type Item = Result<LineOutcome, FlowTagError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.lines.next()? {
            Ok(line) => {
                self.line_number += 1;
                Some(Ok(parse_line(self.line_number, &line)))
            }
            Err(source) => {
                self.failed = true;
                debug!(
                    "Read error after line {} of {}",
                    self.line_number,
                    self.path.display()
                );
                Some(Err(FlowTagError::Io {
                    path: self.path.clone(),
                    source,
                }))
            }
        }
    }
}
