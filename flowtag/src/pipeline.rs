use std::{
    io::BufRead,
    path::PathBuf,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::aggregate::{Aggregator, ScanStats};
use crate::error::FlowTagError;
use crate::flow_log::{classify, FlowLogScanner};
use crate::output::write_reports;
use crate::tables::{LookupTable, ProtocolTable};

/// The five files a run reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub flow_log: PathBuf,
    pub lookup: PathBuf,
    pub protocols: PathBuf,
    pub tag_counts_output: PathBuf,
    pub port_protocol_counts_output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: ScanStats,
    pub distinct_tags: usize,
    pub distinct_port_protocols: usize,
    pub elapsed: Duration,
}

/// Classifies every line of the scanner and counts the results.
///
/// Malformed lines are logged and skipped; a read error from the scanner ends
/// the scan with that error.
pub fn scan_and_aggregate<R: BufRead>(
    scanner: FlowLogScanner<R>,
    protocols: &ProtocolTable,
    lookup: &LookupTable,
) -> Result<Aggregator, FlowTagError> {
    let mut aggregator = Aggregator::new();

    for outcome in scanner {
        match outcome? {
            Ok(record) => {
                let classification = classify(&record, protocols, lookup);
                debug!(
                    "Line {}: {} tagged {}",
                    record.line_number, classification.key, classification.tag
                );
                aggregator.record(&classification);
            }
            Err(malformed) => aggregator.skip(&malformed),
        }
    }

    Ok(aggregator)
}

/// Loads the reference tables, scans the flow log and writes both reports.
///
/// Any fatal condition stops the run before the next phase; in particular no
/// report is written unless the whole flow log was scanned.
pub fn run(paths: &RunPaths) -> Result<RunSummary, FlowTagError> {
    let start = Instant::now();
    debug!("Running with {:?}", paths);

    let lookup = LookupTable::load(&paths.lookup)?;
    let protocols = ProtocolTable::load(&paths.protocols)?;

    let scanner = FlowLogScanner::open(&paths.flow_log)?;
    let aggregator = scan_and_aggregate(scanner, &protocols, &lookup)?;
    let (tag_counts, port_protocol_counts, stats) = aggregator.finish();

    info!(
        "Scanned {} lines: {} classified, {} skipped",
        stats.lines_read, stats.classified, stats.malformed
    );
    if tag_counts.is_empty() {
        warn!(
            "No records classified from {}, reports will only hold headers",
            paths.flow_log.display()
        );
    }
    debug!(
        "Counted {} tag hits and {} port/protocol hits",
        tag_counts.total(),
        port_protocol_counts.total()
    );

    write_reports(
        &paths.tag_counts_output,
        &paths.port_protocol_counts_output,
        &tag_counts,
        &port_protocol_counts,
    )?;

    Ok(RunSummary {
        stats,
        distinct_tags: tag_counts.len(),
        distinct_port_protocols: port_protocol_counts.len(),
        elapsed: start.elapsed(),
    })
}
