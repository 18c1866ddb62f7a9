use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use log::{debug, error, info};

use crate::aggregate::{PortProtocolCounts, TagCounts};
use crate::error::FlowTagError;

pub const TAG_COUNTS_HEADER: [&str; 2] = ["Tag", "Count"];
pub const PORT_PROTOCOL_COUNTS_HEADER: [&str; 3] = ["Port", "Protocol", "Count"];

/// Writes one report table as comma-separated rows.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl ReportWriter<BufWriter<File>> {
    /// Creates (or truncates) the destination file.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(ReportWriter::new(BufWriter::new(file)))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        ReportWriter {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn write_tag_counts(&mut self, tag_counts: &TagCounts) -> io::Result<()> {
        debug!("Writing {} tag rows", tag_counts.len());
        self.writer.write_record(TAG_COUNTS_HEADER)?;
        for (tag, count) in tag_counts.iter() {
            self.writer
                .write_record([tag.as_str(), count.to_string().as_str()])?;
        }
        Ok(())
    }

    pub fn write_port_protocol_counts(
        &mut self,
        port_protocol_counts: &PortProtocolCounts,
    ) -> io::Result<()> {
        debug!(
            "Writing {} port/protocol rows",
            port_protocol_counts.len()
        );
        self.writer.write_record(PORT_PROTOCOL_COUNTS_HEADER)?;
        for (key, count) in port_protocol_counts.iter() {
            self.writer.write_record([
                key.dstport.to_string().as_str(),
                key.protocol.as_str(),
                count.to_string().as_str(),
            ])?;
        }
        Ok(())
    }

    /// Flushes buffered rows and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))
    }
}

fn write_report<F>(path: &Path, render: F) -> Result<(), FlowTagError>
where
    F: FnOnce(&mut ReportWriter<BufWriter<File>>) -> io::Result<()>,
{
    let result = ReportWriter::create(path).and_then(|mut writer| {
        render(&mut writer)?;
        writer.into_inner()?.flush()
    });

    result.map_err(|source| FlowTagError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes both reports. Each file is attempted even if the other fails; the
/// first failure is returned and already-written files are left in place.
pub fn write_reports(
    tag_counts_path: &Path,
    port_protocol_counts_path: &Path,
    tag_counts: &TagCounts,
    port_protocol_counts: &PortProtocolCounts,
) -> Result<(), FlowTagError> {
    info!(
        "Writing output to the files, {} and {}",
        tag_counts_path.display(),
        port_protocol_counts_path.display()
    );

    let tags = write_report(tag_counts_path, |w| w.write_tag_counts(tag_counts));
    if let Err(e) = &tags {
        error!("{}", e);
    }

    let ports = write_report(port_protocol_counts_path, |w| {
        w.write_port_protocol_counts(port_protocol_counts)
    });
    if let Err(e) = &ports {
        error!("{}", e);
    }

    tags.and(ports)
}
