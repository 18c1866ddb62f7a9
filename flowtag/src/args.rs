use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::FlowTagError;
use crate::pipeline::RunPaths;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// TOML configuration file with a `[files]` table
    #[clap(short, long)]
    pub config_file: Option<PathBuf>,

    /// Flow log to classify
    #[clap(long)]
    pub flow_log: Option<PathBuf>,

    /// Lookup table with `dstport,protocol,tag` columns
    #[clap(long)]
    pub lookup: Option<PathBuf>,

    /// Protocol table with `number,name` columns
    #[clap(long)]
    pub protocols: Option<PathBuf>,

    /// Destination of the per-tag counts
    #[clap(long)]
    pub tag_counts_output: Option<PathBuf>,

    /// Destination of the per port/protocol counts
    #[clap(long)]
    pub port_protocol_counts_output: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub files: FilesConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FilesConfig {
    pub flow_log_file: PathBuf,
    pub lookup_file: PathBuf,
    pub protocols_file: PathBuf,
    pub tag_counts_output_file: PathBuf,
    pub port_protocol_counts_output_file: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            flow_log_file: PathBuf::from("flowlogs.txt"),
            lookup_file: PathBuf::from("lookup.csv"),
            protocols_file: PathBuf::from("protocols.csv"),
            tag_counts_output_file: PathBuf::from("tag_counts.csv"),
            port_protocol_counts_output_file: PathBuf::from("port_protocol_counts.csv"),
        }
    }
}

impl ConfigFile {
    /// Loads a configuration file. confy writes the defaults if the file is absent.
    pub fn load(path: &Path) -> Result<Self, FlowTagError> {
        confy::load_path::<ConfigFile>(path).map_err(|e| FlowTagError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Cli {
    /// Resolves the run paths: command line flag, then config file, then default.
    pub fn resolve(self, config: ConfigFile) -> RunPaths {
        let files = config.files;
        RunPaths {
            flow_log: self.flow_log.unwrap_or(files.flow_log_file),
            lookup: self.lookup.unwrap_or(files.lookup_file),
            protocols: self.protocols.unwrap_or(files.protocols_file),
            tag_counts_output: self
                .tag_counts_output
                .unwrap_or(files.tag_counts_output_file),
            port_protocol_counts_output: self
                .port_protocol_counts_output
                .unwrap_or(files.port_protocol_counts_output_file),
        }
    }
}
