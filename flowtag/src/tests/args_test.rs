#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use crate::args::{Cli, ConfigFile, FilesConfig};
    use crate::error::FlowTagError;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["flowtag"]);
        let paths = cli.resolve(ConfigFile::default());

        assert_eq!(paths.flow_log, PathBuf::from("flowlogs.txt"));
        assert_eq!(paths.lookup, PathBuf::from("lookup.csv"));
        assert_eq!(paths.protocols, PathBuf::from("protocols.csv"));
        assert_eq!(paths.tag_counts_output, PathBuf::from("tag_counts.csv"));
        assert_eq!(
            paths.port_protocol_counts_output,
            PathBuf::from("port_protocol_counts.csv")
        );
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let cli = Cli::parse_from(["flowtag", "--flow-log", "today.log", "--protocols", "iana.csv"]);
        let config = ConfigFile {
            files: FilesConfig {
                flow_log_file: PathBuf::from("from-config.log"),
                lookup_file: PathBuf::from("tags.csv"),
                ..FilesConfig::default()
            },
        };

        let paths = cli.resolve(config);

        assert_eq!(paths.flow_log, PathBuf::from("today.log"));
        assert_eq!(paths.protocols, PathBuf::from("iana.csv"));
        assert_eq!(paths.lookup, PathBuf::from("tags.csv"));
        assert_eq!(paths.tag_counts_output, PathBuf::from("tag_counts.csv"));
    }

    #[test]
    fn test_load_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowtag.toml");
        std::fs::write(
            &path,
            "[files]\nlookup_file = \"custom_lookup.csv\"\ntag_counts_output_file = \"out/tags.csv\"\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert_eq!(config.files.lookup_file, PathBuf::from("custom_lookup.csv"));
        assert_eq!(
            config.files.tag_counts_output_file,
            PathBuf::from("out/tags.csv")
        );
        assert_eq!(config.files.flow_log_file, PathBuf::from("flowlogs.txt"));
    }

    #[test]
    fn test_load_absent_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowtag.toml");

        let config = ConfigFile::load(&path).unwrap();

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[files\nlookup_file = ").unwrap();

        assert!(matches!(
            ConfigFile::load(&path),
            Err(FlowTagError::Config { .. })
        ));
    }
}
