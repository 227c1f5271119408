//! Command-line arguments.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "collate-server")]
#[command(about = "Collate - key-value store with first-writer-wins ownership", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on [default: 0.0.0.0:46597]
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// SQLite database file [default: database.db]
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the effective configuration: defaults, then the config file
    /// if given, then flags.
    pub fn load_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }

        Ok(config)
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = Cli::try_parse_from(["collate-server"]).unwrap();
        assert_eq!(cli.load_config().unwrap(), ServerConfig::default());
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collate.json");
        std::fs::write(
            &path,
            r#"{ "listen": "127.0.0.1:9000", "database": "from-file.db" }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "collate-server",
            "--config",
            path.to_str().unwrap(),
            "--database",
            "from-flag.db",
            "-v",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.listen.to_string(), "127.0.0.1:9000");
        assert_eq!(config.database, PathBuf::from("from-flag.db"));
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_bad_listen_address_rejected() {
        assert!(Cli::try_parse_from(["collate-server", "--listen", "nowhere"]).is_err());
    }
}
