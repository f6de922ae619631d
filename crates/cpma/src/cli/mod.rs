//! Command line arguments of the `cpma` binary and their merge with the optional config file.
//!
//! Values are taken from, in decreasing precedence, the command line, the `CPMA_*` environment
//! variables, the config file and finally the built-in defaults.

use std::path::{Path, PathBuf};

use clap::Parser;
use snafu::{OptionExt, ResultExt, Snafu};

mod config;

pub use config::*;

pub const DEFAULT_MASTER_CONFIG_FILE: &str = "/etc/origin/master/master-config.yaml";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to load config file"))]
    LoadConfigFile { source: config::Error },

    #[snafu(display(
        "no hostname of the OCP 3 master configured, pass --hostname or set it in the config file"
    ))]
    MissingHostname,
}

#[derive(Clone, Debug, Eq, Parser, PartialEq)]
#[command(
    name = "cpma",
    author,
    version,
    about = "Migrates the OAuth configuration of an OCP 3 cluster to OCP 4 manifests"
)]
pub struct Cli {
    /// Path to a YAML config file, `$HOME/.cpma.yaml` is used if present
    #[arg(long, value_name = "FILE", env = "CPMA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at DEBUG level unless `CPMA_LOG` says otherwise
    #[arg(long, env = "CPMA_DEBUG")]
    pub debug: bool,

    /// Directory the manifests and retrieved files are placed in
    #[arg(long, short = 'o', value_name = "DIR", env = "CPMA_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Hostname of the OCP 3 master
    #[arg(long, env = "CPMA_HOSTNAME")]
    pub hostname: Option<String>,

    /// Path of the master configuration on the OCP 3 master
    #[arg(long, value_name = "FILE", env = "CPMA_MASTER_CONFIG_FILE")]
    pub master_config_file: Option<String>,
}

/// The effective settings of a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub hostname: String,
    pub master_config_file: String,
    pub output_dir: PathBuf,
    pub debug: bool,
}

impl Settings {
    /// Loads the config file (if any) and merges it with `cli`. `home_dir` is searched for
    /// `.cpma.yaml` when no config file is passed explicitly.
    pub fn resolve(cli: &Cli, home_dir: Option<&Path>) -> Result<Self> {
        let default_paths: Vec<PathBuf> = home_dir
            .map(|home| home.join(DEFAULT_CONFIG_FILE_NAME))
            .into_iter()
            .collect();
        let file = ConfigFile::load(cli.config.as_deref(), &default_paths)
            .context(LoadConfigFileSnafu)?;

        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: ConfigFile) -> Result<Self> {
        let hostname = cli
            .hostname
            .clone()
            .or(file.hostname)
            .filter(|hostname| !hostname.is_empty())
            .context(MissingHostnameSnafu)?;

        Ok(Self {
            hostname,
            master_config_file: cli
                .master_config_file
                .clone()
                .or(file.master_config_file)
                .unwrap_or_else(|| DEFAULT_MASTER_CONFIG_FILE.to_owned()),
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            debug: cli.debug || file.debug.unwrap_or_default(),
        })
    }
}
