use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use snafu::{ResultExt, Snafu};

pub const DEFAULT_CONFIG_FILE_NAME: &str = ".cpma.yaml";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "failed to locate a required file in any of the following locations: {search_path:?}"
    ))]
    RequiredFileMissing { search_path: Vec<PathBuf> },

    #[snafu(display("failed to read config file {path:?}"))]
    ReadConfigFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse config file {path:?}"))]
    ParseConfigFile {
        source: serde_yaml::Error,
        path: PathBuf,
    },
}

/// Settings read from the optional YAML config file. Every field can be overridden on the
/// command line or through the environment.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub hostname: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub master_config_file: Option<String>,
    pub debug: Option<bool>,
}

impl ConfigFile {
    /// Loads the config file at the user provided path, falling back to the first path that
    /// exists in `default_paths`. Returns an empty config if neither is available.
    pub fn load(
        user_provided_path: Option<&Path>,
        default_paths: &[impl AsRef<Path>],
    ) -> Result<Self> {
        match resolve_path(user_provided_path, default_paths)? {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read(path).context(ReadConfigFileSnafu { path })?;
        serde_yaml::from_slice(&content).context(ParseConfigFileSnafu { path })
    }
}

/// Check if the path can be found anywhere
///
/// 1. User provides path `user_provided_path` to file. Return [`Error`] if not existing.
/// 2. User does not provide path to file -> search in `default_paths` and take the first
///    existing file.
/// 3. Return `None` if nothing was found, the config file is optional.
fn resolve_path<'a>(
    user_provided_path: Option<&'a Path>,
    default_paths: &'a [impl AsRef<Path> + 'a],
) -> Result<Option<&'a Path>> {
    if let Some(path) = user_provided_path {
        return if path.exists() {
            Ok(Some(path))
        } else {
            RequiredFileMissingSnafu {
                search_path: vec![path.to_path_buf()],
            }
            .fail()
        };
    }

    Ok(default_paths
        .iter()
        .map(AsRef::as_ref)
        .find(|path| path.exists()))
}
