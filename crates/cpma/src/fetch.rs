//! Retrieval of files referenced by the legacy configuration.
//!
//! The transformation never touches the filesystem itself, it asks a [`FileFetcher`] for the
//! content of every path it needs (htpasswd files, client certificates, secret files).

use std::{
    fs,
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu};
use tracing::debug;

const LOCAL_HOSTNAMES: &[&str] = &["localhost", "127.0.0.1", "::1"];

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read {path:?}"))]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to record a local copy of {path:?} at {local_path:?}"))]
    StoreLocalCopy {
        source: std::io::Error,
        path: String,
        local_path: PathBuf,
    },

    #[snafu(display(
        "{path:?} from host {hostname:?} has not been retrieved, expected a copy at {local_path:?}"
    ))]
    FileNotRetrieved {
        hostname: String,
        path: String,
        local_path: PathBuf,
    },
}

/// Provides the content of a file located on the legacy master host.
pub trait FileFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>>;
}

impl<F> FileFetcher for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        self(path)
    }
}

/// Serves files of a single host from a local mirror directory.
///
/// A file at `path` on `hostname` is expected at `<work_dir>/<hostname>/<path>`. Files of the
/// local machine are read directly and copied into the mirror, so that the mirror always
/// reflects what a conversion run has seen.
#[derive(Clone, Debug)]
pub struct HostFileFetcher {
    hostname: String,
    work_dir: PathBuf,
}

impl HostFileFetcher {
    pub fn new(hostname: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            hostname: hostname.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The location of the local copy of `path`.
    pub fn local_path(&self, path: &str) -> PathBuf {
        self.work_dir
            .join(&self.hostname)
            .join(path.trim_start_matches('/'))
    }

    fn is_local_host(&self) -> bool {
        LOCAL_HOSTNAMES.contains(&self.hostname.as_str())
    }

    fn store_local_copy(&self, path: &str, local_path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent).context(StoreLocalCopySnafu { path, local_path })?;
        }
        fs::write(local_path, content).context(StoreLocalCopySnafu { path, local_path })
    }
}

impl FileFetcher for HostFileFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let local_path = self.local_path(path);

        if local_path.exists() {
            debug!(path, local_path = %local_path.display(), "using retrieved copy");
            return fs::read(&local_path).context(ReadFileSnafu { path: local_path });
        }

        if self.is_local_host() {
            let content = fs::read(path).context(ReadFileSnafu { path })?;
            self.store_local_copy(path, &local_path, &content)?;
            debug!(path, local_path = %local_path.display(), "copied local file");
            return Ok(content);
        }

        FileNotRetrievedSnafu {
            hostname: self.hostname.clone(),
            path,
            local_path,
        }
        .fail()
    }
}
