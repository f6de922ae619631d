//! Persists generated manifests below an output directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu};
use tracing::info;

use crate::manifest::Manifest;

pub const MANIFESTS_DIR: &str = "manifests";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to create manifest directory {path:?}"))]
    CreateManifestDir {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write manifest {path:?}"))]
    WriteManifest {
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Writes every manifest to `<output_dir>/manifests/<name>` and returns the written paths in
/// order. Existing files are overwritten.
pub fn write_manifests(output_dir: &Path, manifests: &[Manifest]) -> Result<Vec<PathBuf>> {
    let manifest_dir = output_dir.join(MANIFESTS_DIR);
    fs::create_dir_all(&manifest_dir).context(CreateManifestDirSnafu {
        path: &manifest_dir,
    })?;

    let mut written = Vec::with_capacity(manifests.len());
    for manifest in manifests {
        let path = manifest_dir.join(&manifest.name);
        fs::write(&path, &manifest.content).context(WriteManifestSnafu { path: &path })?;
        info!(path = %path.display(), "wrote manifest");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn manifest(name: &str, content: &str) -> Manifest {
        Manifest {
            name: name.to_owned(),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn writes_below_manifests_directory() {
        let output_dir = tempdir().expect("create temporary directory");
        let manifests = [
            manifest("100_CPMA-cluster-config-oauth.yaml", "kind: OAuth\n"),
            manifest(
                "100_CPMA-cluster-config-secret-htpasswd_auth-secret.yaml",
                "kind: Secret\n",
            ),
        ];

        let written = write_manifests(output_dir.path(), &manifests).unwrap();

        assert_eq!(
            written,
            vec![
                output_dir
                    .path()
                    .join("manifests/100_CPMA-cluster-config-oauth.yaml"),
                output_dir
                    .path()
                    .join("manifests/100_CPMA-cluster-config-secret-htpasswd_auth-secret.yaml"),
            ]
        );
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "kind: OAuth\n");
        assert_eq!(fs::read_to_string(&written[1]).unwrap(), "kind: Secret\n");
    }

    #[test]
    fn overwrites_existing_manifests() {
        let output_dir = tempdir().expect("create temporary directory");

        write_manifests(output_dir.path(), &[manifest("oauth.yaml", "old\n")]).unwrap();
        let written =
            write_manifests(output_dir.path(), &[manifest("oauth.yaml", "new\n")]).unwrap();

        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "new\n");
    }

    #[test]
    fn output_dir_is_a_file() {
        let output_dir = tempdir().expect("create temporary directory");
        let file = output_dir.path().join("not-a-directory");
        fs::write(&file, "").unwrap();

        let error = write_manifests(&file, &[manifest("oauth.yaml", "")]).unwrap_err();

        assert!(matches!(error, Error::CreateManifestDir { .. }));
    }
}
