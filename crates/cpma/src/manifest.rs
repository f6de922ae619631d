//! Renders the conversion output into named manifest documents.

use cpma_shared::yaml::{self, SerializeOptions, YamlManifest};
use k8s_openapi::api::core::v1::Secret;
use snafu::{OptionExt, ResultExt, Snafu};

use crate::crd::oauth::OAuth;

pub const OAUTH_MANIFEST_NAME: &str = "100_CPMA-cluster-config-oauth.yaml";

const SECRET_MANIFEST_PREFIX: &str = "100_CPMA-cluster-config-secret-";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to serialize the OAuth resource"))]
    SerializeOAuth { source: yaml::Error },

    #[snafu(display("failed to serialize secret {secret_name:?}"))]
    SerializeSecret {
        source: yaml::Error,
        secret_name: String,
    },

    #[snafu(display("secret has no name, a manifest name cannot be derived"))]
    UnnamedSecret,
}

/// A serialized document together with the file name it is written to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub content: Vec<u8>,
}

pub fn secret_manifest_name(secret_name: &str) -> String {
    format!("{SECRET_MANIFEST_PREFIX}{secret_name}.yaml")
}

/// Serializes `oauth` followed by every secret, in the order given.
pub fn generate_manifests(oauth: &OAuth, secrets: &[Secret]) -> Result<Vec<Manifest>> {
    let mut manifests = Vec::with_capacity(secrets.len() + 1);

    manifests.push(Manifest {
        name: OAUTH_MANIFEST_NAME.to_owned(),
        content: oauth
            .to_yaml_bytes(SerializeOptions::manifest())
            .context(SerializeOAuthSnafu)?,
    });

    for secret in secrets {
        let secret_name = secret.metadata.name.as_deref().context(UnnamedSecretSnafu)?;
        let content = secret
            .to_yaml_bytes(SerializeOptions::manifest())
            .context(SerializeSecretSnafu { secret_name })?;

        manifests.push(Manifest {
            name: secret_manifest_name(secret_name),
            content,
        });
    }

    Ok(manifests)
}
