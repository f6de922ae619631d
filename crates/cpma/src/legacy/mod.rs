//! The OCP 3.x master configuration, reduced to what the OAuth migration reads.
//!
//! Only `oauthConfig.identityProviders` is interpreted. Each identity provider carries its
//! kind-specific settings as an embedded resource (`provider`), which is kept as an opaque
//! [`serde_yaml::Value`] until [`providers::DecodedProvider::decode`] turns it into a typed
//! record.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

pub mod providers;

pub use providers::{DecodedProvider, ProviderKind};

pub const DEFAULT_MAPPING_METHOD: &str = "claim";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse master configuration"))]
    ParseMasterConfig { source: serde_yaml::Error },
}

/// The subset of `master-config.yaml` relevant for the migration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MasterConfig {
    #[serde(default)]
    pub oauth_config: Option<OAuthConfig>,
}

impl MasterConfig {
    pub fn from_yaml(content: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(content).context(ParseMasterConfigSnafu)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConfig {
    #[serde(default)]
    pub identity_providers: Vec<IdentityProvider>,
}

/// A single entry of `oauthConfig.identityProviders`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    pub name: String,

    #[serde(default)]
    pub challenge: bool,

    #[serde(default)]
    pub login: bool,

    #[serde(default = "IdentityProvider::default_mapping_method")]
    pub mapping_method: String,

    /// The embedded, kind-specific provider resource.
    pub provider: serde_yaml::Value,
}

impl IdentityProvider {
    fn default_mapping_method() -> String {
        DEFAULT_MAPPING_METHOD.to_owned()
    }

    /// The `kind` discriminator of the embedded provider resource, if any.
    pub fn kind(&self) -> Option<&str> {
        self.provider.get("kind").and_then(serde_yaml::Value::as_str)
    }
}

/// A legacy secret-bearing string. It is either given as a plain string or as a
/// source specification pointing at a literal value, an environment variable, a file or an
/// encrypted key file.
#[derive(Clone, Debug, Deserialize, Eq, Hash, JsonSchema, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StringSource {
    Value(String),
    Spec(StringSourceSpec),
}

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSourceSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub env: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key_file: String,
}
