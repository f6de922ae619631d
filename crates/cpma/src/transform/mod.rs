//! Converts legacy identity providers into the OCP 4.x `OAuth` resource and its secrets.
//!
//! A conversion walks the configured providers once, in order. Each entry is decoded by kind,
//! handed to the builder of that kind and its output appended to the result. Entries of an
//! unsupported kind are skipped and reported as [`UnsupportedKind`], a malformed entry of a
//! supported kind aborts the whole conversion.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    fmt,
    str::FromStr,
};

use k8s_openapi::api::core::v1::Secret;
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, instrument};

use crate::{
    builder::meta::ObjectMetaBuilder,
    crd::oauth::{self, OAUTH_RESOURCE_NAME, OAuth, OAuthSpec, OPENSHIFT_CONFIG_NAMESPACE},
    fetch::FileFetcher,
    legacy::{self, DecodedProvider, OAuthConfig, ProviderKind},
    manifest::{self, Manifest},
};

pub mod providers;
pub mod secrets;

pub use secrets::{SecretExtractor, SecretRole};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("identity provider {provider_name:?} does not declare a provider kind"))]
    MissingProviderKind { provider_name: String },

    #[snafu(display("failed to decode identity provider {provider_name:?} of kind {kind}"))]
    DecodeProvider {
        source: legacy::providers::Error,
        provider_name: String,
        kind: ProviderKind,
    },

    #[snafu(display("failed to extract the secrets of identity provider {provider_name:?} ({kind})"))]
    ExtractSecrets {
        source: secrets::Error,
        provider_name: String,
        kind: ProviderKind,
    },

    #[snafu(display(
        "secret {secret_name:?} of identity provider {provider_name:?} has already been produced, \
         provider names must be unique"
    ))]
    DuplicateSecretName {
        secret_name: String,
        provider_name: String,
    },

    #[snafu(display(
        "identity providers {owner_name:?} and {provider_name:?} both produce secret \
         {secret_name:?}, rename one of them"
    ))]
    SecretNameCollision {
        secret_name: String,
        provider_name: String,
        owner_name: String,
    },
}

/// An identity provider that was skipped because its kind has no OCP 4.x counterpart.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsupportedKind {
    pub provider_name: String,
    pub kind: String,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identity provider {name:?} of kind {kind:?} is not supported and has been skipped",
            name = self.provider_name,
            kind = self.kind
        )
    }
}

/// The ordered result of converting a list of identity providers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conversion {
    pub providers: Vec<oauth::IdentityProvider>,
    pub secrets: Vec<Secret>,
    pub diagnostics: Vec<UnsupportedKind>,
}

/// The complete output of a conversion run.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformOutput {
    pub oauth: OAuth,
    pub secrets: Vec<Secret>,
    pub diagnostics: Vec<UnsupportedKind>,
}

impl TransformOutput {
    /// Serializes the resource and its secrets, see [`manifest::generate_manifests`].
    pub fn manifests(&self) -> manifest::Result<Vec<Manifest>> {
        manifest::generate_manifests(&self.oauth, &self.secrets)
    }
}

pub struct Transformer<'a> {
    fetcher: &'a dyn FileFetcher,
}

impl<'a> Transformer<'a> {
    pub fn new(fetcher: &'a dyn FileFetcher) -> Self {
        Self { fetcher }
    }

    /// Converts the identity providers of `config` and assembles the `OAuth` resource.
    pub fn transform(&self, config: &OAuthConfig) -> Result<TransformOutput> {
        let Conversion {
            providers,
            secrets,
            diagnostics,
        } = self.transform_identity_providers(&config.identity_providers)?;

        Ok(TransformOutput {
            oauth: assemble(providers),
            secrets,
            diagnostics,
        })
    }

    #[instrument(skip_all, fields(count = identity_providers.len()))]
    pub fn transform_identity_providers(
        &self,
        identity_providers: &[legacy::IdentityProvider],
    ) -> Result<Conversion> {
        let mut conversion = Conversion::default();
        // secret name -> name of the provider that produced it
        let mut secret_owners: BTreeMap<String, String> = BTreeMap::new();

        for identity_provider in identity_providers {
            let provider_name = &identity_provider.name;
            let raw_kind = identity_provider
                .kind()
                .context(MissingProviderKindSnafu { provider_name })?;

            let Ok(kind) = ProviderKind::from_str(raw_kind) else {
                debug!(
                    provider_name,
                    kind = raw_kind,
                    "skipping identity provider of unsupported kind"
                );
                conversion.diagnostics.push(UnsupportedKind {
                    provider_name: provider_name.clone(),
                    kind: raw_kind.to_owned(),
                });
                continue;
            };

            let decoded = DecodedProvider::decode(kind, &identity_provider.provider)
                .context(DecodeProviderSnafu {
                    provider_name,
                    kind,
                })?;

            let mut extractor = SecretExtractor::new(self.fetcher, provider_name);
            let provider = providers::build(&decoded, &mut extractor).context(
                ExtractSecretsSnafu {
                    provider_name,
                    kind,
                },
            )?;
            let secrets = extractor.into_secrets();

            for secret in &secrets {
                let secret_name = secret.metadata.name.clone().unwrap_or_default();
                match secret_owners.entry(secret_name) {
                    Entry::Vacant(entry) => {
                        entry.insert(provider_name.clone());
                    }
                    Entry::Occupied(entry) if entry.get() == provider_name => {
                        return DuplicateSecretNameSnafu {
                            secret_name: entry.key(),
                            provider_name,
                        }
                        .fail();
                    }
                    Entry::Occupied(entry) => {
                        return SecretNameCollisionSnafu {
                            secret_name: entry.key(),
                            provider_name,
                            owner_name: entry.get(),
                        }
                        .fail();
                    }
                }
            }

            debug!(
                provider_name,
                %kind,
                secrets = secrets.len(),
                "converted identity provider"
            );

            conversion.providers.push(oauth::IdentityProvider {
                name: provider_name.clone(),
                challenge: identity_provider.challenge,
                login: identity_provider.login,
                mapping_method: identity_provider.mapping_method.clone(),
                provider,
            });
            conversion.secrets.extend(secrets);
        }

        Ok(conversion)
    }
}

/// Wraps `providers` into the cluster-wide `OAuth` resource.
pub fn assemble(providers: Vec<oauth::IdentityProvider>) -> OAuth {
    OAuth {
        metadata: ObjectMetaBuilder::new()
            .name(OAUTH_RESOURCE_NAME)
            .namespace(OPENSHIFT_CONFIG_NAMESPACE)
            .build(),
        spec: OAuthSpec {
            identity_providers: providers,
        },
    }
}
