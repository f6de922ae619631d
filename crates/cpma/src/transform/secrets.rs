//! Lifts sensitive provider fields into standalone secrets.

use k8s_openapi::api::core::v1::Secret;
use snafu::{ResultExt, Snafu};

use crate::{
    builder::{
        meta::ObjectMetaBuilder,
        secret::{self, OPAQUE_SECRET_TYPE, SecretBuilder},
    },
    crd::oauth::{OPENSHIFT_CONFIG_NAMESPACE, SecretNameReference},
    fetch::{self, FileFetcher},
    legacy::{StringSource, StringSourceSpec, providers::CertInfo},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to retrieve {path:?} for the {role} secret"))]
    FetchFile {
        source: fetch::Error,
        role: SecretRole,
        path: String,
    },

    #[snafu(display(
        "the {role} secret is sourced from {source_type:?}, which cannot be resolved offline"
    ))]
    UnsupportedStringSource {
        role: SecretRole,
        source_type: &'static str,
    },

    #[snafu(display("failed to build the {role} secret"))]
    BuildSecret {
        source: secret::Error,
        role: SecretRole,
    },
}

/// The kinds of sensitive material a provider can carry. Each role has a fixed secret name
/// suffix and data key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SecretRole {
    HtpasswdFile,
    ClientSecret,
    ClientCert,
    ClientKey,
}

impl SecretRole {
    pub fn name_suffix(self) -> &'static str {
        match self {
            Self::HtpasswdFile | Self::ClientSecret => "-secret",
            Self::ClientCert => "-client-cert-secret",
            Self::ClientKey => "-client-key-secret",
        }
    }

    pub fn data_key(self) -> &'static str {
        match self {
            Self::HtpasswdFile => "htpasswd",
            Self::ClientSecret => "clientSecret",
            Self::ClientCert => "tls.crt",
            Self::ClientKey => "tls.key",
        }
    }

    /// The name of the secret holding this role's material for `provider_name`.
    pub fn secret_name(self, provider_name: &str) -> String {
        format!("{provider_name}{suffix}", suffix = self.name_suffix())
    }
}

/// References to the client certificate and key secrets of a provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientCertificateReferences {
    pub cert: SecretNameReference,
    pub key: SecretNameReference,
}

/// Collects the secrets of a single identity provider, in the order they are extracted.
pub struct SecretExtractor<'a> {
    fetcher: &'a dyn FileFetcher,
    provider_name: &'a str,
    secrets: Vec<Secret>,
}

impl<'a> SecretExtractor<'a> {
    pub fn new(fetcher: &'a dyn FileFetcher, provider_name: &'a str) -> Self {
        Self {
            fetcher,
            provider_name,
            secrets: Vec::new(),
        }
    }

    /// Stores the content of the file at `path` as the secret for `role`.
    pub fn from_file(&mut self, role: SecretRole, path: &str) -> Result<SecretNameReference> {
        let content = self.fetch(role, path)?;
        self.push(role, content)
    }

    /// Resolves `source` and stores the value as the secret for `role`. An empty source yields a
    /// secret with empty data.
    pub fn from_string_source(
        &mut self,
        role: SecretRole,
        source: &StringSource,
    ) -> Result<SecretNameReference> {
        let content = match source {
            StringSource::Value(value) => value.as_bytes().to_vec(),
            StringSource::Spec(spec) => self.resolve_spec(role, spec)?,
        };
        self.push(role, content)
    }

    /// Extracts the client certificate and key into two secrets, certificate first. Returns
    /// `None` without producing any secret if no client certificate is configured.
    pub fn client_certificate(
        &mut self,
        cert_info: &CertInfo,
    ) -> Result<Option<ClientCertificateReferences>> {
        if !cert_info.is_configured() {
            return Ok(None);
        }

        let cert = self.from_file(SecretRole::ClientCert, &cert_info.cert_file)?;
        let key = self.from_file(SecretRole::ClientKey, &cert_info.key_file)?;
        Ok(Some(ClientCertificateReferences { cert, key }))
    }

    pub fn into_secrets(self) -> Vec<Secret> {
        self.secrets
    }

    fn resolve_spec(&self, role: SecretRole, spec: &StringSourceSpec) -> Result<Vec<u8>> {
        if !spec.value.is_empty() {
            Ok(spec.value.as_bytes().to_vec())
        } else if !spec.file.is_empty() {
            self.fetch(role, &spec.file)
        } else if !spec.env.is_empty() {
            UnsupportedStringSourceSnafu {
                role,
                source_type: "env",
            }
            .fail()
        } else if !spec.key_file.is_empty() {
            UnsupportedStringSourceSnafu {
                role,
                source_type: "keyFile",
            }
            .fail()
        } else {
            Ok(Vec::new())
        }
    }

    fn fetch(&self, role: SecretRole, path: &str) -> Result<Vec<u8>> {
        self.fetcher
            .fetch(path)
            .context(FetchFileSnafu { role, path })
    }

    fn push(&mut self, role: SecretRole, content: Vec<u8>) -> Result<SecretNameReference> {
        let name = role.secret_name(self.provider_name);
        let secret = SecretBuilder::new()
            .metadata(
                ObjectMetaBuilder::new()
                    .name(&name)
                    .namespace(OPENSHIFT_CONFIG_NAMESPACE)
                    .build(),
            )
            .add_data(role.data_key(), content)
            .secret_type(OPAQUE_SECRET_TYPE)
            .build()
            .context(BuildSecretSnafu { role })?;

        self.secrets.push(secret);
        Ok(SecretNameReference::new(name))
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::ByteString;
    use rstest::rstest;

    use super::*;

    fn fetch_stub(path: &str) -> fetch::Result<Vec<u8>> {
        Ok(format!("content of {path}").into_bytes())
    }

    fn data(secret: &Secret, key: &str) -> Vec<u8> {
        secret
            .data
            .as_ref()
            .and_then(|data| data.get(key))
            .map(|ByteString(bytes)| bytes.clone())
            .unwrap_or_default()
    }

    #[rstest]
    #[case(SecretRole::HtpasswdFile, "htpasswd_auth-secret", "htpasswd")]
    #[case(SecretRole::ClientSecret, "htpasswd_auth-secret", "clientSecret")]
    #[case(SecretRole::ClientCert, "htpasswd_auth-client-cert-secret", "tls.crt")]
    #[case(SecretRole::ClientKey, "htpasswd_auth-client-key-secret", "tls.key")]
    fn role_naming(#[case] role: SecretRole, #[case] name: &str, #[case] key: &str) {
        assert_eq!(role.secret_name("htpasswd_auth"), name);
        assert_eq!(role.data_key(), key);
    }

    #[test]
    fn from_file() {
        let fetcher = fetch_stub;
        let mut extractor = SecretExtractor::new(&fetcher, "htpasswd_auth");

        let reference = extractor
            .from_file(SecretRole::HtpasswdFile, "/etc/origin/master/htpasswd")
            .unwrap();
        let secrets = extractor.into_secrets();

        assert_eq!(reference, SecretNameReference::new("htpasswd_auth-secret"));
        let [secret] = secrets.as_slice() else {
            panic!("expected exactly one secret, got {secrets:?}");
        };
        assert_eq!(secret.metadata.name.as_deref(), Some("htpasswd_auth-secret"));
        assert_eq!(
            secret.metadata.namespace.as_deref(),
            Some("openshift-config")
        );
        assert_eq!(
            data(secret, "htpasswd"),
            b"content of /etc/origin/master/htpasswd"
        );
    }

    #[rstest]
    #[case(StringSource::Value("fake-secret".to_owned()), b"fake-secret".to_vec())]
    #[case(
        StringSource::Spec(StringSourceSpec { value: "fake-secret".to_owned(), ..Default::default() }),
        b"fake-secret".to_vec()
    )]
    #[case(
        StringSource::Spec(StringSourceSpec { file: "/secret".to_owned(), ..Default::default() }),
        b"content of /secret".to_vec()
    )]
    fn from_string_source(#[case] source: StringSource, #[case] expected: Vec<u8>) {
        let fetcher = fetch_stub;
        let mut extractor = SecretExtractor::new(&fetcher, "github");

        let reference = extractor
            .from_string_source(SecretRole::ClientSecret, &source)
            .unwrap();

        assert_eq!(reference.name, "github-secret");
        assert_eq!(data(&extractor.into_secrets()[0], "clientSecret"), expected);
    }

    #[rstest]
    #[case(StringSourceSpec { env: "GITHUB_SECRET".to_owned(), ..Default::default() }, "env")]
    #[case(StringSourceSpec { key_file: "/secret.key".to_owned(), ..Default::default() }, "keyFile")]
    fn unsupported_string_source(#[case] spec: StringSourceSpec, #[case] expected: &str) {
        let fetcher = fetch_stub;
        let mut extractor = SecretExtractor::new(&fetcher, "github");

        let error = extractor
            .from_string_source(SecretRole::ClientSecret, &StringSource::Spec(spec))
            .unwrap_err();

        assert!(matches!(
            error,
            Error::UnsupportedStringSource { source_type, .. } if source_type == expected
        ));
        assert!(extractor.into_secrets().is_empty());
    }

    #[rstest]
    #[case(StringSource::Value(String::new()))]
    #[case(StringSource::Spec(StringSourceSpec::default()))]
    fn empty_string_source(#[case] source: StringSource) {
        let fetcher = fetch_stub;
        let mut extractor = SecretExtractor::new(&fetcher, "github");

        let reference = extractor
            .from_string_source(SecretRole::ClientSecret, &source)
            .unwrap();
        let secrets = extractor.into_secrets();

        assert_eq!(reference.name, "github-secret");
        assert_eq!(secrets.len(), 1);
        assert_eq!(data(&secrets[0], "clientSecret"), b"");
        assert!(
            secrets[0]
                .data
                .as_ref()
                .is_some_and(|data| data.contains_key("clientSecret"))
        );
    }

    #[test]
    fn client_certificate_pair() {
        let fetcher = fetch_stub;
        let mut extractor = SecretExtractor::new(&fetcher, "keystone");

        let references = extractor
            .client_certificate(&CertInfo {
                cert_file: "/client.crt".to_owned(),
                key_file: "/client.key".to_owned(),
            })
            .unwrap()
            .unwrap();
        let secrets = extractor.into_secrets();

        assert_eq!(references.cert.name, "keystone-client-cert-secret");
        assert_eq!(references.key.name, "keystone-client-key-secret");
        assert_eq!(secrets.len(), 2);
        assert_eq!(data(&secrets[0], "tls.crt"), b"content of /client.crt");
        assert_eq!(data(&secrets[1], "tls.key"), b"content of /client.key");
    }

    #[test]
    fn client_certificate_absent() {
        let fetcher = fetch_stub;
        let mut extractor = SecretExtractor::new(&fetcher, "keystone");

        let references = extractor.client_certificate(&CertInfo::default()).unwrap();

        assert_eq!(references, None);
        assert!(extractor.into_secrets().is_empty());
    }

    #[test]
    fn fetch_failure() {
        let fetcher = |path: &str| -> fetch::Result<Vec<u8>> {
            Err(fetch::Error::FileNotRetrieved {
                hostname: "master.example.com".to_owned(),
                path: path.to_owned(),
                local_path: "/tmp/missing".into(),
            })
        };
        let mut extractor = SecretExtractor::new(&fetcher, "htpasswd_auth");

        let error = extractor
            .from_file(SecretRole::HtpasswdFile, "/etc/origin/master/htpasswd")
            .unwrap_err();

        assert!(matches!(error, Error::FetchFile { role: SecretRole::HtpasswdFile, .. }));
    }
}
