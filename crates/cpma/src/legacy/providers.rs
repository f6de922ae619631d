//! Typed records for the nine legacy identity provider kinds.
//!
//! Unknown fields (including the embedded `apiVersion` and `kind`) are ignored, missing
//! required fields fail the decoding of the whole payload.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu, ensure};
use strum::{Display, EnumIter, EnumString};

use crate::legacy::StringSource;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to deserialize {kind} payload"))]
    DeserializePayload {
        kind: ProviderKind,
        source: serde_yaml::Error,
    },

    #[snafu(display(
        "{kind} sets only one of certFile and keyFile, a client certificate needs both"
    ))]
    IncompleteClientCertificate { kind: ProviderKind },
}

/// The closed set of supported legacy provider kinds, parsed from the `kind` of the embedded
/// provider resource.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ProviderKind {
    #[strum(serialize = "BasicAuthPasswordIdentityProvider")]
    BasicAuth,

    #[strum(serialize = "GitHubIdentityProvider")]
    GitHub,

    #[strum(serialize = "GitLabIdentityProvider")]
    GitLab,

    #[strum(serialize = "GoogleIdentityProvider")]
    Google,

    #[strum(serialize = "HTPasswdPasswordIdentityProvider")]
    HTPasswd,

    #[strum(serialize = "KeystonePasswordIdentityProvider")]
    Keystone,

    #[strum(serialize = "LDAPPasswordIdentityProvider")]
    Ldap,

    #[strum(serialize = "OpenIDIdentityProvider")]
    OpenId,

    #[strum(serialize = "RequestHeaderIdentityProvider")]
    RequestHeader,
}

/// A provider payload decoded into the record of its kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodedProvider {
    BasicAuth(BasicAuthPasswordIdentityProvider),
    GitHub(GitHubIdentityProvider),
    GitLab(GitLabIdentityProvider),
    Google(GoogleIdentityProvider),
    HTPasswd(HTPasswdPasswordIdentityProvider),
    Keystone(KeystonePasswordIdentityProvider),
    Ldap(LdapPasswordIdentityProvider),
    OpenId(OpenIdIdentityProvider),
    RequestHeader(RequestHeaderIdentityProvider),
}

impl DecodedProvider {
    /// Decodes `payload` as the record selected by `kind`.
    pub fn decode(kind: ProviderKind, payload: &serde_yaml::Value) -> Result<Self> {
        let decoded = match kind {
            ProviderKind::BasicAuth => Self::BasicAuth(deserialize(kind, payload)?),
            ProviderKind::GitHub => Self::GitHub(deserialize(kind, payload)?),
            ProviderKind::GitLab => Self::GitLab(deserialize(kind, payload)?),
            ProviderKind::Google => Self::Google(deserialize(kind, payload)?),
            ProviderKind::HTPasswd => Self::HTPasswd(deserialize(kind, payload)?),
            ProviderKind::Keystone => Self::Keystone(deserialize(kind, payload)?),
            ProviderKind::Ldap => Self::Ldap(deserialize(kind, payload)?),
            ProviderKind::OpenId => Self::OpenId(deserialize(kind, payload)?),
            ProviderKind::RequestHeader => Self::RequestHeader(deserialize(kind, payload)?),
        };

        if let Some(connection) = decoded.remote_connection_info() {
            ensure!(
                !connection.client_cert.is_partial(),
                IncompleteClientCertificateSnafu { kind }
            );
        }

        Ok(decoded)
    }

    fn remote_connection_info(&self) -> Option<&RemoteConnectionInfo> {
        match self {
            Self::BasicAuth(provider) => Some(&provider.remote_connection_info),
            Self::Keystone(provider) => Some(&provider.remote_connection_info),
            _ => None,
        }
    }
}

fn deserialize<T: DeserializeOwned>(kind: ProviderKind, payload: &serde_yaml::Value) -> Result<T> {
    T::deserialize(payload).context(DeserializePayloadSnafu { kind })
}

/// Connection details of a remote authentication server.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConnectionInfo {
    pub url: String,

    /// Path of the CA bundle used to verify the server.
    #[serde(default)]
    pub ca: String,

    #[serde(flatten)]
    pub client_cert: CertInfo,
}

/// The client certificate presented to a remote authentication server.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertInfo {
    #[serde(default)]
    pub cert_file: String,

    #[serde(default)]
    pub key_file: String,
}

impl CertInfo {
    pub fn is_configured(&self) -> bool {
        !self.cert_file.is_empty() && !self.key_file.is_empty()
    }

    fn is_partial(&self) -> bool {
        self.cert_file.is_empty() != self.key_file.is_empty()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuthPasswordIdentityProvider {
    #[serde(flatten)]
    pub remote_connection_info: RemoteConnectionInfo,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitHubIdentityProvider {
    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: StringSource,

    #[serde(default)]
    pub organizations: Vec<String>,

    #[serde(default)]
    pub teams: Vec<String>,

    /// GitHub Enterprise hostname, empty for github.com.
    #[serde(default)]
    pub hostname: String,

    #[serde(default)]
    pub ca: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GitLabIdentityProvider {
    #[serde(default)]
    pub ca: String,

    pub url: String,

    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: StringSource,

    #[serde(default)]
    pub legacy: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoogleIdentityProvider {
    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: StringSource,

    #[serde(default)]
    pub hosted_domain: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HTPasswdPasswordIdentityProvider {
    /// Path of the htpasswd file on the master host.
    pub file: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeystonePasswordIdentityProvider {
    #[serde(flatten)]
    pub remote_connection_info: RemoteConnectionInfo,

    pub domain_name: String,

    #[serde(default)]
    pub use_keystone_identity: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LdapPasswordIdentityProvider {
    pub url: String,

    #[serde(default, rename = "bindDN")]
    pub bind_dn: String,

    #[serde(default)]
    pub bind_password: Option<StringSource>,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default)]
    pub ca: String,

    #[serde(default)]
    pub attributes: LdapAttributeMapping,
}

/// Maps LDAP attributes to identity fields. Shared between both cluster generations.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LdapAttributeMapping {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_username: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenIdIdentityProvider {
    #[serde(default)]
    pub ca: String,

    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: StringSource,

    #[serde(default)]
    pub extra_scopes: Vec<String>,

    #[serde(default)]
    pub extra_authorize_parameters: BTreeMap<String, String>,

    pub urls: OpenIdUrls,

    #[serde(default)]
    pub claims: OpenIdClaims,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenIdUrls {
    pub authorize: String,

    pub token: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_info: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenIdClaims {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_username: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeaderIdentityProvider {
    #[serde(default, rename = "loginURL")]
    pub login_url: String,

    #[serde(default, rename = "challengeURL")]
    pub challenge_url: String,

    #[serde(default, rename = "clientCA")]
    pub client_ca: String,

    #[serde(default)]
    pub client_common_names: Vec<String>,

    #[serde(default)]
    pub headers: Vec<String>,

    #[serde(default)]
    pub preferred_username_headers: Vec<String>,

    #[serde(default)]
    pub name_headers: Vec<String>,

    #[serde(default)]
    pub email_headers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use indoc::indoc;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    fn payload(yaml: &str) -> serde_yaml::Value {
        serde_yaml::from_str(yaml).expect("test payload must be valid YAML")
    }

    #[rstest]
    #[case("BasicAuthPasswordIdentityProvider", ProviderKind::BasicAuth)]
    #[case("GitHubIdentityProvider", ProviderKind::GitHub)]
    #[case("GitLabIdentityProvider", ProviderKind::GitLab)]
    #[case("GoogleIdentityProvider", ProviderKind::Google)]
    #[case("HTPasswdPasswordIdentityProvider", ProviderKind::HTPasswd)]
    #[case("KeystonePasswordIdentityProvider", ProviderKind::Keystone)]
    #[case("LDAPPasswordIdentityProvider", ProviderKind::Ldap)]
    #[case("OpenIDIdentityProvider", ProviderKind::OpenId)]
    #[case("RequestHeaderIdentityProvider", ProviderKind::RequestHeader)]
    fn kind_from_str(#[case] input: &str, #[case] expected: ProviderKind) {
        assert_eq!(ProviderKind::from_str(input).unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case("AllowAllPasswordIdentityProvider")]
    #[case("DenyAllPasswordIdentityProvider")]
    #[case("githubidentityprovider")]
    #[case("")]
    fn unsupported_kind_from_str(#[case] input: &str) {
        assert!(ProviderKind::from_str(input).is_err());
    }

    #[test]
    fn nine_supported_kinds() {
        assert_eq!(ProviderKind::iter().count(), 9);
    }

    #[test]
    fn decode_github() {
        let decoded = DecodedProvider::decode(
            ProviderKind::GitHub,
            &payload(indoc! {"
                apiVersion: v1
                kind: GitHubIdentityProvider
                clientID: abc123
                clientSecret: fake-secret
                organizations:
                - myorganization1
                teams:
                - myorganization1/team-a
                unknownField: ignored
            "}),
        )
        .unwrap();

        let DecodedProvider::GitHub(github) = decoded else {
            panic!("expected a GitHub provider, got {decoded:?}");
        };
        assert_eq!(github.client_id, "abc123");
        assert_eq!(
            github.client_secret,
            StringSource::Value("fake-secret".to_owned())
        );
        assert_eq!(github.organizations, vec!["myorganization1"]);
        assert_eq!(github.teams, vec!["myorganization1/team-a"]);
        assert_eq!(github.hostname, "");
    }

    #[rstest]
    #[case(ProviderKind::GitHub, "clientSecret: fake-secret")]
    #[case(ProviderKind::GitLab, "clientID: abc\nclientSecret: fake-secret")]
    #[case(ProviderKind::Google, "clientSecret: fake-secret")]
    #[case(ProviderKind::HTPasswd, "kind: HTPasswdPasswordIdentityProvider")]
    #[case(ProviderKind::Keystone, "url: https://keystone.example.com:5000")]
    #[case(ProviderKind::Ldap, "bindDN: cn=admin")]
    #[case(ProviderKind::OpenId, "clientID: abc\nclientSecret: fake-secret")]
    #[case(ProviderKind::BasicAuth, "ca: /etc/origin/master/ca.crt")]
    fn decode_missing_required_field(#[case] kind: ProviderKind, #[case] yaml: &str) {
        let error = DecodedProvider::decode(kind, &payload(yaml)).unwrap_err();
        assert!(matches!(error, Error::DeserializePayload { kind: k, .. } if k == kind));
    }

    #[test]
    fn decode_request_header_without_fields() {
        let decoded = DecodedProvider::decode(
            ProviderKind::RequestHeader,
            &payload("kind: RequestHeaderIdentityProvider"),
        )
        .unwrap();

        assert_eq!(
            decoded,
            DecodedProvider::RequestHeader(RequestHeaderIdentityProvider::default())
        );
    }

    #[test]
    fn decode_keystone_with_client_certificate() {
        let decoded = DecodedProvider::decode(
            ProviderKind::Keystone,
            &payload(indoc! {"
                kind: KeystonePasswordIdentityProvider
                domainName: default
                url: http://fake.url:5000
                ca: keystone.pem
                certFile: clientcert.pem
                keyFile: clientkey.pem
            "}),
        )
        .unwrap();

        let DecodedProvider::Keystone(keystone) = decoded else {
            panic!("expected a Keystone provider, got {decoded:?}");
        };
        assert_eq!(keystone.domain_name, "default");
        assert_eq!(keystone.remote_connection_info.ca, "keystone.pem");
        assert!(keystone.remote_connection_info.client_cert.is_configured());
    }

    #[rstest]
    #[case(ProviderKind::BasicAuth, "url: https://www.example.com/\ncertFile: cert.crt")]
    #[case(
        ProviderKind::Keystone,
        "url: http://fake.url:5000\ndomainName: default\nkeyFile: key.pem"
    )]
    fn decode_incomplete_client_certificate(#[case] kind: ProviderKind, #[case] yaml: &str) {
        let error = DecodedProvider::decode(kind, &payload(yaml)).unwrap_err();
        assert!(matches!(error, Error::IncompleteClientCertificate { .. }));
    }

    #[test]
    fn decoded_kind_matches_requested_kind() {
        let decoded = DecodedProvider::decode(
            ProviderKind::HTPasswd,
            &payload("file: /etc/origin/master/htpasswd"),
        )
        .unwrap();

        assert_eq!(
            decoded,
            DecodedProvider::HTPasswd(HTPasswdPasswordIdentityProvider {
                file: "/etc/origin/master/htpasswd".to_owned(),
            })
        );
    }
}
