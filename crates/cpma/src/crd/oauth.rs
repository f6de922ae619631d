//! The cluster-wide `OAuth` configuration resource of OCP 4.x.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::legacy::{
    StringSource,
    providers::{LdapAttributeMapping, OpenIdClaims, OpenIdUrls},
};

pub const OAUTH_RESOURCE_NAME: &str = "cluster";
pub const OPENSHIFT_CONFIG_NAMESPACE: &str = "openshift-config";

/// Holds the cluster-wide information about OAuth, most notably the identity providers users
/// can log in with. There is exactly one instance, named `cluster`.
#[derive(Clone, CustomResource, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "OAuth",
    plural = "oauths",
    derive = "PartialEq",
    crates(
        kube_core = "kube::core",
        k8s_openapi = "k8s_openapi",
        schemars = "schemars"
    )
)]
#[serde(rename_all = "camelCase")]
pub struct OAuthSpec {
    /// Identity providers in the order they were configured on the legacy master.
    #[serde(default)]
    pub identity_providers: Vec<IdentityProvider>,
}

/// An identity provider entry of [`OAuthSpec`].
#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    pub name: String,
    pub challenge: bool,
    pub login: bool,
    pub mapping_method: String,

    #[serde(flatten)]
    pub provider: IdentityProviderType,
}

/// The kind-specific part of an [`IdentityProvider`], discriminated by `type`.
#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum IdentityProviderType {
    BasicAuth {
        #[serde(rename = "basicAuth")]
        basic_auth: BasicAuthIdentityProvider,
    },
    GitHub {
        github: GitHubIdentityProvider,
    },
    GitLab {
        gitlab: GitLabIdentityProvider,
    },
    Google {
        google: GoogleIdentityProvider,
    },
    HTPasswd {
        htpasswd: HTPasswdIdentityProvider,
    },
    Keystone {
        keystone: KeystoneIdentityProvider,
    },
    #[serde(rename = "LDAP")]
    Ldap { ldap: LdapIdentityProvider },
    #[serde(rename = "OpenID")]
    OpenId {
        #[serde(rename = "openID")]
        open_id: OpenIdIdentityProvider,
    },
    RequestHeader {
        #[serde(rename = "requestHeader")]
        request_header: RequestHeaderIdentityProvider,
    },
}

impl IdentityProviderType {
    /// Every secret reference held by this provider.
    pub fn secret_references(&self) -> Vec<&SecretNameReference> {
        match self {
            Self::BasicAuth { basic_auth } => {
                [&basic_auth.tls_client_cert, &basic_auth.tls_client_key]
                    .into_iter()
                    .flatten()
                    .collect()
            }
            Self::Keystone { keystone } => {
                [&keystone.tls_client_cert, &keystone.tls_client_key]
                    .into_iter()
                    .flatten()
                    .collect()
            }
            Self::GitHub { github } => vec![&github.client_secret],
            Self::GitLab { gitlab } => vec![&gitlab.client_secret],
            Self::Google { google } => vec![&google.client_secret],
            Self::OpenId { open_id } => vec![&open_id.client_secret],
            Self::HTPasswd { htpasswd } => vec![&htpasswd.file_data],
            Self::Ldap { .. } | Self::RequestHeader { .. } => Vec::new(),
        }
    }
}

/// Points at a secret in the `openshift-config` namespace.
#[derive(Clone, Debug, Deserialize, Eq, Hash, JsonSchema, PartialEq, Serialize)]
pub struct SecretNameReference {
    pub name: String,
}

impl SecretNameReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuthIdentityProvider {
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_cert: Option<SecretNameReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_key: Option<SecretNameReference>,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubIdentityProvider {
    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: SecretNameReference,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca: String,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitLabIdentityProvider {
    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: SecretNameReference,

    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleIdentityProvider {
    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: SecretNameReference,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hosted_domain: String,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HTPasswdIdentityProvider {
    /// Secret holding the htpasswd file under the `htpasswd` key.
    pub file_data: SecretNameReference,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystoneIdentityProvider {
    pub domain_name: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_cert: Option<SecretNameReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_key: Option<SecretNameReference>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub use_keystone_identity: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LdapIdentityProvider {
    pub url: String,

    #[serde(default, rename = "bindDN", skip_serializing_if = "String::is_empty")]
    pub bind_dn: String,

    /// Kept in its legacy shape, LDAP bind credentials are not lifted into a secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<StringSource>,

    pub insecure: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca: String,

    pub attributes: LdapAttributeMapping,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenIdIdentityProvider {
    #[serde(rename = "clientID")]
    pub client_id: String,

    pub client_secret: SecretNameReference,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_scopes: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_authorize_parameters: BTreeMap<String, String>,

    pub urls: OpenIdUrls,

    pub claims: OpenIdClaims,
}

#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeaderIdentityProvider {
    #[serde(default, rename = "loginURL", skip_serializing_if = "String::is_empty")]
    pub login_url: String,

    #[serde(default, rename = "challengeURL", skip_serializing_if = "String::is_empty")]
    pub challenge_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub client_common_names: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_username_headers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_headers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub email_headers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use cpma_shared::yaml::{SerializeOptions, YamlManifest};
    use indoc::indoc;

    use super::*;

    fn htpasswd_provider() -> IdentityProvider {
        IdentityProvider {
            name: "htpasswd_auth".to_owned(),
            challenge: true,
            login: true,
            mapping_method: "claim".to_owned(),
            provider: IdentityProviderType::HTPasswd {
                htpasswd: HTPasswdIdentityProvider {
                    file_data: SecretNameReference::new("htpasswd_auth-secret"),
                },
            },
        }
    }

    #[test]
    fn identity_provider_yaml() {
        let yaml = htpasswd_provider()
            .to_yaml_string(SerializeOptions::manifest())
            .unwrap();

        assert_eq!(
            yaml,
            indoc! {"
                name: htpasswd_auth
                challenge: true
                login: true
                mappingMethod: claim
                type: HTPasswd
                htpasswd:
                  fileData:
                    name: htpasswd_auth-secret
            "}
        );
    }

    #[test]
    fn identity_provider_yaml_parses_back() {
        let yaml = htpasswd_provider()
            .to_yaml_string(SerializeOptions::manifest())
            .unwrap();
        let parsed: IdentityProvider = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed, htpasswd_provider());
    }

    #[test]
    fn keystone_without_client_certificate_omits_references() {
        let keystone = IdentityProviderType::Keystone {
            keystone: KeystoneIdentityProvider {
                domain_name: "default".to_owned(),
                url: "http://fake.url:5000".to_owned(),
                ca: String::new(),
                tls_client_cert: None,
                tls_client_key: None,
                use_keystone_identity: false,
            },
        };

        let yaml = keystone
            .to_yaml_string(SerializeOptions::manifest())
            .unwrap();

        assert!(!yaml.contains("tlsClientCert"));
        assert!(!yaml.contains("tlsClientKey"));
        assert!(!yaml.contains("useKeystoneIdentity"));
        assert!(keystone.secret_references().is_empty());
    }

    #[test]
    fn type_tags() {
        let ldap = IdentityProviderType::Ldap {
            ldap: LdapIdentityProvider {
                url: "ldap://ldap.example.com/ou=users,dc=acme,dc=com?uid".to_owned(),
                bind_dn: String::new(),
                bind_password: None,
                insecure: false,
                ca: String::new(),
                attributes: LdapAttributeMapping::default(),
            },
        };

        let yaml = ldap.to_yaml_string(SerializeOptions::manifest()).unwrap();
        assert!(yaml.starts_with("type: LDAP\nldap:\n"));
    }
}
