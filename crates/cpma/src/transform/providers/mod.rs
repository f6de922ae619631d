//! One builder per legacy provider kind.
//!
//! Builders map a decoded legacy record to its OCP 4.x counterpart. Sensitive fields are
//! handed to the [`SecretExtractor`] and replaced by the returned secret references. A builder
//! only fails if the extractor cannot resolve a value, never because an optional field is
//! absent.

use crate::{
    crd::oauth::IdentityProviderType,
    legacy::DecodedProvider,
    transform::secrets::{Result, SecretExtractor},
};

mod basic_auth;
mod github;
mod gitlab;
mod google;
mod htpasswd;
mod keystone;
mod ldap;
mod openid;
mod request_header;

/// Routes `decoded` to the builder of its kind.
pub fn build(
    decoded: &DecodedProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    match decoded {
        DecodedProvider::BasicAuth(provider) => basic_auth::build(provider, secrets),
        DecodedProvider::GitHub(provider) => github::build(provider, secrets),
        DecodedProvider::GitLab(provider) => gitlab::build(provider, secrets),
        DecodedProvider::Google(provider) => google::build(provider, secrets),
        DecodedProvider::HTPasswd(provider) => htpasswd::build(provider, secrets),
        DecodedProvider::Keystone(provider) => keystone::build(provider, secrets),
        DecodedProvider::Ldap(provider) => Ok(ldap::build(provider)),
        DecodedProvider::OpenId(provider) => openid::build(provider, secrets),
        DecodedProvider::RequestHeader(provider) => Ok(request_header::build(provider)),
    }
}
