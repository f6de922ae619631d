use crate::{
    crd::oauth::{IdentityProviderType, LdapIdentityProvider},
    legacy::providers::LdapPasswordIdentityProvider,
};

/// The bind password is carried over in its legacy form and never extracted into a secret.
// TODO: Lift bindPassword into a `<name>-bind-password-secret` once it is settled that LDAP
// should follow the other kinds.
pub fn build(provider: &LdapPasswordIdentityProvider) -> IdentityProviderType {
    IdentityProviderType::Ldap {
        ldap: LdapIdentityProvider {
            url: provider.url.clone(),
            bind_dn: provider.bind_dn.clone(),
            bind_password: provider.bind_password.clone(),
            insecure: provider.insecure,
            ca: provider.ca.clone(),
            attributes: provider.attributes.clone(),
        },
    }
}
