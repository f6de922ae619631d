use crate::{
    crd::oauth::{IdentityProviderType, KeystoneIdentityProvider},
    legacy::providers::KeystonePasswordIdentityProvider,
    transform::secrets::{Result, SecretExtractor},
};

pub fn build(
    provider: &KeystonePasswordIdentityProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    let connection = &provider.remote_connection_info;
    let client_certificate = secrets.client_certificate(&connection.client_cert)?;
    let (tls_client_cert, tls_client_key) = client_certificate
        .map(|references| (references.cert, references.key))
        .unzip();

    Ok(IdentityProviderType::Keystone {
        keystone: KeystoneIdentityProvider {
            domain_name: provider.domain_name.clone(),
            url: connection.url.clone(),
            ca: connection.ca.clone(),
            tls_client_cert,
            tls_client_key,
            use_keystone_identity: provider.use_keystone_identity,
        },
    })
}
