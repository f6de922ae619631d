use crate::{
    crd::oauth::{BasicAuthIdentityProvider, IdentityProviderType},
    legacy::providers::BasicAuthPasswordIdentityProvider,
    transform::secrets::{Result, SecretExtractor},
};

pub fn build(
    provider: &BasicAuthPasswordIdentityProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    let connection = &provider.remote_connection_info;
    let client_certificate = secrets.client_certificate(&connection.client_cert)?;
    let (tls_client_cert, tls_client_key) = client_certificate
        .map(|references| (references.cert, references.key))
        .unzip();

    Ok(IdentityProviderType::BasicAuth {
        basic_auth: BasicAuthIdentityProvider {
            url: connection.url.clone(),
            ca: connection.ca.clone(),
            tls_client_cert,
            tls_client_key,
        },
    })
}
