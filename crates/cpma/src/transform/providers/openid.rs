use crate::{
    crd::oauth::{IdentityProviderType, OpenIdIdentityProvider},
    legacy::providers,
    transform::secrets::{Result, SecretExtractor, SecretRole},
};

pub fn build(
    provider: &providers::OpenIdIdentityProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    let client_secret =
        secrets.from_string_source(SecretRole::ClientSecret, &provider.client_secret)?;

    Ok(IdentityProviderType::OpenId {
        open_id: OpenIdIdentityProvider {
            client_id: provider.client_id.clone(),
            client_secret,
            ca: provider.ca.clone(),
            extra_scopes: provider.extra_scopes.clone(),
            extra_authorize_parameters: provider.extra_authorize_parameters.clone(),
            urls: provider.urls.clone(),
            claims: provider.claims.clone(),
        },
    })
}
