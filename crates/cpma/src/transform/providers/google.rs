use crate::{
    crd::oauth::{GoogleIdentityProvider, IdentityProviderType},
    legacy::providers,
    transform::secrets::{Result, SecretExtractor, SecretRole},
};

pub fn build(
    provider: &providers::GoogleIdentityProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    let client_secret =
        secrets.from_string_source(SecretRole::ClientSecret, &provider.client_secret)?;

    Ok(IdentityProviderType::Google {
        google: GoogleIdentityProvider {
            client_id: provider.client_id.clone(),
            client_secret,
            hosted_domain: provider.hosted_domain.clone(),
        },
    })
}
