use crate::{
    crd::oauth::{GitLabIdentityProvider, IdentityProviderType},
    legacy::providers,
    transform::secrets::{Result, SecretExtractor, SecretRole},
};

pub fn build(
    provider: &providers::GitLabIdentityProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    let client_secret =
        secrets.from_string_source(SecretRole::ClientSecret, &provider.client_secret)?;

    Ok(IdentityProviderType::GitLab {
        gitlab: GitLabIdentityProvider {
            client_id: provider.client_id.clone(),
            client_secret,
            url: provider.url.clone(),
            ca: provider.ca.clone(),
            legacy: provider.legacy,
        },
    })
}
