use crate::{
    crd::oauth::{GitHubIdentityProvider, IdentityProviderType},
    legacy::providers,
    transform::secrets::{Result, SecretExtractor, SecretRole},
};

pub fn build(
    provider: &providers::GitHubIdentityProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    let client_secret =
        secrets.from_string_source(SecretRole::ClientSecret, &provider.client_secret)?;

    Ok(IdentityProviderType::GitHub {
        github: GitHubIdentityProvider {
            client_id: provider.client_id.clone(),
            client_secret,
            organizations: provider.organizations.clone(),
            teams: provider.teams.clone(),
            hostname: provider.hostname.clone(),
            ca: provider.ca.clone(),
        },
    })
}
