use crate::{
    crd::oauth::{HTPasswdIdentityProvider, IdentityProviderType},
    legacy::providers::HTPasswdPasswordIdentityProvider,
    transform::secrets::{Result, SecretExtractor, SecretRole},
};

/// The whole htpasswd file becomes a single secret, the provider only keeps its name.
pub fn build(
    provider: &HTPasswdPasswordIdentityProvider,
    secrets: &mut SecretExtractor,
) -> Result<IdentityProviderType> {
    let file_data = secrets.from_file(SecretRole::HtpasswdFile, &provider.file)?;

    Ok(IdentityProviderType::HTPasswd {
        htpasswd: HTPasswdIdentityProvider { file_data },
    })
}
