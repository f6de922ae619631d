use crate::{
    crd::oauth::{IdentityProviderType, RequestHeaderIdentityProvider},
    legacy::providers,
};

/// Request header providers carry no sensitive material, the client CA stays a path.
pub fn build(provider: &providers::RequestHeaderIdentityProvider) -> IdentityProviderType {
    IdentityProviderType::RequestHeader {
        request_header: RequestHeaderIdentityProvider {
            login_url: provider.login_url.clone(),
            challenge_url: provider.challenge_url.clone(),
            ca: provider.client_ca.clone(),
            client_common_names: provider.client_common_names.clone(),
            headers: provider.headers.clone(),
            preferred_username_headers: provider.preferred_username_headers.clone(),
            name_headers: provider.name_headers.clone(),
            email_headers: provider.email_headers.clone(),
        },
    }
}
