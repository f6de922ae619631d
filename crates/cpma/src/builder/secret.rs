use std::collections::BTreeMap;

use k8s_openapi::{
    ByteString, api::core::v1::Secret, apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use snafu::{OptionExt, Snafu};

pub const OPAQUE_SECRET_TYPE: &str = "Opaque";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("secret is missing the required key {key:?}"))]
    MissingObjectKey { key: &'static str },
}

/// A builder to build [`Secret`] objects.
#[derive(Clone, Debug, Default)]
pub struct SecretBuilder {
    metadata: Option<ObjectMeta>,
    data: Option<BTreeMap<String, ByteString>>,
    secret_type: Option<String>,
}

impl SecretBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&mut self, metadata: impl Into<ObjectMeta>) -> &mut Self {
        self.metadata = Some(metadata.into());
        self
    }

    /// Adds a single data entry. The raw bytes are base64 encoded on serialization.
    pub fn add_data(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), ByteString(value.into()));
        self
    }

    pub fn secret_type(&mut self, secret_type: impl Into<String>) -> &mut Self {
        self.secret_type = Some(secret_type.into());
        self
    }

    pub fn build(&self) -> Result<Secret> {
        let metadata = self
            .metadata
            .clone()
            .context(MissingObjectKeySnafu { key: "metadata" })?;

        Ok(Secret {
            metadata,
            data: self.data.clone(),
            type_: self.secret_type.clone(),
            ..Secret::default()
        })
    }
}
