//! Utility functions for processing data in the YAML file format
use std::io::Write;

use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Represents every error which can be encountered during YAML serialization.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to serialize YAML"))]
    SerializeYaml { source: serde_yaml::Error },

    #[snafu(display("failed to write YAML document separator"))]
    WriteDocumentSeparator { source: std::io::Error },

    #[snafu(display("failed to parse bytes as valid UTF-8 string"))]
    ParseUtf8Bytes { source: std::string::FromUtf8Error },
}

/// Provides configurable options during YAML serialization.
///
/// The default implementation [`SerializeOptions::default()`] enables explicit document and
/// singleton map serialization. Generated manifests use [`SerializeOptions::manifest()`]
/// instead, which disables both so the output matches what the OpenShift installer expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Adds leading triple dashes (`---`) to the output string.
    pub explicit_document: bool,

    /// Serialize enum variants as YAML maps using the variant name as the key.
    pub singleton_map: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            explicit_document: true,
            singleton_map: true,
        }
    }
}

impl SerializeOptions {
    /// Options used for every manifest handed to the installer: a bare document without
    /// separator, enums serialized through their own serde representation.
    pub fn manifest() -> Self {
        Self {
            explicit_document: false,
            singleton_map: false,
        }
    }
}

/// Serializes any type `T` which is [serializable](serde::Serialize) as YAML using the provided
/// [`SerializeOptions`].
///
/// Output is stable: field order follows the serde representation of `T` and maps must be
/// ordered (for example [`BTreeMap`](std::collections::BTreeMap)) for repeated runs to produce
/// identical bytes.
pub trait YamlManifest: Sized + serde::Serialize {
    /// Renders `self` into a byte buffer.
    fn to_yaml_bytes(&self, options: SerializeOptions) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        serialize(&self, &mut buffer, options)?;
        Ok(buffer)
    }

    /// Renders `self` into a [`String`].
    fn to_yaml_string(&self, options: SerializeOptions) -> Result<String> {
        let buffer = self.to_yaml_bytes(options)?;
        String::from_utf8(buffer).context(ParseUtf8BytesSnafu)
    }
}

impl<T> YamlManifest for T where T: serde::ser::Serialize {}

/// Serializes the given data structure and writes it to a [`Writer`](Write).
pub fn serialize<T, W>(value: &T, mut writer: W, options: SerializeOptions) -> Result<()>
where
    T: serde::Serialize,
    W: std::io::Write,
{
    if options.explicit_document {
        writer
            .write_all(b"---\n")
            .context(WriteDocumentSeparatorSnafu)?;
    }

    let mut serializer = serde_yaml::Serializer::new(writer);

    if options.singleton_map {
        serde_yaml::with::singleton_map_recursive::serialize(value, &mut serializer)
            .context(SerializeYamlSnafu)?;
    } else {
        value
            .serialize(&mut serializer)
            .context(SerializeYamlSnafu)?;
    }

    Ok(())
}
