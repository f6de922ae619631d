//! This module provides builders for the Kubernetes objects emitted as manifests.

pub mod meta;
pub mod secret;
