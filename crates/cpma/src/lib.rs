//! Migrates the identity providers of an OCP 3.x master configuration into the `OAuth`
//! resource and secrets of an OCP 4.x cluster.
//!
//! The engine in [`transform`] works on in-memory data only. Reading files from the master
//! host is delegated to a [`fetch::FileFetcher`], persisting the result to [`writer`].

pub mod builder;
pub mod cli;
pub mod crd;
pub mod fetch;
pub mod legacy;
pub mod logging;
pub mod manifest;
pub mod transform;
pub mod writer;

// External re-exports
pub use k8s_openapi;
pub use kube;
// Internal re-exports
pub use cpma_shared as shared;
