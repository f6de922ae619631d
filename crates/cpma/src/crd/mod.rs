//! Resources of the target cluster generation.

pub mod oauth;
