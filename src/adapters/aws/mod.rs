//! Shared AWS plumbing: credentials, region resolution and SigV4 signing

pub mod credentials;
pub mod signing;

pub use credentials::{resolve_region, AwsCredentials};
pub use signing::SigV4Signer;
