//! S3 adapter: destination bucket guard

pub mod client;

pub use client::S3BucketGuard;
