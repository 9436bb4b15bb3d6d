//! Domain types for Logvault.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SourceId`], [`TaskId`], [`BucketName`])
//! - **Error types** ([`LogvaultError`], [`LogServiceError`], [`ObjectStoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use logvault::domain::{BucketName, SourceId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceId::new("/aws/ecs/app-a")?;
//! let bucket = BucketName::new("cw-logroup-to-s3")?;
//!
//! // This won't compile - a bucket is not a log source
//! // let wrong: SourceId = bucket;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod result;

pub use errors::{LogServiceError, LogvaultError, ObjectStoreError};
pub use ids::{BucketName, SourceId, TaskId};
pub use result::Result;
