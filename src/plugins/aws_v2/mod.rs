//! AWS SDK v2 plugin implementations
//!
//! These implementations are conditionally compiled using the `aws-dynamodb`
//! feature flag.

#[cfg(feature = "aws-dynamodb")]
pub mod dynamodb;
