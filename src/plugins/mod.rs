//! Plugin architecture for AWS service integrations
//!
//! AWS-backed stores live here so they can be compiled out. The
//! `aws-dynamodb` feature (on by default) enables
//! [`aws_v2::dynamodb`], a DynamoDB customer repository built on the AWS SDK.
//!
//! To build with only the in-memory repository:
//! ```toml
//! [dependencies]
//! customerstore = { version = "0.1.0", default-features = false }
//! ```

pub mod aws_v2;
