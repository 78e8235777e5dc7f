//! DynamoDB customer repository using AWS SDK v2
//!
//! [`DynamoDbClientBuilder`] produces the process-wide [`StoreClient`], which
//! hands out [`DynamoDbCustomerRepository`] instances bound to a table. Items
//! are keyed by the `customerId` string attribute.

mod builder;
mod item;
mod repository;

pub use builder::{DynamoDbClientBuilder, StoreClient};
pub use item::{customer_from_item, customer_to_item, ADDRESS, PARTITION_KEY};
pub use repository::DynamoDbCustomerRepository;

#[cfg(test)]
mod tests;
