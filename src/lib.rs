//! # Customer Store
//!
//! Asynchronous CRUD orchestration for customer records held in a key-value
//! store.
//!
//! The crate has two layers. A [`CustomerRepository`] is the store itself:
//! an in-memory implementation ships for tests and local development, and a
//! DynamoDB implementation is available behind the `aws-dynamodb` feature,
//! built from a single shared [`StoreClient`](plugins::aws_v2::dynamodb::StoreClient).
//! On top of it, [`CustomerService`] stamps write timestamps, maps every
//! outcome onto either a typed [`Result`] or the legacy sentinel values
//! ([`OperationResult::Fail`], an empty [`Customer`]), and streams the table
//! with one of two pacing strategies.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use customerstore::model::{Address, Customer, OperationResult};
//! use customerstore::repository::InMemoryCustomerRepository;
//! use customerstore::service::CustomerService;
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let repository = Arc::new(InMemoryCustomerRepository::new());
//! let service = CustomerService::new(repository);
//!
//! let customer = Customer::new("c1").with_address(Address::new("1 Main St", "Springfield"));
//! assert_eq!(service.create_new_customer(customer).await, OperationResult::Success);
//!
//! let stored = service.get_customer_by_customer_id("c1").await;
//! assert!(stored.created_time_stamp.is_some());
//!
//! let all: Vec<Customer> = service.get_customer_list().collect().await;
//! assert_eq!(all.len(), 1);
//! # }
//! ```
//!
//! ## Using DynamoDB
//!
//! ```rust,ignore
//! use customerstore::config::StoreConfig;
//! use customerstore::plugins::aws_v2::dynamodb::DynamoDbClientBuilder;
//! use customerstore::service::CustomerService;
//! use std::sync::Arc;
//!
//! # async fn dynamodb_example() -> customerstore::Result<()> {
//! let config = StoreConfig::from_env()?;
//! let client = DynamoDbClientBuilder::from_store_config(&config).build().await?;
//! let service = CustomerService::new(Arc::new(client.customer_repository(&config.table_name)));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod pacing;
pub mod repository;
pub mod service;

// Plugin architecture for AWS service integrations
pub mod plugins;

pub use crate::config::{ServiceOptions, StoreConfig, TimestampPolicy};
pub use crate::error::{Error, Result};
pub use crate::model::{Address, Customer, OperationResult};
pub use crate::pacing::Pacing;
pub use crate::service::CustomerService;

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;

/// Key-value store interface for customer records
///
/// Every method is independent: no ordering is guaranteed between concurrent
/// calls on the same `customer_id`.
#[async_trait]
pub trait CustomerRepository: Send + Sync + fmt::Debug {
    /// Stores the customer, replacing any existing record with the same ID
    async fn save(&self, customer: &Customer) -> Result<()>;

    /// Loads a customer by ID
    async fn get_by_id(&self, customer_id: &str) -> Result<Option<Customer>>;

    /// Loads only the address of a customer
    ///
    /// Returns `Some(Address::default())` for a stored customer without an
    /// address and `None` when the customer does not exist.
    async fn get_address(&self, customer_id: &str) -> Result<Option<Address>>;

    /// Writes the customer whether or not it exists and returns the stored record
    async fn update(&self, customer: &Customer) -> Result<Customer>;

    /// Replaces an existing customer
    ///
    /// Returns false, without writing, if no record exists for the ID
    async fn replace_existing(&self, customer: &Customer) -> Result<bool>;

    /// Deletes a customer and returns the removed record, if there was one
    async fn delete_by_id(&self, customer_id: &str) -> Result<Option<Customer>>;

    /// Scans the whole table, one stream element per store page
    fn scan_pages(&self) -> BoxStream<'static, Result<Vec<Customer>>>;

    /// Scans the whole table as one sequence of customers
    ///
    /// A failed page yields a single error item and ends the stream.
    fn scan_all(&self) -> BoxStream<'static, Result<Customer>> {
        repository::flatten_pages(self.scan_pages())
    }
}
