//! Customer CRUD orchestration
//!
//! [`CustomerService`] exposes every operation twice:
//!
//! - a typed `try_*` form that returns [`Result`] and keeps "not found",
//!   "invalid request" and store failures apart;
//! - the masked form (`create_new_customer`, `get_customer_by_customer_id`,
//!   ...) that never fails: errors are logged and replaced with
//!   [`OperationResult::Fail`] or an empty [`Customer`]/[`Address`].
//!
//! Listings are streams over a full-table scan. A failure part-way through
//! replaces the rest of the listing with one empty `Customer`, after which
//! the stream completes normally.

use crate::config::{Clock, ServiceOptions, SystemClock, TimestampPolicy};
use crate::error::{Error, Result};
use crate::model::{Address, Customer, OperationResult};
use crate::pacing::Pacing;
use crate::timer;
use crate::CustomerRepository;

use futures::future;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;

const FAILURE_COUNTER: &str = "customer.service.failures";

/// Orchestrates customer operations over a shared repository
#[derive(Debug, Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    options: ServiceOptions,
    clock: Arc<dyn Clock>,
}

impl CustomerService {
    /// Creates a service with default options and the system clock
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self::with_options(repository, ServiceOptions::default())
    }

    /// Creates a service with the given options and the system clock
    pub fn with_options(repository: Arc<dyn CustomerRepository>, options: ServiceOptions) -> Self {
        Self {
            repository,
            options,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for write timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Options the service was built with
    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Repository shared by every operation
    pub fn repository(&self) -> &Arc<dyn CustomerRepository> {
        &self.repository
    }

    fn stamp(&self, customer: &mut Customer, stored_created: Option<i64>) {
        let now = self.clock.epoch_seconds();

        customer.created_time_stamp = match self.options.timestamp_policy {
            TimestampPolicy::Legacy => Some(now),
            TimestampPolicy::WriteOnce => stored_created.or(Some(now)),
        };
        customer.last_modified_time_stamp = Some(now);
    }

    /// Stores a new customer, overwriting any record with the same ID
    ///
    /// Returns the record as written, timestamps included.
    pub async fn try_create(&self, mut customer: Customer) -> Result<Customer> {
        let _timer = timer!("customer.service.create");
        validate_id(&customer.customer_id)?;

        self.stamp(&mut customer, None);
        self.repository.save(&customer).await?;

        log::debug!("created customer {}", customer.customer_id);
        Ok(customer)
    }

    /// Loads a customer, failing with [`Error::NotFound`] if absent
    pub async fn try_get(&self, customer_id: &str) -> Result<Customer> {
        let _timer = timer!("customer.service.get");
        validate_id(customer_id)?;

        self.repository
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| Error::NotFound(customer_id.to_string()))
    }

    /// Loads the address of a customer
    ///
    /// A stored customer without an address yields an empty [`Address`].
    pub async fn try_get_address(&self, customer_id: &str) -> Result<Address> {
        let _timer = timer!("customer.service.get_address");
        validate_id(customer_id)?;

        self.repository
            .get_address(customer_id)
            .await?
            .ok_or_else(|| Error::NotFound(customer_id.to_string()))
    }

    /// Replaces an existing customer
    ///
    /// The current record is read first and the call fails with
    /// [`Error::NotFound`] if there is none. The write itself is conditional
    /// on the record still existing, so a delete that lands between the read
    /// and the write is also reported as `NotFound`.
    pub async fn try_update(&self, mut customer: Customer) -> Result<Customer> {
        let _timer = timer!("customer.service.update");
        validate_id(&customer.customer_id)?;

        let stored = self
            .repository
            .get_by_id(&customer.customer_id)
            .await?
            .ok_or_else(|| Error::NotFound(customer.customer_id.clone()))?;

        self.stamp(&mut customer, stored.created_time_stamp);

        if !self.repository.replace_existing(&customer).await? {
            log::debug!(
                "customer {} was removed before it could be updated",
                customer.customer_id
            );
            return Err(Error::NotFound(customer.customer_id));
        }

        Ok(customer)
    }

    /// Writes the customer whether or not it already exists
    ///
    /// Under [`TimestampPolicy::WriteOnce`] the stored creation time is read
    /// first so it can be carried over; the legacy policy writes blind.
    pub async fn try_upsert(&self, mut customer: Customer) -> Result<Customer> {
        let _timer = timer!("customer.service.upsert");
        validate_id(&customer.customer_id)?;

        let stored_created = match self.options.timestamp_policy {
            TimestampPolicy::Legacy => None,
            TimestampPolicy::WriteOnce => self
                .repository
                .get_by_id(&customer.customer_id)
                .await?
                .and_then(|stored| stored.created_time_stamp),
        };

        self.stamp(&mut customer, stored_created);
        self.repository.update(&customer).await
    }

    /// Deletes a customer and returns the removed record
    pub async fn try_delete(&self, customer_id: &str) -> Result<Customer> {
        let _timer = timer!("customer.service.delete");
        validate_id(customer_id)?;

        self.repository
            .delete_by_id(customer_id)
            .await?
            .ok_or_else(|| Error::NotFound(customer_id.to_string()))
    }

    /// Streams every customer with the given pacing, errors included
    pub fn stream_customers(&self, pacing: Pacing) -> BoxStream<'static, Result<Customer>> {
        pacing
            .apply(self.repository.scan_all())
            .inspect(|item| {
                if let Ok(customer) = item {
                    log::info!("server produces: {:?}", customer);
                }
            })
            .boxed()
    }

    /// Creates a customer; see [`try_create`](Self::try_create)
    pub async fn create_new_customer(&self, customer: Customer) -> OperationResult {
        let result = self.try_create(customer).await;
        outcome("create", result)
    }

    /// Loads a customer, or an empty one on any failure
    pub async fn get_customer_by_customer_id(&self, customer_id: &str) -> Customer {
        self.try_get(customer_id)
            .await
            .unwrap_or_else(|e| fallback("get", e))
    }

    /// Loads a customer's address, or an empty one on any failure
    pub async fn query_address_by_customer_id(&self, customer_id: &str) -> Address {
        self.try_get_address(customer_id)
            .await
            .unwrap_or_else(|e| fallback("get_address", e))
    }

    /// Replaces an existing customer; see [`try_update`](Self::try_update)
    pub async fn update_existing_customer(&self, customer: Customer) -> OperationResult {
        let result = self.try_update(customer).await;
        outcome("update", result)
    }

    /// Writes a customer whether or not it exists
    pub async fn update_existing_or_create_customer(&self, customer: Customer) -> OperationResult {
        let result = self.try_upsert(customer).await;
        outcome("upsert", result)
    }

    /// Deletes a customer; an absent record is a failure
    pub async fn delete_customer_by_customer_id(&self, customer_id: &str) -> OperationResult {
        let result = self.try_delete(customer_id).await;
        outcome("delete", result)
    }

    /// Lists every customer, delaying the whole sequence once
    pub fn get_customer_list(&self) -> BoxStream<'static, Customer> {
        self.list_customers(Pacing::Sequence(self.options.list_delay))
    }

    /// Lists every customer, delaying each one as the consumer asks for it
    pub fn get_customer_list_backpressure(&self) -> BoxStream<'static, Customer> {
        self.list_customers(Pacing::PerElement(self.options.list_delay))
    }

    /// Lists every customer with the given pacing, masking a failed scan
    pub fn list_customers(&self, pacing: Pacing) -> BoxStream<'static, Customer> {
        substitute_default_on_error(self.stream_customers(pacing))
    }
}

fn validate_id(customer_id: &str) -> Result<()> {
    if customer_id.trim().is_empty() {
        return Err(Error::InvalidArgument("customer ID must not be empty".into()));
    }
    Ok(())
}

fn record_failure(operation: &'static str, err: &Error) {
    log::warn!("customer {} failed: {}", operation, err);
    metrics::counter!(FAILURE_COUNTER, 1, "operation" => operation);
    crate::metrics::increment_counter(FAILURE_COUNTER, 1);
}

fn outcome<T>(operation: &'static str, result: Result<T>) -> OperationResult {
    if let Err(e) = &result {
        record_failure(operation, e);
    }
    OperationResult::from(result)
}

fn fallback<T: Default>(operation: &'static str, err: Error) -> T {
    // Absent records are expected on the masked read path.
    if err.is_not_found() {
        log::debug!("customer {}: {}", operation, err);
    } else {
        record_failure(operation, &err);
    }
    T::default()
}

/// Ends the stream at the first error, emitting one empty customer in its place
fn substitute_default_on_error(
    items: BoxStream<'static, Result<Customer>>,
) -> BoxStream<'static, Customer> {
    items
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }

            let customer = match item {
                Ok(customer) => customer,
                Err(e) => {
                    record_failure("list", &e);
                    *failed = true;
                    Customer::default()
                }
            };

            future::ready(Some(customer))
        })
        .boxed()
}
