#![allow(dead_code)]

use async_trait::async_trait;
use customerstore::error::{Error, Result};
use customerstore::model::{Address, Customer};
use customerstore::repository::InMemoryCustomerRepository;
use customerstore::CustomerRepository;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};

/// Repository wrapper that injects store failures on demand
#[derive(Debug, Default)]
pub struct FaultyRepository {
    pub inner: InMemoryCustomerRepository,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// Deletes the record right before a conditional replace, as a concurrent
    /// writer would
    pub delete_before_replace: AtomicBool,
    /// Number of scan pages served before the scan fails
    pub fail_scan_after_pages: Option<usize>,
}

impl FaultyRepository {
    pub fn new(inner: InMemoryCustomerRepository) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn failing_scan_after(inner: InMemoryCustomerRepository, pages: usize) -> Self {
        Self {
            inner,
            fail_scan_after_pages: Some(pages),
            ..Self::default()
        }
    }

    fn check(&self, flag: &AtomicBool, operation: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Store(format!("injected {} failure", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for FaultyRepository {
    async fn save(&self, customer: &Customer) -> Result<()> {
        self.check(&self.fail_writes, "save")?;
        self.inner.save(customer).await
    }

    async fn get_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        self.check(&self.fail_reads, "get")?;
        self.inner.get_by_id(customer_id).await
    }

    async fn get_address(&self, customer_id: &str) -> Result<Option<Address>> {
        self.check(&self.fail_reads, "get_address")?;
        self.inner.get_address(customer_id).await
    }

    async fn update(&self, customer: &Customer) -> Result<Customer> {
        self.check(&self.fail_writes, "update")?;
        self.inner.update(customer).await
    }

    async fn replace_existing(&self, customer: &Customer) -> Result<bool> {
        self.check(&self.fail_writes, "replace")?;
        if self.delete_before_replace.load(Ordering::SeqCst) {
            self.inner.delete_by_id(&customer.customer_id).await?;
        }
        self.inner.replace_existing(customer).await
    }

    async fn delete_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        self.check(&self.fail_writes, "delete")?;
        self.inner.delete_by_id(customer_id).await
    }

    fn scan_pages(&self) -> BoxStream<'static, Result<Vec<Customer>>> {
        match self.fail_scan_after_pages {
            None => self.inner.scan_pages(),
            Some(pages) => self
                .inner
                .scan_pages()
                .take(pages)
                .chain(stream::once(async {
                    Err(Error::Store("injected scan failure".into()))
                }))
                .boxed(),
        }
    }
}

pub fn customer(id: &str) -> Customer {
    Customer::new(id)
        .with_name("Test", id)
        .with_address(Address::new(format!("{} Main St", id), "Springfield"))
}
