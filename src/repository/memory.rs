use crate::error::{Error, Result};
use crate::model::{Address, Customer};
use crate::CustomerRepository;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, RwLock};

/// Default number of customers returned per scan page
pub const DEFAULT_PAGE_SIZE: usize = 100;

type Table = Arc<RwLock<BTreeMap<String, Customer>>>;

/// An in-memory implementation of the CustomerRepository trait
///
/// Records are kept ordered by ID, so scans are deterministic. Scans are
/// paginated the way a remote store would paginate them: each page is read
/// under its own lock, resuming after the last key of the previous page.
#[derive(Debug, Clone)]
pub struct InMemoryCustomerRepository {
    store: Table,
    page_size: usize,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates a repository whose scans return at most `page_size` records per page
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: page_size.max(1),
        }
    }

    /// Number of stored customers
    pub fn len(&self) -> usize {
        self.store.read().map(|s| s.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Store("in-memory table lock poisoned".into())
}

enum ScanCursor {
    Start,
    After(String),
    Done,
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn save(&self, customer: &Customer) -> Result<()> {
        let mut store = self.store.write().map_err(poisoned)?;
        store.insert(customer.customer_id.clone(), customer.clone());

        Ok(())
    }

    async fn get_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        let store = self.store.read().map_err(poisoned)?;

        Ok(store.get(customer_id).cloned())
    }

    async fn get_address(&self, customer_id: &str) -> Result<Option<Address>> {
        let store = self.store.read().map_err(poisoned)?;

        Ok(store
            .get(customer_id)
            .map(|c| c.address.clone().unwrap_or_default()))
    }

    async fn update(&self, customer: &Customer) -> Result<Customer> {
        let mut store = self.store.write().map_err(poisoned)?;
        store.insert(customer.customer_id.clone(), customer.clone());

        Ok(customer.clone())
    }

    async fn replace_existing(&self, customer: &Customer) -> Result<bool> {
        let mut store = self.store.write().map_err(poisoned)?;

        match store.get_mut(&customer.customer_id) {
            Some(existing) => {
                *existing = customer.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        let mut store = self.store.write().map_err(poisoned)?;

        Ok(store.remove(customer_id))
    }

    fn scan_pages(&self) -> BoxStream<'static, Result<Vec<Customer>>> {
        let store = self.store.clone();
        let page_size = self.page_size;

        stream::try_unfold(ScanCursor::Start, move |cursor| {
            let store = store.clone();
            async move {
                let start = match cursor {
                    ScanCursor::Done => return Ok::<_, Error>(None),
                    ScanCursor::Start => None,
                    ScanCursor::After(key) => Some(key),
                };

                let table = store.read().map_err(poisoned)?;
                let lower = match start.as_deref() {
                    Some(key) => Bound::Excluded(key),
                    None => Bound::Unbounded,
                };

                let page: Vec<Customer> = table
                    .range::<str, _>((lower, Bound::Unbounded))
                    .take(page_size)
                    .map(|(_, customer)| customer.clone())
                    .collect();

                let next = match page.last() {
                    Some(last) if page.len() == page_size => {
                        ScanCursor::After(last.customer_id.clone())
                    }
                    _ => ScanCursor::Done,
                };

                Ok(Some((page, next)))
            }
        })
        .boxed()
    }
}
