//! Customer repository implementations
//!
//! - In-memory repository for testing and development
//! - DynamoDB repository (available through the plugins module with the
//!   `aws-dynamodb` feature)
//!
//! Other stores can be added by implementing [`CustomerRepository`](crate::CustomerRepository).

pub mod memory;

pub use memory::InMemoryCustomerRepository;

#[cfg(feature = "aws-dynamodb")]
pub use crate::plugins::aws_v2::dynamodb::DynamoDbCustomerRepository;

use crate::error::Result;
use crate::model::Customer;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};

/// Flattens a stream of pages into a stream of customers
///
/// The first page error is passed through as a single item and ends the
/// stream; pages after it are never polled.
pub fn flatten_pages(
    pages: BoxStream<'static, Result<Vec<Customer>>>,
) -> BoxStream<'static, Result<Customer>> {
    pages
        .scan(false, |failed, page| {
            if *failed {
                return future::ready(None);
            }

            let items: Vec<Result<Customer>> = match page {
                Ok(customers) => customers.into_iter().map(Ok).collect(),
                Err(e) => {
                    *failed = true;
                    vec![Err(e)]
                }
            };

            future::ready(Some(stream::iter(items)))
        })
        .flatten()
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_flatten_pages_preserves_order() {
        let pages = stream::iter(vec![
            Ok(vec![Customer::new("a"), Customer::new("b")]),
            Ok(vec![]),
            Ok(vec![Customer::new("c")]),
        ])
        .boxed();

        let ids: Vec<String> = flatten_pages(pages)
            .map(|c| c.unwrap().customer_id)
            .collect()
            .await;

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_flatten_pages_stops_after_error() {
        let pages = stream::iter(vec![
            Ok(vec![Customer::new("a")]),
            Err(Error::Store("scan failed".into())),
            Ok(vec![Customer::new("b")]),
        ])
        .boxed();

        let items: Vec<Result<Customer>> = flatten_pages(pages).collect().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(Error::Store(_))));
    }
}
