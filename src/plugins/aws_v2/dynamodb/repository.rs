use crate::error::{Error, Result};
use crate::model::{Address, Customer};
use crate::plugins::aws_v2::dynamodb::item::{
    address_from_item, customer_from_item, customer_to_item, key_for, Item, ADDRESS, PARTITION_KEY,
};
use crate::timer;
use crate::CustomerRepository;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ReturnValue, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as AwsDynamoDbClient;
use futures::stream::{self, BoxStream, StreamExt};

/// DynamoDB-backed customer repository
///
/// Maps [`Customer`] records to items in a table whose hash key is the
/// `customerId` string attribute. Scans follow `LastEvaluatedKey` until the
/// table is exhausted; each SDK response becomes one page.
#[derive(Debug, Clone)]
pub struct DynamoDbCustomerRepository {
    client: AwsDynamoDbClient,

    table_name: String,

    /// Maximum items evaluated per scan request; `None` lets DynamoDB decide
    page_size: Option<i32>,

    consistent_read: bool,
}

enum ScanCursor {
    Start,
    After(Item),
    Done,
}

fn store_error(operation: &str, err: impl std::fmt::Display) -> Error {
    Error::Store(format!("DynamoDB {} error: {}", operation, err))
}

/// Checks an SDK error for a DynamoDB exception name
///
/// The short display form of a service error may omit the exception name,
/// so the debug form is checked as well.
fn is_exception<E>(err: &E, name: &str) -> bool
where
    E: std::fmt::Display + std::fmt::Debug,
{
    err.to_string().contains(name) || format!("{:?}", err).contains(name)
}

impl DynamoDbCustomerRepository {
    pub fn new(client: AwsDynamoDbClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            page_size: None,
            consistent_read: false,
        }
    }

    /// Limits the number of items evaluated per scan page
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Uses strongly consistent reads for point lookups and scans
    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Creates the customer table if it does not exist yet
    ///
    /// Returns true if the table was created. Intended for local and test
    /// stores; production tables are expected to be provisioned separately.
    pub async fn create_table_if_not_exists(&self) -> Result<bool> {
        let result = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(PARTITION_KEY)
                    .attribute_type(ScalarAttributeType::S)
                    .build(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(PARTITION_KEY)
                    .key_type(KeyType::Hash)
                    .build(),
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match result {
            Ok(_) => {
                log::info!("created DynamoDB table {}", self.table_name);
                Ok(true)
            }
            Err(err) if is_exception(&err, "ResourceInUseException") => Ok(false),
            Err(err) => Err(store_error("create_table", err)),
        }
    }
}

#[async_trait]
impl CustomerRepository for DynamoDbCustomerRepository {
    async fn save(&self, customer: &Customer) -> Result<()> {
        let _timer = timer!("customer.store.dynamodb.save");

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(customer_to_item(customer)))
            .send()
            .await
            .map_err(|e| store_error("put_item", e))?;

        Ok(())
    }

    async fn get_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        let _timer = timer!("customer.store.dynamodb.get");

        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_for(customer_id)))
            .consistent_read(self.consistent_read)
            .send()
            .await
            .map_err(|e| store_error("get_item", e))?;

        result.item().map(customer_from_item).transpose()
    }

    async fn get_address(&self, customer_id: &str) -> Result<Option<Address>> {
        let _timer = timer!("customer.store.dynamodb.get_address");

        // The key is projected too, so a customer without an address still
        // comes back as an item.
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_for(customer_id)))
            .projection_expression("#id, #address")
            .expression_attribute_names("#id", PARTITION_KEY)
            .expression_attribute_names("#address", ADDRESS)
            .consistent_read(self.consistent_read)
            .send()
            .await
            .map_err(|e| store_error("get_item", e))?;

        result.item().map(address_from_item).transpose()
    }

    async fn update(&self, customer: &Customer) -> Result<Customer> {
        let _timer = timer!("customer.store.dynamodb.update");

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(customer_to_item(customer)))
            .send()
            .await
            .map_err(|e| store_error("put_item", e))?;

        Ok(customer.clone())
    }

    async fn replace_existing(&self, customer: &Customer) -> Result<bool> {
        let _timer = timer!("customer.store.dynamodb.replace");

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(customer_to_item(customer)))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", PARTITION_KEY)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            // The record is gone; nothing was written.
            Err(err) if is_exception(&err, "ConditionalCheckFailedException") => Ok(false),
            Err(err) => Err(store_error("put_item", err)),
        }
    }

    async fn delete_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        let _timer = timer!("customer.store.dynamodb.delete");

        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_for(customer_id)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| store_error("delete_item", e))?;

        result.attributes().map(customer_from_item).transpose()
    }

    fn scan_pages(&self) -> BoxStream<'static, Result<Vec<Customer>>> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let page_size = self.page_size;
        let consistent_read = self.consistent_read;

        stream::try_unfold(ScanCursor::Start, move |cursor| {
            let client = client.clone();
            let table_name = table_name.clone();
            async move {
                let exclusive_start_key = match cursor {
                    ScanCursor::Done => return Ok::<_, Error>(None),
                    ScanCursor::Start => None,
                    ScanCursor::After(key) => Some(key),
                };

                let result = client
                    .scan()
                    .table_name(table_name)
                    .set_limit(page_size)
                    .consistent_read(consistent_read)
                    .set_exclusive_start_key(exclusive_start_key)
                    .send()
                    .await
                    .map_err(|e| store_error("scan", e))?;

                let page = result
                    .items()
                    .unwrap_or_default()
                    .iter()
                    .map(customer_from_item)
                    .collect::<Result<Vec<_>>>()?;

                let next = match result.last_evaluated_key() {
                    Some(key) if !key.is_empty() => ScanCursor::After(key.clone()),
                    _ => ScanCursor::Done,
                };

                log::debug!("scanned page of {} customers", page.len());

                Ok(Some((page, next)))
            }
        })
        .boxed()
    }
}
