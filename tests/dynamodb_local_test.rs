//! End-to-end tests against DynamoDB Local.
//!
//! These need Docker and are ignored by default:
//! `cargo test --test dynamodb_local_test -- --ignored`
#![cfg(feature = "aws-dynamodb")]

mod common;

use common::customer;
use customerstore::config::StoreConfig;
use customerstore::model::{Address, OperationResult};
use customerstore::plugins::aws_v2::dynamodb::{DynamoDbClientBuilder, DynamoDbCustomerRepository};
use customerstore::{CustomerRepository, CustomerService, Pacing};
use futures::StreamExt;
use std::sync::Arc;
use testcontainers::core::WaitFor;
use testcontainers::{clients, images::generic::GenericImage};

const DYNAMODB_PORT: u16 = 8000;

async fn repository_for(port: u16, table: &str) -> DynamoDbCustomerRepository {
    let config = StoreConfig::new(format!("http://127.0.0.1:{}", port), "local", "local")
        .with_table_name(table);

    let client = DynamoDbClientBuilder::from_store_config(&config)
        .build()
        .await
        .expect("Failed to build DynamoDB client");
    assert!(client.health_check().await);

    let repository = client.customer_repository(&config.table_name).with_page_size(2);
    assert!(repository
        .create_table_if_not_exists()
        .await
        .expect("Failed to create table"));
    assert!(!repository.create_table_if_not_exists().await.unwrap());

    repository
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_customer_lifecycle_against_dynamodb_local() {
    let _ = env_logger::builder().is_test(true).try_init();

    let docker = clients::Cli::default();
    let image = GenericImage::new("amazon/dynamodb-local", "latest")
        .with_exposed_port(DYNAMODB_PORT)
        .with_wait_for(WaitFor::message_on_stdout("Initializing DynamoDB Local"));
    let node = docker.run(image);
    let port = node.get_host_port_ipv4(DYNAMODB_PORT);

    let repository = Arc::new(repository_for(port, "customer_test").await);
    let service = CustomerService::new(repository.clone());

    // create / read
    assert_eq!(
        service.create_new_customer(customer("c1")).await,
        OperationResult::Success
    );
    let stored = service.get_customer_by_customer_id("c1").await;
    assert_eq!(stored.address, customer("c1").address);
    assert!(stored.created_time_stamp.is_some());
    assert_eq!(
        service.query_address_by_customer_id("c1").await,
        customer("c1").address.unwrap()
    );

    // update
    let moved = customer("c1").with_address(Address::new("9 Elm St", "Ogdenville"));
    assert_eq!(
        service.update_existing_customer(moved.clone()).await,
        OperationResult::Success
    );
    assert_eq!(
        service.get_customer_by_customer_id("c1").await.address,
        moved.address
    );
    assert_eq!(
        service.update_existing_customer(customer("ghost")).await,
        OperationResult::Fail
    );
    assert!(!repository.replace_existing(&customer("ghost")).await.unwrap());

    // upsert
    assert_eq!(
        service.update_existing_or_create_customer(customer("c2")).await,
        OperationResult::Success
    );

    // list across pages
    for i in 3..6 {
        service.create_new_customer(customer(&format!("c{}", i))).await;
    }
    let listed: Vec<_> = service.list_customers(Pacing::Unpaced).collect().await;
    assert_eq!(listed.len(), 5);
    assert!(listed.iter().all(|c| !c.is_empty()));

    // delete
    assert_eq!(
        service.delete_customer_by_customer_id("c1").await,
        OperationResult::Success
    );
    assert!(service.get_customer_by_customer_id("c1").await.is_empty());
    assert_eq!(
        service.delete_customer_by_customer_id("c1").await,
        OperationResult::Fail
    );
}
