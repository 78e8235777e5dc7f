use crate::config::{StoreConfig, DEFAULT_REGION};
use crate::error::Error;
use crate::plugins::aws_v2::dynamodb::DynamoDbClientBuilder;

#[tokio::test]
async fn test_build_with_endpoint_override() {
    let client = DynamoDbClientBuilder::new("eu-west-1")
        .with_endpoint("http://localhost:8000")
        .with_static_credentials("local", "local")
        .build()
        .await
        .unwrap();

    assert_eq!(client.region(), "eu-west-1");
    assert_eq!(client.endpoint(), Some("http://localhost:8000"));

    let repository = client.customer_repository("customers");
    assert_eq!(repository.table_name(), "customers");
}

#[tokio::test]
async fn test_empty_endpoint_uses_default() {
    let client = DynamoDbClientBuilder::new(DEFAULT_REGION)
        .with_endpoint("   ")
        .with_static_credentials("AKID", "SECRET")
        .build()
        .await
        .unwrap();

    assert_eq!(client.endpoint(), None);
}

#[tokio::test]
async fn test_from_store_config() {
    let config = StoreConfig::new("http://127.0.0.1:4566", "AKID", "SECRET").with_region("");

    let client = DynamoDbClientBuilder::from_store_config(&config)
        .build()
        .await
        .unwrap();

    assert_eq!(client.region(), DEFAULT_REGION);
    assert_eq!(client.endpoint(), Some("http://127.0.0.1:4566"));
}

#[tokio::test]
async fn test_missing_credentials_fail() {
    let result = DynamoDbClientBuilder::new(DEFAULT_REGION).build().await;
    assert!(matches!(result, Err(Error::Config(_))));

    let result = DynamoDbClientBuilder::new(DEFAULT_REGION)
        .with_static_credentials("AKID", "")
        .build()
        .await;
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_invalid_endpoint_fails() {
    let result = DynamoDbClientBuilder::new(DEFAULT_REGION)
        .with_endpoint("localhost:8000")
        .with_static_credentials("AKID", "SECRET")
        .build()
        .await;

    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("localhost:8000")));
}
