use crate::config::{StoreConfig, DEFAULT_REGION};
use crate::error::{Error, Result};
use crate::plugins::aws_v2::dynamodb::DynamoDbCustomerRepository;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::Client as AwsDynamoDbClient;

/// Provider name reported for the static credentials
const CREDENTIALS_PROVIDER_NAME: &str = "customerstore-static";

/// Shared handle to a configured DynamoDB client
///
/// Cloning is cheap: every clone talks through the same underlying SDK
/// client and connection pool. Build one at startup and pass it around.
#[derive(Debug, Clone)]
pub struct StoreClient {
    /// AWS SDK DynamoDB client
    client: AwsDynamoDbClient,

    region: String,

    endpoint: Option<String>,
}

impl StoreClient {
    /// Wraps an already configured SDK client
    pub fn new(client: AwsDynamoDbClient, region: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            client,
            region: region.into(),
            endpoint,
        }
    }

    /// Item-level access to the store
    pub fn client(&self) -> &AwsDynamoDbClient {
        &self.client
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Endpoint override, if the client is not using the regional endpoint
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Object-mapped customer access to the given table
    pub fn customer_repository(&self, table_name: impl Into<String>) -> DynamoDbCustomerRepository {
        DynamoDbCustomerRepository::new(self.client.clone(), table_name)
    }

    /// Performs a lightweight request to check the store is reachable
    pub async fn health_check(&self) -> bool {
        match self.client.list_tables().limit(1).send().await {
            Ok(_) => true,
            Err(e) => {
                log::debug!("DynamoDB health check failed: {}", e);
                false
            }
        }
    }
}

/// Builder for the DynamoDB store client
///
/// # Examples
///
/// ```rust,no_run
/// use customerstore::plugins::aws_v2::dynamodb::DynamoDbClientBuilder;
///
/// # async fn example() -> customerstore::Result<()> {
/// let client = DynamoDbClientBuilder::new("us-east-1")
///     .with_endpoint("http://localhost:8000")
///     .with_static_credentials("local", "local")
///     .build()
///     .await?;
/// assert_eq!(client.endpoint(), Some("http://localhost:8000"));
/// # Ok(())
/// # }
/// ```
pub struct DynamoDbClientBuilder {
    /// AWS config for the client
    config: Option<aws_config::SdkConfig>,

    region: String,

    endpoint: Option<String>,

    credentials: Option<Credentials>,
}

impl DynamoDbClientBuilder {
    /// Creates a new builder with the given region
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            config: None,
            region: region.into(),
            endpoint: None,
            credentials: None,
        }
    }

    /// Creates a builder from store settings
    ///
    /// An empty region falls back to the default region, and an empty
    /// endpoint to the default regional endpoint.
    pub fn from_store_config(config: &StoreConfig) -> Self {
        let region = if config.region.is_empty() {
            DEFAULT_REGION
        } else {
            &config.region
        };

        let mut builder = Self::new(region)
            .with_static_credentials(config.access_key.as_str(), config.secret_key.as_str());

        if let Some(endpoint) = config.endpoint_override() {
            builder = builder.with_endpoint(endpoint);
        }

        builder
    }

    /// Sends requests to `endpoint` instead of the regional endpoint
    ///
    /// An empty string clears the override.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint = if endpoint.trim().is_empty() {
            None
        } else {
            Some(endpoint.trim().to_string())
        };
        self
    }

    /// Signs requests with a fixed access key pair
    pub fn with_static_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
        self
    }

    /// Sets the SDK config for the client
    ///
    /// The config's own region and credentials are used; an endpoint set on
    /// this builder still takes precedence.
    pub fn with_config(mut self, config: aws_config::SdkConfig) -> Self {
        self.config = Some(config);
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "endpoint must be an http(s) URI: {}",
                    endpoint
                )));
            }
        }

        if self.config.is_some() {
            return Ok(());
        }

        if self.region.is_empty() {
            return Err(Error::Config("region must not be empty".into()));
        }

        match &self.credentials {
            Some(credentials)
                if !credentials.access_key_id().is_empty()
                    && !credentials.secret_access_key().is_empty() =>
            {
                Ok(())
            }
            _ => Err(Error::Config(
                "static access key and secret key are required".into(),
            )),
        }
    }

    /// Builds the store client
    pub async fn build(self) -> Result<StoreClient> {
        self.validate()?;

        let (client, region) = match self.config {
            Some(config) => {
                let mut conf = aws_sdk_dynamodb::config::Builder::from(&config);
                if let Some(endpoint) = &self.endpoint {
                    conf = conf.endpoint_url(endpoint);
                }
                let region = config
                    .region()
                    .map(|r| r.as_ref().to_string())
                    .unwrap_or(self.region);

                (AwsDynamoDbClient::from_conf(conf.build()), region)
            }
            None => {
                let mut loader = aws_config::from_env().region(Region::new(self.region.clone()));
                if let Some(credentials) = self.credentials {
                    loader = loader.credentials_provider(credentials);
                }
                if let Some(endpoint) = &self.endpoint {
                    loader = loader.endpoint_url(endpoint);
                }

                (AwsDynamoDbClient::new(&loader.load().await), self.region)
            }
        };

        log::debug!(
            "built DynamoDB client for region {} (endpoint: {})",
            region,
            self.endpoint.as_deref().unwrap_or("default")
        );

        Ok(StoreClient::new(client, region, self.endpoint))
    }
}
