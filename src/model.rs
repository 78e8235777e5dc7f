//! Customer records and the outcome type returned by mutating operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address embedded in a customer record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    /// Creates an address with the given street and city
    pub fn new(street: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            street: Some(street.into()),
            city: Some(city.into()),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A customer record keyed by `customer_id`
///
/// `Customer::default()` has every field unset and is the value the masked
/// service API returns in place of a failed read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Caller-assigned unique identifier
    #[serde(default)]
    pub customer_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// Epoch seconds, stamped by the service on write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time_stamp: Option<i64>,

    /// Epoch seconds of the most recent write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time_stamp: Option<i64>,
}

impl Customer {
    /// Creates a customer with only the ID set
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Returns true if this is the empty placeholder record
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of a mutating operation on the masked service API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationResult {
    Success,
    Fail,
}

impl OperationResult {
    pub fn is_success(self) -> bool {
        self == OperationResult::Success
    }
}

impl<T, E> From<Result<T, E>> for OperationResult {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => OperationResult::Success,
            Err(_) => OperationResult::Fail,
        }
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationResult::Success => f.write_str("SUCCESS"),
            OperationResult::Fail => f.write_str("FAIL"),
        }
    }
}
