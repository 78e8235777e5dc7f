use crate::error::{Error, Result};
use crate::model::{Address, Customer};
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

// DynamoDB attribute names
pub const PARTITION_KEY: &str = "customerId";
pub const ADDRESS: &str = "address";
const FIRST_NAME: &str = "firstName";
const LAST_NAME: &str = "lastName";
const EMAIL: &str = "email";
const PHONE: &str = "phone";
const CREATED: &str = "createdTimeStamp";
const LAST_MODIFIED: &str = "lastModifiedTimeStamp";

const STREET: &str = "street";
const CITY: &str = "city";
const STATE: &str = "state";
const ZIP_CODE: &str = "zipCode";
const COUNTRY: &str = "country";

pub(crate) type Item = HashMap<String, AttributeValue>;

fn put_string(item: &mut Item, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        item.insert(name.to_string(), AttributeValue::S(value.clone()));
    }
}

fn put_number(item: &mut Item, name: &str, value: Option<i64>) {
    if let Some(value) = value {
        item.insert(name.to_string(), AttributeValue::N(value.to_string()));
    }
}

fn get_string(item: &Item, name: &str) -> Result<Option<String>> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::Store(format!("Invalid {} attribute", name))),
    }
}

fn get_number(item: &Item, name: &str) -> Result<Option<i64>> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::N(n)) => n
            .parse::<i64>()
            .map(Some)
            .map_err(|e| Error::Store(format!("Invalid {} value: {}", name, e))),
        Some(_) => Err(Error::Store(format!("Invalid {} attribute", name))),
    }
}

/// Converts an address to a DynamoDB map attribute
pub(crate) fn address_to_attribute(address: &Address) -> AttributeValue {
    let mut map = HashMap::new();

    put_string(&mut map, STREET, &address.street);
    put_string(&mut map, CITY, &address.city);
    put_string(&mut map, STATE, &address.state);
    put_string(&mut map, ZIP_CODE, &address.zip_code);
    put_string(&mut map, COUNTRY, &address.country);

    AttributeValue::M(map)
}

/// Reads the address map attribute of an item
///
/// A missing or null attribute yields an empty address.
pub(crate) fn address_from_item(item: &Item) -> Result<Address> {
    let map = match item.get(ADDRESS) {
        None | Some(AttributeValue::Null(_)) => return Ok(Address::default()),
        Some(AttributeValue::M(m)) => m,
        Some(_) => return Err(Error::Store("Invalid address attribute".into())),
    };

    Ok(Address {
        street: get_string(map, STREET)?,
        city: get_string(map, CITY)?,
        state: get_string(map, STATE)?,
        zip_code: get_string(map, ZIP_CODE)?,
        country: get_string(map, COUNTRY)?,
    })
}

/// Builds the key attributes for a customer ID
pub(crate) fn key_for(customer_id: &str) -> Item {
    HashMap::from([(
        PARTITION_KEY.to_string(),
        AttributeValue::S(customer_id.to_string()),
    )])
}

/// Converts a customer to a DynamoDB item
///
/// Unset optional fields are left out of the item rather than written as nulls.
pub fn customer_to_item(customer: &Customer) -> HashMap<String, AttributeValue> {
    let mut item = key_for(&customer.customer_id);

    put_string(&mut item, FIRST_NAME, &customer.first_name);
    put_string(&mut item, LAST_NAME, &customer.last_name);
    put_string(&mut item, EMAIL, &customer.email);
    put_string(&mut item, PHONE, &customer.phone);
    put_number(&mut item, CREATED, customer.created_time_stamp);
    put_number(&mut item, LAST_MODIFIED, customer.last_modified_time_stamp);

    if let Some(address) = &customer.address {
        item.insert(ADDRESS.to_string(), address_to_attribute(address));
    }

    item
}

/// Converts a DynamoDB item to a customer
pub fn customer_from_item(item: &HashMap<String, AttributeValue>) -> Result<Customer> {
    let customer_id = get_string(item, PARTITION_KEY)?
        .ok_or_else(|| Error::Store("Missing customerId attribute".into()))?;

    // A missing or NULL address attribute reads as no address.
    let address = match item.get(ADDRESS) {
        None | Some(AttributeValue::Null(_)) => None,
        Some(_) => Some(address_from_item(item)?),
    };

    Ok(Customer {
        customer_id,
        first_name: get_string(item, FIRST_NAME)?,
        last_name: get_string(item, LAST_NAME)?,
        email: get_string(item, EMAIL)?,
        phone: get_string(item, PHONE)?,
        address,
        created_time_stamp: get_number(item, CREATED)?,
        last_modified_time_stamp: get_number(item, LAST_MODIFIED)?,
    })
}
