use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::CustomerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, address: Option<String>, phone_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address,
            phone_number: phone_number.into(),
        }
    }

    /// "name, address" as shown in listings
    pub fn display_name(&self) -> String {
        match &self.address {
            Some(address) => format!("{}, {}", self.name, address),
            None => self.name.clone(),
        }
    }
}
