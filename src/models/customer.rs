//! Customer models. Customers are read-only from the dashboard apart
//! from the generic status toggle.

use serde::{Deserialize, Serialize};

use super::common::Pagination;

/// `GET /customers` response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomersPayload {
    #[serde(default)]
    pub customers: Vec<ApiCustomer>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCustomer {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_count: Option<u64>,
    #[serde(default)]
    pub total_spent: Option<f64>,
}

/// Row projection for the customers table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub status: String,
    pub order_count: u64,
    pub total_spent: f64,
}

impl ApiCustomer {
    pub fn to_customer(&self) -> Customer {
        Customer {
            id: self.id,
            full_name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            avatar: self.profile_image.clone().unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_else(|| "active".to_string()),
            order_count: self.order_count.unwrap_or_default(),
            total_spent: self.total_spent.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_projection_defaults() {
        let api = ApiCustomer {
            id: 9,
            name: Some("Omar Said".to_string()),
            email: None,
            phone: None,
            profile_image: None,
            status: Some("Inactive".to_string()),
            order_count: None,
            total_spent: None,
        };
        let customer = api.to_customer();
        assert_eq!(customer.full_name, "Omar Said");
        assert_eq!(customer.status, "inactive");
        assert_eq!(customer.order_count, 0);
    }
}
