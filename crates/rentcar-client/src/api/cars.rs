use serde::Serialize;
use serde_json::json;

use crate::api::{decode_data, decode_page, ApiClient};
use crate::error::ClientResult;
use crate::models::{Car, Page};
use crate::services::validation::{self, ValidationError};

/// Catalog filters. Unset and blank filters are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_driver: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl CarQuery {
    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page.max(1));
        self.limit = Some(limit.max(1));
        self
    }

    /// Drop blank text filters so they are not sent as empty parameters.
    pub fn normalized(mut self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        self.brand = keep(self.brand);
        self.fuel_type = keep(self.fuel_type);
        self.search = keep(self.search);
        self
    }
}

/// Body for creating or updating a car.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarInput {
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub fuel_type: String,
    pub seats: u32,
    pub price_per_day: f64,
    pub with_driver: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_price_per_day: Option<f64>,
    pub images: Vec<String>,
    pub location: String,
    pub availability: bool,
}

impl CarInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("name", &self.name)?;
        validation::require("brand", &self.brand)?;
        if self.price_per_day.is_nan() || self.price_per_day < 0.0 {
            return Err(ValidationError::InvalidPrice);
        }
        if self.with_driver && self.driver_price_per_day.is_none() {
            return Err(ValidationError::Required {
                field: "driverPricePerDay",
            });
        }
        Ok(())
    }

    /// Driver rate is only sent for cars that offer a driver.
    fn wire(&self) -> Self {
        let mut input = self.clone();
        if !input.with_driver {
            input.driver_price_per_day = None;
        }
        input
    }
}

impl ApiClient {
    pub async fn list_cars(&self, query: &CarQuery) -> ClientResult<Page<Car>> {
        let query = query.clone().normalized();
        let body = self.get_with("/cars", &query).await?;
        decode_page(body)
    }

    pub async fn get_car(&self, id: &str) -> ClientResult<Car> {
        let body = self.get(&format!("/cars/{id}")).await?;
        decode_data(body)
    }

    pub async fn create_car(&self, input: &CarInput) -> ClientResult<Car> {
        input.validate()?;
        let body = self.post("/cars", &input.wire()).await?;
        decode_data(body)
    }

    pub async fn update_car(&self, id: &str, input: &CarInput) -> ClientResult<Car> {
        input.validate()?;
        let body = self.put(&format!("/cars/{id}"), &input.wire()).await?;
        decode_data(body)
    }

    pub async fn delete_car(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/cars/{id}")).await?;
        Ok(())
    }

    pub async fn update_car_status(&self, id: &str, status: &str) -> ClientResult<Car> {
        let body = self
            .patch(&format!("/cars/{id}/status"), &json!({ "status": status }))
            .await?;
        decode_data(body)
    }
}
