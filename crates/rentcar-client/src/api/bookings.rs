use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::api::{decode_data, decode_page, ApiClient};
use crate::error::ClientResult;
use crate::models::{wire_date, Booking, BookingStatus, Car, Page};
use crate::services::dates::midnight;
use crate::services::pricing::{quote_for_car, PriceBreakdown};

/// Booking submission. `days` and `total_price` come from the price quote the
/// user saw; the server recomputes and validates them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub car_id: String,
    #[serde(with = "wire_date")]
    pub start_date: NaiveDate,
    #[serde(with = "wire_date")]
    pub end_date: NaiveDate,
    pub with_driver: bool,
    pub days: u32,
    pub total_price: f64,
}

impl CreateBookingRequest {
    /// Build a submission for `car`, priced with the same quote shown in the UI.
    pub fn for_car(car: &Car, start: NaiveDate, end: NaiveDate, with_driver: bool) -> (Self, PriceBreakdown) {
        let with_driver = with_driver && car.with_driver;
        let quote = quote_for_car(car, midnight(start), midnight(end), with_driver);
        let request = Self {
            car_id: car.id.clone(),
            start_date: start,
            end_date: end,
            with_driver,
            days: quote.days,
            total_price: quote.total,
        };
        (request, quote)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ApiClient {
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<Booking> {
        let body = self.post("/bookings", request).await?;
        decode_data(body)
    }

    pub async fn my_bookings(&self) -> ClientResult<Vec<Booking>> {
        let body = self.get("/bookings/my").await?;
        Ok(decode_page(body)?.items)
    }

    /// All bookings (admin).
    pub async fn all_bookings(&self, query: &BookingQuery) -> ClientResult<Page<Booking>> {
        let body = self.get_with("/bookings", query).await?;
        decode_page(body)
    }

    pub async fn update_booking_status(&self, id: &str, status: BookingStatus) -> ClientResult<Booking> {
        let body = self
            .put(&format!("/bookings/{id}/status"), &json!({ "status": status }))
            .await?;
        decode_data(body)
    }

    pub async fn get_booking(&self, id: &str) -> ClientResult<Booking> {
        let body = self.get(&format!("/bookings/{id}")).await?;
        decode_data(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(with_driver: bool) -> Car {
        serde_json::from_value(json!({
            "_id": "c1",
            "name": "Prado",
            "pricePerDay": 100,
            "withDriver": with_driver,
            "driverPricePerDay": 25
        }))
        .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    #[test]
    fn request_carries_quote() {
        let (req, quote) = CreateBookingRequest::for_car(&car(true), day(1), day(4), true);
        assert_eq!(quote.days, 3);
        assert_eq!(req.total_price, 375.0);
        assert!(req.with_driver);

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({
                "carId": "c1",
                "startDate": "2026-11-01",
                "endDate": "2026-11-04",
                "withDriver": true,
                "days": 3,
                "totalPrice": 375.0
            })
        );
    }

    #[test]
    fn driver_flag_dropped_when_car_has_none() {
        let (req, quote) = CreateBookingRequest::for_car(&car(false), day(1), day(2), true);
        assert!(!req.with_driver);
        assert_eq!(quote.driver_fee, 0.0);
        assert_eq!(req.total_price, 100.0);
    }
}
