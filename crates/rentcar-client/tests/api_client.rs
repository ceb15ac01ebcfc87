//! HTTP behaviour of `ApiClient` against a mock rental API: bearer
//! injection, response classification and envelope decoding.

use std::sync::Arc;

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;

use rentcar_client::api::bookings::CreateBookingRequest;
use rentcar_client::api::cars::CarQuery;
use rentcar_client::models::{BookingStatus, Car};
use rentcar_client::storage::{self, LocalStorage, MemoryStorage};
use rentcar_client::{ApiClient, ClientError, Config, Notice, NoticeBus, NoticeLevel};
use tokio::sync::mpsc::UnboundedReceiver;

fn client(server: &MockServer, storage: Arc<MemoryStorage>) -> (ApiClient, UnboundedReceiver<Notice>) {
    let (bus, rx) = NoticeBus::channel();
    let api = ApiClient::new(&Config::for_api(server.url("/api/v1")), storage)
        .unwrap()
        .with_notices(bus);
    (api, rx)
}

fn user_json() -> serde_json::Value {
    json!({ "_id": "u1", "name": "Abebe", "email": "abebe@example.com", "role": "user" })
}

#[tokio::test]
async fn stored_token_is_sent_as_bearer() {
    let server = MockServer::start();
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/auth/me")
            .header("authorization", "Bearer tok-1");
        then.status(200).json_body(json!({ "data": { "user": user_json() } }));
    });

    let storage = Arc::new(MemoryStorage::new());
    storage.set(storage::TOKEN_KEY, "tok-1").unwrap();
    let (api, _rx) = client(&server, storage);

    let raw = api.current_user().await.unwrap();
    assert_eq!(raw["data"]["user"]["email"], "abebe@example.com");
    me.assert_calls(1);
}

#[tokio::test]
async fn unauthorized_with_token_expires_session() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/bookings/my");
        then.status(401).json_body(json!({ "message": "jwt expired" }));
    });

    let storage = Arc::new(MemoryStorage::new());
    storage.set(storage::TOKEN_KEY, "old").unwrap();
    let (api, mut rx) = client(&server, storage.clone());

    let err = api.my_bookings().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthExpired));
    assert_eq!(storage::load_token(storage.as_ref()).unwrap(), None);

    let notice = rx.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Session expired. Please login again.");
}

#[tokio::test]
async fn unauthorized_without_token_is_a_domain_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/auth/login");
        then.status(401)
            .json_body(json!({ "success": false, "message": "Invalid credentials" }));
    });

    let (api, mut rx) = client(&server, Arc::new(MemoryStorage::new()));
    let err = api
        .login(&rentcar_client::api::auth::LoginRequest {
            email: "abebe@example.com".into(),
            password: "wrong-pass".into(),
        })
        .await
        .unwrap_err();

    match &err {
        ClientError::Domain { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message.as_deref(), Some("Invalid credentials"));
        }
        other => panic!("expected domain error, got {other:?}"),
    }
    assert_eq!(err.notice("Login failed"), "Invalid credentials");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn not_found_is_not_announced() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/cars/missing");
        then.status(404);
    });

    let (api, mut rx) = client(&server, Arc::new(MemoryStorage::new()));
    let err = api.get_car("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { ref path } if path == "/cars/missing"));
    assert_eq!(err.kind(), "DOMAIN_ERROR");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn server_errors_are_announced_once() {
    let server = MockServer::start();
    let cars = server.mock(|when, then| {
        when.method(GET).path("/api/v1/cars");
        then.status(503).body("upstream down");
    });

    let (api, mut rx) = client(&server, Arc::new(MemoryStorage::new()));
    let err = api.list_cars(&CarQuery::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 503 }));

    assert_eq!(
        rx.try_recv().unwrap().message,
        "Server error. Please try again later."
    );
    assert!(rx.try_recv().is_err());
    cars.assert_calls(1);
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let (bus, mut rx) = NoticeBus::channel();
    let api = ApiClient::new(
        &Config::for_api("http://127.0.0.1:1/api/v1"),
        Arc::new(MemoryStorage::new()),
    )
    .unwrap()
    .with_notices(bus);

    let err = api.get_car("c1").await.unwrap_err();
    assert_eq!(err.kind(), "TRANSPORT_ERROR");
    assert_eq!(
        rx.try_recv().unwrap().message,
        "Network error. Please check your connection."
    );
}

#[tokio::test]
async fn car_search_sends_filters_and_reads_pagination() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/cars")
            .query_param("brand", "Toyota")
            .query_param("page", "2")
            .query_param("limit", "9");
        then.status(200).json_body(json!({
            "success": true,
            "data": [
                { "_id": "c1", "name": "Corolla", "brand": "Toyota", "pricePerDay": 40 },
                { "_id": "c2", "name": "Hilux", "brand": "Toyota", "pricePerDay": 65, "withDriver": true, "driverPricePerDay": 20 }
            ],
            "meta": { "pagination": { "page": 2, "limit": 9, "total": 11 } }
        }));
    });

    let (api, _rx) = client(&server, Arc::new(MemoryStorage::new()));
    let query = CarQuery {
        brand: Some("Toyota".into()),
        search: Some("   ".into()),
        ..Default::default()
    }
    .page(2, 9);

    let page = api.list_cars(&query).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.items[1].with_driver);
    assert_eq!(page.meta.map(|m| m.total), Some(11));
    search.assert_calls(1);
}

#[tokio::test]
async fn booking_submission_body_and_response() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path("/api/v1/bookings").json_body(json!({
            "carId": "c1",
            "startDate": "2026-11-01",
            "endDate": "2026-11-04",
            "withDriver": false,
            "days": 3,
            "totalPrice": 120.0
        }));
        then.status(201).json_body(json!({
            "success": true,
            "data": {
                "_id": "b9",
                "carId": "c1",
                "userId": "u1",
                "startDate": "2026-11-01T00:00:00.000Z",
                "endDate": "2026-11-04T00:00:00.000Z",
                "days": 3,
                "withDriver": false,
                "totalPrice": 120,
                "status": "pending",
                "createdAt": "2026-10-16T09:30:00.000Z"
            }
        }));
    });

    let (api, _rx) = client(&server, Arc::new(MemoryStorage::new()));
    let car: Car =
        serde_json::from_value(json!({ "_id": "c1", "name": "Corolla", "pricePerDay": 40 })).unwrap();
    let (request, _) = CreateBookingRequest::for_car(
        &car,
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 11, 4).unwrap(),
        true,
    );

    let booking = api.create_booking(&request).await.unwrap();
    assert_eq!(booking.id, "b9");
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.car_id.id(), "c1");
    create.assert_calls(1);
}
