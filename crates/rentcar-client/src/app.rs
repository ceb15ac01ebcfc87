//! Application controller: the single owner of client state.
//!
//! `RentalApp` wires the API client to the session and collection stores and
//! turns every outcome into either a state change, a notice, or both. Errors
//! the HTTP layer already announced (connectivity, 5xx, expired session) are
//! not announced a second time here.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::mpsc;

use crate::api::auth::{LoginRequest, RegisterRequest};
use crate::api::bookings::{BookingQuery, CreateBookingRequest};
use crate::api::cars::CarQuery;
use crate::api::ApiClient;
use crate::auth::{
    normalize_auth_response, normalize_session_response, AuthFlow, AuthGrant, Session,
    SessionAction, SessionState, SessionStore,
};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{Booking, BookingStatus, Car, PageMeta, User};
use crate::notice::{Notice, NoticeBus};
use crate::services::dates::{self, midnight};
use crate::services::pricing::{quote_for_car, PriceBreakdown};
use crate::services::validation::ValidationError;
use crate::storage::{self, Language, LocalStorage};
use crate::store::{BookingStore, CarListing, Pagination};

pub struct RentalApp {
    config: Config,
    api: ApiClient,
    storage: Arc<dyn LocalStorage>,
    session: SessionStore,
    bookings: BookingStore,
    cars: CarListing,
    car_pages: Pagination,
    notices: NoticeBus,
}

impl RentalApp {
    /// Build the app and hand back the receiving end of its notice channel.
    pub fn new(
        config: Config,
        storage: Arc<dyn LocalStorage>,
    ) -> ClientResult<(Self, mpsc::UnboundedReceiver<Notice>)> {
        let (notices, rx) = NoticeBus::channel();
        let api = ApiClient::new(&config, storage.clone())?.with_notices(notices.clone());
        let session = SessionStore::load(storage.clone())?;
        let car_pages = Pagination::new(1, config.page_size);

        let app = Self {
            config,
            api,
            storage,
            session,
            bookings: BookingStore::new(),
            cars: CarListing::new(),
            car_pages,
            notices,
        };
        Ok((app, rx))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.session.session()
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.state().user()
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.bookings
    }

    pub fn cars(&self) -> &CarListing {
        &self.cars
    }

    pub fn car_pages(&self) -> &Pagination {
        &self.car_pages
    }

    /// Check a persisted token against the server. Does nothing when no
    /// stored token is waiting to be verified.
    pub async fn restore_session(&mut self) -> ClientResult<&SessionState> {
        if self.session.pending_restore().is_none() {
            return Ok(self.session.state());
        }

        let restored = match self.api.current_user().await {
            Ok(raw) => normalize_session_response(&raw),
            Err(e) => Err(e),
        };
        let action = match restored {
            Ok(user) => {
                tracing::info!("Restored session for {}", user.email);
                SessionAction::Restored(user)
            }
            Err(e) => {
                tracing::info!("Stored session could not be restored: {e}");
                SessionAction::RestoreFailed
            }
        };
        self.session.dispatch(action)
    }

    pub async fn login(&mut self, request: LoginRequest) -> ClientResult<User> {
        request.validate()?;
        self.begin_auth()?;

        let outcome = match self.api.login(&request).await {
            Ok(raw) => normalize_auth_response(&raw, AuthFlow::Login),
            Err(e) => Err(e),
        };
        self.finish_auth(outcome, "Login failed", "Login successful!")
    }

    pub async fn register(&mut self, request: RegisterRequest) -> ClientResult<User> {
        request.validate()?;
        self.begin_auth()?;

        let outcome = match self.api.register(&request).await {
            Ok(raw) => normalize_auth_response(&raw, AuthFlow::Register),
            Err(e) if e.mentions_existing_account() => Err(ClientError::UserAlreadyExists),
            Err(e) => Err(e),
        };
        self.finish_auth(outcome, "Registration failed", "Registration successful!")
    }

    /// Local sign-out: the token is dropped, the server is not consulted.
    pub fn logout(&mut self) -> ClientResult<()> {
        self.drop_session()?;
        self.notices.success("Logged out successfully");
        Ok(())
    }

    /// Price shown before booking. Dates are whole calendar days.
    pub fn quote(&self, car: &Car, start: NaiveDate, end: NaiveDate, with_driver: bool) -> PriceBreakdown {
        quote_for_car(car, midnight(start), midnight(end), with_driver)
    }

    pub async fn create_booking(
        &mut self,
        car: &Car,
        start: NaiveDate,
        end: NaiveDate,
        with_driver: bool,
        now: NaiveDateTime,
    ) -> ClientResult<Booking> {
        if !self.session.state().is_authenticated() {
            let err = ValidationError::LoginRequired;
            self.notices.error(err.to_string());
            return Err(err.into());
        }
        dates::validate_range(midnight(start), midnight(end), now)?;

        let (request, quote) = CreateBookingRequest::for_car(car, start, end, with_driver);
        tracing::info!(
            "Booking {} for {} day(s), total {}",
            car.id,
            quote.days,
            quote.total
        );

        let result = self.api.create_booking(&request).await;
        let booking = self.settle(result, "Booking failed")?;
        self.bookings.add(booking.clone());
        self.notices.success("Booking created successfully!");
        Ok(booking)
    }

    pub async fn fetch_my_bookings(&mut self) -> ClientResult<&[Booking]> {
        let ticket = self.bookings.start_fetch();
        match self.api.my_bookings().await {
            Ok(list) => {
                self.bookings.fetch_succeeded(ticket, list);
                Ok(self.bookings.bookings())
            }
            Err(err) => {
                self.bookings.fetch_failed(ticket, err.to_string());
                tracing::error!("Fetch bookings error: {err}");
                self.settle(Err(err), "Failed to load bookings")
            }
        }
    }

    /// Load every booking (admin view). Returns the page metadata, if any.
    pub async fn fetch_all_bookings(&mut self, query: &BookingQuery) -> ClientResult<Option<PageMeta>> {
        let ticket = self.bookings.start_fetch();
        match self.api.all_bookings(query).await {
            Ok(page) => {
                self.bookings.fetch_succeeded(ticket, page.items);
                Ok(page.meta)
            }
            Err(err) => {
                self.bookings.fetch_failed(ticket, err.to_string());
                self.settle(Err(err), "Failed to load bookings")
            }
        }
    }

    pub async fn update_booking_status(
        &mut self,
        id: &str,
        status: BookingStatus,
    ) -> ClientResult<Booking> {
        let result = self.api.update_booking_status(id, status).await;
        let booking = self.settle(result, "Failed to update booking")?;
        self.bookings.replace(id, booking.clone());
        self.notices.success(format!("Booking {status}"));
        Ok(booking)
    }

    /// Search the catalog. A query without a page uses the current cursor;
    /// an explicit page moves the cursor. A failed search keeps the previous
    /// results.
    pub async fn search_cars(&mut self, query: CarQuery) -> ClientResult<&[Car]> {
        let query = match (query.page, query.limit) {
            (Some(page), limit) => {
                self.car_pages.go_to(page);
                if let Some(limit) = limit {
                    self.car_pages.set_limit(limit);
                }
                query
            }
            (None, _) => query.page(self.car_pages.page, self.car_pages.limit),
        };
        let ticket = self.cars.start_fetch();
        match self.api.list_cars(&query).await {
            Ok(page) => {
                self.car_pages.sync(page.meta.as_ref());
                self.cars.fetch_succeeded(ticket, page);
                Ok(self.cars.cars())
            }
            Err(err) => {
                self.cars.fetch_failed(ticket, err.to_string());
                self.settle(Err(err), "Failed to load cars")
            }
        }
    }

    pub fn language(&self) -> ClientResult<Language> {
        storage::load_language(self.storage.as_ref(), self.config.default_language)
    }

    pub fn set_language(&self, language: Language) -> ClientResult<()> {
        storage::save_language(self.storage.as_ref(), language)
    }

    /// Start a login or registration. Any existing session is dropped first.
    fn begin_auth(&mut self) -> ClientResult<()> {
        if !matches!(
            self.session.state(),
            SessionState::Anonymous | SessionState::AuthFailed { .. }
        ) {
            self.session.dispatch(SessionAction::Logout)?;
        }
        self.session.dispatch(SessionAction::Submit)?;
        Ok(())
    }

    fn finish_auth(
        &mut self,
        outcome: ClientResult<AuthGrant>,
        fallback: &str,
        welcome: &str,
    ) -> ClientResult<User> {
        match outcome {
            Ok(grant) => {
                let user = grant.user.clone();
                self.session.dispatch(SessionAction::Succeeded(grant))?;
                self.notices.success(welcome);
                Ok(user)
            }
            Err(err) => {
                let reason = err.notice(fallback);
                self.session.dispatch(SessionAction::Failed(reason.clone()))?;
                if !err.is_globally_reported() {
                    self.notices.error(reason);
                }
                Err(err)
            }
        }
    }

    /// Sign-out shared by `logout` and expired sessions. The previous
    /// user's bookings go with the session.
    fn drop_session(&mut self) -> ClientResult<()> {
        self.session.dispatch(SessionAction::Logout)?;
        self.bookings = BookingStore::new();
        Ok(())
    }

    /// Apply the app-wide consequences of a failed call. Validation errors are
    /// left to the caller to show inline.
    fn settle<T>(&mut self, result: ClientResult<T>, fallback: &str) -> ClientResult<T> {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if matches!(err, ClientError::AuthExpired) {
            self.drop_session()?;
        }
        if !err.is_globally_reported() && !matches!(err, ClientError::Validation(_)) {
            self.notices.error(err.notice(fallback));
        }
        Err(err)
    }
}
