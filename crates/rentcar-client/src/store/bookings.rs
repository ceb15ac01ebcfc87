use crate::models::Booking;
use crate::store::sequence::{RequestSequencer, RequestTicket};

/// Bookings of the current user (or all bookings, for admins), newest first.
///
/// `RentalApp` runs one fetch at a time; the request tickets guard callers
/// that drive the store directly with overlapping fetches.
#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: Vec<Booking>,
    current: Option<Booking>,
    is_loading: bool,
    error: Option<String>,
    sequencer: RequestSequencer,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current(&self) -> Option<&Booking> {
        self.current.as_ref()
    }

    /// Booking picked in the UI for detail display.
    pub fn set_current(&mut self, booking: Option<Booking>) {
        self.current = booking;
    }

    pub fn start_fetch(&mut self) -> RequestTicket {
        self.is_loading = true;
        self.error = None;
        self.sequencer.issue()
    }

    /// Commit a fetched list. Returns `false` when a newer fetch superseded it.
    pub fn fetch_succeeded(&mut self, ticket: RequestTicket, bookings: Vec<Booking>) -> bool {
        if !self.sequencer.is_current(ticket) {
            tracing::debug!("Discarding stale bookings response {ticket:?}");
            return false;
        }
        self.bookings = bookings;
        self.is_loading = false;
        true
    }

    /// Record a failed fetch; the list is cleared.
    pub fn fetch_failed(&mut self, ticket: RequestTicket, reason: String) -> bool {
        if !self.sequencer.is_current(ticket) {
            tracing::debug!("Discarding stale bookings failure {ticket:?}");
            return false;
        }
        self.bookings.clear();
        self.is_loading = false;
        self.error = Some(reason);
        true
    }

    pub fn add(&mut self, booking: Booking) {
        self.bookings.insert(0, booking);
    }

    /// Replace the booking with `id` in the list and in the selection.
    /// Ids held by neither are ignored.
    pub fn replace(&mut self, id: &str, booking: Booking) {
        if self.current.as_ref().is_some_and(|b| b.id == id) {
            self.current = Some(booking.clone());
        }
        if let Some(slot) = self.bookings.iter_mut().find(|b| b.id == id) {
            *slot = booking;
        }
    }
}
