use crate::models::{Car, Page, PageMeta};
use crate::store::sequence::{RequestSequencer, RequestTicket};

/// Results of the current catalog search. Request tickets drop results of
/// superseded fetches when callers overlap them.
#[derive(Debug, Default)]
pub struct CarListing {
    cars: Vec<Car>,
    meta: Option<PageMeta>,
    is_loading: bool,
    error: Option<String>,
    sequencer: RequestSequencer,
}

impl CarListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn start_fetch(&mut self) -> RequestTicket {
        self.is_loading = true;
        self.error = None;
        self.sequencer.issue()
    }

    pub fn fetch_succeeded(&mut self, ticket: RequestTicket, page: Page<Car>) -> bool {
        if !self.sequencer.is_current(ticket) {
            tracing::debug!("Discarding stale car listing {ticket:?}");
            return false;
        }
        self.cars = page.items;
        self.meta = page.meta;
        self.is_loading = false;
        true
    }

    /// Keeps the previous results on screen and records the error.
    pub fn fetch_failed(&mut self, ticket: RequestTicket, reason: String) -> bool {
        if !self.sequencer.is_current(ticket) {
            return false;
        }
        self.is_loading = false;
        self.error = Some(reason);
        true
    }
}
