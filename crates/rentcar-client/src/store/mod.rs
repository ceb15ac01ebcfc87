//! Client-side state containers observed by the UI layer.

mod bookings;
mod cars;
mod pagination;
mod sequence;

pub use bookings::BookingStore;
pub use cars::CarListing;
pub use pagination::Pagination;
pub use sequence::{RequestSequencer, RequestTicket};
