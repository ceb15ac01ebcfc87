pub mod normalizer;
pub mod session;

pub use normalizer::{normalize_auth_response, normalize_session_response, AuthFlow, AuthGrant};
pub use session::{Session, SessionAction, SessionState, SessionStore, TokenEffect};
