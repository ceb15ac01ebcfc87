//! Canonical extraction of `{ user, token }` from authentication responses.
//!
//! The backend wraps the same logical payload differently depending on the
//! endpoint: `{ data: { user, token } }`, `{ data: { ...user, token } }`,
//! `{ user, token }`, or the bare user record. Each known shape is one
//! [`ExtractionStrategy`]; strategies are tried in order and the first one that
//! yields a user (and, independently, the first one that yields a token) wins.

use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::models::User;

/// Which call produced the payload. Registration gets a friendlier error when
/// the account already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Register,
}

/// Canonical result of a successful login or registration.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub user: User,
    pub token: String,
}

/// What a single strategy found in a payload.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub user: Option<&'a Value>,
    pub token: Option<&'a str>,
}

pub trait ExtractionStrategy: Sync {
    fn name(&self) -> &'static str;
    fn extract<'a>(&self, raw: &'a Value) -> Candidate<'a>;
}

/// `{ data: { user, token } }`. With `require_token` unset it also matches
/// `{ data: { user } }`, which is what session restoration needs.
pub struct NestedData {
    pub require_token: bool,
}

/// `{ data: { id, email, ..., token? } }`: the data object is the user itself.
pub struct DataAsUser;

/// `{ user, token? }` at the top level.
pub struct TopLevelUser;

/// The payload is the user record.
pub struct BareUser;

impl ExtractionStrategy for NestedData {
    fn name(&self) -> &'static str {
        "data.user"
    }

    fn extract<'a>(&self, raw: &'a Value) -> Candidate<'a> {
        let Some(data) = raw.get("data") else {
            return Candidate::default();
        };
        let user = data.get("user").filter(|u| u.is_object());
        let token = token_at(data);
        match (user, token) {
            (Some(user), Some(token)) => Candidate {
                user: Some(user),
                token: Some(token),
            },
            (Some(user), None) if !self.require_token => Candidate {
                user: Some(user),
                token: None,
            },
            _ => Candidate::default(),
        }
    }
}

impl ExtractionStrategy for DataAsUser {
    fn name(&self) -> &'static str {
        "data"
    }

    fn extract<'a>(&self, raw: &'a Value) -> Candidate<'a> {
        let Some(data) = raw.get("data").filter(|d| d.is_object()) else {
            return Candidate::default();
        };
        let token = token_at(data);
        if looks_like_user(data) || token.is_some() {
            Candidate {
                user: Some(data),
                token,
            }
        } else {
            Candidate::default()
        }
    }
}

impl ExtractionStrategy for TopLevelUser {
    fn name(&self) -> &'static str {
        "user"
    }

    fn extract<'a>(&self, raw: &'a Value) -> Candidate<'a> {
        match raw.get("user").filter(|u| u.is_object()) {
            Some(user) => Candidate {
                user: Some(user),
                token: token_at(raw),
            },
            None => Candidate::default(),
        }
    }
}

impl ExtractionStrategy for BareUser {
    fn name(&self) -> &'static str {
        "root"
    }

    fn extract<'a>(&self, raw: &'a Value) -> Candidate<'a> {
        if looks_like_user(raw) {
            Candidate {
                user: Some(raw),
                token: None,
            }
        } else {
            Candidate::default()
        }
    }
}

/// Order used for login and registration responses.
pub const AUTH_CHAIN: &[&dyn ExtractionStrategy] = &[
    &NestedData {
        require_token: true,
    },
    &DataAsUser,
    &TopLevelUser,
    &BareUser,
];

/// Order used when restoring a session from `/auth/me`. The token is already
/// held, so only the user is resolved, and a bare record is not accepted.
pub const SESSION_CHAIN: &[&dyn ExtractionStrategy] = &[
    &NestedData {
        require_token: false,
    },
    &DataAsUser,
    &TopLevelUser,
];

/// Run a chain. User and token are resolved independently, first match wins;
/// unresolved tokens fall back to `raw.token`, then `raw.data.token`.
pub fn resolve<'a>(
    chain: &[&dyn ExtractionStrategy],
    raw: &'a Value,
) -> Candidate<'a> {
    let mut resolved = Candidate::default();
    for strategy in chain {
        let found = strategy.extract(raw);
        if resolved.user.is_none() && found.user.is_some() {
            tracing::trace!("User resolved by '{}' strategy", strategy.name());
            resolved.user = found.user;
        }
        if resolved.token.is_none() && found.token.is_some() {
            tracing::trace!("Token resolved by '{}' strategy", strategy.name());
            resolved.token = found.token;
        }
    }

    if resolved.token.is_none() {
        resolved.token = token_at(raw).or_else(|| raw.get("data").and_then(token_at));
    }
    resolved
}

/// Extract the canonical user and token from a login or registration payload.
///
/// Fails with [`ClientError::MalformedResponse`] when either is missing, or with
/// [`ClientError::UserAlreadyExists`] for a registration whose message says so.
pub fn normalize_auth_response(raw: &Value, flow: AuthFlow) -> ClientResult<AuthGrant> {
    let resolved = resolve(AUTH_CHAIN, raw);
    let grant = match (resolved.user, resolved.token) {
        (Some(user), Some(token)) => decode_user(user).map(|user| AuthGrant {
            user,
            token: token.to_string(),
        }),
        _ => None,
    };

    grant.ok_or_else(|| {
        if flow == AuthFlow::Register && payload_says_already_exists(raw) {
            return ClientError::UserAlreadyExists;
        }
        tracing::debug!("Missing user or token in auth response: {raw}");
        ClientError::MalformedResponse
    })
}

/// Extract the user from a session-restore payload.
pub fn normalize_session_response(raw: &Value) -> ClientResult<User> {
    if raw.get("data").is_none() && raw.get("user").is_none() {
        tracing::debug!("Session response has neither data nor user: {raw}");
        return Err(ClientError::MalformedResponse);
    }

    resolve(SESSION_CHAIN, raw)
        .user
        .and_then(decode_user)
        .ok_or_else(|| {
            tracing::debug!("No usable user in session response: {raw}");
            ClientError::MalformedResponse
        })
}

pub(crate) fn says_already_exists(message: &str) -> bool {
    message.to_ascii_lowercase().contains("already exists")
}

fn payload_says_already_exists(raw: &Value) -> bool {
    ["message", "error"]
        .iter()
        .filter_map(|key| raw.get(key).and_then(Value::as_str))
        .any(says_already_exists)
}

fn token_at(value: &Value) -> Option<&str> {
    value
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

fn looks_like_user(value: &Value) -> bool {
    let has_id = value.get("id").is_some() || value.get("_id").is_some();
    has_id && value.get("email").is_some()
}

fn decode_user(value: &Value) -> Option<User> {
    match serde_json::from_value::<User>(value.clone()) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!("User record did not decode: {e}");
            None
        }
    }
}
