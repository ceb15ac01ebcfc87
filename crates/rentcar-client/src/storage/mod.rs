//! Durable client-side state: the bearer token and the UI language, each under
//! a fixed key. Nothing else is persisted.

mod memory;
mod migrations;
mod sqlite;

use std::fmt;
use std::str::FromStr;

use crate::error::ClientResult;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub const TOKEN_KEY: &str = "token";
pub const LANGUAGE_KEY: &str = "language";

/// String key/value storage that survives restarts.
pub trait LocalStorage: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

pub fn load_token(storage: &dyn LocalStorage) -> ClientResult<Option<String>> {
    Ok(storage.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
}

pub fn save_token(storage: &dyn LocalStorage, token: &str) -> ClientResult<()> {
    storage.set(TOKEN_KEY, token)
}

pub fn clear_token(storage: &dyn LocalStorage) -> ClientResult<()> {
    storage.remove(TOKEN_KEY)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Amharic,
    Oromo,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Amharic, Language::Oromo];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Amharic => "am",
            Language::Oromo => "om",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Amharic => "Amharic",
            Language::Oromo => "Afaan Oromoo",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language: {s}"))
    }
}

/// Persisted language, or `fallback` when nothing usable is stored.
pub fn load_language(storage: &dyn LocalStorage, fallback: Language) -> ClientResult<Language> {
    let stored = storage.get(LANGUAGE_KEY)?;
    Ok(match stored {
        Some(code) => code.parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored language: {e}");
            fallback
        }),
        None => fallback,
    })
}

pub fn save_language(storage: &dyn LocalStorage, language: Language) -> ClientResult<()> {
    storage.set(LANGUAGE_KEY, language.code())
}
