pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod notice;
pub mod services;
pub mod storage;
pub mod store;

pub use api::ApiClient;
pub use app::RentalApp;
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use notice::{Notice, NoticeBus, NoticeLevel};
