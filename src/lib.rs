//! Restro Dashboard - admin client for the restaurant POS REST API.
//!
//! The library holds everything below the command line: the API client and
//! its transport seam, the per-resource queries and mutations, the query
//! cache, report aggregation, paging and date-range selection, form
//! validation, and the terminal views. `main.rs` wires them to clap.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod period;
pub mod probe;
pub mod query;
pub mod report;
pub mod resources;
pub mod session;
pub mod storage;
pub mod validation;
pub mod views;

pub use api::{ApiClient, HttpTransport, Transport};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use query::Query;
pub use session::Session;
