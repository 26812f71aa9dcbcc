//! Record keeping for a remodeling business: projects with their tasks,
//! expenses and income, stored in SQLite, plus per-project dashboard
//! metrics.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod receipts;
pub mod reporting;
pub mod validation;

pub use db::Database;
pub use error::{Error, Result, ValidationError};
pub use reporting::{compute_dashboard, Dashboard};
