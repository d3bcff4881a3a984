//! # Yoko Common Library
//!
//! Shared code for the Yoko applicant tracker:
//! - Database initialization, migrations and topic seeding
//! - Domain models (submissions, documents, topics, companies)
//! - Configuration loading and root folder resolution
//! - Reference data used by the submission wizard

pub mod config;
pub mod db;
pub mod error;
pub mod reference;

pub use error::{Error, Result};
