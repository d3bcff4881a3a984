//! Database access layer for yoko-api
//!
//! Schema creation lives in `yoko_common::db`; these modules hold the
//! queries behind each endpoint group.

pub mod companies;
pub mod submissions;
pub mod topics;
