//! HTTP API handlers for yoko-api

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod companies;
pub mod confirmation;
pub mod health;
pub mod reference;
pub mod stats;
pub mod submissions;
pub mod topics;

pub use companies::company_routes;
pub use confirmation::confirmation_routes;
pub use health::health_routes;
pub use reference::reference_routes;
pub use stats::stats_routes;
pub use submissions::submission_routes;
pub use topics::topic_routes;

/// Body of the archive endpoints.
///
/// `archive` is read with JavaScript truthiness (`1`, `"yes"` and `true` all
/// archive). A missing flag unarchives.
#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    #[serde(default, deserialize_with = "truthy")]
    pub archive: bool,
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_flag(body: &str) -> bool {
        serde_json::from_str::<ArchiveRequest>(body).unwrap().archive
    }

    #[test]
    fn test_archive_flag_truthiness() {
        assert!(archive_flag(r#"{"archive": true}"#));
        assert!(archive_flag(r#"{"archive": 1}"#));
        assert!(archive_flag(r#"{"archive": "yes"}"#));
        assert!(!archive_flag(r#"{"archive": 0}"#));
        assert!(!archive_flag(r#"{"archive": ""}"#));
        assert!(!archive_flag(r#"{"archive": null}"#));
        assert!(!archive_flag(r#"{}"#));
    }
}
