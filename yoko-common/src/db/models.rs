//! Database models
//!
//! List-valued columns (`fields`, `countries_worked_in`, `roles`) are stored
//! as JSON text. Reads are tolerant: NULL or malformed text decodes to an
//! empty list, and array elements of the wrong shape are skipped one by one.
//!
//! Timestamps serialize in SQLite's `CURRENT_TIMESTAMP` text form.

use crate::reference::DEFAULT_ROLE_EXPERIENCE;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Review state of an applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubmissionStatus {
    #[default]
    Unseen,
    Reviewed,
    Shortlisted,
    Interviewed,
    Accepted,
    Rejected,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 6] = [
        SubmissionStatus::Unseen,
        SubmissionStatus::Reviewed,
        SubmissionStatus::Shortlisted,
        SubmissionStatus::Interviewed,
        SubmissionStatus::Accepted,
        SubmissionStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Unseen => "Unseen",
            SubmissionStatus::Reviewed => "Reviewed",
            SubmissionStatus::Shortlisted => "Shortlisted",
            SubmissionStatus::Interviewed => "Interviewed",
            SubmissionStatus::Accepted => "Accepted",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    /// Decode a stored value. NULL means the column default; anything
    /// unrecognised is logged and treated as `Unseen`.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(s) => s.parse().unwrap_or_else(|_| {
                warn!("Unknown stored submission status '{}', treating as Unseen", s);
                Self::default()
            }),
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown status: {}", s)))
    }
}

/// Encode a list column
pub fn encode_list<T: Serialize>(items: &[T]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Decode a list column, tolerating NULL, malformed text and stray elements
pub fn decode_list<T: DeserializeOwned>(raw: Option<&str>) -> Vec<T> {
    let items = match raw {
        None => return Vec::new(),
        Some(text) if text.trim().is_empty() => return Vec::new(),
        Some(text) => match serde_json::from_str::<Option<Vec<Value>>>(text) {
            Ok(Some(items)) => items,
            _ => return Vec::new(),
        },
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping malformed list element {}: {}", item, e);
                None
            }
        })
        .collect()
}

/// Storage format of `CURRENT_TIMESTAMP`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_timestamp<S: Serializer>(
    value: &Option<NaiveDateTime>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
        None => serializer.serialize_none(),
    }
}

/// Applicant record
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub referral_source: Option<String>,
    pub experience_level: Option<String>,
    pub fields: Vec<String>,
    pub position: Option<String>,
    /// Applicant's previous employer
    pub company: Option<String>,
    pub countries_worked_in: Vec<String>,
    pub achievements: Option<String>,
    pub status: SubmissionStatus,
    pub is_archived: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl Submission {
    /// Exact match against one of the applicant's topic tags
    pub fn has_field(&self, topic: &str) -> bool {
        self.fields.iter().any(|f| f == topic)
    }

    /// First topic tag, used as the applicant's primary field
    pub fn primary_field(&self) -> Option<&str> {
        self.fields.iter().map(String::as_str).find(|f| !f.is_empty())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Submission {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let fields: Option<String> = row.try_get("fields")?;
        let countries: Option<String> = row.try_get("countries_worked_in")?;
        let status: Option<String> = row.try_get("status")?;
        let archived: Option<i64> = row.try_get("is_archived")?;

        Ok(Self {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            referral_source: row.try_get("referral_source")?,
            experience_level: row.try_get("experience_level")?,
            fields: decode_list(fields.as_deref()),
            position: row.try_get("position")?,
            company: row.try_get("company")?,
            countries_worked_in: decode_list(countries.as_deref()),
            achievements: row.try_get("achievements")?,
            status: SubmissionStatus::from_stored(status.as_deref()),
            is_archived: archived.unwrap_or(0) != 0,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// File metadata attached to a submission
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub submission_id: i64,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub document_type: Option<String>,
}

/// Submission together with its documents
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: Submission,
    pub documents: Vec<Document>,
}

/// Named category applicants and companies are grouped under
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Topic {
    pub id: i64,
    pub name: String,
}

/// Topic with counts recomputed on each request
#[derive(Debug, Clone, Serialize)]
pub struct TopicStats {
    #[serde(flatten)]
    pub topic: Topic,
    pub companies_count: usize,
    pub applicants_count: usize,
}

/// Topic a company hires for, with the experience it requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRole")]
pub struct Role {
    pub name: String,
    pub experience: String,
}

impl Role {
    pub fn new(name: impl Into<String>, experience: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            experience: experience.into(),
        }
    }
}

/// Stored role shapes: older rows hold bare topic names
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRole {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        experience: Option<Value>,
    },
}

impl From<RawRole> for Role {
    fn from(raw: RawRole) -> Self {
        match raw {
            RawRole::Name(name) => Role::new(name, DEFAULT_ROLE_EXPERIENCE),
            RawRole::Full { name, experience } => {
                let experience = match experience {
                    Some(Value::String(s)) => s,
                    Some(Value::Number(n)) => n.to_string(),
                    _ => DEFAULT_ROLE_EXPERIENCE.to_string(),
                };
                Role::new(name, experience)
            }
        }
    }
}

/// Employer registered under one or more topics
#[derive(Debug, Clone, Serialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub roles: Vec<Role>,
    /// Filled in per request; never read from the table
    pub applicants_count: usize,
    pub is_archived: bool,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl Company {
    pub fn has_role(&self, topic: &str) -> bool {
        self.roles.iter().any(|r| r.name == topic)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Company {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let roles: Option<String> = row.try_get("roles")?;
        let archived: Option<i64> = row.try_get("is_archived")?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            roles: decode_list(roles.as_deref()),
            applicants_count: 0,
            is_archived: archived.unwrap_or(0) != 0,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("shortlisted".parse::<SubmissionStatus>().unwrap(), SubmissionStatus::Shortlisted);
        assert_eq!(" Unseen ".parse::<SubmissionStatus>().unwrap(), SubmissionStatus::Unseen);
        assert!("Hired".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_status_from_stored() {
        assert_eq!(SubmissionStatus::from_stored(None), SubmissionStatus::Unseen);
        assert_eq!(SubmissionStatus::from_stored(Some("Rejected")), SubmissionStatus::Rejected);
        assert_eq!(SubmissionStatus::from_stored(Some("garbage")), SubmissionStatus::Unseen);
    }

    #[test]
    fn test_status_serializes_as_name() {
        let json = serde_json::to_string(&SubmissionStatus::Interviewed).unwrap();
        assert_eq!(json, "\"Interviewed\"");
    }

    #[test]
    fn test_decode_list_tolerates_bad_input() {
        assert!(decode_list::<String>(None).is_empty());
        assert!(decode_list::<String>(Some("")).is_empty());
        assert!(decode_list::<String>(Some("null")).is_empty());
        assert!(decode_list::<String>(Some("not json")).is_empty());
        assert_eq!(decode_list::<String>(Some(r#"["HR","Sales"]"#)), vec!["HR", "Sales"]);
        assert_eq!(decode_list::<String>(Some(r#"["HR", 7, null, "Sales"]"#)), vec!["HR", "Sales"]);
    }

    #[test]
    fn test_mixed_legacy_roles_keep_valid_elements() {
        let roles: Vec<Role> = decode_list(Some(
            r#"["Sales", {"title": "x"}, {"name": "HR", "experience": 5}, 42]"#,
        ));
        assert_eq!(roles, vec![Role::new("Sales", "0-5"), Role::new("HR", "5")]);
    }

    #[test]
    fn test_created_at_serializes_in_storage_format() {
        let stamp = NaiveDateTime::parse_from_str("2026-10-18 13:42:16", TIMESTAMP_FORMAT).unwrap();
        let company = Company {
            id: 1,
            name: "Acme".into(),
            roles: vec![],
            applicants_count: 0,
            is_archived: false,
            created_at: Some(stamp),
        };
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["created_at"], "2026-10-18 13:42:16");

        let undated = Company { created_at: None, ..company };
        assert!(serde_json::to_value(&undated).unwrap()["created_at"].is_null());
    }

    #[test]
    fn test_role_accepts_legacy_and_full_forms() {
        let roles: Vec<Role> =
            decode_list(Some(r#"["Sales", {"name": "HR", "experience": "10+"}, {"name": "Finance"}]"#));
        assert_eq!(
            roles,
            vec![
                Role::new("Sales", "0-5"),
                Role::new("HR", "10+"),
                Role::new("Finance", "0-5"),
            ]
        );
    }

    #[test]
    fn test_role_serializes_full_form() {
        let json = encode_list(&[Role::new("Sales", "5-10")]).unwrap();
        assert_eq!(json, r#"[{"name":"Sales","experience":"5-10"}]"#);
    }

    #[test]
    fn test_primary_field_skips_blank() {
        let submission = Submission {
            id: 1,
            full_name: None,
            email: None,
            phone_number: None,
            referral_source: None,
            experience_level: None,
            fields: vec!["".to_string(), "HR".to_string()],
            position: None,
            company: None,
            countries_worked_in: vec![],
            achievements: None,
            status: SubmissionStatus::Unseen,
            is_archived: false,
            created_at: None,
        };
        assert_eq!(submission.primary_field(), Some("HR"));
        assert!(submission.has_field("HR"));
        assert!(!submission.has_field("H"));
    }
}
