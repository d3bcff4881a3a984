//! Reference data shared by the submission wizard and the backend

use serde::Serialize;

/// Topics inserted into an empty `topics` table
pub const SEED_TOPICS: &[&str] = &[
    "Excutive Leadership (General management ,c-level , director)",
    "Operations Management :Departement manager ,Manager",
    "Sales",
    "Marketing",
    "Service",
    "HR",
    "Finance",
    "digital marketing",
    "CRM/CX",
    "Logistics",
    "Product",
    "Others",
];

/// Experience assigned to a role stored in the legacy bare-name form
pub const DEFAULT_ROLE_EXPERIENCE: &str = "0-5";

/// Chart bucket for missing or unrecognised experience values
pub const OTHER_BUCKET: &str = "Other";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExperienceLevel {
    pub value: &'static str,
    pub label: &'static str,
}

pub const EXPERIENCE_LEVELS: &[ExperienceLevel] = &[
    ExperienceLevel { value: "0-5", label: "0-5 years" },
    ExperienceLevel { value: "5-10", label: "5-10 years" },
    ExperienceLevel { value: "10+", label: "10+ years" },
];

pub fn is_experience_level(value: &str) -> bool {
    EXPERIENCE_LEVELS.iter().any(|level| level.value == value)
}

pub const DOCUMENT_TYPES: &[&str] = &[
    "Resume / CV",
    "Cover Letter",
    "Portfolio",
    "Certifications",
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountryCode {
    pub code: &'static str,
    pub dial_code: &'static str,
    pub name: &'static str,
}

/// Dial codes offered by the phone picker; Saudi Arabia is the wizard default
pub const COUNTRY_CODES: &[CountryCode] = &[
    CountryCode { code: "SA", dial_code: "+966", name: "Saudi Arabia" },
    CountryCode { code: "AE", dial_code: "+971", name: "United Arab Emirates" },
    CountryCode { code: "EG", dial_code: "+20", name: "Egypt" },
    CountryCode { code: "IQ", dial_code: "+964", name: "Iraq" },
    CountryCode { code: "JO", dial_code: "+962", name: "Jordan" },
    CountryCode { code: "LB", dial_code: "+961", name: "Lebanon" },
    CountryCode { code: "KW", dial_code: "+965", name: "Kuwait" },
    CountryCode { code: "QA", dial_code: "+974", name: "Qatar" },
    CountryCode { code: "BH", dial_code: "+973", name: "Bahrain" },
    CountryCode { code: "OM", dial_code: "+968", name: "Oman" },
    CountryCode { code: "SY", dial_code: "+963", name: "Syria" },
    CountryCode { code: "YE", dial_code: "+967", name: "Yemen" },
    CountryCode { code: "PS", dial_code: "+970", name: "Palestine" },
    CountryCode { code: "MA", dial_code: "+212", name: "Morocco" },
    CountryCode { code: "DZ", dial_code: "+213", name: "Algeria" },
    CountryCode { code: "TN", dial_code: "+216", name: "Tunisia" },
    CountryCode { code: "LY", dial_code: "+218", name: "Libya" },
    CountryCode { code: "SD", dial_code: "+249", name: "Sudan" },
    CountryCode { code: "SO", dial_code: "+252", name: "Somalia" },
    CountryCode { code: "MR", dial_code: "+222", name: "Mauritania" },
    CountryCode { code: "DJ", dial_code: "+253", name: "Djibouti" },
    CountryCode { code: "KM", dial_code: "+269", name: "Comoros" },
];
