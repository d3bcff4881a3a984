//! Topic, company and applicant matching
//!
//! Topic links live in JSON text columns, so SQL can only narrow candidates
//! with a `LIKE` prefilter. Every filter is settled here by exact name
//! comparison, and every count is recomputed from the rows it is given.

use std::collections::HashSet;
use yoko_common::db::{Company, Role, Submission, Topic, TopicStats};

/// `LIKE` pattern that keeps every row whose JSON text could hold `topic`.
///
/// Returns `None` when the name contains characters JSON escapes; the raw
/// name would not appear verbatim in the stored text, so the caller must
/// skip the prefilter.
pub fn like_prefilter(topic: &str) -> Option<String> {
    if topic.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
        return None;
    }
    Some(format!("%{}%", topic))
}

/// Trim, drop blanks and duplicates, keep first-seen order
pub fn normalize_names(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Collapse roles sharing a topic name; the first occurrence wins
pub fn dedupe_roles(roles: Vec<Role>) -> Vec<Role> {
    let mut seen = HashSet::new();
    roles
        .into_iter()
        .filter(|role| seen.insert(role.name.clone()))
        .collect()
}

/// Case-insensitive substring match on the applicant's name
pub fn name_matches(submission: &Submission, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    submission
        .full_name
        .as_deref()
        .map(|name| name.to_lowercase().contains(&query))
        .unwrap_or(false)
}

/// Applicants whose topic tags overlap the company's roles
pub fn company_applicant_count(company: &Company, submissions: &[Submission]) -> usize {
    submissions
        .iter()
        .filter(|s| company.roles.iter().any(|role| s.has_field(&role.name)))
        .count()
}

/// Fill in `applicants_count` for each company
pub fn with_applicant_counts(mut companies: Vec<Company>, submissions: &[Submission]) -> Vec<Company> {
    for company in &mut companies {
        company.applicants_count = company_applicant_count(company, submissions);
    }
    companies
}

/// Per-topic counts of the companies and applicants given
pub fn topic_stats(
    topics: Vec<Topic>,
    companies: &[Company],
    submissions: &[Submission],
) -> Vec<TopicStats> {
    topics
        .into_iter()
        .map(|topic| {
            let companies_count = companies.iter().filter(|c| c.has_role(&topic.name)).count();
            let applicants_count = submissions.iter().filter(|s| s.has_field(&topic.name)).count();
            TopicStats {
                topic,
                companies_count,
                applicants_count,
            }
        })
        .collect()
}
