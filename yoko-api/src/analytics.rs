//! Chart aggregations over a set of submissions

use serde::Serialize;
use std::collections::HashMap;
use yoko_common::db::{Submission, SubmissionStatus};
use yoko_common::reference::{EXPERIENCE_LEVELS, OTHER_BUCKET};

/// One chart slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSummary {
    pub total: usize,
    /// Every status, zero counts included
    pub by_status: Vec<Bucket>,
    /// Known levels in ladder order, then "Other"; empty buckets omitted
    pub by_experience: Vec<Bucket>,
    pub by_referral_source: Vec<Bucket>,
    pub by_field: Vec<Bucket>,
    pub by_country: Vec<Bucket>,
}

fn bucket_or_other(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => OTHER_BUCKET.to_string(),
    }
}

/// Largest first, ties by name
fn ranked(counts: HashMap<String, usize>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(name, value)| Bucket { name, value })
        .collect();
    buckets.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    buckets
}

pub fn summarize(submissions: &[Submission]) -> SubmissionSummary {
    let mut status_counts: HashMap<SubmissionStatus, usize> = HashMap::new();
    let mut experience_counts: HashMap<String, usize> = HashMap::new();
    let mut referral_counts: HashMap<String, usize> = HashMap::new();
    let mut field_counts: HashMap<String, usize> = HashMap::new();
    let mut country_counts: HashMap<String, usize> = HashMap::new();

    for s in submissions {
        *status_counts.entry(s.status).or_default() += 1;

        let experience = match s.experience_level.as_deref() {
            Some(level) if EXPERIENCE_LEVELS.iter().any(|l| l.value == level) => level.to_string(),
            _ => OTHER_BUCKET.to_string(),
        };
        *experience_counts.entry(experience).or_default() += 1;

        *referral_counts
            .entry(bucket_or_other(s.referral_source.as_deref()))
            .or_default() += 1;
        *field_counts
            .entry(bucket_or_other(s.primary_field()))
            .or_default() += 1;

        for country in &s.countries_worked_in {
            let country = country.trim();
            if !country.is_empty() {
                *country_counts.entry(country.to_string()).or_default() += 1;
            }
        }
    }

    let by_status = SubmissionStatus::ALL
        .iter()
        .map(|status| Bucket {
            name: status.as_str().to_string(),
            value: status_counts.get(status).copied().unwrap_or(0),
        })
        .collect();

    let by_experience = EXPERIENCE_LEVELS
        .iter()
        .map(|l| l.value)
        .chain(std::iter::once(OTHER_BUCKET))
        .filter_map(|name| {
            experience_counts.get(name).map(|&value| Bucket {
                name: name.to_string(),
                value,
            })
        })
        .collect();

    SubmissionSummary {
        total: submissions.len(),
        by_status,
        by_experience,
        by_referral_source: ranked(referral_counts),
        by_field: ranked(field_counts),
        by_country: ranked(country_counts),
    }
}
