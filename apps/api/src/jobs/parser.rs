//! Job listing parser — turns the recommendation prompt's bullet output
//! (`• Title at Company | Skills | Why`) into structured listings.
//!
//! Lenient: lines that are not bullets are skipped, and bullets without a
//! `|` are dropped. Dropped bullets are counted so callers can surface them.

use serde::Serialize;
use tracing::debug;

use crate::jobs::platforms::{search_links, JobPlatform, SearchLink};

/// Company used when a listing does not name one.
pub const DEFAULT_COMPANY: &str = "Various Companies";

const BULLET_MARKERS: [char; 2] = ['•', '-'];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub detail_fields: Vec<String>,
}

impl JobListing {
    /// Detail fields joined for display, `None` when there are none.
    pub fn details(&self) -> Option<String> {
        if self.detail_fields.is_empty() {
            None
        } else {
            Some(self.detail_fields.join(" | "))
        }
    }

    pub fn links(&self, platforms: &[JobPlatform]) -> Vec<SearchLink> {
        search_links(&self.title, &self.company, platforms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedListings {
    pub listings: Vec<JobListing>,
    /// Bullet lines discarded because they carried no `|`.
    pub dropped: usize,
}

pub fn parse_listings(raw_text: &str) -> ParsedListings {
    let mut parsed = ParsedListings::default();

    for line in raw_text.lines() {
        let Some(job_text) = line.trim().strip_prefix(BULLET_MARKERS) else {
            continue;
        };
        let job_text = job_text.trim();

        if !job_text.contains('|') {
            debug!("Dropping job line without '|': {job_text}");
            parsed.dropped += 1;
            continue;
        }

        let mut parts = job_text.split('|');
        let title_company = parts.next().unwrap_or_default().trim();
        let detail_fields = parts.map(|p| p.trim().to_string()).collect();

        let (title, company) = match title_company.split_once(" at ") {
            Some((title, company)) => (title.trim(), company.trim()),
            None => (title_company, DEFAULT_COMPANY),
        };

        parsed.listings.push(JobListing {
            title: title.to_string(),
            company: company.to_string(),
            detail_fields,
        });
    }

    parsed
}
