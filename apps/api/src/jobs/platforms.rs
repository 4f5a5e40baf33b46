//! Job board search links. Pure URL construction, no API calls.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// The job boards outbound search links can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobPlatform {
    LinkedIn,
    Indeed,
    Glassdoor,
    Monster,
    SimplyHired,
    CareerBuilder,
}

/// Boards linked from each recommended listing.
pub const LISTING_PLATFORMS: [JobPlatform; 3] =
    [JobPlatform::LinkedIn, JobPlatform::Indeed, JobPlatform::Glassdoor];

/// Boards offered for a free-text search.
pub const DIRECT_SEARCH_PLATFORMS: [JobPlatform; 4] = [
    JobPlatform::LinkedIn,
    JobPlatform::Indeed,
    JobPlatform::Glassdoor,
    JobPlatform::Monster,
];

impl JobPlatform {
    pub const ALL: [JobPlatform; 6] = [
        JobPlatform::LinkedIn,
        JobPlatform::Indeed,
        JobPlatform::Glassdoor,
        JobPlatform::Monster,
        JobPlatform::SimplyHired,
        JobPlatform::CareerBuilder,
    ];

    pub fn key(self) -> &'static str {
        match self {
            JobPlatform::LinkedIn => "LinkedIn",
            JobPlatform::Indeed => "Indeed",
            JobPlatform::Glassdoor => "Glassdoor",
            JobPlatform::Monster => "Monster",
            JobPlatform::SimplyHired => "SimplyHired",
            JobPlatform::CareerBuilder => "CareerBuilder",
        }
    }

    /// Search URL prefix; the encoded query is appended as-is.
    pub fn base_url(self) -> &'static str {
        match self {
            JobPlatform::LinkedIn => "https://www.linkedin.com/jobs/search/?keywords=",
            JobPlatform::Indeed => "https://www.indeed.com/jobs?q=",
            JobPlatform::Glassdoor => "https://www.glassdoor.com/Job/jobs.htm?sc.keyword=",
            JobPlatform::Monster => "https://www.monster.com/jobs/search/?q=",
            JobPlatform::SimplyHired => "https://www.simplyhired.com/search?q=",
            JobPlatform::CareerBuilder => "https://www.careerbuilder.com/jobs?keywords=",
        }
    }

    /// Exact, case-sensitive key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn search_url(self, title: &str, company: &str) -> String {
        let query = format!("{title} {company}");
        let encoded: String = form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
        format!("{}{}", self.base_url(), encoded)
    }
}

/// A generated outbound link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchLink {
    pub platform: JobPlatform,
    pub url: String,
}

/// Builds the search URL for `platform`, falling back to LinkedIn for unknown keys.
pub fn build_search_url(title: &str, company: &str, platform: &str) -> String {
    JobPlatform::from_key(platform)
        .unwrap_or(JobPlatform::LinkedIn)
        .search_url(title, company)
}

pub fn search_links(title: &str, company: &str, platforms: &[JobPlatform]) -> Vec<SearchLink> {
    platforms
        .iter()
        .map(|&platform| SearchLink {
            platform,
            url: platform.search_url(title, company),
        })
        .collect()
}
