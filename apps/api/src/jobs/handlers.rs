//! Axum route handlers for the stateless Jobs API.

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::parser::{parse_listings, JobListing};
use crate::jobs::platforms::{
    build_search_url, search_links, SearchLink, DIRECT_SEARCH_PLATFORMS, LISTING_PLATFORMS,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub links: Vec<SearchLink>,
}

#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    pub title: String,
    #[serde(default)]
    pub company: String,
    /// Platform key, e.g. `Indeed`. Unknown or absent keys use LinkedIn.
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// A parsed listing with its display details and outbound links.
#[derive(Debug, Serialize)]
pub struct RenderedListing {
    #[serde(flatten)]
    pub listing: JobListing,
    pub details: Option<String>,
    pub links: Vec<SearchLink>,
}

impl From<JobListing> for RenderedListing {
    fn from(listing: JobListing) -> Self {
        Self {
            details: listing.details(),
            links: listing.links(&LISTING_PLATFORMS),
            listing,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    pub listings: Vec<RenderedListing>,
    pub dropped_lines: usize,
}

/// Parses raw recommendation text into rendered listings.
pub fn render_listings(raw_text: &str) -> ListingsResponse {
    let parsed = parse_listings(raw_text);
    ListingsResponse {
        listings: parsed.listings.into_iter().map(RenderedListing::from).collect(),
        dropped_lines: parsed.dropped,
    }
}

/// GET /api/v1/jobs/search?q=
pub async fn handle_search(
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::Validation("q cannot be empty".to_string()));
    }

    Ok(Json(SearchResponse {
        query: query.to_string(),
        links: search_links(query, "", &DIRECT_SEARCH_PLATFORMS),
    }))
}

/// GET /api/v1/jobs/link?title=&company=&platform=
pub async fn handle_link(Query(params): Query<LinkQuery>) -> Json<LinkResponse> {
    Json(LinkResponse {
        url: build_search_url(&params.title, &params.company, &params.platform),
    })
}

/// POST /api/v1/jobs/parse
pub async fn handle_parse(Json(request): Json<ParseRequest>) -> Json<ListingsResponse> {
    Json(render_listings(&request.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_listing_carries_three_links() {
        let response = render_listings("• Data Scientist at Acme | Python, SQL | Great fit");
        let listing = &response.listings[0];
        assert_eq!(listing.details.as_deref(), Some("Python, SQL | Great fit"));
        assert_eq!(listing.links.len(), 3);
        assert_eq!(
            listing.links[2].url,
            "https://www.glassdoor.com/Job/jobs.htm?sc.keyword=Data+Scientist+Acme"
        );
    }

    #[test]
    fn test_rendered_listing_flattens_fields() {
        let response = render_listings("• Backend Engineer | Go");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["listings"][0]["title"], "Backend Engineer");
        assert_eq!(json["listings"][0]["company"], "Various Companies");
        assert_eq!(json["listings"][0]["links"][0]["platform"], "LinkedIn");
        assert_eq!(json["dropped_lines"], 0);
    }
}
