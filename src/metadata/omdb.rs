use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::metadata::{MetadataProvider, SearchHit, TitleDetails};

const OMDB_BASE: &str = "https://www.omdbapi.com/";

pub struct OmdbClient {
    client: Client,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    async fn get_body(&self, query: &[(&str, &str)]) -> Result<String> {
        let response = self.client.get(OMDB_BASE).query(query).send().await?;

        if !response.status().is_success() {
            return Err(Error::Omdb(format!("HTTP {}", response.status())));
        }

        Ok(response.text().await?)
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let body = self
            .get_body(&[("apikey", self.api_key.as_str()), ("s", query)])
            .await?;
        parse_search_body(&body)
    }

    async fn try_details(&self, imdb_id: &str) -> Result<Option<TitleDetails>> {
        let body = self
            .get_body(&[
                ("apikey", self.api_key.as_str()),
                ("i", imdb_id),
                ("plot", "short"),
            ])
            .await?;
        parse_detail_body(&body)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbClient {
    async fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.try_search(query).await {
            Ok(hits) => {
                debug!(query, count = hits.len(), "OMDb search completed");
                hits
            }
            Err(e) => {
                warn!(error = %e, query, "OMDb search failed");
                Vec::new()
            }
        }
    }

    async fn details(&self, imdb_id: &str) -> Option<TitleDetails> {
        match self.try_details(imdb_id).await {
            Ok(details) => details,
            Err(e) => {
                warn!(error = %e, imdb_id, "OMDb detail fetch failed");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<RawSearchHit>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct RawSearchHit {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Type", default)]
    media_type: String,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: String,
}

#[derive(Deserialize)]
struct RawDetail {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Response", default)]
    response: String,
}

fn non_sentinel(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

fn parse_search_body(body: &str) -> Result<Vec<SearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;

    // OMDb signals "no matches" as Response=False plus an Error string; the
    // Search array is simply absent in that case.
    if let Some(error) = response.error {
        debug!(error, "OMDb reported no search results");
    }

    Ok(response
        .search
        .into_iter()
        .map(|hit| SearchHit {
            title: hit.title,
            year: hit.year,
            media_type: hit.media_type,
            poster: non_sentinel(hit.poster),
            imdb_id: hit.imdb_id,
        })
        .collect())
}

fn parse_detail_body(body: &str) -> Result<Option<TitleDetails>> {
    let raw: RawDetail = serde_json::from_str(body)?;

    if raw.response.eq_ignore_ascii_case("false") {
        return Ok(None);
    }

    let Some(imdb_id) = raw.imdb_id else {
        return Ok(None);
    };

    Ok(Some(TitleDetails {
        title: raw.title,
        year: raw.year,
        media_type: raw.media_type,
        poster: raw.poster,
        imdb_id,
        imdb_rating: raw.imdb_rating,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_hits() {
        let body = r#"{
            "Search": [
                {"Title": "Heat", "Year": "1995", "imdbID": "tt0113277", "Type": "movie", "Poster": "https://img.example/heat.jpg"},
                {"Title": "Heat", "Year": "2013", "imdbID": "tt2304771", "Type": "series", "Poster": "N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;

        let hits = parse_search_body(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].imdb_id, "tt0113277");
        assert_eq!(hits[0].poster.as_deref(), Some("https://img.example/heat.jpg"));
        assert_eq!(hits[1].media_type, "series");
        assert_eq!(hits[1].poster, None);
    }

    #[test]
    fn no_matches_is_an_empty_result() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        assert!(parse_search_body(body).unwrap().is_empty());
    }

    #[test]
    fn garbage_search_body_is_an_error() {
        assert!(parse_search_body("<html>not json</html>").is_err());
    }

    #[test]
    fn parses_detail_record() {
        let body = r#"{
            "Title": "Heat",
            "Year": "1995",
            "Type": "movie",
            "Poster": "https://img.example/heat.jpg",
            "imdbRating": "8.3",
            "imdbID": "tt0113277",
            "Response": "True"
        }"#;

        let details = parse_detail_body(body).unwrap().unwrap();
        assert_eq!(details.imdb_id, "tt0113277");
        assert_eq!(details.title.as_deref(), Some("Heat"));
        assert_eq!(details.imdb_rating.as_deref(), Some("8.3"));
    }

    #[test]
    fn failed_detail_lookup_is_absent() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        assert_eq!(parse_detail_body(body).unwrap(), None);

        // A record without an ID is unusable regardless of Response.
        let body = r#"{"Title": "Heat", "Response": "True"}"#;
        assert_eq!(parse_detail_body(body).unwrap(), None);
    }

    #[tokio::test]
    async fn blank_query_short_circuits() {
        // No request is issued for a whitespace-only query, so an unusable
        // key cannot matter here.
        let client = OmdbClient::new(String::new());
        assert!(client.search("   ").await.is_empty());
        assert!(client.search("").await.is_empty());
    }
}
