pub mod omdb;

pub use omdb::OmdbClient;

/// One row of a title search: enough to render a result and to ask for the
/// full record later.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub year: String,
    pub media_type: String,
    // Carried from the provider; the result list has nowhere to draw it.
    #[allow(dead_code)]
    pub poster: Option<String>,
    pub imdb_id: String,
}

/// Full record for one title, as the provider reports it. Fields other than
/// the ID are optional; normalization into a watchlist entry fills defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleDetails {
    pub title: Option<String>,
    pub year: Option<String>,
    pub media_type: Option<String>,
    pub poster: Option<String>,
    pub imdb_id: String,
    pub imdb_rating: Option<String>,
}

/// Read-only metadata lookups. Failures never cross this boundary: transport
/// and parse errors are logged and collapse into an empty or absent result.
#[async_trait::async_trait]
pub trait MetadataProvider {
    /// Search by title. A whitespace-only query returns empty without issuing
    /// a request.
    async fn search(&self, query: &str) -> Vec<SearchHit>;

    /// Fetch the full record for one external ID.
    async fn details(&self, imdb_id: &str) -> Option<TitleDetails>;
}
