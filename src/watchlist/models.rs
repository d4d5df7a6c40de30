use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metadata::TitleDetails;

/// Shown in place of a poster the provider does not have.
pub const NO_POSTER: &str = "https://via.placeholder.com/300x420?text=No+Poster";

/// One tracked title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub title: String,
    pub year: String,
    pub media_type: String,
    pub poster_url: String,
    pub imdb_id: String,
    pub imdb_rating: String,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub user_overall: Option<f64>,
    #[serde(default)]
    pub episode_ratings: BTreeMap<u32, f64>,
}

impl Entry {
    /// Normalize a provider record into a fresh entry. Missing fields get
    /// their documented defaults; rating state starts empty.
    pub fn from_details(details: TitleDetails) -> Self {
        let poster_url = details
            .poster
            .filter(|p| !p.is_empty() && p != "N/A")
            .unwrap_or_else(|| NO_POSTER.to_string());

        Self {
            title: details.title.unwrap_or_else(|| "Unknown".to_string()),
            year: details.year.unwrap_or_default(),
            media_type: details.media_type.unwrap_or_else(|| "movie".to_string()),
            poster_url,
            imdb_id: details.imdb_id,
            imdb_rating: details.imdb_rating.unwrap_or_else(|| "N/A".to_string()),
            total_episodes: None,
            user_overall: None,
            episode_ratings: BTreeMap::new(),
        }
    }

    pub fn is_series(&self) -> bool {
        self.media_type.to_lowercase().contains("series")
    }

    /// The user-facing rating: the overall rating verbatim when set,
    /// otherwise the mean of the episode ratings, otherwise nothing.
    ///
    /// Every key in the map counts, even episodes beyond `total_episodes`.
    pub fn user_average(&self) -> Option<f64> {
        if let Some(overall) = self.user_overall {
            return Some(overall);
        }

        if self.episode_ratings.is_empty() {
            return None;
        }

        let sum: f64 = self.episode_ratings.values().sum();
        Some(sum / self.episode_ratings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_entry() -> Entry {
        Entry::from_details(TitleDetails {
            imdb_id: "tt0113277".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn normalization_fills_defaults() {
        let entry = bare_entry();
        assert_eq!(entry.title, "Unknown");
        assert_eq!(entry.media_type, "movie");
        assert_eq!(entry.poster_url, NO_POSTER);
        assert_eq!(entry.imdb_rating, "N/A");
        assert_eq!(entry.year, "");
        assert_eq!(entry.total_episodes, None);
        assert_eq!(entry.user_overall, None);
        assert!(entry.episode_ratings.is_empty());
    }

    #[test]
    fn na_poster_becomes_placeholder() {
        let entry = Entry::from_details(TitleDetails {
            imdb_id: "tt1".to_string(),
            poster: Some("N/A".to_string()),
            ..Default::default()
        });
        assert_eq!(entry.poster_url, NO_POSTER);
    }

    #[test]
    fn series_detection_is_case_insensitive() {
        let mut entry = bare_entry();
        assert!(!entry.is_series());
        entry.media_type = "Series".to_string();
        assert!(entry.is_series());
    }

    #[test]
    fn overall_rating_wins_over_episode_average() {
        let mut entry = bare_entry();
        entry.episode_ratings = BTreeMap::from([(1, 2.0), (2, 3.0)]);
        entry.user_overall = Some(9.5);
        assert_eq!(entry.user_average(), Some(9.5));
    }

    #[test]
    fn episode_average_is_the_arithmetic_mean() {
        let mut entry = bare_entry();
        entry.episode_ratings = BTreeMap::from([(1, 8.0), (2, 6.0)]);
        assert_eq!(entry.user_average(), Some(7.0));

        entry.episode_ratings = BTreeMap::from([(1, 9.0), (2, 7.0), (3, 8.0)]);
        assert_eq!(entry.user_average(), Some(8.0));
    }

    #[test]
    fn no_ratings_means_no_average() {
        assert_eq!(bare_entry().user_average(), None);
    }

    #[test]
    fn episodes_beyond_the_declared_count_still_count() {
        let mut entry = bare_entry();
        entry.total_episodes = Some(2);
        entry.episode_ratings = BTreeMap::from([(1, 10.0), (2, 10.0), (7, 1.0)]);
        assert_eq!(entry.user_average(), Some(7.0));
    }
}
