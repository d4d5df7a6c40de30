pub mod models;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use models::Entry;

use crate::config::watchlist_path;
use crate::error::Result;
use crate::metadata::TitleDetails;

/// Persisted watchlist state. The in-memory list is the source of truth;
/// callers save after every successful mutation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Watchlist {
    pub fn load() -> Self {
        match watchlist_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!(error = %e, "No data directory; starting with an empty watchlist");
                Watchlist::default()
            }
        }
    }

    /// Missing, unreadable, or wrongly-shaped data all load as an empty
    /// watchlist. Prior state on disk is left untouched until the next save.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Watchlist::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read watchlist");
                return Watchlist::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(watchlist) => watchlist,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to parse watchlist");
                Watchlist::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&watchlist_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Insert a normalized entry at the front unless one with the same IMDb
    /// ID is already present. Returns whether an insertion happened.
    pub fn add_if_absent(&mut self, details: TitleDetails) -> bool {
        if self.entries.iter().any(|e| e.imdb_id == details.imdb_id) {
            return false;
        }

        self.entries.insert(0, Entry::from_details(details));
        true
    }

    /// Remove by current position. Out-of-bounds indices are a no-op.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }

        self.entries.remove(index);
        true
    }

    /// Commit ratings from the detail dialog: the overall rating only when
    /// one was supplied, the episode map as a full replacement.
    pub fn update_ratings(
        &mut self,
        index: usize,
        overall: Option<f64>,
        episodes: BTreeMap<u32, f64>,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };

        if let Some(value) = overall {
            entry.user_overall = Some(value);
        }
        entry.episode_ratings = episodes;
        true
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: &str, title: &str) -> TitleDetails {
        TitleDetails {
            title: Some(title.to_string()),
            year: Some("1995".to_string()),
            media_type: Some("movie".to_string()),
            poster: None,
            imdb_id: id.to_string(),
            imdb_rating: Some("8.3".to_string()),
        }
    }

    #[test]
    fn adds_new_entries_at_the_front() {
        let mut watchlist = Watchlist::default();
        assert!(watchlist.add_if_absent(details("tt1", "First")));
        assert!(watchlist.add_if_absent(details("tt2", "Second")));

        assert_eq!(watchlist.len(), 2);
        assert_eq!(watchlist.entries[0].imdb_id, "tt2");
        assert_eq!(watchlist.entries[1].imdb_id, "tt1");
    }

    #[test]
    fn duplicate_add_leaves_the_list_unchanged() {
        let mut watchlist = Watchlist::default();
        assert!(watchlist.add_if_absent(details("tt1", "Heat")));
        let before = watchlist.entries.clone();

        assert!(!watchlist.add_if_absent(details("tt1", "Heat (again)")));
        assert_eq!(watchlist.entries, before);
    }

    #[test]
    fn remove_at_out_of_range_is_a_noop() {
        let mut watchlist = Watchlist::default();
        watchlist.add_if_absent(details("tt1", "Heat"));

        assert!(!watchlist.remove_at(5));
        assert_eq!(watchlist.len(), 1);

        assert!(watchlist.remove_at(0));
        assert!(watchlist.is_empty());
        assert!(!watchlist.remove_at(0));
    }

    #[test]
    fn update_ratings_replaces_the_episode_map_wholesale() {
        let mut watchlist = Watchlist::default();
        watchlist.add_if_absent(details("tt1", "Heat"));
        watchlist.update_ratings(0, None, BTreeMap::from([(1, 9.0), (2, 7.0)]));

        assert!(watchlist.update_ratings(0, Some(9.5), BTreeMap::new()));

        let entry = watchlist.get(0).unwrap();
        assert_eq!(entry.user_overall, Some(9.5));
        assert!(entry.episode_ratings.is_empty());
    }

    #[test]
    fn update_ratings_without_an_overall_keeps_the_previous_one() {
        let mut watchlist = Watchlist::default();
        watchlist.add_if_absent(details("tt1", "Heat"));
        watchlist.update_ratings(0, Some(8.0), BTreeMap::new());

        watchlist.update_ratings(0, None, BTreeMap::from([(1, 6.0)]));

        let entry = watchlist.get(0).unwrap();
        assert_eq!(entry.user_overall, Some(8.0));
        assert_eq!(entry.episode_ratings, BTreeMap::from([(1, 6.0)]));
    }

    #[test]
    fn update_ratings_out_of_range_is_a_noop() {
        let mut watchlist = Watchlist::default();
        assert!(!watchlist.update_ratings(0, Some(5.0), BTreeMap::new()));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");

        let mut watchlist = Watchlist::default();
        watchlist.add_if_absent(details("tt1", "Heat"));
        watchlist.add_if_absent(details("tt2", "Ronin"));
        watchlist.update_ratings(1, Some(9.0), BTreeMap::from([(1, 8.0), (3, 7.5)]));
        watchlist.get_mut(1).unwrap().total_episodes = Some(6);
        watchlist.save_to(&path).unwrap();

        let loaded = Watchlist::load_from(&path);
        assert_eq!(loaded.entries, watchlist.entries);
    }

    #[test]
    fn missing_or_corrupt_data_loads_empty() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("nope.json");
        assert!(Watchlist::load_from(&missing).is_empty());

        let corrupt = dir.path().join("watchlist.json");
        std::fs::write(&corrupt, "not json at all").unwrap();
        assert!(Watchlist::load_from(&corrupt).is_empty());

        let wrong_shape = dir.path().join("wrong.json");
        std::fs::write(&wrong_shape, r#"{"entries": [{"bogus": true}]}"#).unwrap();
        assert!(Watchlist::load_from(&wrong_shape).is_empty());
    }
}
