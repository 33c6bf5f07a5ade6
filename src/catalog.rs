//! Catalog browsing: show search, seasons, episodes.
//!
//! Each operation is a direct query translation. Whatever the server
//! returns comes back unfiltered; remote errors surface unmodified.

use crate::client::Session;
use crate::error::Result;
use crate::types::{Item, ItemsResult, SearchHint, SearchHintsResult};
use tracing::debug;

impl Session {
    /// Search for shows matching a free-text term.
    pub async fn search_shows(&self, term: &str) -> Result<Vec<SearchHint>> {
        let url = format!(
            "{}/Search/Hints?searchTerm={}&includeItemTypes=Series",
            self.base_url,
            urlencoding::encode(term)
        );
        debug!(url = %url, term = %term, "Searching shows");

        let response = self.get(&url).send().await?;
        let result: SearchHintsResult = Self::read_json(response, "search hints").await?;

        debug!(results = result.search_hints.len(), "Search complete");
        Ok(result.search_hints)
    }

    /// List the seasons of a show.
    pub async fn seasons(&self, show_id: &str) -> Result<Vec<Item>> {
        let url = format!("{}/Shows/{}/Seasons", self.base_url, show_id);
        debug!(url = %url, show_id = %show_id, "Fetching seasons");

        let response = self.get(&url).send().await?;
        let result: ItemsResult = Self::read_json(response, "seasons response").await?;

        Ok(result.items)
    }

    /// List the episodes of one season of a show.
    pub async fn episodes(&self, show_id: &str, season_id: &str) -> Result<Vec<Item>> {
        let url = format!(
            "{}/Shows/{}/Episodes?seasonId={}",
            self.base_url,
            show_id,
            urlencoding::encode(season_id)
        );
        debug!(url = %url, show_id = %show_id, season_id = %season_id, "Fetching episodes");

        let response = self.get(&url).send().await?;
        let result: ItemsResult = Self::read_json(response, "episodes response").await?;

        Ok(result.items)
    }

    /// Fetch the full record of a single episode, including media
    /// sources, streams, and the caller's playback data.
    pub async fn episode(&self, episode_id: &str) -> Result<Item> {
        let url = format!(
            "{}/Users/{}/Items/{}?Fields=MediaSources,MediaStreams",
            self.base_url, self.user_id, episode_id
        );
        debug!(url = %url, episode_id = %episode_id, "Fetching episode");

        let response = self.get(&url).send().await?;
        Self::read_json(response, "episode record").await
    }
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
