//! Jellyfin default-track client
//!
//! HTTP client library for bulk-changing the default subtitle and audio
//! tracks of episodes on a Jellyfin server.
//!
//! # Features
//!
//! - **Discovery**: resolve a URL to the best reachable server address
//! - **Authentication**: username/password login yielding an immutable session
//! - **Browsing**: show search, season and episode listings
//! - **Default tracks**: per-episode default subtitle/audio updates via
//!   simulated playback reports
//!
//! # Example
//!
//! ```ignore
//! use jellytracks::resolve;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = resolve("media.example.com").await?;
//!     let session = client.authenticate("alice", "hunter2").await?;
//!
//!     let shows = session.search_shows("planet earth").await?;
//!     let seasons = session.seasons(&shows[0].item_id).await?;
//!     let episodes = session.episodes(&shows[0].item_id, &seasons[0].id).await?;
//!
//!     let episode = session.episode(&episodes[0].id).await?;
//!     let streams = episode.media_streams.unwrap_or_default();
//!     let subtitle = streams.iter().find(|s| s.stream_type == "Subtitle").unwrap();
//!     let audio = streams.iter().find(|s| s.stream_type == "Audio").unwrap();
//!
//!     let (subs_changed, audio_changed) = session
//!         .update_defaults(&episodes[0].id, subtitle, audio)
//!         .await?;
//!     println!("subtitle changed: {subs_changed}, audio changed: {audio_changed}");
//!
//!     Ok(())
//! }
//! ```

mod catalog;
mod client;
mod defaults;
mod discovery;
mod error;
mod types;

// Re-export main types
pub use client::{JellyfinClient, Session};
pub use discovery::{resolve, resolve_with_info};
pub use error::{JellyfinError, Result};
pub use types::{
    AuthenticationResult, ClientInfo, Item, ItemsResult, MediaSource, MediaStream,
    PlaybackReport, PublicSystemInfo, SearchHint, SearchHintsResult, UserDto, UserItemData,
};
