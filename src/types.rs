//! Types for the Jellyfin API requests and responses.
//!
//! These mirror the JSON shapes of the handful of endpoints this crate
//! uses. Fields the server may omit are lenient via `#[serde(default)]`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity this client reports to the server.
///
/// Jellyfin requires every request to carry an `X-Emby-Authorization`
/// header naming the client, device, and (once logged in) the access
/// token.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
    pub device_name: String,
    pub device_id: String,
}

impl ClientInfo {
    /// Create a client identity with a fresh random device id.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            device_name: name.clone(),
            name,
            version: version.into(),
            device_id: Uuid::new_v4().to_string(),
        }
    }

    /// The `X-Emby-Authorization` header value, with the token appended
    /// once authenticated.
    pub(crate) fn authorization(&self, token: Option<&str>) -> String {
        match token {
            Some(token) => format!(
                r#"MediaBrowser Client="{}", Device="{}", DeviceId="{}", Version="{}", Token="{}""#,
                self.name, self.device_name, self.device_id, self.version, token
            ),
            None => format!(
                r#"MediaBrowser Client="{}", Device="{}", DeviceId="{}", Version="{}""#,
                self.name, self.device_name, self.device_id, self.version
            ),
        }
    }
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

// =============================================================================
// Discovery Types
// =============================================================================

/// Response from `GET /System/Info/Public`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicSystemInfo {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub id: String,
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for `POST /Users/AuthenticateByName`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticateRequest {
    pub username: String,
    pub pw: String,
}

/// Response from a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    pub user: UserDto,
    pub access_token: String,
    #[serde(default)]
    pub server_id: Option<String>,
}

/// Jellyfin user record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Response from `GET /Search/Hints`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchHintsResult {
    #[serde(default)]
    pub search_hints: Vec<SearchHint>,
    #[serde(default)]
    pub total_record_count: i32,
}

/// One search result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchHint {
    pub item_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub production_year: Option<i32>,
}

/// Paged item listing, as returned by the seasons and episodes endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResult {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub total_record_count: i32,
}

/// A catalog item (show, season, or episode).
///
/// Listings return a sparse record; fetching a single episode through
/// [`Session::episode`](crate::Session::episode) fills in the media
/// sources, streams, and user data the updater needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub season_id: Option<String>,
    #[serde(default)]
    pub index_number: Option<i32>,
    #[serde(default)]
    pub parent_index_number: Option<i32>,
    #[serde(default)]
    pub run_time_ticks: Option<i64>,
    #[serde(default)]
    pub media_sources: Option<Vec<MediaSource>>,
    #[serde(default)]
    pub media_streams: Option<Vec<MediaStream>>,
    #[serde(default)]
    pub user_data: Option<UserItemData>,
}

/// A playable media source attached to an item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaSource {
    pub id: String,
    #[serde(default)]
    pub default_audio_stream_index: Option<i32>,
    #[serde(default)]
    pub default_subtitle_stream_index: Option<i32>,
}

/// A selectable track (video, audio, or subtitle) on an item.
///
/// Display titles are not unique on their own; callers identify a track
/// by the (display title, index) pair.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStream {
    pub index: i32,
    #[serde(rename = "Type", default)]
    pub stream_type: String,
    #[serde(default)]
    pub display_title: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Per-user playback state attached to an item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserItemData {
    #[serde(default)]
    pub playback_position_ticks: i64,
    #[serde(default)]
    pub play_count: i32,
    #[serde(default)]
    pub played: bool,
}

// =============================================================================
// Playback Report Types
// =============================================================================

/// Payload for `POST /Sessions/Playing/Progress` and
/// `POST /Sessions/Playing/Stopped`.
///
/// Reporting a simulated playback session at the episode's last known
/// position is how Jellyfin persists default-track choices; there is no
/// dedicated preference endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackReport {
    pub item_id: String,
    pub media_source_id: String,
    pub subtitle_stream_index: Option<i32>,
    pub audio_stream_index: Option<i32>,
    pub position_ticks: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_header_without_token() {
        let info = ClientInfo::new("TestClient", "1.2.3");
        let header = info.authorization(None);

        assert!(header.starts_with(r#"MediaBrowser Client="TestClient""#));
        assert!(header.contains(r#"Version="1.2.3""#));
        assert!(!header.contains("Token"));
    }

    #[test]
    fn authorization_header_with_token() {
        let info = ClientInfo::new("TestClient", "1.2.3");
        let header = info.authorization(Some("abc123"));

        assert!(header.ends_with(r#"Token="abc123""#));
    }

    #[test]
    fn fresh_device_ids_differ() {
        let a = ClientInfo::new("c", "1");
        let b = ClientInfo::new("c", "1");
        assert_ne!(a.device_id, b.device_id);
    }

    #[test]
    fn item_deserializes_sparse_record() {
        let item: Item = serde_json::from_str(r#"{"Id": "ep1", "Name": "Pilot"}"#).unwrap();

        assert_eq!(item.id, "ep1");
        assert_eq!(item.name.as_deref(), Some("Pilot"));
        assert!(item.media_sources.is_none());
        assert!(item.user_data.is_none());
    }

    #[test]
    fn playback_report_serializes_pascal_case() {
        let report = PlaybackReport {
            item_id: "ep1".into(),
            media_source_id: "ep1".into(),
            subtitle_stream_index: Some(3),
            audio_stream_index: None,
            position_ticks: 1234,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ItemId"], "ep1");
        assert_eq!(json["SubtitleStreamIndex"], 3);
        assert!(json["AudioStreamIndex"].is_null());
        assert_eq!(json["PositionTicks"], 1234);
    }
}
