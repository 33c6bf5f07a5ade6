//! The default-track updater.
//!
//! Jellyfin has no endpoint for setting an episode's default subtitle or
//! audio track directly. The trick is to report a simulated playback
//! session at the episode's last known position carrying the wanted
//! stream indexes: a progress report followed by a stopped report, both
//! with the same payload. The server persists the indexes as the new
//! defaults.

use crate::client::Session;
use crate::error::{JellyfinError, Result};
use crate::types::{Item, MediaStream, PlaybackReport};
use tracing::{debug, info};

impl Session {
    /// Set an episode's default subtitle and audio tracks.
    ///
    /// The desired streams are identified by their (display title,
    /// index) pair; a display title alone is not unique. Returns
    /// `(subtitle_changed, audio_changed)`. An axis whose descriptor
    /// matches none of the episode's streams keeps its current default
    /// and comes back `false`; if neither matches, nothing is written.
    ///
    /// The result reflects only this call's match against the episode's
    /// current streams, so repeating the call with the same descriptors
    /// reports changed again.
    ///
    /// If the second of the two writes fails the server may be left in
    /// an intermediate state; nothing is rolled back.
    pub async fn update_defaults(
        &self,
        episode_id: &str,
        subtitle: &MediaStream,
        audio: &MediaStream,
    ) -> Result<(bool, bool)> {
        let episode = self.episode(episode_id).await?;

        let (report, subtitle_changed, audio_changed) =
            plan_report(episode_id, &episode, subtitle, audio)?;

        if subtitle_changed || audio_changed {
            self.report_playback(episode_id, "Progress", &report).await?;
            self.report_playback(episode_id, "Stopped", &report).await?;

            info!(
                episode_id = %episode_id,
                subtitle_changed,
                audio_changed,
                "Updated default tracks"
            );
        }

        Ok((subtitle_changed, audio_changed))
    }

    async fn report_playback(
        &self,
        episode_id: &str,
        kind: &str,
        report: &PlaybackReport,
    ) -> Result<()> {
        let url = format!("{}/Sessions/Playing/{}", self.base_url, kind);
        debug!(url = %url, episode_id = %episode_id, "Reporting playback state");

        let response = self.post(&url).json(report).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(JellyfinError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

/// Decide what to write for an episode, without touching the network.
///
/// Seeds the payload from the episode's current defaults and playback
/// position, then scans the stream list once in order. Per stream the
/// subtitle descriptor is checked before the audio descriptor and only
/// one branch can fire, mirroring the server-side selection behavior
/// this routine replays.
pub(crate) fn plan_report(
    episode_id: &str,
    episode: &Item,
    subtitle: &MediaStream,
    audio: &MediaStream,
) -> Result<(PlaybackReport, bool, bool)> {
    let source = episode
        .media_sources
        .as_deref()
        .and_then(|sources| sources.first())
        .ok_or_else(|| JellyfinError::MissingMediaSources {
            item_id: episode_id.to_string(),
        })?;

    let user_data = episode
        .user_data
        .as_ref()
        .ok_or_else(|| JellyfinError::MissingUserData {
            item_id: episode_id.to_string(),
        })?;

    let mut report = PlaybackReport {
        item_id: episode_id.to_string(),
        media_source_id: episode_id.to_string(),
        subtitle_stream_index: source.default_subtitle_stream_index,
        audio_stream_index: source.default_audio_stream_index,
        position_ticks: user_data.playback_position_ticks,
    };

    let mut subtitle_changed = false;
    let mut audio_changed = false;

    for stream in episode.media_streams.as_deref().unwrap_or_default() {
        if stream.display_title == subtitle.display_title && stream.index == subtitle.index {
            report.subtitle_stream_index = Some(subtitle.index);
            subtitle_changed = true;
        } else if stream.display_title == audio.display_title && stream.index == audio.index {
            report.audio_stream_index = Some(audio.index);
            audio_changed = true;
        }
    }

    Ok((report, subtitle_changed, audio_changed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn episode_with_streams(streams: serde_json::Value) -> Item {
        serde_json::from_value(json!({
            "Id": "ep1",
            "Name": "Pilot",
            "Type": "Episode",
            "MediaSources": [{
                "Id": "ep1",
                "DefaultSubtitleStreamIndex": 1,
                "DefaultAudioStreamIndex": 0
            }],
            "MediaStreams": streams,
            "UserData": { "PlaybackPositionTicks": 5000 }
        }))
        .expect("valid episode json")
    }

    fn descriptor(title: &str, index: i32) -> MediaStream {
        MediaStream {
            index,
            display_title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn subtitle_match_sets_index_and_flag() {
        let episode = episode_with_streams(json!([
            { "Index": 2, "Type": "Subtitle", "DisplayTitle": "English" },
            { "Index": 3, "Type": "Subtitle", "DisplayTitle": "Japanese" }
        ]));

        let (report, subs, audio) = plan_report(
            "ep1",
            &episode,
            &descriptor("Japanese", 3),
            &descriptor("Stereo", 0),
        )
        .unwrap();

        assert!(subs);
        assert!(!audio);
        assert_eq!(report.subtitle_stream_index, Some(3));
        // Audio axis untouched: prior default preserved.
        assert_eq!(report.audio_stream_index, Some(0));
        assert_eq!(report.position_ticks, 5000);
        assert_eq!(report.item_id, "ep1");
        assert_eq!(report.media_source_id, "ep1");
    }

    #[test]
    fn audio_match_is_independent() {
        let episode = episode_with_streams(json!([
            { "Index": 0, "Type": "Audio", "DisplayTitle": "Stereo" },
            { "Index": 2, "Type": "Subtitle", "DisplayTitle": "English" }
        ]));

        let (report, subs, audio) = plan_report(
            "ep1",
            &episode,
            &descriptor("French", 9),
            &descriptor("Stereo", 0),
        )
        .unwrap();

        assert!(!subs);
        assert!(audio);
        assert_eq!(report.subtitle_stream_index, Some(1));
        assert_eq!(report.audio_stream_index, Some(0));
    }

    #[test]
    fn no_match_keeps_current_defaults() {
        let episode = episode_with_streams(json!([
            { "Index": 2, "Type": "Subtitle", "DisplayTitle": "English" }
        ]));

        let (report, subs, audio) = plan_report(
            "ep1",
            &episode,
            &descriptor("Japanese", 3),
            &descriptor("Stereo", 0),
        )
        .unwrap();

        assert!(!subs);
        assert!(!audio);
        assert_eq!(report.subtitle_stream_index, Some(1));
        assert_eq!(report.audio_stream_index, Some(0));
    }

    #[test]
    fn label_alone_is_not_a_match() {
        // Same display title at a different index must not match.
        let episode = episode_with_streams(json!([
            { "Index": 4, "Type": "Subtitle", "DisplayTitle": "Japanese" }
        ]));

        let (_, subs, _) = plan_report(
            "ep1",
            &episode,
            &descriptor("Japanese", 3),
            &descriptor("Stereo", 0),
        )
        .unwrap();

        assert!(!subs);
    }

    #[test]
    fn subtitle_branch_wins_when_stream_satisfies_both() {
        // One stream matching both descriptors only ever updates the
        // subtitle axis: the branches are exclusive per stream.
        let episode = episode_with_streams(json!([
            { "Index": 5, "Type": "Subtitle", "DisplayTitle": "Commentary" }
        ]));

        let (report, subs, audio) = plan_report(
            "ep1",
            &episode,
            &descriptor("Commentary", 5),
            &descriptor("Commentary", 5),
        )
        .unwrap();

        assert!(subs);
        assert!(!audio);
        assert_eq!(report.subtitle_stream_index, Some(5));
        assert_eq!(report.audio_stream_index, Some(0));
    }

    #[test]
    fn missing_media_sources_is_fatal() {
        let episode: Item = serde_json::from_value(json!({
            "Id": "ep1",
            "UserData": { "PlaybackPositionTicks": 0 }
        }))
        .unwrap();

        let result = plan_report(
            "ep1",
            &episode,
            &descriptor("English", 2),
            &descriptor("Stereo", 0),
        );

        assert!(matches!(
            result,
            Err(JellyfinError::MissingMediaSources { .. })
        ));
    }

    #[test]
    fn empty_media_sources_is_fatal() {
        let episode: Item = serde_json::from_value(json!({
            "Id": "ep1",
            "MediaSources": [],
            "UserData": { "PlaybackPositionTicks": 0 }
        }))
        .unwrap();

        let result = plan_report(
            "ep1",
            &episode,
            &descriptor("English", 2),
            &descriptor("Stereo", 0),
        );

        assert!(matches!(
            result,
            Err(JellyfinError::MissingMediaSources { .. })
        ));
    }

    #[test]
    fn missing_user_data_is_fatal() {
        let episode: Item = serde_json::from_value(json!({
            "Id": "ep1",
            "MediaSources": [{ "Id": "ep1" }]
        }))
        .unwrap();

        let result = plan_report(
            "ep1",
            &episode,
            &descriptor("English", 2),
            &descriptor("Stereo", 0),
        );

        assert!(matches!(result, Err(JellyfinError::MissingUserData { .. })));
    }

    #[test]
    fn missing_stream_list_means_no_changes() {
        let episode: Item = serde_json::from_value(json!({
            "Id": "ep1",
            "MediaSources": [{ "Id": "ep1", "DefaultAudioStreamIndex": 0 }],
            "UserData": { "PlaybackPositionTicks": 42 }
        }))
        .unwrap();

        let (report, subs, audio) = plan_report(
            "ep1",
            &episode,
            &descriptor("English", 2),
            &descriptor("Stereo", 0),
        )
        .unwrap();

        assert!(!subs);
        assert!(!audio);
        assert_eq!(report.subtitle_stream_index, None);
        assert_eq!(report.audio_stream_index, Some(0));
        assert_eq!(report.position_ticks, 42);
    }
}
