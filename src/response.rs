//! Player response binding.
//!
//! Deserializes the upstream player response into flat input records. The
//! schema drifts between revisions, so every field is optional and binds on
//! its own: scalars are accepted as either strings or numbers, and a field
//! of an unexpected shape is logged and left empty without taking its
//! siblings down with it.

use serde::Deserialize;

use crate::captions::{CaptionTrack, TranslationLanguage};
use crate::error::Result;
use crate::format::RawFormat;

/// Caption `kind` of speech-recognition tracks.
const KIND_ASR: &str = "asr";

/// Video metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoDetails {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub video_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub length_seconds: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub channel_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub short_description: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub view_count: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub is_live: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub is_live_content: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub is_low_latency_live_stream: bool,
}

/// Fields of a player response consumed by the assembler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerResponse {
    pub adaptive_formats: Vec<RawFormat>,
    pub regular_formats: Vec<RawFormat>,
    pub restricted_formats: Vec<RawFormat>,
    pub caption_tracks: Vec<CaptionTrack>,
    pub translation_languages: Vec<TranslationLanguage>,
    pub hls_manifest_url: Option<String>,
    pub dash_manifest_url: Option<String>,
    pub watch_time_url: Option<String>,
    pub playback_url: Option<String>,
    pub video_details: Option<VideoDetails>,
    pub playability_status: Option<String>,
    pub playability_reason: Option<String>,
    pub playability_description: Option<String>,
    pub trailer_video_id: Option<String>,
    pub storyboard_spec: Option<String>,
    pub start_timestamp: Option<String>,
    pub upload_date: Option<String>,
    /// `0.0` when not reported.
    pub loudness_db: f32,
}

impl PlayerResponse {
    /// Bind a player response from JSON text.
    ///
    /// # Errors
    ///
    /// Only when the input isn't JSON at all; schema drift never fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: RawDocument = serde_json::from_str(json)?;
        Ok(document.into())
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: RawDocument = serde_json::from_slice(bytes)?;
        Ok(document.into())
    }
}

impl From<RawDocument> for PlayerResponse {
    fn from(doc: RawDocument) -> Self {
        let tracklist = doc.captions.player_captions_tracklist_renderer.unwrap_or_default();
        let error_screen = doc.playability_status.error_screen.unwrap_or_default();
        let microformat = doc.microformat.player_microformat_renderer.unwrap_or_default();
        #[allow(clippy::cast_possible_truncation)]
        let loudness_db = doc
            .player_config
            .audio_config
            .and_then(|c| c.loudness_db)
            .unwrap_or_default() as f32;

        Self {
            adaptive_formats: doc.streaming_data.adaptive_formats,
            regular_formats: doc.streaming_data.formats,
            restricted_formats: doc
                .playability_status
                .paygated_qualities_metadata
                .map(|meta| meta.restricted_adaptive_formats)
                .unwrap_or_default(),
            caption_tracks: tracklist
                .caption_tracks
                .into_iter()
                .map(CaptionTrack::from)
                .collect(),
            translation_languages: tracklist
                .translation_languages
                .into_iter()
                .map(TranslationLanguage::from)
                .collect(),
            hls_manifest_url: doc.streaming_data.hls_manifest_url,
            dash_manifest_url: doc.streaming_data.dash_manifest_url,
            watch_time_url: doc
                .playback_tracking
                .videostats_watchtime_url
                .and_then(|u| u.base_url),
            playback_url: doc
                .playback_tracking
                .videostats_playback_url
                .and_then(|u| u.base_url),
            video_details: doc.video_details,
            playability_status: doc.playability_status.status,
            playability_reason: doc
                .playability_status
                .reason
                .and_then(TextValue::into_text),
            playability_description: error_screen
                .player_error_message_renderer
                .and_then(|r| r.subreason)
                .and_then(TextValue::into_text),
            trailer_video_id: error_screen
                .player_legacy_desktop_ypc_trailer_renderer
                .and_then(|r| r.trailer_video_id),
            storyboard_spec: doc
                .storyboards
                .player_storyboard_spec_renderer
                .and_then(|r| r.spec),
            start_timestamp: microformat
                .live_broadcast_details
                .and_then(|d| d.start_timestamp),
            upload_date: microformat.upload_date.or(microformat.publish_date),
            loudness_db,
        }
    }
}

impl From<CaptionTrackJson> for CaptionTrack {
    fn from(json: CaptionTrackJson) -> Self {
        Self {
            language_code: json.language_code.unwrap_or_default(),
            name: json.name.and_then(TextValue::into_text).unwrap_or_default(),
            is_autogenerated: json.kind.as_deref() == Some(KIND_ASR),
            base_url: json.base_url.unwrap_or_default(),
            vss_id: json.vss_id,
        }
    }
}

impl From<TranslationLanguageJson> for TranslationLanguage {
    fn from(json: TranslationLanguageJson) -> Self {
        Self {
            language_code: json.language_code.unwrap_or_default(),
            name: json
                .language_name
                .and_then(TextValue::into_text)
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// Upstream document shape
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    streaming_data: StreamingData,
    #[serde(deserialize_with = "lenient::or_default")]
    captions: Captions,
    #[serde(deserialize_with = "lenient::or_default")]
    playback_tracking: PlaybackTracking,
    #[serde(deserialize_with = "lenient::or_default")]
    video_details: Option<VideoDetails>,
    #[serde(deserialize_with = "lenient::or_default")]
    playability_status: PlayabilityJson,
    #[serde(deserialize_with = "lenient::or_default")]
    storyboards: Storyboards,
    #[serde(deserialize_with = "lenient::or_default")]
    microformat: Microformat,
    #[serde(deserialize_with = "lenient::or_default")]
    player_config: PlayerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StreamingData {
    #[serde(deserialize_with = "lenient::vec_skip_invalid")]
    formats: Vec<RawFormat>,
    #[serde(deserialize_with = "lenient::vec_skip_invalid")]
    adaptive_formats: Vec<RawFormat>,
    #[serde(deserialize_with = "lenient::opt_string")]
    hls_manifest_url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    dash_manifest_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Captions {
    #[serde(deserialize_with = "lenient::or_default")]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TracklistRenderer {
    #[serde(deserialize_with = "lenient::vec_skip_invalid")]
    caption_tracks: Vec<CaptionTrackJson>,
    #[serde(deserialize_with = "lenient::vec_skip_invalid")]
    translation_languages: Vec<TranslationLanguageJson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CaptionTrackJson {
    #[serde(deserialize_with = "lenient::opt_string")]
    base_url: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    name: Option<TextValue>,
    #[serde(deserialize_with = "lenient::opt_string")]
    vss_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    language_code: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TranslationLanguageJson {
    #[serde(deserialize_with = "lenient::opt_string")]
    language_code: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    language_name: Option<TextValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlaybackTracking {
    #[serde(deserialize_with = "lenient::or_default")]
    videostats_watchtime_url: Option<BaseUrl>,
    #[serde(deserialize_with = "lenient::or_default")]
    videostats_playback_url: Option<BaseUrl>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BaseUrl {
    #[serde(deserialize_with = "lenient::opt_string")]
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlayabilityJson {
    #[serde(deserialize_with = "lenient::opt_string")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    reason: Option<TextValue>,
    #[serde(deserialize_with = "lenient::or_default")]
    error_screen: Option<ErrorScreen>,
    #[serde(deserialize_with = "lenient::or_default")]
    paygated_qualities_metadata: Option<PaygatedQualities>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorScreen {
    #[serde(deserialize_with = "lenient::or_default")]
    player_error_message_renderer: Option<ErrorMessageRenderer>,
    #[serde(deserialize_with = "lenient::or_default")]
    player_legacy_desktop_ypc_trailer_renderer: Option<TrailerRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorMessageRenderer {
    #[serde(deserialize_with = "lenient::or_default")]
    subreason: Option<TextValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TrailerRenderer {
    #[serde(deserialize_with = "lenient::opt_string")]
    trailer_video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PaygatedQualities {
    #[serde(deserialize_with = "lenient::vec_skip_invalid")]
    restricted_adaptive_formats: Vec<RawFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Storyboards {
    #[serde(
        alias = "playerLiveStoryboardSpecRenderer",
        deserialize_with = "lenient::or_default"
    )]
    player_storyboard_spec_renderer: Option<StoryboardSpecRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoryboardSpecRenderer {
    #[serde(deserialize_with = "lenient::opt_string")]
    spec: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Microformat {
    #[serde(deserialize_with = "lenient::or_default")]
    player_microformat_renderer: Option<MicroformatRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MicroformatRenderer {
    #[serde(deserialize_with = "lenient::opt_string")]
    upload_date: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    publish_date: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    live_broadcast_details: Option<LiveBroadcastDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LiveBroadcastDetails {
    #[serde(deserialize_with = "lenient::opt_string")]
    start_timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlayerConfig {
    #[serde(deserialize_with = "lenient::or_default")]
    audio_config: Option<AudioConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AudioConfig {
    #[serde(deserialize_with = "lenient::opt_f64")]
    loudness_db: Option<f64>,
}

/// Upstream text: a plain string, `{simpleText}` or `{runs: [{text}]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Plain(String),
    #[serde(rename_all = "camelCase")]
    Rich {
        #[serde(default)]
        simple_text: Option<String>,
        #[serde(default)]
        runs: Vec<TextRun>,
    },
}

#[derive(Debug, Deserialize)]
struct TextRun {
    #[serde(default)]
    text: String,
}

impl TextValue {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Plain(text) => Some(text),
            Self::Rich {
                simple_text: Some(text),
                ..
            } => Some(text),
            Self::Rich { runs, .. } if !runs.is_empty() => {
                Some(runs.into_iter().map(|run| run.text).collect())
            }
            Self::Rich { .. } => None,
        }
    }
}

/// Deserializers that tolerate upstream type drift.
pub(crate) mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Any scalar as a string.
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    /// A number, or a string holding one.
    pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// A number, or a string holding one.
    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// The value, or its default if it has an unexpected shape.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::debug!("Dropping malformed section: {err}");
            T::default()
        }))
    }

    /// A list, skipping entries with an unexpected shape.
    pub fn vec_skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    tracing::debug!("Skipping malformed list entry: {err}");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "playabilityStatus": {
            "status": "OK",
            "reason": "Sign in",
            "errorScreen": {
                "playerErrorMessageRenderer": { "subreason": { "runs": [{"text": "Part "}, {"text": "two"}] } },
                "playerLegacyDesktopYpcTrailerRenderer": { "trailerVideoId": "trailer1" }
            }
        },
        "streamingData": {
            "formats": [
                { "itag": 18, "url": "https://r.example/videoplayback?itag=18", "mimeType": "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"", "width": 640, "height": 360, "qualityLabel": "360p", "bitrate": 500000 }
            ],
            "adaptiveFormats": [
                { "itag": 137, "mimeType": "video/mp4; codecs=\"avc1.640028\"", "width": 1920, "height": 1080, "qualityLabel": "1080p", "contentLength": "12345" },
                "garbage",
                { "itag": "140", "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"" }
            ],
            "hlsManifestUrl": "https://manifest.example/hls",
            "dashManifestUrl": "https://manifest.example/dash/hfr/all"
        },
        "captions": {
            "playerCaptionsTracklistRenderer": {
                "captionTracks": [
                    { "baseUrl": "https://t.example/timedtext?v=x", "name": { "simpleText": "English (auto-generated)" }, "vssId": "a.en", "languageCode": "en", "kind": "asr" }
                ],
                "translationLanguages": [
                    { "languageCode": "fr", "languageName": { "simpleText": "French" } }
                ]
            }
        },
        "playbackTracking": {
            "videostatsWatchtimeUrl": { "baseUrl": "https://s.example/api/stats/watchtime?ei=E&vm=V&of=O" }
        },
        "videoDetails": {
            "videoId": "abc123",
            "title": "A video",
            "lengthSeconds": "212",
            "viewCount": 1000,
            "author": "Someone",
            "isLive": false,
            "isLowLatencyLiveStream": true
        },
        "storyboards": { "playerStoryboardSpecRenderer": { "spec": "https://i.example/sb/$L/$N.jpg|48#27#100" } },
        "microformat": { "playerMicroformatRenderer": { "uploadDate": "2020-01-01", "liveBroadcastDetails": { "startTimestamp": "2020-01-01T10:00:00+00:00" } } },
        "playerConfig": { "audioConfig": { "loudnessDb": -3.5 } }
    }"#;

    #[test]
    fn binds_full_document() {
        let response = PlayerResponse::from_json(DOCUMENT).unwrap();

        assert_eq!(response.regular_formats.len(), 1);
        assert_eq!(response.regular_formats[0].itag.as_deref(), Some("18"));
        assert_eq!(response.adaptive_formats.len(), 2);
        assert_eq!(response.adaptive_formats[0].content_length, Some(12345));
        assert_eq!(response.adaptive_formats[1].itag.as_deref(), Some("140"));

        assert_eq!(response.caption_tracks.len(), 1);
        assert!(response.caption_tracks[0].is_autogenerated);
        assert_eq!(response.caption_tracks[0].name, "English (auto-generated)");
        assert_eq!(response.translation_languages[0].name, "French");

        let details = response.video_details.as_ref().unwrap();
        assert_eq!(details.view_count.as_deref(), Some("1000"));
        assert_eq!(details.length_seconds.as_deref(), Some("212"));
        assert!(details.is_low_latency_live_stream);

        assert_eq!(response.playability_description.as_deref(), Some("Part two"));
        assert_eq!(response.trailer_video_id.as_deref(), Some("trailer1"));
        assert_eq!(response.upload_date.as_deref(), Some("2020-01-01"));
        assert!(response.storyboard_spec.is_some());
        assert!((response.loudness_db - -3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_document_binds_to_defaults() {
        let response = PlayerResponse::from_json("{}").unwrap();
        assert_eq!(response, PlayerResponse::default());
    }

    #[test]
    fn drifted_section_is_dropped() {
        let response = PlayerResponse::from_json(
            r#"{ "videoDetails": ["unexpected"], "playabilityStatus": { "status": "OK" } }"#,
        )
        .unwrap();
        assert_eq!(response.video_details, None);
        assert_eq!(response.playability_status.as_deref(), Some("OK"));
    }

    #[test]
    fn drifted_field_keeps_its_siblings() {
        let response = PlayerResponse::from_json(
            r#"{
                "playabilityStatus": { "status": "LIVE_STREAM_OFFLINE", "reason": { "simpleText": "Soon" }, "errorScreen": [] },
                "streamingData": { "dashManifestUrl": ["x"], "formats": [{ "itag": 18, "url": "u", "qualityLabel": 360 }] },
                "videoDetails": { "videoId": "abc", "isLive": "yes" },
                "playerConfig": { "audioConfig": { "loudnessDb": "-2.5" } }
            }"#,
        )
        .unwrap();

        assert_eq!(response.playability_status.as_deref(), Some("LIVE_STREAM_OFFLINE"));
        assert_eq!(response.playability_reason.as_deref(), Some("Soon"));
        assert_eq!(response.playability_description, None);
        assert_eq!(response.dash_manifest_url, None);
        assert_eq!(response.regular_formats.len(), 1);
        assert_eq!(response.regular_formats[0].url.as_deref(), Some("u"));
        assert_eq!(response.regular_formats[0].quality_label.as_deref(), Some("360"));

        let details = response.video_details.as_ref().unwrap();
        assert_eq!(details.video_id.as_deref(), Some("abc"));
        assert!(!details.is_live);
        assert!((response.loudness_db - -2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn live_storyboard_renderer_is_accepted() {
        let response = PlayerResponse::from_json(
            r#"{ "storyboards": { "playerLiveStoryboardSpecRenderer": { "spec": "live-spec" } } }"#,
        )
        .unwrap();
        assert_eq!(response.storyboard_spec.as_deref(), Some("live-spec"));
    }

    #[test]
    fn non_json_is_an_error() {
        assert!(PlayerResponse::from_json("<html>").is_err());
    }
}
