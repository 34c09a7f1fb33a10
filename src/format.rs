//! Format classification.
//!
//! Turns one raw format record from the player response into a
//! [`NormalizedFormat`]: MIME type, codec family, dimensions, DASH
//! eligibility and live markers. Nothing in here fails; a record that
//! can't be classified resolves to empty dimensions and an unknown MIME.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::response::lenient;

/// Highest itag used by regular (progressive) formats.
pub const MAX_REGULAR_ITAG: u32 = 50;

/// URL fragments that mark a live-stream media URL.
pub const LIVE_URL_MARKERS: [&str; 2] = ["live=1", "yt_live_broadcast"];

// input example: video/mp4; codecs="avc1.640033"
static CODECS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"codecs="([^"]*)""#).unwrap());

/// One playable rendition as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFormat {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub itag: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub bitrate: Option<u64>,
    /// `"WxH"`, only present in older document revisions.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub width: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub height: Option<u64>,
    #[serde(alias = "type", deserialize_with = "lenient::opt_string")]
    pub mime_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub quality_label: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub global_segment_list: Option<String>,
    #[serde(alias = "cipher", deserialize_with = "lenient::opt_string")]
    pub signature_cipher: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub content_length: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub fps: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub approx_duration_ms: Option<u64>,
}

impl RawFormat {
    /// The `"WxH"` size string, synthesized from `width`/`height` when the
    /// document only carries those.
    pub fn size_string(&self) -> Option<Cow<'_, str>> {
        match (&self.size, self.width, self.height) {
            (Some(size), _, _) => Some(Cow::Borrowed(size.as_str())),
            (None, Some(w), Some(h)) => Some(Cow::Owned(format!("{w}x{h}"))),
            _ => None,
        }
    }
}

/// Normalized MIME type of a format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum MimeType {
    WebmAudio,
    WebmVideo,
    Mp4Audio,
    Mp4Video,
    /// Taken verbatim from a segment-list record.
    Other(String),
}

impl MimeType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::WebmAudio => "audio/webm",
            Self::WebmVideo => "video/webm",
            Self::Mp4Audio => "audio/mp4",
            Self::Mp4Video => "video/mp4",
            Self::Other(mime) => mime,
        }
    }

    pub fn is_audio(&self) -> bool {
        is_audio(self.as_str())
    }

    pub fn is_video(&self) -> bool {
        is_video(self.as_str())
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codec family derived from the leading codec token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CodecFamily {
    Avc,
    Av1,
    Vp9,
    Mp4a,
    Opus,
    Vorbis,
    Ec3,
    Ac3,
    Unknown,
}

impl CodecFamily {
    fn from_codecs(codecs: &str) -> Self {
        let codecs = codecs.trim_start();
        if codecs.starts_with("avc") {
            Self::Avc
        } else if codecs.starts_with("av01") {
            Self::Av1
        } else if codecs.starts_with("vp9") {
            Self::Vp9
        } else if codecs.starts_with("mp4a") {
            Self::Mp4a
        } else if codecs.starts_with("opus") {
            Self::Opus
        } else if codecs.starts_with("vorbis") {
            Self::Vorbis
        } else if codecs.starts_with("ec-3") {
            Self::Ec3
        } else if codecs.starts_with("ac-3") {
            Self::Ac3
        } else {
            Self::Unknown
        }
    }
}

/// Derived view of a [`RawFormat`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedFormat {
    /// `None` when the codec isn't recognized.
    pub mime_type: Option<MimeType>,
    /// Codec parameter of the MIME string, if it had one.
    pub codecs: Option<String>,
    /// Matches on the same prefixes as the MIME inference, so `vp09.*`
    /// stays `Unknown` just like its MIME stays `None`.
    pub codec_family: CodecFamily,
    /// Empty when the size is missing or malformed.
    pub width: String,
    /// Empty when the size is missing or malformed.
    pub height: String,
    pub is_dash: bool,
    pub is_live: bool,
}

impl NormalizedFormat {
    pub fn is_audio(&self) -> bool {
        self.mime_type.as_ref().is_some_and(MimeType::is_audio)
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.as_ref().is_some_and(MimeType::is_video)
    }
}

/// Classify a raw format record.
pub fn classify(format: &RawFormat) -> NormalizedFormat {
    let size = format.size_string();
    let (width, height) = split_size(size.as_deref());
    let codecs = extract_codecs(format);
    let codec_family = codecs
        .as_deref()
        .map_or(CodecFamily::Unknown, CodecFamily::from_codecs);

    NormalizedFormat {
        mime_type: extract_mime_type(format),
        codecs,
        codec_family,
        width,
        height,
        is_dash: is_dash(format),
        is_live: is_live_media(format),
    }
}

/// Split a `"WxH"` string into `(width, height)`.
///
/// Anything other than exactly two parts yields two empty strings.
pub fn split_size(size: Option<&str>) -> (String, String) {
    let Some(size) = size else {
        return (String::new(), String::new());
    };

    let parts: Vec<&str> = size.split('x').collect();
    match parts.as_slice() {
        [width, height] => ((*width).to_string(), (*height).to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Codec token from the record's MIME string.
pub fn extract_codecs(format: &RawFormat) -> Option<String> {
    let mime = format.mime_type.as_deref()?;
    CODECS_REGEX
        .captures(mime)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Normalized MIME type, inferred from the codec prefix.
///
/// Segment-list records are classified upstream; their MIME is returned
/// as-is.
pub fn extract_mime_type(format: &RawFormat) -> Option<MimeType> {
    if format.global_segment_list.is_some() {
        return format.mime_type.clone().map(MimeType::Other);
    }

    let Some(codecs) = extract_codecs(format) else {
        tracing::debug!(itag = ?format.itag, "No codecs in MIME string");
        return None;
    };

    mime_from_codecs(&codecs)
}

/// Map a codec string to its MIME type. First match wins.
pub fn mime_from_codecs(codecs: &str) -> Option<MimeType> {
    let codecs = codecs.trim_start();
    if codecs.starts_with("vorbis") || codecs.starts_with("opus") {
        return Some(MimeType::WebmAudio);
    }

    if codecs.starts_with("vp9") {
        return Some(MimeType::WebmVideo);
    }

    if codecs.starts_with("mp4a") || codecs.starts_with("ec-3") || codecs.starts_with("ac-3") {
        return Some(MimeType::Mp4Audio);
    }

    if codecs.starts_with("avc") || codecs.starts_with("av01") {
        return Some(MimeType::Mp4Video);
    }

    None
}

/// Whether the record is addressable as a DASH representation.
pub fn is_dash(format: &RawFormat) -> bool {
    if format.global_segment_list.is_some() {
        return true;
    }

    format.itag.as_deref().is_some_and(is_dash_itag)
}

/// Numeric itags above [`MAX_REGULAR_ITAG`] are adaptive.
pub fn is_dash_itag(itag: &str) -> bool {
    itag.parse::<u32>()
        .is_ok_and(|itag| itag > MAX_REGULAR_ITAG)
}

/// Whether the media URL points at a live stream.
pub fn is_live_media(format: &RawFormat) -> bool {
    format
        .url
        .as_deref()
        .is_some_and(|url| LIVE_URL_MARKERS.iter().any(|marker| url.contains(marker)))
}

pub fn has_media_url(format: &RawFormat) -> bool {
    format.url.is_some()
}

pub fn is_audio(mime_type: &str) -> bool {
    starts_with_ignore_case(mime_type, "audio")
}

pub fn is_video(mime_type: &str) -> bool {
    starts_with_ignore_case(mime_type, "video")
}

fn starts_with_ignore_case(word: &str, prefix: &str) -> bool {
    word.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Which list of the document a format came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    /// Segment-addressable DASH rendition.
    Adaptive,
    /// Progressive single-file rendition.
    Regular,
    /// Paywalled rendition; listed but not playable.
    Restricted,
}

/// A classified format together with the record it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFormat {
    pub kind: FormatKind,
    pub raw: RawFormat,
    pub normalized: NormalizedFormat,
}

impl MediaFormat {
    pub fn new(kind: FormatKind, raw: RawFormat) -> Self {
        let normalized = classify(&raw);
        Self {
            kind,
            raw,
            normalized,
        }
    }

    pub fn quality_label(&self) -> Option<&str> {
        self.raw.quality_label.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.raw.url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_mime(mime: &str) -> RawFormat {
        RawFormat {
            mime_type: Some(mime.to_string()),
            ..RawFormat::default()
        }
    }

    #[test]
    fn splits_well_formed_size() {
        assert_eq!(
            split_size(Some("1920x1080")),
            ("1920".to_string(), "1080".to_string())
        );
    }

    #[test]
    fn malformed_size_yields_empty_dimensions() {
        let empty = (String::new(), String::new());
        assert_eq!(split_size(None), empty);
        assert_eq!(split_size(Some("1920")), empty);
        assert_eq!(split_size(Some("1x2x3")), empty);
    }

    #[test]
    fn size_is_synthesized_from_width_and_height() {
        let format = RawFormat {
            width: Some(1280),
            height: Some(720),
            ..RawFormat::default()
        };
        let normalized = classify(&format);
        assert_eq!(normalized.width, "1280");
        assert_eq!(normalized.height, "720");
    }

    #[test]
    fn mime_from_codec_prefix() {
        let cases = [
            (r#"video/webm; codecs="vp9""#, Some(MimeType::WebmVideo)),
            (r#"audio/mp4; codecs="mp4a.40.2""#, Some(MimeType::Mp4Audio)),
            (r#"audio/webm; codecs="opus""#, Some(MimeType::WebmAudio)),
            (r#"video/mp4; codecs="avc1.640033""#, Some(MimeType::Mp4Video)),
            (r#"video/mp4; codecs="av01.0.08M.08""#, Some(MimeType::Mp4Video)),
            (r#"audio/mp4; codecs="ec-3""#, Some(MimeType::Mp4Audio)),
            (r#"video/x-unknown; codecs="hev1.1.6""#, None),
        ];

        for (mime, expected) in cases {
            assert_eq!(extract_mime_type(&with_mime(mime)), expected, "{mime}");
        }
    }

    #[test]
    fn codec_family_agrees_with_mime() {
        let padded = classify(&with_mime(r#"video/webm; codecs=" vp9""#));
        assert_eq!(padded.mime_type, Some(MimeType::WebmVideo));
        assert_eq!(padded.codec_family, CodecFamily::Vp9);

        let long_form = classify(&with_mime(r#"video/webm; codecs="vp09.00.40.08""#));
        assert_eq!(long_form.mime_type, None);
        assert_eq!(long_form.codec_family, CodecFamily::Unknown);
    }

    #[test]
    fn missing_codec_parameter_is_unknown() {
        let format = with_mime("video/mp4");
        assert_eq!(extract_codecs(&format), None);
        assert_eq!(extract_mime_type(&format), None);
        assert_eq!(classify(&format).codec_family, CodecFamily::Unknown);
        assert_eq!(extract_mime_type(&RawFormat::default()), None);
    }

    #[test]
    fn segment_list_keeps_verbatim_mime() {
        let format = RawFormat {
            mime_type: Some("video/mp4".to_string()),
            global_segment_list: Some("sq/0".to_string()),
            ..RawFormat::default()
        };
        assert_eq!(
            extract_mime_type(&format),
            Some(MimeType::Other("video/mp4".to_string()))
        );
        assert!(is_dash(&format));
    }

    #[test]
    fn dash_itag_boundary() {
        assert!(is_dash_itag("51"));
        assert!(!is_dash_itag("50"));
        assert!(!is_dash_itag("abc"));
        assert!(!is_dash(&RawFormat::default()));
    }

    #[test]
    fn live_markers_in_url() {
        let mut format = RawFormat {
            url: Some("https://host/videoplayback?live=1&itag=136".to_string()),
            ..RawFormat::default()
        };
        assert!(is_live_media(&format));

        format.url = Some("https://host/videoplayback/yt_live_broadcast/x".to_string());
        assert!(is_live_media(&format));

        format.url = Some("https://host/videoplayback?itag=22".to_string());
        assert!(!is_live_media(&format));

        format.url = None;
        assert!(!is_live_media(&format));
        assert!(!has_media_url(&format));
    }

    #[test]
    fn audio_video_prefix_is_case_insensitive() {
        assert!(is_audio("AUDIO/mp4"));
        assert!(is_video("Video/webm"));
        assert!(!is_video("audio/webm"));
        assert!(!is_audio("au"));
    }

    #[test]
    fn classify_full_record() {
        let format = RawFormat {
            itag: Some("137".to_string()),
            size: Some("1920x1080".to_string()),
            mime_type: Some(r#"video/mp4; codecs="avc1.640028""#.to_string()),
            ..RawFormat::default()
        };
        let normalized = classify(&format);
        assert_eq!(normalized.mime_type, Some(MimeType::Mp4Video));
        assert_eq!(normalized.codecs.as_deref(), Some("avc1.640028"));
        assert_eq!(normalized.codec_family, CodecFamily::Avc);
        assert!(normalized.is_dash);
        assert!(normalized.is_video());
        assert!(!normalized.is_audio());
        assert!(!normalized.is_live);
    }
}
