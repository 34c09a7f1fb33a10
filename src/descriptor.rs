//! Playback descriptor assembly.
//!
//! A [`PlaybackDescriptor`] is built once per fetched player response. It
//! holds the classified formats, the merged captions, manifest URLs and the
//! playability verdict, and it answers the questions the player asks before
//! starting playback: how loud, whether the extended HLS formats can be
//! trusted, and whether the descriptor itself can be reused or must be
//! fetched again.
//!
//! # Example
//!
//! ```rust
//! use tubeinfo::{EngineConfig, PlaybackDescriptor, PlayerResponse};
//!
//! # fn example() -> tubeinfo::Result<()> {
//! let response = PlayerResponse::from_json(r#"{"playabilityStatus": {"status": "OK"}}"#)?;
//! let descriptor = PlaybackDescriptor::assemble(response, &EngineConfig::default());
//!
//! assert!(!descriptor.contains_media());
//! assert!(!descriptor.is_cache_actual(&|| true));
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};

use crate::builders::{DashManifestBuilder, StoryboardParser, UrlListBuilder};
use crate::captions::{Caption, CaptionSource};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::format::{FormatKind, MediaFormat};
use crate::playability::{Playability, PlayabilityStatus};
use crate::response::{PlayerResponse, VideoDetails};
use crate::timing::{parse_timestamp, LiveTiming, SegmentTiming};
use crate::tracking::{TrackingParams, TrackingSource};

/// DASH manifest path segment of high-frame-rate streams.
pub const HFR_MARKER: &str = "/hfr/all";

/// Answers whether the active signature decipher routine is still valid.
pub trait CipherOracle {
    fn is_cipher_fresh(&self) -> bool;
}

impl<F: Fn() -> bool> CipherOracle for F {
    fn is_cipher_fresh(&self) -> bool {
        self()
    }
}

/// Loudness-derived playback gain.
///
/// `10^(-db/50)` capped at `cap`, or `1.0` when loudness wasn't reported,
/// then scaled by `attenuation`.
pub fn normalize_volume(loudness_db: f32, cap: f32, attenuation: f32) -> f32 {
    let gain = if loudness_db == 0.0 {
        1.0
    } else {
        10f32.powf(-loudness_db / 50.0).min(cap)
    };

    gain * attenuation
}

/// Inputs of the extended-format heuristics.
struct ExtendedFormatsProbe<'a> {
    is_live: bool,
    has_hls: bool,
    first_adaptive_quality: Option<&'a str>,
    upload_date: Option<&'a str>,
}

impl ExtendedFormatsProbe<'_> {
    fn is_full_hd(&self, config: &EngineConfig) -> bool {
        self.first_adaptive_quality == Some(config.full_hd_label.as_str())
    }

    fn available(&self, config: &EngineConfig, now: DateTime<Utc>) -> bool {
        if self.is_live || !self.has_hls || !self.is_full_hd(config) {
            return false;
        }

        let Some(uploaded) = self.upload_date.and_then(parse_timestamp) else {
            return false;
        };

        uploaded.timestamp_millis() > 0
            && config
                .extended_formats_cooldown()
                .is_some_and(|cooldown| now - uploaded > cooldown)
    }

    fn broken(&self, config: &EngineConfig) -> bool {
        !self.is_live && !self.has_hls && self.is_full_hd(config)
    }
}

/// Validated, typed playback information for one video.
#[derive(Debug, Clone)]
pub struct PlaybackDescriptor {
    details: VideoDetails,
    formats: Vec<MediaFormat>,
    captions: CaptionSource,
    dash_manifest_url: Option<String>,
    hls_manifest_url: Option<String>,
    playback_url: Option<String>,
    storyboard_spec: Option<String>,
    playability: Playability,
    tracking: TrackingSource,
    timing: SegmentTiming,
    start_timestamp: Option<String>,
    upload_date: Option<String>,
    loudness_db: f32,
    volume_level: f32,
    has_extended_hls_formats: bool,
    extended_hls_formats_broken: bool,
    created_at: DateTime<Utc>,
    cache_ttl: chrono::Duration,
}

impl PlaybackDescriptor {
    /// Assemble a descriptor from a bound player response.
    pub fn assemble(response: PlayerResponse, config: &EngineConfig) -> Self {
        Self::assemble_at(response, config, Utc::now())
    }

    /// Assemble as if the current time were `now`.
    pub fn assemble_at(response: PlayerResponse, config: &EngineConfig, now: DateTime<Utc>) -> Self {
        let details = response.video_details.unwrap_or_default();

        let formats: Vec<MediaFormat> = [
            (FormatKind::Adaptive, response.adaptive_formats),
            (FormatKind::Regular, response.regular_formats),
            (FormatKind::Restricted, response.restricted_formats),
        ]
        .into_iter()
        .flat_map(|(kind, raw)| raw.into_iter().map(move |raw| MediaFormat::new(kind, raw)))
        .collect();

        let playability = Playability::classify(
            response.playability_status.as_deref(),
            response.playability_reason.as_deref(),
            response.playability_description.as_deref(),
            response.trailer_video_id.as_deref(),
        );

        let probe = ExtendedFormatsProbe {
            is_live: details.is_live,
            has_hls: response.hls_manifest_url.is_some(),
            first_adaptive_quality: formats
                .iter()
                .find(|f| f.kind == FormatKind::Adaptive)
                .and_then(MediaFormat::quality_label),
            upload_date: response.upload_date.as_deref(),
        };
        let has_extended_hls_formats = probe.available(config, now);
        let extended_hls_formats_broken = probe.broken(config);

        let volume_level = normalize_volume(
            response.loudness_db,
            config.volume_cap,
            config.volume_attenuation,
        );

        let cache_ttl =
            chrono::Duration::from_std(config.cache_ttl()).unwrap_or(chrono::Duration::MAX);

        let descriptor = Self {
            details,
            formats,
            captions: CaptionSource::new(response.caption_tracks, response.translation_languages),
            dash_manifest_url: response.dash_manifest_url,
            hls_manifest_url: response.hls_manifest_url,
            playback_url: response.playback_url,
            storyboard_spec: response.storyboard_spec,
            playability,
            tracking: TrackingSource::new(response.watch_time_url),
            timing: SegmentTiming::default(),
            start_timestamp: response.start_timestamp,
            upload_date: response.upload_date,
            loudness_db: response.loudness_db,
            volume_level,
            has_extended_hls_formats,
            extended_hls_formats_broken,
            created_at: now,
            cache_ttl,
        };

        tracing::debug!(
            video_id = ?descriptor.video_id(),
            formats = descriptor.formats.len(),
            status = ?descriptor.playability.status,
            extended_hls = has_extended_hls_formats,
            "Assembled playback descriptor"
        );

        if extended_hls_formats_broken {
            tracing::warn!(video_id = ?descriptor.video_id(), "Full-HD video without HLS manifest");
        }

        descriptor
    }

    // ------------------------------------------------------------------------
    // Video details
    // ------------------------------------------------------------------------

    pub fn length_seconds(&self) -> Option<&str> {
        self.details.length_seconds.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.details.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.details.author.as_deref()
    }

    pub fn view_count(&self) -> Option<&str> {
        self.details.view_count.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.details.short_description.as_deref()
    }

    pub fn video_id(&self) -> Option<&str> {
        self.details.video_id.as_deref()
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.details.channel_id.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.details.is_live
    }

    pub fn is_live_content(&self) -> bool {
        self.details.is_live_content
    }

    pub fn is_low_latency_stream(&self) -> bool {
        self.details.is_low_latency_live_stream
    }

    // ------------------------------------------------------------------------
    // Media
    // ------------------------------------------------------------------------

    /// All formats, adaptive first, then regular, then restricted.
    pub fn formats(&self) -> &[MediaFormat] {
        &self.formats
    }

    pub fn formats_of(&self, kind: FormatKind) -> impl Iterator<Item = &MediaFormat> {
        self.formats.iter().filter(move |format| format.kind == kind)
    }

    pub fn adaptive_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats_of(FormatKind::Adaptive)
    }

    pub fn regular_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats_of(FormatKind::Regular)
    }

    pub fn restricted_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats_of(FormatKind::Restricted)
    }

    /// Native caption tracks followed by synthesized translations.
    pub fn captions(&self) -> &[Caption] {
        self.captions.merged()
    }

    pub fn dash_manifest_url(&self) -> Option<&str> {
        self.dash_manifest_url.as_deref()
    }

    pub fn hls_manifest_url(&self) -> Option<&str> {
        self.hls_manifest_url.as_deref()
    }

    pub fn playback_url(&self) -> Option<&str> {
        self.playback_url.as_deref()
    }

    pub fn storyboard_spec(&self) -> Option<&str> {
        self.storyboard_spec.as_deref()
    }

    pub fn contains_dash_info(&self) -> bool {
        self.adaptive_formats().next().is_some()
    }

    pub fn contains_dash_video_info(&self) -> bool {
        self.adaptive_formats().any(|f| f.normalized.is_video())
    }

    pub fn contains_hls_url(&self) -> bool {
        self.hls_manifest_url.is_some()
    }

    pub fn contains_dash_url(&self) -> bool {
        self.dash_manifest_url.is_some()
    }

    pub fn contains_url_list_info(&self) -> bool {
        self.regular_formats().next().is_some()
    }

    pub fn contains_media(&self) -> bool {
        self.contains_dash_url()
            || self.contains_hls_url()
            || self.contains_dash_video_info()
            || self.contains_url_list_info()
    }

    pub fn is_hfr(&self) -> bool {
        self.dash_manifest_url
            .as_deref()
            .is_some_and(|url| url.contains(HFR_MARKER))
    }

    pub fn has_extended_hls_formats(&self) -> bool {
        self.has_extended_hls_formats
    }

    /// Full-HD, not live, but no HLS manifest. Worth a re-fetch.
    pub fn is_extended_hls_formats_broken(&self) -> bool {
        self.extended_hls_formats_broken
    }

    pub fn is_storyboard_broken(&self) -> bool {
        !self.is_live() && self.storyboard_spec.is_none()
    }

    pub fn loudness_db(&self) -> f32 {
        self.loudness_db
    }

    /// Linear gain to apply to the audio track.
    pub fn volume_level(&self) -> f32 {
        self.volume_level
    }

    // ------------------------------------------------------------------------
    // Playability
    // ------------------------------------------------------------------------

    pub fn playability_status(&self) -> &PlayabilityStatus {
        &self.playability.status
    }

    pub fn playability_message(&self) -> Option<&str> {
        self.playability.message.as_deref()
    }

    pub fn is_unplayable(&self) -> bool {
        self.playability.status.is_unplayable()
    }

    /// Offline live streams, or documents carrying watch-history data.
    /// An invalid document should be fetched again.
    pub fn is_valid(&self) -> bool {
        self.playability.is_valid(self.tracking.params())
    }

    // ------------------------------------------------------------------------
    // Tracking
    // ------------------------------------------------------------------------

    pub fn tracking_params(&self) -> &TrackingParams {
        self.tracking.params()
    }

    pub fn event_id(&self) -> Option<&str> {
        self.tracking_params().event_id.as_deref()
    }

    pub fn visitor_monitoring_data(&self) -> Option<&str> {
        self.tracking_params().visitor_monitoring_data.as_deref()
    }

    pub fn of_param(&self) -> Option<&str> {
        self.tracking_params().of_param.as_deref()
    }

    pub fn tracking_mut(&mut self) -> &mut TrackingSource {
        &mut self.tracking
    }

    /// Copy tracking values from a companion document of the same video,
    /// e.g. one fetched without a cipher when this one lacks history data.
    pub fn merge_tracking_from(&mut self, other: &PlaybackDescriptor) {
        self.tracking.seed(other.tracking_params().clone());
    }

    // ------------------------------------------------------------------------
    // Timing
    // ------------------------------------------------------------------------

    /// Merge live timing from an out-of-band probe.
    pub fn sync(&mut self, timing: Option<&LiveTiming>) {
        self.timing.sync(timing);
    }

    pub fn timing(&self) -> &SegmentTiming {
        &self.timing
    }

    pub fn start_time_ms(&self) -> i64 {
        self.timing.start_time_ms
    }

    pub fn start_segment_num(&self) -> u32 {
        self.timing.start_segment_num
    }

    pub fn segment_duration_us(&self) -> u32 {
        self.timing.segment_duration_us
    }

    pub fn is_stream_seekable(&self) -> bool {
        self.is_hfr() || self.timing.seekable
    }

    pub fn start_timestamp(&self) -> Option<&str> {
        self.start_timestamp.as_deref()
    }

    pub fn upload_date(&self) -> Option<&str> {
        self.upload_date.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // ------------------------------------------------------------------------
    // Cache freshness
    // ------------------------------------------------------------------------

    /// Whether this descriptor can be reused instead of fetching again.
    ///
    /// Documents without media (e.g. upcoming premieres) are never reused;
    /// they have to be polled.
    pub fn is_cache_actual(&self, oracle: &dyn CipherOracle) -> bool {
        self.is_cache_actual_at(Utc::now(), oracle)
    }

    pub fn is_cache_actual_at(&self, now: DateTime<Utc>, oracle: &dyn CipherOracle) -> bool {
        self.contains_media() && self.is_created_recently(now) && oracle.is_cipher_fresh()
    }

    fn is_created_recently(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < self.cache_ttl
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    pub fn create_mpd_stream(&self, builder: &dyn DashManifestBuilder) -> Result<Vec<u8>> {
        builder.build_mpd(self)
    }

    pub fn create_url_list(&self, builder: &dyn UrlListBuilder) -> Vec<String> {
        builder.build_uri_list(self)
    }

    /// `None` when the document carries no storyboard spec.
    pub fn create_storyboard<P: StoryboardParser>(&self, parser: &P) -> Option<P::Storyboard> {
        parser.parse(self.storyboard_spec.as_deref()?)
    }
}
