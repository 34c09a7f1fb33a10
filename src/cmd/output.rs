use serde::Serialize;

use tubeinfo::{PlaybackDescriptor, PlayabilityStatus, SegmentTiming};

/// Machine-readable view of a descriptor.
#[derive(Debug, Serialize)]
pub struct DescriptorSummary<'a> {
    pub video_id: Option<&'a str>,
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub length_seconds: Option<&'a str>,
    pub view_count: Option<&'a str>,
    pub is_live: bool,
    pub is_low_latency: bool,
    pub playability: &'a PlayabilityStatus,
    pub playability_message: Option<&'a str>,
    pub is_valid: bool,
    pub adaptive_formats: usize,
    pub regular_formats: usize,
    pub restricted_formats: usize,
    pub captions: usize,
    pub dash_manifest_url: Option<&'a str>,
    pub hls_manifest_url: Option<&'a str>,
    pub is_hfr: bool,
    pub is_stream_seekable: bool,
    pub has_extended_hls_formats: bool,
    pub extended_hls_formats_broken: bool,
    pub volume_level: f32,
    pub timing: &'a SegmentTiming,
    pub event_id: Option<&'a str>,
    pub created_at: String,
}

impl<'a> DescriptorSummary<'a> {
    pub fn new(descriptor: &'a PlaybackDescriptor) -> Self {
        Self {
            video_id: descriptor.video_id(),
            title: descriptor.title(),
            author: descriptor.author(),
            length_seconds: descriptor.length_seconds(),
            view_count: descriptor.view_count(),
            is_live: descriptor.is_live(),
            is_low_latency: descriptor.is_low_latency_stream(),
            playability: descriptor.playability_status(),
            playability_message: descriptor.playability_message(),
            is_valid: descriptor.is_valid(),
            adaptive_formats: descriptor.adaptive_formats().count(),
            regular_formats: descriptor.regular_formats().count(),
            restricted_formats: descriptor.restricted_formats().count(),
            captions: descriptor.captions().len(),
            dash_manifest_url: descriptor.dash_manifest_url(),
            hls_manifest_url: descriptor.hls_manifest_url(),
            is_hfr: descriptor.is_hfr(),
            is_stream_seekable: descriptor.is_stream_seekable(),
            has_extended_hls_formats: descriptor.has_extended_hls_formats(),
            extended_hls_formats_broken: descriptor.is_extended_hls_formats_broken(),
            volume_level: descriptor.volume_level(),
            timing: descriptor.timing(),
            event_id: descriptor.event_id(),
            created_at: descriptor.created_at().to_rfc3339(),
        }
    }
}

pub fn print_text(summary: &DescriptorSummary<'_>) {
    println!("🎬 {}", summary.title.unwrap_or("<untitled>"));
    if let Some(author) = summary.author {
        println!("   by {author}");
    }
    if let Some(id) = summary.video_id {
        println!("   id: {id}");
    }

    println!("\n▶️  Playability: {:?}", summary.playability);
    if let Some(message) = summary.playability_message {
        println!("   {message}");
    }
    println!(
        "   Valid: {}",
        if summary.is_valid { "yes" } else { "no (fetch again)" }
    );

    println!("\n📦 Formats:");
    println!("   Adaptive:   {}", summary.adaptive_formats);
    println!("   Regular:    {}", summary.regular_formats);
    println!("   Restricted: {}", summary.restricted_formats);
    println!("   Captions:   {}", summary.captions);

    println!("\n🔗 Manifests:");
    println!("   DASH: {}", summary.dash_manifest_url.unwrap_or("-"));
    println!("   HLS:  {}", summary.hls_manifest_url.unwrap_or("-"));
    println!("   HFR: {}, seekable: {}", summary.is_hfr, summary.is_stream_seekable);
    println!(
        "   Extended HLS: {}{}",
        summary.has_extended_hls_formats,
        if summary.extended_hls_formats_broken { " (broken)" } else { "" }
    );

    if summary.is_live {
        println!("\n📡 Live{}:", if summary.is_low_latency { " (low latency)" } else { "" });
        println!("   Start segment: {}", summary.timing.start_segment_num);
        println!("   Segment duration: {}µs", summary.timing.segment_duration_us);
    }

    println!("\n🔊 Volume: {:.3}", summary.volume_level);
}
