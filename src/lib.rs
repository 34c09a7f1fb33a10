//! `tubeinfo` - Playback descriptors from upstream player responses
//!
//! # Features
//!
//! - **Format classification**: MIME, codec family, dimensions, DASH and live markers
//! - **Captions**: native tracks merged with synthesized translations
//! - **Playability**: age/region, embed and rental restrictions, offline live streams
//! - **Freshness**: cache reuse tied to descriptor age and cipher validity
//!
//! # Example
//!
//! ```rust,no_run
//! use tubeinfo::{EngineConfig, PlaybackDescriptor, PlayerResponse};
//!
//! fn main() -> anyhow::Result<()> {
//!     let json = std::fs::read_to_string("player_response.json")?;
//!     let response = PlayerResponse::from_json(&json)?;
//!     let descriptor = PlaybackDescriptor::assemble(response, &EngineConfig::load()?);
//!
//!     if !descriptor.is_valid() {
//!         println!("Stub document, fetch again");
//!     }
//!     println!("{} formats, volume {:.2}", descriptor.formats().len(), descriptor.volume_level());
//!     Ok(())
//! }
//! ```

pub mod builders;
pub mod captions;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod format;
pub mod playability;
pub mod response;
pub mod timing;
pub mod tracking;

pub use builders::{DashManifestBuilder, RegularUrlList, StoryboardParser, UrlListBuilder};
pub use captions::{Caption, CaptionTrack, TranslatedCaptionTrack, TranslationLanguage};
pub use config::EngineConfig;
pub use descriptor::{normalize_volume, CipherOracle, PlaybackDescriptor};
pub use error::{Result, TubeInfoError};
pub use format::{classify, CodecFamily, FormatKind, MediaFormat, MimeType, NormalizedFormat, RawFormat};
pub use playability::{Playability, PlayabilityStatus};
pub use response::{PlayerResponse, VideoDetails};
pub use timing::{LiveTiming, SegmentTiming};
pub use tracking::{TrackingParams, TrackingSource};

/// Version of tubeinfo
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
