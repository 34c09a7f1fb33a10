//! Seams to the manifest builders that consume a finished descriptor.
//!
//! DASH manifest synthesis and storyboard parsing live outside this crate;
//! they plug in through the traits below. [`RegularUrlList`] is the one
//! builder shipped here: the progressive URLs of a descriptor, in document
//! order.

use crate::descriptor::PlaybackDescriptor;
use crate::error::Result;

/// Synthesizes a DASH MPD from a descriptor.
pub trait DashManifestBuilder {
    fn build_mpd(&self, descriptor: &PlaybackDescriptor) -> Result<Vec<u8>>;
}

/// Builds the ordered URI list used for progressive playback.
pub trait UrlListBuilder {
    fn build_uri_list(&self, descriptor: &PlaybackDescriptor) -> Vec<String>;
}

/// Parses a raw storyboard spec into a storyboard model.
pub trait StoryboardParser {
    type Storyboard;

    fn parse(&self, spec: &str) -> Option<Self::Storyboard>;
}

/// URLs of the regular formats that carry one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegularUrlList;

impl UrlListBuilder for RegularUrlList {
    fn build_uri_list(&self, descriptor: &PlaybackDescriptor) -> Vec<String> {
        descriptor
            .regular_formats()
            .filter_map(|format| format.url().map(str::to_string))
            .collect()
    }
}
