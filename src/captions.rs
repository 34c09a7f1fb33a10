//! Caption track merging.
//!
//! The document lists native caption tracks and, separately, the languages
//! the upstream can machine-translate into. Merging produces one list: the
//! native tracks followed by a synthesized track for every translation
//! language that no native track's origin already covers.

use std::sync::LazyLock;

use once_cell::unsync::OnceCell;
use regex::Regex;
use serde::Serialize;

/// Trailing parenthetical of a track name, e.g. `"(auto-generated)"`.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*\)$").unwrap());

/// Query parameter asking the caption endpoint for a translation.
const TRANSLATION_PARAM: &str = "tlang";

/// A caption track shipped with the video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptionTrack {
    pub language_code: String,
    pub name: String,
    pub is_autogenerated: bool,
    pub base_url: String,
    pub vss_id: Option<String>,
}

/// A language the upstream can translate captions into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationLanguage {
    pub language_code: String,
    pub name: String,
}

/// A caption track synthesized from an origin track and a target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedCaptionTrack {
    pub origin: CaptionTrack,
    pub language: TranslationLanguage,
    pub tag: Option<String>,
}

impl TranslatedCaptionTrack {
    pub fn new(origin: CaptionTrack, language: TranslationLanguage, tag: Option<String>) -> Self {
        Self {
            origin,
            language,
            tag,
        }
    }

    pub fn language_code(&self) -> &str {
        &self.language.language_code
    }

    /// Target language name, followed by the origin's tag if it had one.
    pub fn name(&self) -> String {
        match &self.tag {
            Some(tag) => format!("{} {tag}", self.language.name),
            None => self.language.name.clone(),
        }
    }

    /// Origin URL with the translation target appended.
    pub fn base_url(&self) -> String {
        let separator = if self.origin.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}{TRANSLATION_PARAM}={}",
            self.origin.base_url, self.language.language_code
        )
    }
}

/// Entry of the merged caption list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Caption {
    Native(CaptionTrack),
    Translated(TranslatedCaptionTrack),
}

impl Caption {
    pub fn language_code(&self) -> &str {
        match self {
            Self::Native(track) => &track.language_code,
            Self::Translated(track) => track.language_code(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Native(track) => track.name.clone(),
            Self::Translated(track) => track.name(),
        }
    }

    pub fn base_url(&self) -> String {
        match self {
            Self::Native(track) => track.base_url.clone(),
            Self::Translated(track) => track.base_url(),
        }
    }

    pub fn is_autogenerated(&self) -> bool {
        match self {
            Self::Native(track) => track.is_autogenerated,
            Self::Translated(track) => track.origin.is_autogenerated,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, Self::Translated(_))
    }
}

/// First non-autogenerated track, else the first track.
pub fn find_origin_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|track| !track.is_autogenerated)
        .or_else(|| tracks.first())
}

/// Trailing parenthetical of a track name.
pub fn extract_tag(name: &str) -> Option<String> {
    TAG_REGEX.find(name).map(|m| m.as_str().to_string())
}

/// Merge native tracks with synthesized translations.
pub fn merge(tracks: &[CaptionTrack], languages: &[TranslationLanguage]) -> Vec<Caption> {
    let mut merged: Vec<Caption> = tracks.iter().cloned().map(Caption::Native).collect();

    if languages.is_empty() {
        return merged;
    }

    let Some(origin) = find_origin_track(tracks) else {
        return merged;
    };

    let tag = extract_tag(&origin.name);

    merged.extend(
        languages
            .iter()
            .filter(|language| language.language_code != origin.language_code)
            .map(|language| {
                Caption::Translated(TranslatedCaptionTrack::new(
                    origin.clone(),
                    language.clone(),
                    tag.clone(),
                ))
            }),
    );

    tracing::debug!(
        origin = %origin.language_code,
        native = tracks.len(),
        total = merged.len(),
        "Merged caption tracks"
    );

    merged
}

/// Caption inputs of a descriptor, merged on first read.
#[derive(Debug, Clone, Default)]
pub struct CaptionSource {
    tracks: Vec<CaptionTrack>,
    languages: Vec<TranslationLanguage>,
    merged: OnceCell<Vec<Caption>>,
}

impl CaptionSource {
    pub fn new(tracks: Vec<CaptionTrack>, languages: Vec<TranslationLanguage>) -> Self {
        Self {
            tracks,
            languages,
            merged: OnceCell::new(),
        }
    }

    pub fn native_tracks(&self) -> &[CaptionTrack] {
        &self.tracks
    }

    pub fn translation_languages(&self) -> &[TranslationLanguage] {
        &self.languages
    }

    /// The merged list. Computed once; later calls return the cached list.
    pub fn merged(&self) -> &[Caption] {
        self.merged
            .get_or_init(|| merge(&self.tracks, &self.languages))
    }
}
