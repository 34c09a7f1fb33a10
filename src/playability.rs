//! Playability classification from the document's status fields.

use serde::Serialize;

use crate::tracking::TrackingParams;

pub const STATUS_UNPLAYABLE: &str = "UNPLAYABLE";
pub const STATUS_ERROR: &str = "ERROR";
pub const STATUS_OFFLINE: &str = "LIVE_STREAM_OFFLINE";
pub const STATUS_LOGIN_REQUIRED: &str = "LOGIN_REQUIRED";
pub const STATUS_AGE_CHECK_REQUIRED: &str = "AGE_CHECK_REQUIRED";
pub const STATUS_CONTENT_CHECK_REQUIRED: &str = "CONTENT_CHECK_REQUIRED";

const EMBED_RESTRICTED: [&str; 2] = [STATUS_UNPLAYABLE, STATUS_ERROR];
const AGE_RESTRICTED: [&str; 3] = [
    STATUS_LOGIN_REQUIRED,
    STATUS_AGE_CHECK_REQUIRED,
    STATUS_CONTENT_CHECK_REQUIRED,
];

/// Separator between the reason and the description in messages.
const MESSAGE_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlayabilityStatus {
    Playable,
    /// The video cannot be embedded.
    EmbedRestricted,
    AgeOrRegionRestricted,
    /// A live stream that isn't on air. The document is still valid.
    Offline,
    /// Embed-restricted, but a trailer can be played instead.
    Rentable { trailer_id: String },
}

impl PlayabilityStatus {
    /// Classify the raw `playabilityStatus.status` string.
    pub fn classify(status: Option<&str>, trailer_id: Option<&str>) -> Self {
        let Some(status) = status else {
            return Self::Playable;
        };

        if EMBED_RESTRICTED.contains(&status) {
            return match trailer_id {
                Some(trailer_id) => Self::Rentable {
                    trailer_id: trailer_id.to_string(),
                },
                None => Self::EmbedRestricted,
            };
        }

        if AGE_RESTRICTED.contains(&status) {
            return Self::AgeOrRegionRestricted;
        }

        if status == STATUS_OFFLINE {
            return Self::Offline;
        }

        Self::Playable
    }

    pub fn is_embed_restricted(&self) -> bool {
        matches!(self, Self::EmbedRestricted | Self::Rentable { .. })
    }

    pub fn is_age_restricted(&self) -> bool {
        matches!(self, Self::AgeOrRegionRestricted)
    }

    pub fn is_unplayable(&self) -> bool {
        self.is_embed_restricted() || self.is_age_restricted()
    }

    pub fn is_rent(&self) -> bool {
        matches!(self, Self::Rentable { .. })
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }

    pub fn trailer_id(&self) -> Option<&str> {
        match self {
            Self::Rentable { trailer_id } => Some(trailer_id),
            _ => None,
        }
    }
}

/// Classified status plus the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playability {
    pub status: PlayabilityStatus,
    pub message: Option<String>,
}

impl Playability {
    pub fn classify(
        status: Option<&str>,
        reason: Option<&str>,
        description: Option<&str>,
        trailer_id: Option<&str>,
    ) -> Self {
        let classified = PlayabilityStatus::classify(status, trailer_id);
        if classified != PlayabilityStatus::Playable {
            tracing::debug!(status = ?status, reason = ?reason, "Video not playable as-is");
        }

        Self {
            status: classified,
            message: combine_message(reason, description),
        }
    }

    /// A document is valid when it is an offline live stream or carries
    /// watch-history tracking data.
    pub fn is_valid(&self, tracking: &TrackingParams) -> bool {
        self.status.is_offline() || tracking.has_history_data()
    }
}

/// Join reason and description, skipping whichever is missing.
pub fn combine_message(reason: Option<&str>, description: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [reason, description]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(MESSAGE_SEPARATOR))
    }
}
