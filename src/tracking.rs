//! Tracking parameters recovered from the watch-time URL.
//!
//! Downstream history and analytics calls need the `ei`, `vm` and `of`
//! values the upstream embeds in its watch-time tracking URL. They are parsed
//! lazily, once. A caller may seed them beforehand (e.g. from a companion
//! document fetched without a cipher) and seeded values always win.

use once_cell::unsync::OnceCell;
use serde::Serialize;
use url::Url;

pub const PARAM_EVENT_ID: &str = "ei";
pub const PARAM_VISITOR_MONITORING: &str = "vm";
pub const PARAM_OF: &str = "of";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackingParams {
    pub event_id: Option<String>,
    pub visitor_monitoring_data: Option<String>,
    pub of_param: Option<String>,
}

impl TrackingParams {
    /// Event id and visitor data are both present. Documents without them
    /// carry no watch-history data and are treated as stubs.
    pub fn has_history_data(&self) -> bool {
        self.event_id.is_some() && self.visitor_monitoring_data.is_some()
    }

    fn is_seeded(&self) -> bool {
        self.event_id.is_some() || self.visitor_monitoring_data.is_some()
    }
}

/// Parse the tracking triple from a URL's query string.
///
/// A URL that doesn't parse yields no values.
pub fn extract(tracking_url: &str) -> TrackingParams {
    let Ok(url) = Url::parse(tracking_url) else {
        tracing::debug!("Unparsable tracking URL");
        return TrackingParams::default();
    };

    let mut params = TrackingParams::default();
    for (key, value) in url.query_pairs() {
        let slot = match key.as_ref() {
            PARAM_EVENT_ID => &mut params.event_id,
            PARAM_VISITOR_MONITORING => &mut params.visitor_monitoring_data,
            PARAM_OF => &mut params.of_param,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    params
}

/// Tracking URL plus caller seeds, resolved on first read.
#[derive(Debug, Clone, Default)]
pub struct TrackingSource {
    url: Option<String>,
    seeded: TrackingParams,
    resolved: OnceCell<TrackingParams>,
}

impl TrackingSource {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            seeded: TrackingParams::default(),
            resolved: OnceCell::new(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Replace the tracking URL. Has no effect once params were read.
    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    /// Seed values from another source. `None` fields are left alone.
    pub fn seed(&mut self, params: TrackingParams) {
        let targets = [Some(&mut self.seeded), self.resolved.get_mut()];
        for target in targets.into_iter().flatten() {
            if params.event_id.is_some() {
                target.event_id.clone_from(&params.event_id);
            }
            if params.visitor_monitoring_data.is_some() {
                target
                    .visitor_monitoring_data
                    .clone_from(&params.visitor_monitoring_data);
            }
            if params.of_param.is_some() {
                target.of_param.clone_from(&params.of_param);
            }
        }
    }

    /// The resolved triple. Parsed at most once.
    pub fn params(&self) -> &TrackingParams {
        self.resolved.get_or_init(|| self.resolve())
    }

    fn resolve(&self) -> TrackingParams {
        if self.seeded.is_seeded() {
            return self.seeded.clone();
        }

        let Some(url) = self.url.as_deref() else {
            return self.seeded.clone();
        };

        let parsed = extract(url);
        TrackingParams {
            of_param: self.seeded.of_param.clone().or(parsed.of_param),
            ..parsed
        }
    }
}
