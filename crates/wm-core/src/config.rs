//! Dashboard timing and link configuration

use crate::{CoreError, CoreResult};
use std::time::Duration;

pub const DEFAULT_DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// Pan animation length and the delay before the popup opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanTiming {
    pub pan: Duration,
    pub popup_delay: Duration,
}

impl PanTiming {
    pub const fn from_millis(pan: u64, popup_delay: u64) -> Self {
        Self {
            pan: Duration::from_millis(pan),
            popup_delay: Duration::from_millis(popup_delay),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Quiet period after the last filter edit before a query is issued
    pub debounce: Duration,
    /// Timing for a direct marker click
    pub click: PanTiming,
    /// Timing for a selection arriving from the filter/dashboard layer
    pub external_select: PanTiming,
    /// Directions URL prefix; `lat,lon` is appended
    pub directions_base: String,
    /// Optional boundary outline (GeoJSON)
    pub boundary_url: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            click: PanTiming::from_millis(600, 400),
            external_select: PanTiming::from_millis(500, 300),
            directions_base: DEFAULT_DIRECTIONS_BASE.to_string(),
            boundary_url: None,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by `WM_*` environment variables
    pub fn from_env() -> CoreResult<Self> {
        let defaults = Self::default();
        let config = Self {
            debounce: env_millis("WM_DEBOUNCE_MS", defaults.debounce)?,
            click: PanTiming {
                pan: env_millis("WM_PAN_MS", defaults.click.pan)?,
                popup_delay: env_millis("WM_POPUP_DELAY_MS", defaults.click.popup_delay)?,
            },
            external_select: PanTiming {
                pan: env_millis("WM_SELECT_PAN_MS", defaults.external_select.pan)?,
                popup_delay: env_millis(
                    "WM_SELECT_POPUP_DELAY_MS",
                    defaults.external_select.popup_delay,
                )?,
            },
            directions_base: std::env::var("WM_DIRECTIONS_BASE")
                .unwrap_or(defaults.directions_base),
            boundary_url: std::env::var("WM_BOUNDARY_URL").ok().or(defaults.boundary_url),
        };
        config.validate()?;
        Ok(config)
    }

    /// The popup must open while the pan is still underway
    pub fn validate(&self) -> CoreResult<()> {
        for (name, timing) in [("click", self.click), ("external select", self.external_select)] {
            if timing.popup_delay >= timing.pan {
                return Err(CoreError::Config(format!(
                    "{name} popup delay ({:?}) must be shorter than the pan ({:?})",
                    timing.popup_delay, timing.pan
                )));
            }
        }
        if self.directions_base.is_empty() {
            return Err(CoreError::Config("directions base URL is empty".to_string()));
        }
        Ok(())
    }
}

fn env_millis(key: &str, default: Duration) -> CoreResult<Duration> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| CoreError::Config(format!("invalid {key} value {raw:?}: {e}"))),
        Err(_) => Ok(default),
    }
}
