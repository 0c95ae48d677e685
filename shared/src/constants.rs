use std::time::Duration;

/// Traffic-data service the live dashboard polls. Overridable on the command
/// line with `--base-url=`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const TRAFFIC_DATA_PATH: &str = "/api/traffic-data";

/// One snapshot request per second, first request immediately on mount.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Initial map viewport: central Chennai.
pub const MAP_CENTER_LAT: f64 = 13.0827;
pub const MAP_CENTER_LNG: f64 = 80.2707;
pub const MAP_ZOOM: u32 = 12;

/// Redraw/input cadence of the terminal UI.
pub const UI_TICK: Duration = Duration::from_millis(100);

/// Stacked alerts are spaced this many rows apart so simultaneous alerts
/// never overlap.
pub const ALERT_SLOT_ROWS: u16 = 4;

#[must_use]
pub fn traffic_data_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), TRAFFIC_DATA_PATH)
}

/// Degrees of longitude visible across the map canvas at `MAP_ZOOM`,
/// roughly four tile-widths worth of the mercator grid.
#[must_use]
pub fn map_span_lng() -> f64 {
    360.0 / f64::from(1u32 << MAP_ZOOM) * 4.0
}
