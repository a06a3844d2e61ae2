/// `chrono` format string for Olo's compact timestamps.
pub const OLO_TIMESTAMP_FORMAT: &str = "%Y%m%d %H:%M";

/// Seconds between dashboard cleanup sweeps.
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Change-feed event name for a new order row.
pub const ORDERS_INSERT_EVENT: &str = "orders:insert";

/// Dashboard stream event names
pub const MARKER_ADD_EVENT: &str = "marker:add";
pub const MARKER_REMOVE_EVENT: &str = "marker:remove";
pub const DASHBOARD_STATS_EVENT: &str = "stats";
