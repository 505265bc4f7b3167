/// Conventional name of the events file.
pub const DEFAULT_EVENTS_FILE: &str = "~/calendar_events.json";

/// Date key format in the events file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format for events.
pub const TIME_FORMAT: &str = "%H:%M";

/// Format of `created_at` timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Width of a rendered month grid: seven two-column cells plus separators.
pub const GRID_WIDTH: usize = 20;
