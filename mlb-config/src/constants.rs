/// JSON pointer of the one recognized key in the config blob (§6).
pub const INTERVAL_CONFIG_PATH: &str = "/controller/interval";

/// Fallback interval, in seconds, used when the config blob is absent,
/// unreadable, or missing the recognized key.
pub const DEFAULT_INTERVAL_SECS: i64 = 10;

/// Default Ocn step count per adjustment (§6 "Default parameters at boot").
pub const DEFAULT_DELTA_OCN: i64 = 3;

/// Identifies this controller to its collaborators (logging, OffsetSink
/// metadata).
pub const APP_ID: &str = "mlb-server";
