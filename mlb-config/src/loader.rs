use std::path::Path;

use tracing::warn;

use crate::constants::{DEFAULT_INTERVAL_SECS, INTERVAL_CONFIG_PATH};

/// Reads the tick interval from the JSON configuration blob at `path`.
///
/// Falls back to [`DEFAULT_INTERVAL_SECS`] — logged as a warning, not an
/// error — if the file is missing, unreadable, not valid JSON, or lacks
/// the `/controller/interval` key. Mirrors the upstream config
/// collaborator's "set interval to default interval" behavior on any
/// config error (see DESIGN.md).
pub fn load_interval_secs(path: Option<&Path>) -> i64 {
    let Some(path) = path else {
        warn!("no config path configured; using default interval of {DEFAULT_INTERVAL_SECS}s");
        return DEFAULT_INTERVAL_SECS;
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("could not read config file {}: {e}; using default interval", path.display());
            return DEFAULT_INTERVAL_SECS;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            warn!("config file {} is not valid JSON: {e}; using default interval", path.display());
            return DEFAULT_INTERVAL_SECS;
        }
    };

    match value.pointer(INTERVAL_CONFIG_PATH).and_then(|v| v.as_i64()) {
        Some(interval) => interval,
        None => {
            warn!(
                "config file {} missing {INTERVAL_CONFIG_PATH}; using default interval",
                path.display()
            );
            DEFAULT_INTERVAL_SECS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_uses_default() {
        assert_eq!(load_interval_secs(None), DEFAULT_INTERVAL_SECS);
    }

    #[test]
    fn valid_blob_returns_configured_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"controller": {{"interval": 30}}}}"#).unwrap();
        assert_eq!(load_interval_secs(Some(file.path())), 30);
    }

    #[test]
    fn blob_missing_key_uses_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"other": 1}}"#).unwrap();
        assert_eq!(load_interval_secs(Some(file.path())), DEFAULT_INTERVAL_SECS);
    }

    #[test]
    fn invalid_json_uses_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert_eq!(load_interval_secs(Some(file.path())), DEFAULT_INTERVAL_SECS);
    }
}
