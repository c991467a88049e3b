use std::path::PathBuf;

use mlb_contracts::ParameterName;

use crate::cli::Cli;
use crate::constants::DEFAULT_DELTA_OCN;
use crate::loader::load_interval_secs;

/// Fully-resolved boot configuration: CLI flags layered with the
/// JSON-config-blob interval lookup (§6).
#[derive(Debug, Clone)]
pub struct Config {
    pub ca_path: PathBuf,
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
    pub topo_source_endpoint: String,
    pub offset_sink_endpoint: String,
    pub management_api_port: u16,
    pub ric_action_id: i32,
    pub overload_threshold: i32,
    pub target_threshold: i32,
    pub interval_secs: i64,
    pub delta_ocn: i64,
}

impl Config {
    /// Resolves a `Config` from already-parsed CLI flags, reading the
    /// interval from the configured JSON blob if one is present.
    pub fn from_cli(cli: Cli) -> Self {
        let interval_secs = load_interval_secs(cli.config_path.as_deref().map(std::path::Path::new));

        Self {
            ca_path: PathBuf::from(cli.ca_path),
            key_path: PathBuf::from(cli.key_path),
            cert_path: PathBuf::from(cli.cert_path),
            topo_source_endpoint: cli.topo_source_endpoint,
            offset_sink_endpoint: cli.offset_sink_endpoint,
            management_api_port: cli.management_api_port,
            ric_action_id: cli.ric_action_id,
            overload_threshold: cli.overload_threshold,
            target_threshold: cli.target_threshold,
            interval_secs,
            delta_ocn: DEFAULT_DELTA_OCN,
        }
    }

    /// Loads configuration from `std::env::args()` plus environment
    /// variables (clap's `env` fallback), then resolves the interval.
    pub fn from_env() -> Self {
        Self::from_cli(<Cli as clap::Parser>::parse())
    }
}

/// The parameter names a [`Config`] seeds at boot, re-exported for
/// collaborators that only need the key set, not the values.
pub const SEEDED_PARAMETERS: [ParameterName; 4] = ParameterName::ALL;
