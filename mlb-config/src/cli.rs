use clap::Parser;

/// Command-line flags for the MLB controller binary. Every flag also
/// accepts an environment-variable fallback via clap's `env` feature,
/// matching the layering the rest of the workspace uses: CLI > env > file
/// default.
#[derive(Parser, Debug, Clone)]
#[command(name = "mlb-server", about = "Mobility load-balancing controller")]
pub struct Cli {
    /// Path to the CA certificate used for outbound TLS connections.
    #[arg(long, env = "MLB_CA_PATH")]
    pub ca_path: String,

    /// Path to the private key used for outbound TLS connections.
    #[arg(long, env = "MLB_KEY_PATH")]
    pub key_path: String,

    /// Path to the certificate used for outbound TLS connections.
    #[arg(long, env = "MLB_CERT_PATH")]
    pub cert_path: String,

    /// Path to the JSON configuration blob. Its only recognized key is
    /// `/controller/interval`; absence (of the file or the key) defaults
    /// to 10 seconds.
    #[arg(long, env = "MLB_CONFIG_PATH")]
    pub config_path: Option<String>,

    /// TopoSource endpoint, `host:port`.
    #[arg(long, env = "MLB_TOPO_SOURCE_ENDPOINT")]
    pub topo_source_endpoint: String,

    /// OffsetSink endpoint, `host:port`.
    #[arg(long, env = "MLB_OFFSET_SINK_ENDPOINT", default_value = "localhost:5150")]
    pub offset_sink_endpoint: String,

    /// Port the management API listens on.
    #[arg(long, env = "MLB_MANAGEMENT_API_PORT", default_value_t = 8443)]
    pub management_api_port: u16,

    /// RIC action ID passed through to OffsetSink.
    #[arg(long, env = "MLB_RIC_ACTION_ID", default_value_t = 10)]
    pub ric_action_id: i32,

    /// Overload threshold, percent load.
    #[arg(long, env = "MLB_OVERLOAD_THRESHOLD")]
    pub overload_threshold: i32,

    /// Target (underload) threshold, percent load.
    #[arg(long, env = "MLB_TARGET_THRESHOLD")]
    pub target_threshold: i32,
}
