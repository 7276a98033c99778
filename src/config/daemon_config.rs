use serde::Deserialize;

/// Connection settings for the external backup daemon's HTTP API.
#[derive(Deserialize, Debug, Clone)]
pub struct DaemonConfig {
    pub api_url: String,
    /// Timeout for outbound calls, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    10
}
