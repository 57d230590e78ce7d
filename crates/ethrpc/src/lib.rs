pub mod alloy;

use {::alloy::providers::DynProvider, std::time::Duration};

pub type AlloyProvider = DynProvider;

#[derive(Debug, Clone)]
pub struct Config {
    /// Timeout for every individual HTTP request sent to the node.
    pub http_timeout: Duration,

    /// Label attached to all requests of the provider. Shows up in logs and
    /// metrics.
    pub label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(10),
            label: "main".to_string(),
        }
    }
}
