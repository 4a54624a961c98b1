use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    pub start_block: Option<u64>,
    pub end_block: Option<u64>,
    pub chunk_size: u64,
    pub classify_concurrency: usize,
    pub output_path: String,
    pub metrics: MetricsConfig,
}
