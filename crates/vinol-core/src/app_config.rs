use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub user_agent: String,
    /// `None` means requests never time out.
    pub request_timeout_secs: Option<u64>,
    pub cache_ttl_hours: u64,
    /// `None` keeps the rating cache in memory for the life of the process.
    pub cache_dir: Option<PathBuf>,
    pub retailer_base_url: String,
    pub untappd_base_url: String,
    pub hachette_base_url: String,
}
