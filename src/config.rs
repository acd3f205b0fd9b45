use crate::gateway::HttpGateway;
use crate::theme::Theme;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const API_URL_ENV: &str = "NEWSLENS_API_URL";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Settings shared by the CLI and the web views.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub theme: Theme,
}

impl Config {
    pub fn gateway(&self) -> HttpGateway {
        HttpGateway::new(&self.api_url)
    }
}
