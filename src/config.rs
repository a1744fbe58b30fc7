use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the persisted JSON blobs.
    pub data_dir: PathBuf,
    /// Gemini API key; when unset, description drafting degrades to fallback copy.
    pub gemini_api_key: Option<String>,
    /// Upper bound on a description-drafting call, in seconds.
    pub describe_timeout_secs: u64,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = env::var("EBURGER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let describe_timeout_secs = env::var("DESCRIBE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);
        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        Ok(Self {
            data_dir,
            gemini_api_key,
            describe_timeout_secs,
            admin_username,
            admin_password,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            gemini_api_key: None,
            describe_timeout_secs: 1,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}
