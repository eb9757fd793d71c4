use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use std::time::Duration;
use url::Url;

/// Variables read for the project URL, in lookup order.
pub const URL_VARS: [&str; 2] = ["VITE_SUPABASE_URL", "SUPABASE_URL"];
/// Variables read for the access key, in lookup order.
pub const KEY_VARS: [&str; 2] = ["VITE_SUPABASE_ANON_KEY", "SUPABASE_KEY"];

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|&name| lookup(name))
                .find(|value| !value.trim().is_empty())
        };

        let url = first_set(&URL_VARS);
        let api_key = first_set(&KEY_VARS);

        let config = Self {
            url: validate_required_field(URL_VARS[0], &url)?.trim().to_string(),
            api_key: validate_required_field(KEY_VARS[0], &api_key)?
                .trim()
                .to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Result<Self> {
        validate_range("timeout_seconds", seconds, 1, 600)?;
        self.timeout = Duration::from_secs(seconds);
        Ok(self)
    }

    /// Project URL with a trailing slash, so `rest/v1/...` joins under it.
    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url).map_err(|e| ToolError::InvalidConfigValueError {
            field: URL_VARS[0].to_string(),
            value: self.url.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn setup_instructions() -> String {
        [
            format!(
                "Variables {} and {} were not found in the environment or in .env",
                URL_VARS[0], KEY_VARS[0]
            ),
            "Create a .env file with:".to_string(),
            format!("{}=https://your-project.supabase.co", URL_VARS[0]),
            format!("{}=your-anon-key", KEY_VARS[0]),
        ]
        .join("\n")
    }
}

impl Validate for SupabaseConfig {
    fn validate(&self) -> Result<()> {
        validate_url(URL_VARS[0], &self.url)?;
        validate_non_empty_string(KEY_VARS[0], &self.api_key)?;
        Ok(())
    }
}

pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("⚠️ Ignoring unreadable .env file: {}", e),
    }
}
