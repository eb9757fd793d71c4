use crate::config::env::SupabaseConfig;
use crate::domain::ports::TableProbe;
use crate::utils::error::{Result, ToolError};
use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Minimal client for the PostgREST endpoint behind a Supabase project.
pub struct SupabaseRestClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

/// Error body returned by PostgREST for failed requests.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<serde_json::Value>,
    hint: Option<serde_json::Value>,
}

impl SupabaseRestClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            api_key: config.api_key.clone(),
        })
    }

    pub fn table_url(&self, table: &str) -> Result<Url> {
        self.base_url
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| ToolError::InvalidConfigValueError {
                field: "table".to_string(),
                value: table.to_string(),
                reason: format!("Cannot build request URL: {}", e),
            })
    }
}

#[async_trait]
impl TableProbe for SupabaseRestClient {
    async fn count_rows(&self, table: &str) -> Result<u64> {
        let url = self.table_url(table)?;
        tracing::debug!("Counting rows: GET {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("select", "count"), ("limit", "1")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await?;
            return Err(remote_error(status.as_u16(), &body));
        }

        let header_count = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range);
        if let Some(count) = header_count {
            return Ok(count);
        }

        let body: serde_json::Value = response.json().await?;
        count_from_body(&body).ok_or_else(|| {
            ToolError::processing("response carried neither a Content-Range header nor a count")
        })
    }
}

/// `0-0/12` and `*/0` carry a total; `0-0/*` does not.
fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

fn count_from_body(body: &serde_json::Value) -> Option<u64> {
    body.as_array()?.first()?.get("count")?.as_u64()
}

fn remote_error(status: u16, body: &str) -> ToolError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => {
            let mut message = err.message.unwrap_or_else(|| body.to_string());
            if let Some(details) = err.details.filter(|d| !d.is_null()) {
                message.push_str(&format!(" (details: {})", details));
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_null()) {
                message.push_str(&format!(" (hint: {})", hint));
            }
            ToolError::RemoteQueryError {
                status,
                code: err.code,
                message,
            }
        }
        Err(_) => ToolError::RemoteQueryError {
            status,
            code: None,
            message: if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                body.trim().to_string()
            },
        },
    }
}
