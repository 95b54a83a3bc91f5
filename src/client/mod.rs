//! Dashboard client: fetches reports from the service and turns them into charts.

pub mod dashboards;
pub mod state;
pub mod transform;

use serde_json::Value;

use crate::errors::ApiResponse;

/// Failure fetching a single report.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{path} responded with status {status}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    #[error("{path} reported an error: {message}")]
    Rejected { path: String, message: String },
}

/// Thin HTTP client over the report endpoints.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET one report and return the envelope's `data` rows.
    ///
    /// A successful envelope without `data` yields no rows.
    pub async fn fetch_report(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Value>, ClientError> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = reqwest::Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if !params.is_empty() {
            let mut qs = url.query_pairs_mut();
            for (k, v) in params {
                qs.append_pair(k, v);
            }
        }

        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiResponse<Value>>(&body)
                .map(|envelope| envelope.message)
                .unwrap_or(body);
            return Err(ClientError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<Vec<Value>> = resp.json().await?;
        if envelope.error {
            return Err(ClientError::Rejected {
                path: path.to_string(),
                message: envelope.message,
            });
        }

        tracing::debug!(path, message = %envelope.message, "Fetched report");
        Ok(envelope.data.unwrap_or_default())
    }
}
