use crate::warehouse::error::WarehouseError;
use crate::warehouse::response::{dataframe_from_reply, ErrorReply, QueryReply};
use crate::warehouse::runner::QueryRunner;
use async_trait::async_trait;
use log::{info, warn};
use polars::frame::DataFrame;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::task;

/// Production [`QueryRunner`] speaking the BigQuery REST `jobs.query`
/// protocol.
///
/// Requests are authenticated with a bearer token the caller resolves up
/// front; the client never reads credentials itself. Queries run
/// synchronously: the reply either carries the full result or is rejected
/// with [`WarehouseError::JobIncomplete`].
pub struct BigQueryClient {
    http: Client,
    endpoint: String,
    project_id: String,
    token: String,
}

impl BigQueryClient {
    /// Creates a client for `project_id` behind `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::ClientBuild`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        endpoint: &str,
        project_id: &str,
        token: String,
        timeout: Duration,
    ) -> Result<Self, WarehouseError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WarehouseError::ClientBuild)?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            token,
        })
    }

    fn query_url(&self) -> String {
        format!("{}/projects/{}/queries", self.endpoint, self.project_id)
    }
}

#[async_trait]
impl QueryRunner for BigQueryClient {
    async fn run_query(&self, sql: &str) -> Result<DataFrame, WarehouseError> {
        let url = self.query_url();
        info!("Submitting warehouse query to {}", url);

        let body = json!({ "query": sql, "useLegacySql": false });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| WarehouseError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorReply>(&body) {
                Ok(reply) => {
                    warn!(
                        "Warehouse error {} (code {}) for {}: {}",
                        status, reply.error.code, url, reply.error.message
                    );
                    reply.error.message
                }
                Err(_) => {
                    warn!("Warehouse error {} for {} with opaque body", status, url);
                    body.chars().take(200).collect()
                }
            };
            return Err(WarehouseError::Api { status, message });
        }

        let reply: QueryReply = response
            .json()
            .await
            .map_err(|e| WarehouseError::ReplyDecode(url.clone(), e))?;
        if let Some(total) = reply.total_rows.as_deref() {
            info!("Warehouse reported {} result rows for {}", total, url);
        }

        let df = task::spawn_blocking(move || dataframe_from_reply(reply)).await??;
        info!("Decoded {} forecast rows from {}", df.height(), url);
        Ok(df)
    }
}
