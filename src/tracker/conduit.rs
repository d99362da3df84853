//! Conduit API client
//!
//! Implements the Tracker trait against a Phabricator-style Conduit endpoint.
//! Every call is `POST {base}/api/{method}` with the JSON params (token
//! included) sent as a form field, and every answer is the
//! `{result, error_code, error_info}` envelope.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::domain::{Task, Transaction};
use crate::error::{Result, TriageError};
use crate::tracker::client::Tracker;

/// Page size for `*.search` methods
const SEARCH_LIMIT: u32 = 100;

/// Default timeout per request
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Conduit client
#[derive(Debug, Clone)]
pub struct ConduitConfig {
    pub base_url: String,
    pub api_token: String,
    pub timeout: Duration,
}

impl ConduitConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Conduit API client
pub struct ConduitClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl ConduitClient {
    /// Create a client; fails only if the HTTP client cannot be built.
    pub fn new(config: ConduitConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TriageError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/api/{}", self.base_url, method)
    }

    /// Attach the API token to a params object
    fn build_params(&self, mut params: Value) -> Value {
        params["__conduit__"] = json!({ "token": self.api_token });
        params
    }

    /// Invoke a Conduit method and unwrap its envelope.
    async fn call(&self, method: &str, params: Value) -> std::result::Result<Value, String> {
        let params = self.build_params(params).to_string();
        let response = self
            .client
            .post(self.endpoint(method))
            .form(&[("params", params.as_str()), ("output", "json"), ("__conduit__", "1")])
            .send()
            .await
            .map_err(|e| format!("{} request failed: {}", method, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("{} returned {}: {}", method, status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| format!("{} returned invalid JSON: {}", method, e))?;

        parse_envelope(method, body)
    }

    /// Collect every row of a paginated `*.search` method.
    async fn search_all(&self, method: &str, constraints: Value) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let params = json!({
                "constraints": constraints,
                "limit": SEARCH_LIMIT,
                "after": after,
            });
            let result = self.call(method, params).await.map_err(TriageError::RemoteReadFailure)?;

            if let Some(data) = result.get("data").and_then(Value::as_array) {
                rows.extend(data.iter().cloned());
            }

            let next = result
                .get("cursor")
                .and_then(|c| c.get("after"))
                .and_then(Value::as_str)
                .map(String::from);
            match next {
                None => break,
                Some(cursor) if after.as_deref() == Some(cursor.as_str()) => {
                    log::warn!("{} repeated cursor '{}', stopping pagination", method, cursor);
                    break;
                }
                Some(cursor) => after = Some(cursor),
            }
        }

        Ok(rows)
    }

    /// Build the public URI of a task
    pub fn task_uri(&self, id: u64) -> String {
        format!("{}/T{}", self.base_url, id)
    }
}

/// Unwrap a Conduit response envelope.
fn parse_envelope(method: &str, body: Value) -> std::result::Result<Value, String> {
    if let Some(code) = body.get("error_code").and_then(Value::as_str) {
        let info = body.get("error_info").and_then(Value::as_str).unwrap_or("no details");
        return Err(format!("{} failed with {}: {}", method, code, info));
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| format!("{} response has no result", method))
}

/// Parse one `maniphest.search` row.
fn parse_task(row: &Value, base_url: &str) -> Option<Task> {
    let id = row.get("id")?.as_u64()?;
    let phid = row.get("phid")?.as_str()?;
    let title = row
        .get("fields")
        .and_then(|f| f.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("");
    Some(Task::new(id, phid, title, format!("{}/T{}", base_url, id)))
}

/// Parse a `maniphest.gettasktransactions` result.
///
/// An empty map arrives as `[]`.
fn parse_transactions(result: Value) -> Result<HashMap<u64, Vec<Transaction>>> {
    let map = match result {
        Value::Object(map) => map,
        Value::Array(items) if items.is_empty() => return Ok(HashMap::new()),
        other => {
            return Err(TriageError::RemoteReadFailure(format!(
                "unexpected transaction payload: {}",
                other
            )));
        }
    };

    let mut histories = HashMap::with_capacity(map.len());
    for (key, entries) in map {
        let id: u64 = key
            .parse()
            .map_err(|_| TriageError::RemoteReadFailure(format!("bad task id key '{}'", key)))?;
        let txs: Vec<Transaction> = serde_json::from_value(entries)
            .map_err(|e| TriageError::RemoteReadFailure(format!("bad transactions for T{}: {}", id, e)))?;
        histories.insert(id, txs);
    }
    Ok(histories)
}

/// Parse `project.column.search` rows into `column id -> name`.
fn parse_columns(rows: &[Value]) -> HashMap<String, String> {
    rows.iter()
        .filter_map(|row| {
            let phid = row.get("phid")?.as_str()?;
            let name = row.get("fields")?.get("name")?.as_str()?;
            Some((phid.to_string(), name.to_string()))
        })
        .collect()
}

#[async_trait]
impl Tracker for ConduitClient {
    async fn fetch_open_tasks(&self, board_id: &str) -> Result<Vec<Task>> {
        let rows = self
            .search_all(
                "maniphest.search",
                json!({ "projects": [board_id], "statuses": ["open"] }),
            )
            .await?;

        let tasks: Vec<Task> = rows.iter().filter_map(|row| parse_task(row, &self.base_url)).collect();
        if tasks.len() != rows.len() {
            log::warn!("Ignored {} malformed task rows", rows.len() - tasks.len());
        }
        log::info!("Fetched {} open tasks on {}", tasks.len(), board_id);
        Ok(tasks)
    }

    async fn fetch_transactions(&self, task_ids: &[u64]) -> Result<HashMap<u64, Vec<Transaction>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let result = self
            .call("maniphest.gettasktransactions", json!({ "ids": task_ids }))
            .await
            .map_err(TriageError::RemoteReadFailure)?;
        let histories = parse_transactions(result)?;
        log::info!("Fetched histories for {} tasks", histories.len());
        Ok(histories)
    }

    async fn fetch_columns(&self, board_id: &str) -> Result<HashMap<String, String>> {
        let rows = self
            .search_all("project.column.search", json!({ "projects": [board_id] }))
            .await?;
        Ok(parse_columns(&rows))
    }

    async fn submit_edit(&self, task: &Task, priority_code: &str) -> Result<()> {
        let params = json!({
            "objectIdentifier": task.phid,
            "transactions": [{ "type": "priority", "value": priority_code }],
        });
        self.call("maniphest.edit", params)
            .await
            .map_err(|message| TriageError::RemoteWriteFailure {
                task_id: task.id,
                code: priority_code.to_string(),
                message,
            })?;
        log::info!("Set {} priority to '{}'", task.monogram(), priority_code);
        Ok(())
    }
}

impl std::fmt::Debug for ConduitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConduitClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
