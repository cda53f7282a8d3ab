//! Zabbix JSON-RPC 2.0 client.
//!
//! Thin HTTP wrapper over `api_jsonrpc.php`. One POST per call, no retries,
//! no batching — the tool runs each lookup as a blocking round trip. Pure
//! envelope parsing in `parse_rpc_response` for testability.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{ApiError, HostRow, ImageRow, MapDefinition, MapElement, MapLink, SysmapRow};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build the JSON-RPC endpoint URL from protocol, host and base path,
/// normalizing the slashes around the path.
#[must_use]
pub fn endpoint_url(protocol: &str, host: &str, path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        format!("{protocol}://{host}/api_jsonrpc.php")
    } else {
        format!("{protocol}://{host}/{trimmed}/api_jsonrpc.php")
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ZabbixClient {
    http: reqwest::Client,
    endpoint: String,
    auth: Option<String>,
    next_id: AtomicU64,
}

impl ZabbixClient {
    /// Construct a client for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_owned(),
            auth: None,
            next_id: AtomicU64::new(1),
        })
    }

    /// Authenticate and retain the session token for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails or the credentials are
    /// rejected by the server.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let params = LoginParams { user: username, password };
        let token: String = self.call("user.login", &params, None).await?;
        self.auth = Some(token);
        tracing::debug!("authenticated with Zabbix API");
        Ok(())
    }

    /// Fetch the server icon catalog once, as a name-to-imageid map.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn image_catalog(&self) -> Result<HashMap<String, String>, ApiError> {
        let params = ImageGetParams { output: ["imageid", "name"] };
        let rows: Vec<ImageRow> = self.call("image.get", &params, self.auth.as_deref()).await?;
        Ok(rows.into_iter().map(|row| (row.name, row.imageid)).collect())
    }

    /// Look up a host id by exact host name.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails. An unknown host is `Ok(None)`.
    pub async fn host_by_name(&self, host: &str) -> Result<Option<String>, ApiError> {
        let params = HostGetParams { filter: HostFilter { host } };
        let rows: Vec<HostRow> = self.call("host.get", &params, self.auth.as_deref()).await?;
        Ok(rows.into_iter().next().map(|row| row.hostid))
    }

    /// Look up a map id by exact map name.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails. An unknown map is `Ok(None)`.
    pub async fn map_by_name(&self, name: &str) -> Result<Option<String>, ApiError> {
        let params = MapGetParams { filter: MapFilter { name } };
        let rows: Vec<SysmapRow> = self.call("map.get", &params, self.auth.as_deref()).await?;
        Ok(rows.into_iter().next().map(|row| row.sysmapid))
    }

    /// Create a new map from the definition.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn map_create(&self, definition: &MapDefinition) -> Result<(), ApiError> {
        let _: serde_json::Value = self.call("map.create", definition, self.auth.as_deref()).await?;
        Ok(())
    }

    /// Update an existing map with a full definition carrying its `sysmapid`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn map_update(&self, definition: &MapDefinition) -> Result<(), ApiError> {
        let _: serde_json::Value = self.call("map.update", definition, self.auth.as_deref()).await?;
        Ok(())
    }

    /// Empty a map's elements, links and urls. First half of the
    /// clear-then-repopulate replace; the API has no atomic replace call.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the call fails.
    pub async fn map_clear(&self, sysmapid: &str) -> Result<(), ApiError> {
        let params = MapClearParams {
            sysmapid,
            selements: &[],
            links: &[],
            urls: &[],
        };
        let _: serde_json::Value = self.call("map.update", &params, self.auth.as_deref()).await?;
        Ok(())
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &P,
        auth: Option<&str>,
    ) -> Result<T, ApiError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest { jsonrpc: "2.0", method, params, id, auth };

        tracing::debug!(method, id, "calling Zabbix API");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport { method, detail: e.to_string() })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport { method, detail: e.to_string() })?;
        tracing::debug!(method, id, status, body = %text, "Zabbix API response");

        if status != 200 {
            return Err(ApiError::Http { method, status });
        }

        parse_rpc_response(method, &text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a P,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(serde::Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: String,
}

#[derive(Serialize)]
struct LoginParams<'a> {
    user: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ImageGetParams {
    output: [&'static str; 2],
}

#[derive(Serialize)]
struct HostGetParams<'a> {
    filter: HostFilter<'a>,
}

#[derive(Serialize)]
struct HostFilter<'a> {
    host: &'a str,
}

#[derive(Serialize)]
struct MapGetParams<'a> {
    filter: MapFilter<'a>,
}

#[derive(Serialize)]
struct MapFilter<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct MapClearParams<'a> {
    sysmapid: &'a str,
    selements: &'a [MapElement],
    links: &'a [MapLink],
    urls: &'a [String],
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_rpc_response<T: DeserializeOwned>(method: &'static str, json: &str) -> Result<T, ApiError> {
    let envelope: RpcResponse<T> =
        serde_json::from_str(json).map_err(|e| ApiError::Parse { method, detail: e.to_string() })?;

    if let Some(error) = envelope.error {
        return Err(ApiError::Rpc {
            method,
            code: error.code,
            message: error.message,
            data: error.data,
        });
    }

    envelope
        .result
        .ok_or_else(|| ApiError::Parse { method, detail: "missing result".to_owned() })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
