//! The remote catalog client.
//!
//! Endpoint shapes follow the remote service exactly:
//!
//! - `GET api-v1/system?systemId=…` (or `systemName=…`) with the full detail
//!   params; an unknown system comes back as an empty record, not an error.
//! - `GET api-system-v1/bodies?systemId=…` → `{"bodies": [...]}`; a missing
//!   `bodies` key means zero bodies.
//! - `GET api-v1/cube-systems?x,y,z,radius` → array of system records.
//!
//! Any non-success status is a [`ClientError::Status`], fatal to the current
//! reconciliation step only.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use starsync_core::{Coordinate, Document};

use crate::errors::{ClientError, Result};
use crate::rate_limit::{RateLimitConfig, RateLimiter};

/// Detail flags sent with every system query so records carry coordinates,
/// permit status, primary star, information block and both ids.
const SYSTEM_DETAIL_PARAMS: [(&str, &str); 6] = [
    ("showCoordinates", "1"),
    ("showPermit", "1"),
    ("showPrimaryStar", "1"),
    ("showInformation", "1"),
    ("includeHidden", "1"),
    ("showId", "1"),
];

const SYSTEM_PATH: &str = "api-v1/system";
const CUBE_PATH: &str = "api-v1/cube-systems";
const BODIES_PATH: &str = "api-system-v1/bodies";

/// Rate-limited, read-only client for the remote catalog.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
}

impl CatalogClient {
    /// Client for `base_url` with the default call budget (10 per 60 s).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_rate_limit(base_url, RateLimitConfig::default())
    }

    /// Client with an explicit call budget.
    #[must_use]
    pub fn with_rate_limit(base_url: impl Into<String>, config: RateLimitConfig) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            limiter: RateLimiter::new(config),
        }
    }

    /// Fetch one system record by its short id.
    ///
    /// An unknown id yields an empty document.
    #[instrument(skip(self))]
    pub async fn system_by_id(&self, system_id: i64) -> Result<Document> {
        let mut params = detail_params();
        params.push(("systemId".to_string(), system_id.to_string()));
        let value = self.get_json(SYSTEM_PATH, &params).await?;
        single_system(value)
    }

    /// Fetch one system record by name.
    ///
    /// An unknown name yields an empty document.
    #[instrument(skip(self))]
    pub async fn system_by_name(&self, system_name: &str) -> Result<Document> {
        let mut params = detail_params();
        params.push(("systemName".to_string(), system_name.to_string()));
        let value = self.get_json(SYSTEM_PATH, &params).await?;
        single_system(value)
    }

    /// Fetch all body records of one system.
    ///
    /// A response without the `bodies` field means the system has none.
    #[instrument(skip(self))]
    pub async fn bodies_by_system_id(&self, system_id: i64) -> Result<Vec<Document>> {
        let params = vec![("systemId".to_string(), system_id.to_string())];
        let value = self.get_json(BODIES_PATH, &params).await?;
        let Value::Object(mut map) = value else {
            return Err(ClientError::Payload("bodies response is not an object".into()));
        };
        match map.remove("bodies") {
            Some(Value::Array(items)) => Ok(collect_records(items, "body")),
            Some(_) => Err(ClientError::Payload("`bodies` field is not an array".into())),
            None => Ok(Vec::new()),
        }
    }

    /// Search systems within the axis-aligned cube centered at `center` with
    /// half-width `radius`.
    #[instrument(skip(self))]
    pub async fn systems_in_cube(&self, center: &Coordinate, radius: f64) -> Result<Vec<Document>> {
        let mut params = detail_params();
        params.push(("x".to_string(), center.x.to_string()));
        params.push(("y".to_string(), center.y.to_string()));
        params.push(("z".to_string(), center.z.to_string()));
        params.push(("radius".to_string(), radius.to_string()));
        let value = self.get_json(CUBE_PATH, &params).await?;
        match value {
            Value::Array(items) => Ok(collect_records(items, "system")),
            // An empty region is sometimes encoded as an empty object.
            Value::Object(map) if map.is_empty() => Ok(Vec::new()),
            _ => Err(ClientError::Payload("cube response is not an array".into())),
        }
    }

    /// Issue one rate-limited GET and decode the JSON body.
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        self.limiter.acquire().await;

        let url = format!("{}/{path}", self.base_url);
        let response = self.http.get(&url).query(params).send().await?;

        if let Some(remaining) = response
            .headers()
            .get("x-rate-limit-remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!(remaining, "remote rate-limit headroom");
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn detail_params() -> Vec<(String, String)> {
    SYSTEM_DETAIL_PARAMS
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Interpret a single-system response. The remote sends `{}` (or `[]`) when
/// it knows nothing about the requested system.
fn single_system(value: Value) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(Document(map)),
        Value::Array(items) if items.is_empty() => Ok(Document::new()),
        _ => Err(ClientError::Payload("system response is not an object".into())),
    }
}

/// Keep the object entries of a record array, dropping anything malformed.
fn collect_records(items: Vec<Value>, what: &str) -> Vec<Document> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(Document(map)),
            other => {
                warn!(kind = what, ?other, "skipping non-object record in response");
                None
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
