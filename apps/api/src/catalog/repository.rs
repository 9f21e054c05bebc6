//! Prompt catalog — read-only client for the remote prompt service.
//!
//! The service is OData v4 shaped: collections come back as `{ "value": [...] }`
//! and the single-prompt lookup is a function import, `getPrompt(prompt='…')`.
//!
//! `AppState` holds an `Arc<dyn PromptCatalog>`; tests swap in an in-memory catalog.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Dropdown entries meaning "do not filter on this column".
pub const ALL_CATEGORIES: &str = "All Categories";
pub const ALL_PRODUCTS: &str = "All Products";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prompt service returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid prompt service URL: {0}")]
    Url(String),

    #[error("Unexpected prompt service payload: {0}")]
    Payload(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One row of the prompt list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub prompt: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

/// Category/product narrowing for the prompt list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptFilter {
    pub category: Option<String>,
    pub product: Option<String>,
}

impl PromptFilter {
    /// Builds the OData `$filter` expression, or `None` when nothing narrows the list.
    pub fn to_odata(&self) -> Option<String> {
        let clauses: Vec<String> = [
            ("category", self.category.as_deref(), ALL_CATEGORIES),
            ("product", self.product.as_deref(), ALL_PRODUCTS),
        ]
        .into_iter()
        .filter_map(|(field, value, sentinel)| {
            let value = value.map(str::trim).filter(|v| !v.is_empty() && *v != sentinel)?;
            Some(format!("{field} eq '{}'", odata_quote(value)))
        })
        .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" and "))
        }
    }
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    product: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait PromptCatalog: Send + Sync {
    /// Distinct categories, without the "All Categories" sentinel.
    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    /// Distinct products, without the "All Products" sentinel.
    async fn products(&self) -> Result<Vec<String>, CatalogError>;

    async fn prompts(&self, filter: &PromptFilter) -> Result<Vec<PromptRecord>, CatalogError>;

    /// The flat record for one prompt, including its `key*`/`sel*` fields.
    async fn prompt_record(&self, prompt: &str) -> Result<Map<String, Value>, CatalogError>;
}

/// Returns `values` with `sentinel` prepended, the way the dropdowns show them.
pub fn with_sentinel(sentinel: &str, values: Vec<String>) -> Vec<String> {
    std::iter::once(sentinel.to_string())
        .chain(values.into_iter().filter(|v| v != sentinel))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// ODataPromptCatalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ODataPromptCatalog {
    client: Client,
    service_url: Url,
}

impl ODataPromptCatalog {
    pub fn new(client: Client, service_url: &str) -> Result<Self, CatalogError> {
        let mut service_url =
            Url::parse(service_url).map_err(|e| CatalogError::Url(format!("{service_url}: {e}")))?;
        if service_url.cannot_be_a_base() {
            return Err(CatalogError::Url(service_url.to_string()));
        }
        // Keep a trailing slash off the path so segments append cleanly.
        if let Ok(mut segments) = service_url.path_segments_mut() {
            segments.pop_if_empty();
        }
        Ok(Self {
            client,
            service_url,
        })
    }

    fn endpoint(&self, segment: &str) -> Url {
        let mut url = self.service_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(segment);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: Option<(&str, String)>,
    ) -> Result<T, CatalogError> {
        debug!(%url, "prompt service request");

        let mut request = self.client.get(url.clone());
        if let Some((key, value)) = &query {
            request = request.query(&[(key, value)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PromptCatalog for ODataPromptCatalog {
    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let rows: Collection<CategoryRow> =
            self.get_json(self.endpoint("DistinctCategories()"), None).await?;
        Ok(rows.value.into_iter().filter_map(|r| r.category).collect())
    }

    async fn products(&self) -> Result<Vec<String>, CatalogError> {
        let rows: Collection<ProductRow> =
            self.get_json(self.endpoint("DistinctProducts()"), None).await?;
        Ok(rows.value.into_iter().filter_map(|r| r.product).collect())
    }

    async fn prompts(&self, filter: &PromptFilter) -> Result<Vec<PromptRecord>, CatalogError> {
        let query = filter.to_odata().map(|f| ("$filter", f));
        let rows: Collection<PromptRecord> =
            self.get_json(self.endpoint("PromptsData"), query).await?;
        Ok(rows.value)
    }

    async fn prompt_record(&self, prompt: &str) -> Result<Map<String, Value>, CatalogError> {
        let segment = format!("getPrompt(prompt='{}')", odata_quote(prompt));
        let payload: Value = self.get_json(self.endpoint(&segment), None).await?;
        unwrap_record(payload)
    }
}

/// Doubles single quotes for use inside an OData string literal.
fn odata_quote(value: &str) -> String {
    value.replace('\'', "''")
}

/// Function imports may answer with the record itself or wrapped in `value`.
fn unwrap_record(payload: Value) -> Result<Map<String, Value>, CatalogError> {
    match payload {
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Object(inner)) => Ok(inner),
            Some(other) => {
                map.insert("value".to_string(), other);
                Ok(map)
            }
            None => Ok(map),
        },
        other => Err(CatalogError::Payload(format!(
            "expected an object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
