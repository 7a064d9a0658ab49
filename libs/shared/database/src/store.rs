use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// REST client for the managed record store backing all case-management
/// collections. Constructed once at the application boundary and handed to
/// services explicitly; nothing in this workspace holds a global instance.
pub struct RecordStoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RecordStoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.record_store_url.clone(),
            api_key: config.record_store_api_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key).unwrap_or_else(|_| HeaderValue::from_static("")));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Record store request: {} {}", method, url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Record store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Record store error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Fetch a collection query and deserialize every row into `T` before it
    /// leaves the adapter. A malformed row fails the whole fetch rather than
    /// leaking untyped JSON into business logic.
    pub async fn fetch_list<T>(&self, path: &str, auth_token: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<Value> = self.request(Method::GET, path, Some(auth_token), None).await?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| anyhow!("Malformed record: {}", e)))
            .collect()
    }

    /// Fetch a query expected to match exactly one row.
    pub async fn fetch_one<T>(&self, path: &str, auth_token: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut rows = self.fetch_list::<T>(path, auth_token).await?;
        if rows.len() > 1 {
            return Err(anyhow!("Expected at most one record, got {}", rows.len()));
        }
        Ok(rows.pop())
    }

    /// Insert a row and return the stored representation.
    pub async fn insert<T>(&self, path: &str, auth_token: &str, body: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let mut rows: Vec<Value> = self
            .request_with_headers(Method::POST, path, Some(auth_token), Some(body), Some(headers))
            .await?;

        if rows.is_empty() {
            return Err(anyhow!("Insert returned no representation"));
        }

        serde_json::from_value(rows.remove(0)).map_err(|e| anyhow!("Malformed record: {}", e))
    }

    /// Patch rows matched by the path filter and return the first updated row.
    pub async fn update<T>(&self, path: &str, auth_token: &str, body: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let mut rows: Vec<Value> = self
            .request_with_headers(Method::PATCH, path, Some(auth_token), Some(body), Some(headers))
            .await?;

        if rows.is_empty() {
            return Err(anyhow!("Update matched no records"));
        }

        serde_json::from_value(rows.remove(0)).map_err(|e| anyhow!("Malformed record: {}", e))
    }

    /// Delete rows matched by the path filter.
    pub async fn delete(&self, path: &str, auth_token: &str) -> Result<()> {
        let _: Vec<Value> = self.request(Method::DELETE, path, Some(auth_token), None).await?;
        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
