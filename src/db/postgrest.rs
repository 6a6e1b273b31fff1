// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minimal client for the hosted Postgres REST endpoint (`/rest/v1`).
//!
//! Requests authenticate with the service key, which bypasses row-level
//! security, so this client must only ever run server-side.

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use serde::{de::DeserializeOwned, Serialize};

/// REST client for one project.
#[derive(Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl PostgrestClient {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/rest/v1", config.rest_url),
            service_key: config.service_key.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// `column=eq.value` filter, with the value percent-encoded.
    fn eq_filter(column: &str, value: &str) -> String {
        format!("{}=eq.{}", column, urlencoding::encode(value))
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Fetch the single row where `column` equals `value`.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Option<T>, StoreError> {
        let url = format!(
            "{}?{}&select=*&limit=1",
            self.table_url(table),
            Self::eq_filter(column, value)
        );

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let rows: Vec<T> = Self::check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    /// Insert or merge a row on its primary key.
    pub async fn upsert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::POST, self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Write only the columns present in `patch` to rows where `column`
    /// equals `value`. Returns the first updated row, if any matched.
    pub async fn update<P: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
        patch: &P,
    ) -> Result<Option<T>, StoreError> {
        let url = format!("{}?{}", self.table_url(table), Self::eq_filter(column, value));

        let response = self
            .request(reqwest::Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let rows: Vec<T> = Self::check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    /// Delete rows where `column` equals `value`. Returns whether any row matched.
    pub async fn delete(&self, table: &str, column: &str, value: &str) -> Result<bool, StoreError> {
        let url = format!("{}?{}", self.table_url(table), Self::eq_filter(column, value));

        let response = self
            .request(reqwest::Method::DELETE, url)
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let deleted: Vec<serde_json::Value> = Self::check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(!deleted.is_empty())
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter_encodes_value() {
        assert_eq!(
            PostgrestClient::eq_filter("id", "a&b=c"),
            "id=eq.a%26b%3Dc"
        );
    }

    #[test]
    fn test_table_url() {
        let client = PostgrestClient::new(&DatabaseConfig {
            rest_url: "https://example.supabase.co".to_string(),
            service_key: "key".to_string(),
        });
        assert_eq!(
            client.table_url("profiles"),
            "https://example.supabase.co/rest/v1/profiles"
        );
    }
}
