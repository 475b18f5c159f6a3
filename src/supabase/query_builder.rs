use std::fmt::Display;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::client::SupabaseClient;
use super::error::SupabaseError;

/// PostgREST query on a single table.
///
/// Filters accumulate as query parameters (`col=op.value`) and are shared by
/// reads, updates and counts.
pub struct QueryBuilder<'a> {
    client: &'a SupabaseClient,
    table_name: String,
    select_columns: Option<String>,
    filters: Vec<(String, String)>,
    limit: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(client: &'a SupabaseClient, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            select_columns: None,
            filters: Vec::new(),
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select_columns = Some(columns.to_string());
        self
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "neq", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lt", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// `pattern` uses `*` as the wildcard.
    pub fn like(self, column: &str, pattern: impl Display) -> Self {
        self.filter(column, "like", pattern)
    }

    pub fn in_list<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
        let quoted: Vec<String> = values
            .iter()
            .map(|v| format!("\"{}\"", v.as_ref().replace('"', "\\\"")))
            .collect();
        self.filters
            .push((column.to_string(), format!("in.({})", quoted.join(","))));
        self
    }

    /// Disjunction of raw PostgREST conditions, e.g. `["a.eq.false", "b.eq.false"]`.
    pub fn or(mut self, conditions: &[&str]) -> Self {
        self.filters
            .push(("or".to_string(), format!("({})", conditions.join(","))));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("{}.{}", op, value)));
        self
    }

    fn query_params(&self, with_select: bool) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        if with_select {
            params.push((
                "select".to_string(),
                self.select_columns.clone().unwrap_or_else(|| "*".to_string()),
            ));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    fn table_url(&self) -> Result<url::Url, SupabaseError> {
        self.client.url(&format!("/rest/v1/{}", self.table_name))
    }

    pub async fn select_all<T: DeserializeOwned>(self) -> Result<Vec<T>, SupabaseError> {
        let url = self.table_url()?;
        let response = self
            .client
            .request(Method::GET, url)
            .query(&self.query_params(true))
            .send()
            .await?;
        SupabaseClient::json(response).await
    }

    pub async fn select_optional<T: DeserializeOwned>(self) -> Result<Option<T>, SupabaseError> {
        let rows: Vec<T> = self.limit(1).select_all().await?;
        Ok(rows.into_iter().next())
    }

    pub async fn select_one<T: DeserializeOwned>(self) -> Result<T, SupabaseError> {
        let table = self.table_name.clone();
        self.select_optional()
            .await?
            .ok_or(SupabaseError::NotFound(table))
    }

    /// Number of rows matching the filters.
    pub async fn count(self) -> Result<usize, SupabaseError> {
        let rows: Vec<Value> = self.select_all().await?;
        Ok(rows.len())
    }

    /// Insert one or more rows and return them as stored.
    pub async fn insert<B, T>(self, body: &B) -> Result<Vec<T>, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url()?;
        let response = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        SupabaseClient::json(response).await
    }

    /// Insert without reading the stored row back.
    pub async fn insert_minimal<B: Serialize + ?Sized>(self, body: &B) -> Result<(), SupabaseError> {
        let url = self.table_url()?;
        let response = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        SupabaseClient::check(response).await?;
        Ok(())
    }

    /// Patch every row matching the filters.
    pub async fn update<B: Serialize + ?Sized>(self, body: &B) -> Result<(), SupabaseError> {
        let url = self.table_url()?;
        let response = self
            .client
            .request(Method::PATCH, url)
            .header("Prefer", "return=minimal")
            .query(&self.query_params(false))
            .json(body)
            .send()
            .await?;
        SupabaseClient::check(response).await?;
        Ok(())
    }
}
