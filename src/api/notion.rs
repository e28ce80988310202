// src/api/notion.rs
//! Notion REST client: pages, databases and block children.

use super::client::HttpExecutor;
use super::pagination::{fetch_all_pages, PaginatedResponse};
use super::parser;
use crate::config::NotionConfig;
use crate::error::{AppError, Service};
use crate::formatting::{to_external_schema, Block, FieldMap, FormattedProperties};
use crate::pipeline::PageStore;
use crate::types::NotionId;
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Clone)]
pub struct NotionClient {
    executor: HttpExecutor,
    config: NotionConfig,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self, AppError> {
        let executor = HttpExecutor::new(Service::Notion, config.api.clone())?;
        Ok(Self { executor, config })
    }

    pub fn config(&self) -> &NotionConfig {
        &self.config
    }

    /// Creates a page in `database_id` with `fields` formatted as properties.
    pub async fn create_page(
        &self,
        database_id: &NotionId,
        fields: &FieldMap,
    ) -> Result<Value, AppError> {
        let properties = format_fields(fields);
        let body = json!({
            "parent": { "database_id": database_id.to_hyphenated() },
            "properties": properties.to_json(),
        });
        self.executor
            .execute(Method::POST, "/pages", Some(&body))
            .await
    }

    pub async fn update_page(&self, page_id: &NotionId, fields: &FieldMap) -> Result<Value, AppError> {
        let properties = format_fields(fields);
        let body = json!({ "properties": properties.to_json() });
        let endpoint = format!("/pages/{}", page_id.to_hyphenated());
        self.executor
            .execute(Method::PATCH, &endpoint, Some(&body))
            .await
    }

    /// Returns every row matching `filter`, following `next_cursor` across pages.
    pub async fn query_database(
        &self,
        database_id: &NotionId,
        filter: Option<&Value>,
        sorts: &[Value],
    ) -> Result<Vec<Value>, AppError> {
        let endpoint = format!("/databases/{}/query", database_id.to_hyphenated());
        let page_size = self.config.page_size;

        fetch_all_pages(|cursor| {
            let endpoint = endpoint.clone();
            async move {
                let mut query = json!({ "page_size": page_size });
                if let Some(filter) = filter {
                    query["filter"] = filter.clone();
                }
                if !sorts.is_empty() {
                    query["sorts"] = Value::Array(sorts.to_vec());
                }
                if let Some(cursor) = cursor {
                    query["start_cursor"] = json!(cursor);
                }
                let response = self
                    .executor
                    .execute(Method::POST, &endpoint, Some(&query))
                    .await?;
                parser::decode::<PaginatedResponse<Value>>(Service::Notion, response)
            }
        })
        .await
    }

    pub async fn get_page(&self, page_id: &NotionId) -> Result<Value, AppError> {
        let endpoint = format!("/pages/{}", page_id.to_hyphenated());
        self.executor.execute(Method::GET, &endpoint, None).await
    }

    pub async fn get_database(&self, database_id: &NotionId) -> Result<Value, AppError> {
        let endpoint = format!("/databases/{}", database_id.to_hyphenated());
        self.executor.execute(Method::GET, &endpoint, None).await
    }

    pub async fn append_blocks(&self, page_id: &NotionId, blocks: &[Block]) -> Result<Value, AppError> {
        let endpoint = format!("/blocks/{}/children", page_id.to_hyphenated());
        let body = json!({ "children": blocks });
        self.executor
            .execute(Method::PATCH, &endpoint, Some(&body))
            .await
    }
}

fn format_fields(fields: &FieldMap) -> FormattedProperties {
    let properties = to_external_schema(fields);
    if !properties.is_complete() {
        log::warn!(
            "Skipping fields with no Notion property type: {}",
            properties.unmapped.join(", ")
        );
    }
    properties
}

/// Reads the `id` of a page object returned by the API.
pub fn page_id_of(page: &Value) -> Result<NotionId, AppError> {
    let id = page.get("id").and_then(Value::as_str).ok_or_else(|| AppError::Parse {
        service: Service::Notion,
        message: "page object has no id".to_string(),
    })?;
    Ok(NotionId::parse(id)?)
}

#[async_trait::async_trait]
impl PageStore for NotionClient {
    async fn create_page(&self, database_id: &NotionId, fields: &FieldMap) -> Result<Value, AppError> {
        NotionClient::create_page(self, database_id, fields).await
    }

    async fn append_blocks(&self, page_id: &NotionId, blocks: &[Block]) -> Result<Value, AppError> {
        NotionClient::append_blocks(self, page_id, blocks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_id_is_read_from_response() {
        let page = json!({ "object": "page", "id": "59833787-2cf9-4fdf-8782-e53db20768a5" });
        assert_eq!(
            page_id_of(&page).unwrap().as_str(),
            "598337872cf94fdf8782e53db20768a5"
        );
        assert!(matches!(
            page_id_of(&json!({})),
            Err(AppError::Parse { .. })
        ));
    }
}
