//! Blocking HTTP client for the Notion API.

use crate::config::Config;
use crate::core::{Block, RichText};
use crate::error::{Error, RemoteError, Result};
use crate::notion::traits::WorkspaceApi;
use crate::notion::types::{
    ApiErrorBody, BlockList, CreatedPage, ListResponse, PageEntry, SearchHit, SearchRequest,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::slice::Chunks;

/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Maximum blocks accepted in one create or append request.
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// Page size requested from list endpoints.
pub const PAGE_SIZE: u32 = 100;

/// Longest slice of an unparseable error body kept in the error message.
const MAX_ERROR_BODY: usize = 300;

/// Notion API client.
///
/// Paginated endpoints are followed to the end; oversized child lists are
/// sent in batches of [`MAX_CHILDREN_PER_REQUEST`]. Failed requests are not
/// retried.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
}

impl NotionClient {
    /// Creates a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.notion_api_key))
            .map_err(|_| Error::config("NOTION_API_KEY contains invalid characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            HeaderName::from_static("notion-version"),
            HeaderValue::from_static(NOTION_VERSION),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("engram-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RemoteError::from)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends a request and decodes a successful JSON response.
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, label: &str) -> Result<T> {
        tracing::debug!(request = label, "notion request");

        let response = request.send().map_err(RemoteError::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let err = api_error(status.as_u16(), &body);
            tracing::warn!(request = label, error = %err, "notion request failed");
            return Err(err.into());
        }

        response
            .json::<T>()
            .map_err(|e| RemoteError::Decode(e.to_string()).into())
    }

    fn append_batch(&self, block_id: &str, children: &[Block]) -> Result<()> {
        let request = self
            .http
            .patch(self.url(&format!("blocks/{block_id}/children")))
            .json(&json!({ "children": children }));
        let _: Value = self.send(request, "blocks.children.append")?;
        Ok(())
    }
}

/// Builds an API error from a non-2xx response body.
pub(crate) fn api_error(status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => RemoteError::Api {
            status,
            code: parsed.code,
            message: parsed.message,
        },
        _ => RemoteError::Api {
            status,
            code: "http_error".to_string(),
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        },
    }
}

/// Splits children into the batch sent with a create request and the
/// follow-up append batches, each at most [`MAX_CHILDREN_PER_REQUEST`] long.
pub(crate) fn split_children<T>(children: &[T]) -> (&[T], Chunks<'_, T>) {
    let (first, rest) = children.split_at(children.len().min(MAX_CHILDREN_PER_REQUEST));
    (first, rest.chunks(MAX_CHILDREN_PER_REQUEST))
}

/// Drains a cursor-paginated endpoint.
pub(crate) fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<&str>) -> Result<ListResponse<T>>,
{
    let mut results = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.as_deref())?;
        results.extend(page.results);
        match page.next_cursor {
            Some(next) if page.has_more => cursor = Some(next),
            _ => break,
        }
    }

    Ok(results)
}

impl WorkspaceApi for NotionClient {
    fn create_page(&self, parent_id: &str, title: &str, children: &[Block]) -> Result<CreatedPage> {
        let (first, rest) = split_children(children);

        let body = json!({
            "parent": { "page_id": parent_id },
            "properties": {
                "title": { "title": [RichText::plain(title)] }
            },
            "children": first,
        });
        let request = self.http.post(self.url("pages")).json(&body);
        let page: CreatedPage = self.send(request, "pages.create")?;

        for batch in rest {
            self.append_batch(&page.id, batch)?;
        }

        Ok(page)
    }

    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<()> {
        for batch in children.chunks(MAX_CHILDREN_PER_REQUEST) {
            self.append_batch(block_id, batch)?;
        }
        Ok(())
    }

    fn list_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let url = self.url(&format!("blocks/{block_id}/children"));
        collect_pages(|cursor| {
            let mut request = self.http.get(&url).query(&[("page_size", PAGE_SIZE.to_string())]);
            if let Some(cursor) = cursor {
                request = request.query(&[("start_cursor", cursor)]);
            }
            self.send::<BlockList>(request, "blocks.children.list")
        })
    }

    fn delete_block(&self, block_id: &str) -> Result<()> {
        let request = self.http.delete(self.url(&format!("blocks/{block_id}")));
        let _: Value = self.send(request, "blocks.delete")?;
        Ok(())
    }

    fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let url = self.url("search");
        collect_pages(|cursor| {
            let mut body = serde_json::to_value(request)
                .map_err(|e| RemoteError::Decode(e.to_string()))?;
            body["page_size"] = json!(PAGE_SIZE);
            if let Some(cursor) = cursor {
                body["start_cursor"] = json!(cursor);
            }
            self.send(self.http.post(&url).json(&body), "search")
        })
    }

    fn query_database(&self, database_id: &str) -> Result<Vec<PageEntry>> {
        let url = self.url(&format!("databases/{database_id}/query"));
        collect_pages(|cursor| {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(cursor) = cursor {
                body["start_cursor"] = json!(cursor);
            }
            self.send(self.http.post(&url).json(&body), "databases.query")
        })
    }
}
