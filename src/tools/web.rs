//! Web search tool backed by DuckDuckGo's HTML endpoint (no API key needed)

use super::{require_str, Tool};
use crate::error::AgentError;
use crate::Result;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const DEFAULT_MAX_RESULTS: usize = 5;

/// A single search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DUCKDUCKGO_HTML_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; FinanceAgent/1.0)")
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl Tool for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for general or financial information. Returns titles, snippets and source URLs. Always include sources."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let query = require_str(&args, "query")?;
        let max_results = args
            .get("max_results")
            .and_then(Value::as_u64)
            .map(|n| (n as usize).max(1))
            .unwrap_or(DEFAULT_MAX_RESULTS);

        info!(query = %query, "Running web search");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| AgentError::ToolError(format!("Web search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::ToolError(format!(
                "Web search returned {}",
                status
            )));
        }

        let html = response.text().await?;
        let results = extract_results(&html, max_results);

        Ok(format_results(query, &results))
    }
}

/// Pull result title, snippet and URL out of DuckDuckGo's HTML page
pub fn extract_results(html: &str, limit: usize) -> Vec<SearchResult> {
    html.split("result__body")
        .skip(1)
        .filter_map(|chunk| {
            let title = inner_text_after(chunk, "class=\"result__a\"")?;
            let snippet = inner_text_after(chunk, "class=\"result__snippet\"").unwrap_or_default();
            let url = inner_text_after(chunk, "class=\"result__url\"").unwrap_or_default();

            Some(SearchResult {
                title,
                snippet,
                url,
            })
        })
        .take(limit)
        .collect()
}

/// Text content of the element whose opening tag contains `marker`
fn inner_text_after(chunk: &str, marker: &str) -> Option<String> {
    let after_marker = chunk.split(marker).nth(1)?;
    let (_, body) = after_marker.split_once('>')?;
    let end = body
        .find("</a>")
        .or_else(|| body.find("</"))
        .unwrap_or(body.len());
    let text = strip_tags(&body[..end]);
    let text = html_decode(text.trim());

    (!text.is_empty()).then_some(text)
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Basic HTML entity decoding; `&amp;` goes last so `&amp;lt;` stays `&lt;`
fn html_decode(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for: {}", query);
    }

    results
        .iter()
        .map(|r| format!("**{}**\n{}\nURL: {}", r.title, r.snippet, r.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}
