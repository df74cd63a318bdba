//! Yahoo Finance tools
//!
//! Thin wrappers over Yahoo's public JSON endpoints: chart (prices),
//! quoteSummary (fundamentals, analyst views) and search (news). Each tool
//! returns a compact JSON document for the model to read.

use super::{require_str, symbol_schema, Tool};
use crate::error::AgentError;
use crate::Result;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const YAHOO_API_BASE: &str = "https://query1.finance.yahoo.com";
const YAHOO_CONSENT_URL: &str = "https://fc.yahoo.com";
const DEFAULT_NEWS_COUNT: usize = 5;

/// Shared HTTP client for the Yahoo endpoints
///
/// `quoteSummary` needs a session cookie plus a crumb token. The crumb is
/// fetched on first use and reused until Yahoo rejects it.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
    consent_url: String,
    crumb: RwLock<Option<String>>,
}

impl YahooFinanceClient {
    pub fn new() -> Result<Self> {
        Self::with_urls(YAHOO_API_BASE, YAHOO_CONSENT_URL)
    }

    pub fn with_urls(base_url: impl Into<String>, consent_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; FinanceAgent/1.0)")
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            consent_url: consent_url.into(),
            crumb: RwLock::new(None),
        })
    }

    /// Raw status and body; non-JSON error bodies come back as `Null`
    async fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                AgentError::ToolError(format!("Yahoo Finance request failed for {}: {}", path, e))
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::ToolError(format!("Yahoo Finance read failed: {}", e)))?;

        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => Value::Null,
            Err(e) => {
                return Err(AgentError::ToolError(format!("Invalid JSON response: {}", e)));
            }
        };

        Ok((status, body))
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let (status, body) = self.fetch(path, query).await?;
        check_response(path, status, body)
    }

    async fn crumb(&self) -> Result<String> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let mut slot = self.crumb.write().await;
        // Another request may have completed the handshake while we waited.
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.fetch_crumb().await?;
        *slot = Some(crumb.clone());
        Ok(crumb)
    }

    /// Forget `stale` unless a concurrent request already replaced it
    async fn invalidate_crumb(&self, stale: &str) {
        let mut slot = self.crumb.write().await;
        if slot.as_deref() == Some(stale) {
            *slot = None;
        }
    }

    async fn fetch_crumb(&self) -> Result<String> {
        // Only the cookies set by this response matter.
        if let Err(e) = self.client.get(&self.consent_url).send().await {
            debug!("Yahoo consent request failed: {}", e);
        }

        let response = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.base_url))
            .send()
            .await
            .map_err(|e| AgentError::ToolError(format!("Yahoo crumb request failed: {}", e)))?;

        let status = response.status();
        let crumb = response.text().await?.trim().to_string();
        if !status.is_success() || crumb.is_empty() || crumb.contains('<') {
            return Err(AgentError::ToolError(format!(
                "Yahoo crumb unavailable ({})",
                status
            )));
        }

        info!("Yahoo Finance session established");
        Ok(crumb)
    }

    pub async fn chart(&self, symbol: &str) -> Result<Value> {
        self.get_json(
            &format!("/v8/finance/chart/{}", symbol),
            &[("range", "1d".to_string()), ("interval", "1d".to_string())],
        )
        .await
    }

    /// quoteSummary call; a rejected crumb triggers one fresh handshake
    pub async fn quote_summary(&self, symbol: &str, modules: &[&str]) -> Result<Value> {
        let path = format!("/v10/finance/quoteSummary/{}", symbol);
        let modules = modules.join(",");

        let crumb = self.crumb().await?;
        let (status, body) = self
            .fetch(&path, &[("modules", modules.clone()), ("crumb", crumb.clone())])
            .await?;

        if !crumb_rejected(status, &body) {
            return check_response(&path, status, body);
        }

        warn!(%status, "Yahoo rejected the session crumb, refreshing");
        self.invalidate_crumb(&crumb).await;

        let crumb = self.crumb().await?;
        let (status, body) = self
            .fetch(&path, &[("modules", modules), ("crumb", crumb)])
            .await?;
        check_response(&path, status, body)
    }

    pub async fn search_news(&self, symbol: &str, count: usize) -> Result<Value> {
        self.get_json(
            "/v1/finance/search",
            &[
                ("q", symbol.to_string()),
                ("quotesCount", "0".to_string()),
                ("newsCount", count.to_string()),
            ],
        )
        .await
    }
}

fn crumb_rejected(status: StatusCode, body: &Value) -> bool {
    status == StatusCode::UNAUTHORIZED
        || upstream_error(&body["finance"])
            .is_some_and(|message| message.to_ascii_lowercase().contains("crumb"))
}

/// Surface Yahoo's `finance.error` envelope and bare HTTP failures
fn check_response(path: &str, status: StatusCode, body: Value) -> Result<Value> {
    if let Some(message) = upstream_error(&body["finance"]) {
        return Err(AgentError::ToolError(format!(
            "Yahoo Finance returned {} for {}: {}",
            status, path, message
        )));
    }

    // Endpoint-level errors (chart.error, quoteSummary.error) are left to the extractors
    if !status.is_success() && body.is_null() {
        return Err(AgentError::ToolError(format!(
            "Yahoo Finance returned {} for {}",
            status, path
        )));
    }

    Ok(body)
}

//
// ================= Payload Extraction =================
//

/// Yahoo wraps numbers as `{"raw": 1.2, "fmt": "1.20"}`
fn raw(value: &Value) -> Value {
    match value {
        Value::Object(map) if map.contains_key("raw") => map["raw"].clone(),
        Value::Object(map) if map.is_empty() => Value::Null,
        other => other.clone(),
    }
}

fn unix_to_rfc3339(value: &Value) -> Value {
    value
        .as_i64()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| Value::String(dt.to_rfc3339()))
        .unwrap_or(Value::Null)
}

fn upstream_error(section: &Value) -> Option<String> {
    let error = section.get("error").filter(|e| !e.is_null())?;
    Some(
        error
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    )
}

fn first_result<'a>(section: &'a Value, symbol: &str) -> Result<&'a Value> {
    if let Some(message) = upstream_error(section) {
        return Err(AgentError::ToolError(format!("{}: {}", symbol, message)));
    }

    section
        .get("result")
        .and_then(|r| r.get(0))
        .ok_or_else(|| AgentError::ToolError(format!("No data returned for {}", symbol)))
}

pub fn price_summary(symbol: &str, chart: &Value) -> Result<Value> {
    let meta = first_result(&chart["chart"], symbol)?
        .get("meta")
        .ok_or_else(|| AgentError::ToolError(format!("No quote metadata for {}", symbol)))?;

    let price = meta.get("regularMarketPrice").and_then(Value::as_f64);
    let previous_close = meta
        .get("chartPreviousClose")
        .or_else(|| meta.get("previousClose"))
        .and_then(Value::as_f64);

    let (change, change_percent) = match (price, previous_close) {
        (Some(p), Some(prev)) if prev != 0.0 => (json!(p - prev), json!((p - prev) / prev * 100.0)),
        _ => (Value::Null, Value::Null),
    };

    Ok(json!({
        "symbol": meta.get("symbol").cloned().unwrap_or_else(|| json!(symbol)),
        "price": price,
        "currency": meta.get("currency").cloned().unwrap_or(Value::Null),
        "previous_close": previous_close,
        "change": change,
        "change_percent": change_percent,
        "exchange": meta.get("exchangeName").cloned().unwrap_or(Value::Null),
        "market_time": unix_to_rfc3339(&meta["regularMarketTime"]),
    }))
}

pub fn fundamentals_summary(symbol: &str, summary: &Value) -> Result<Value> {
    let result = first_result(&summary["quoteSummary"], symbol)?;

    let price = &result["price"];
    let profile = &result["summaryProfile"];
    let detail = &result["summaryDetail"];
    let stats = &result["defaultKeyStatistics"];

    let company_name = match &price["longName"] {
        Value::Null => price["shortName"].clone(),
        name => name.clone(),
    };

    Ok(json!({
        "symbol": symbol,
        "company_name": company_name,
        "sector": profile["sector"].clone(),
        "industry": profile["industry"].clone(),
        "market_cap": raw(&price["marketCap"]),
        "pe_ratio": raw(&detail["trailingPE"]),
        "forward_pe": raw(&detail["forwardPE"]),
        "pb_ratio": raw(&stats["priceToBook"]),
        "dividend_yield": raw(&detail["dividendYield"]),
        "eps": raw(&stats["trailingEps"]),
        "beta": raw(&detail["beta"]),
        "52_week_high": raw(&detail["fiftyTwoWeekHigh"]),
        "52_week_low": raw(&detail["fiftyTwoWeekLow"]),
    }))
}

pub fn recommendations_summary(symbol: &str, summary: &Value) -> Result<Value> {
    let result = first_result(&summary["quoteSummary"], symbol)?;
    let financial = &result["financialData"];

    let trend: Vec<Value> = result["recommendationTrend"]["trend"]
        .as_array()
        .map(|periods| {
            periods
                .iter()
                .map(|p| {
                    json!({
                        "period": p["period"].clone(),
                        "strong_buy": raw(&p["strongBuy"]),
                        "buy": raw(&p["buy"]),
                        "hold": raw(&p["hold"]),
                        "sell": raw(&p["sell"]),
                        "strong_sell": raw(&p["strongSell"]),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(json!({
        "symbol": symbol,
        "recommendation": financial["recommendationKey"].clone(),
        "target_mean_price": raw(&financial["targetMeanPrice"]),
        "analyst_count": raw(&financial["numberOfAnalystOpinions"]),
        "trend": trend,
    }))
}

pub fn news_summary(symbol: &str, search: &Value, limit: usize) -> Value {
    let articles: Vec<Value> = search["news"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .take(limit)
                .map(|item| {
                    let mut article = Map::new();
                    article.insert("title".into(), item["title"].clone());
                    article.insert("publisher".into(), item["publisher"].clone());
                    article.insert("link".into(), item["link"].clone());
                    article.insert(
                        "published_at".into(),
                        unix_to_rfc3339(&item["providerPublishTime"]),
                    );
                    Value::Object(article)
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "symbol": symbol,
        "articles": articles,
    })
}

fn to_tool_text(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn normalize_symbol(args: &Value) -> Result<String> {
    Ok(require_str(args, "symbol")?.to_uppercase())
}

//
// ================= Tools =================
//

pub struct StockPriceTool {
    client: Arc<YahooFinanceClient>,
}

impl StockPriceTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for StockPriceTool {
    fn name(&self) -> &str {
        "get_current_stock_price"
    }

    fn description(&self) -> &str {
        "Get the latest stock price of a company."
    }

    fn parameters(&self) -> Value {
        symbol_schema()
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let symbol = normalize_symbol(&args)?;
        let chart = self.client.chart(&symbol).await?;
        to_tool_text(&price_summary(&symbol, &chart)?)
    }
}

pub struct StockFundamentalsTool {
    client: Arc<YahooFinanceClient>,
}

impl StockFundamentalsTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for StockFundamentalsTool {
    fn name(&self) -> &str {
        "get_stock_fundamentals"
    }

    fn description(&self) -> &str {
        "Get fundamental data for a stock (e.g., P/E ratio, market cap)."
    }

    fn parameters(&self) -> Value {
        symbol_schema()
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let symbol = normalize_symbol(&args)?;
        let summary = self
            .client
            .quote_summary(
                &symbol,
                &["price", "summaryProfile", "summaryDetail", "defaultKeyStatistics"],
            )
            .await?;
        to_tool_text(&fundamentals_summary(&symbol, &summary)?)
    }
}

pub struct AnalystRecommendationsTool {
    client: Arc<YahooFinanceClient>,
}

impl AnalystRecommendationsTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for AnalystRecommendationsTool {
    fn name(&self) -> &str {
        "get_analyst_recommendations"
    }

    fn description(&self) -> &str {
        "Get analyst recommendations for a given stock."
    }

    fn parameters(&self) -> Value {
        symbol_schema()
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let symbol = normalize_symbol(&args)?;
        let summary = self
            .client
            .quote_summary(&symbol, &["recommendationTrend", "financialData"])
            .await?;
        to_tool_text(&recommendations_summary(&symbol, &summary)?)
    }
}

pub struct CompanyNewsTool {
    client: Arc<YahooFinanceClient>,
}

impl CompanyNewsTool {
    pub fn new(client: Arc<YahooFinanceClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CompanyNewsTool {
    fn name(&self) -> &str {
        "get_company_news"
    }

    fn description(&self) -> &str {
        "Fetch recent company or stock-related news articles."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "symbol": {
                    "type": "string",
                    "description": "The stock ticker symbol, e.g. TSLA"
                },
                "num_stories": {
                    "type": "integer",
                    "description": "Number of articles to return (default: 5)"
                }
            },
            "required": ["symbol"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let symbol = normalize_symbol(&args)?;
        let count = args
            .get("num_stories")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_NEWS_COUNT);

        let search = self.client.search_news(&symbol, count).await?;
        to_tool_text(&news_summary(&symbol, &search, count))
    }
}

/// Price, analyst recommendations, fundamentals and news over one shared client
pub fn finance_tools(client: Arc<YahooFinanceClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(StockPriceTool::new(client.clone())),
        Arc::new(AnalystRecommendationsTool::new(client.clone())),
        Arc::new(StockFundamentalsTool::new(client.clone())),
        Arc::new(CompanyNewsTool::new(client)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve;
    use axum::extract::{Query, State};
    use axum::http::StatusCode as HttpStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_price_summary() {
        let chart = json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "NVDA",
                        "currency": "USD",
                        "exchangeName": "NMS",
                        "regularMarketPrice": 110.0,
                        "chartPreviousClose": 100.0,
                        "regularMarketTime": 1700000000
                    }
                }],
                "error": null
            }
        });

        let summary = price_summary("NVDA", &chart).unwrap();
        assert_eq!(summary["symbol"], "NVDA");
        assert_eq!(summary["price"], 110.0);
        assert_eq!(summary["change"], 10.0);
        assert_eq!(summary["change_percent"], 10.0);
        assert_eq!(summary["market_time"], "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_price_summary_upstream_error() {
        let chart = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        });

        let err = price_summary("ZZZZ", &chart).unwrap_err();
        assert!(err.to_string().contains("symbol may be delisted"));
    }

    #[test]
    fn test_fundamentals_summary() {
        let summary = json!({
            "quoteSummary": {
                "result": [{
                    "price": {"longName": "NVIDIA Corporation", "marketCap": {"raw": 2.7e12, "fmt": "2.7T"}},
                    "summaryProfile": {"sector": "Technology", "industry": "Semiconductors"},
                    "summaryDetail": {
                        "trailingPE": {"raw": 55.2, "fmt": "55.20"},
                        "dividendYield": {},
                        "beta": {"raw": 1.7}
                    },
                    "defaultKeyStatistics": {"priceToBook": {"raw": 50.1}, "trailingEps": {"raw": 2.1}}
                }],
                "error": null
            }
        });

        let out = fundamentals_summary("NVDA", &summary).unwrap();
        assert_eq!(out["company_name"], "NVIDIA Corporation");
        assert_eq!(out["sector"], "Technology");
        assert_eq!(out["market_cap"], 2.7e12);
        assert_eq!(out["pe_ratio"], 55.2);
        assert!(out["dividend_yield"].is_null());
        assert!(out["52_week_high"].is_null());
    }

    #[test]
    fn test_recommendations_summary() {
        let summary = json!({
            "quoteSummary": {
                "result": [{
                    "recommendationTrend": {
                        "trend": [
                            {"period": "0m", "strongBuy": 12, "buy": 40, "hold": 5, "sell": 1, "strongSell": 0}
                        ]
                    },
                    "financialData": {
                        "recommendationKey": "buy",
                        "targetMeanPrice": {"raw": 140.5},
                        "numberOfAnalystOpinions": {"raw": 58}
                    }
                }]
            }
        });

        let out = recommendations_summary("NVDA", &summary).unwrap();
        assert_eq!(out["recommendation"], "buy");
        assert_eq!(out["target_mean_price"], 140.5);
        assert_eq!(out["trend"][0]["strong_buy"], 12);
        assert_eq!(out["trend"][0]["period"], "0m");
    }

    #[test]
    fn test_news_summary() {
        let search = json!({
            "news": [
                {"title": "Tesla deliveries rise", "publisher": "Reuters", "link": "https://example.com/a", "providerPublishTime": 1700000000},
                {"title": "Second", "publisher": "CNBC", "link": "https://example.com/b"},
                {"title": "Third", "publisher": "WSJ", "link": "https://example.com/c"}
            ]
        });

        let out = news_summary("TSLA", &search, 2);
        let articles = out["articles"].as_array().unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0]["publisher"], "Reuters");
        assert!(articles[1]["published_at"].is_null());

        let empty = news_summary("TSLA", &json!({}), 5);
        assert_eq!(empty["articles"], json!([]));
    }

    #[test]
    fn test_finance_tool_names() {
        let client = Arc::new(YahooFinanceClient::new().unwrap());
        let names: Vec<String> = finance_tools(client)
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "get_current_stock_price",
                "get_analyst_recommendations",
                "get_stock_fundamentals",
                "get_company_news"
            ]
        );
    }

    #[tokio::test]
    async fn test_symbol_required() {
        let tool = StockPriceTool::new(Arc::new(YahooFinanceClient::new().unwrap()));
        let result = tool.execute(json!({})).await;
        assert!(matches!(result, Err(AgentError::InvalidToolInput(_))));
    }

    /// Yahoo stand-in: hands out crumb0, crumb1, ... and rejects any crumb in `rejected`
    struct FakeYahoo {
        crumbs_issued: AtomicUsize,
        rejected: Vec<&'static str>,
    }

    async fn fake_crumb(State(yahoo): State<Arc<FakeYahoo>>) -> String {
        format!("crumb{}", yahoo.crumbs_issued.fetch_add(1, Ordering::SeqCst))
    }

    async fn fake_quote_summary(
        State(yahoo): State<Arc<FakeYahoo>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> axum::response::Response {
        let crumb = params.get("crumb").map(String::as_str).unwrap_or_default();
        if yahoo.rejected.iter().any(|rejected| *rejected == crumb) {
            return (
                HttpStatus::UNAUTHORIZED,
                Json(json!({"finance": {"result": null, "error": {"code": "Unauthorized", "description": "Invalid Crumb"}}})),
            )
                .into_response();
        }

        Json(json!({
            "quoteSummary": {
                "result": [{
                    "price": {"shortName": "NVIDIA Corp", "marketCap": {"raw": 2.7e12}},
                    "summaryDetail": {"trailingPE": {"raw": 55.2}}
                }],
                "error": null
            }
        }))
        .into_response()
    }

    async fn fake_yahoo(rejected: Vec<&'static str>) -> (Arc<FakeYahoo>, YahooFinanceClient) {
        let yahoo = Arc::new(FakeYahoo {
            crumbs_issued: AtomicUsize::new(0),
            rejected,
        });
        let router = Router::new()
            .route("/consent", get(|| async { "ok" }))
            .route("/v1/test/getcrumb", get(fake_crumb))
            .route("/v10/finance/quoteSummary/:symbol", get(fake_quote_summary))
            .route(
                "/v8/finance/chart/:symbol",
                get(|| async { (HttpStatus::BAD_GATEWAY, "upstream down") }),
            )
            .with_state(yahoo.clone());

        let base = serve(router).await;
        let client = YahooFinanceClient::with_urls(&base, format!("{}/consent", base)).unwrap();
        (yahoo, client)
    }

    #[tokio::test]
    async fn test_stale_crumb_is_refreshed() {
        let (yahoo, client) = fake_yahoo(vec!["crumb0"]).await;
        let tool = StockFundamentalsTool::new(Arc::new(client));

        for _ in 0..3 {
            let out = tool.execute(json!({"symbol": "nvda"})).await.unwrap();
            let value: Value = serde_json::from_str(&out).unwrap();
            assert_eq!(value["company_name"], "NVIDIA Corp");
            assert_eq!(value["pe_ratio"], 55.2);
        }

        // One rejected handshake, one replacement, then reuse
        assert_eq!(yahoo.crumbs_issued.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persistent_crumb_rejection_surfaces_yahoo_error() {
        let (yahoo, client) = fake_yahoo(vec!["crumb0", "crumb1", "crumb2"]).await;
        let tool = AnalystRecommendationsTool::new(Arc::new(client));

        let err = tool.execute(json!({"symbol": "NVDA"})).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolError(_)));
        assert!(err.to_string().contains("Invalid Crumb"));
        assert!(err.to_string().contains("401"));

        // Refreshed once per call, never looped
        assert_eq!(yahoo.crumbs_issued.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_json_error_status_is_reported() {
        let (_yahoo, client) = fake_yahoo(vec![]).await;
        let tool = StockPriceTool::new(Arc::new(client));

        let err = tool.execute(json!({"symbol": "NVDA"})).await.unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_finance_error_envelope() {
        let body = json!({"finance": {"result": null, "error": {"code": "Unauthorized", "description": "Invalid Crumb"}}});
        assert!(crumb_rejected(StatusCode::OK, &body));
        assert!(crumb_rejected(StatusCode::UNAUTHORIZED, &Value::Null));
        assert!(!crumb_rejected(StatusCode::NOT_FOUND, &json!({"chart": {"error": {"description": "Not Found"}}})));

        let err = check_response("/v10/finance/quoteSummary/NVDA", StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(err.to_string().contains("Invalid Crumb"));

        // Endpoint errors pass through to the extractors
        let chart = json!({"chart": {"result": null, "error": {"description": "No data found"}}});
        assert!(check_response("/v8/finance/chart/ZZZZ", StatusCode::NOT_FOUND, chart).is_ok());
    }
}
