//! Tool trait and registry
//!
//! Tools are thin wrappers around external data sources. The model picks
//! them by name; the registry executes the call and hands back text.

use crate::error::AgentError;
use crate::groq::ToolSpec;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

pub mod finance;
pub mod web;

pub use finance::{
    finance_tools, AnalystRecommendationsTool, CompanyNewsTool, StockFundamentalsTool,
    StockPriceTool, YahooFinanceClient,
};
pub use web::DuckDuckGoSearch;

/// Trait for a single tool the model may call
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// JSON schema of the arguments object
    fn parameters(&self) -> Value;

    async fn execute(&self, args: Value) -> Result<String>;
}

/// Ordered tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool, replacing any tool already registered under its name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Function specs advertised to the model
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec::function(t.name(), t.description(), t.parameters()))
            .collect()
    }

    /// Execute a model-requested call; `raw_args` is the JSON string the model produced
    pub async fn execute(&self, name: &str, raw_args: &str) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        let args = parse_arguments(raw_args)?;
        tool.execute(args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_arguments(raw_args: &str) -> Result<Value> {
    if raw_args.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let args: Value = serde_json::from_str(raw_args).map_err(|e| {
        AgentError::InvalidToolInput(format!("arguments are not valid JSON: {}", e))
    })?;

    if args.is_object() {
        Ok(args)
    } else {
        Err(AgentError::InvalidToolInput(
            "tool arguments must be a JSON object".to_string(),
        ))
    }
}

/// Fetch a required, non-empty string argument
pub(crate) fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AgentError::InvalidToolInput(format!("Expected '{}' in tool arguments", key)))
}

/// Schema for tools taking a single ticker symbol
pub(crate) fn symbol_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "symbol": {
                "type": "string",
                "description": "The stock ticker symbol, e.g. NVDA"
            }
        },
        "required": ["symbol"]
    })
}
