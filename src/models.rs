//! Core data models for the finance agent service

use serde::{Deserialize, Serialize};
use serde_json::Value;

//
// ================= HTTP Payloads =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// What the health endpoint advertises: member agents or raw tools
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Roster {
    Agents(Vec<String>),
    Tools(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub roster: Roster,
    pub model: String,
}

/// Static facts about the running service, fixed at startup
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub root_message: String,
    pub roster: Roster,
    pub model: String,
}

impl ServiceInfo {
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy",
            roster: self.roster.clone(),
            model: self.model.clone(),
        }
    }
}

//
// ================= Agent Result =================
//

/// Result returned across the agent adapter boundary
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    /// The model's textual content
    Text(String),
    /// Anything else the agent produced
    Opaque(Value),
}

impl AgentOutput {
    pub fn into_text(self) -> String {
        match self {
            AgentOutput::Text(text) => text,
            AgentOutput::Opaque(Value::String(text)) => text,
            AgentOutput::Opaque(value) => value.to_string(),
        }
    }
}

impl From<String> for AgentOutput {
    fn from(text: String) -> Self {
        AgentOutput::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_output_into_text() {
        assert_eq!(AgentOutput::Text("NVDA is up".into()).into_text(), "NVDA is up");
        assert_eq!(AgentOutput::Opaque(json!("plain")).into_text(), "plain");
        assert_eq!(
            AgentOutput::Opaque(json!({"role": "assistant"})).into_text(),
            r#"{"role":"assistant"}"#
        );
    }

    #[test]
    fn test_health_roster_key() {
        let team = HealthResponse {
            status: "healthy",
            roster: Roster::Agents(vec!["finance_agent".into()]),
            model: "llama-3.3-70b-versatile".into(),
        };
        let value = serde_json::to_value(&team).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["agents"], json!(["finance_agent"]));
        assert!(value.get("tools").is_none());

        let toolkit = HealthResponse {
            status: "healthy",
            roster: Roster::Tools(vec!["Web Search".into()]),
            model: "llama-3.3-70b-versatile".into(),
        };
        let value = serde_json::to_value(&toolkit).unwrap();
        assert_eq!(value["tools"], json!(["Web Search"]));
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_chat_request_requires_message() {
        assert!(serde_json::from_str::<ChatRequest>(r#"{"msg": "hi"}"#).is_err());
        let req: ChatRequest = serde_json::from_str(r#"{"message": "Analyze NVDA"}"#).unwrap();
        assert_eq!(req.message, "Analyze NVDA");
    }
}
