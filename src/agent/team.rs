//! Team composition: member agents exposed to a leader as tools

use super::Agent;
use crate::tools::{require_str, Tool};
use crate::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Hands a task to a member agent and returns its answer
pub struct AgentTool {
    member: Arc<dyn Agent>,
    tool_name: String,
    description: String,
}

impl AgentTool {
    pub fn new(member: Arc<dyn Agent>) -> Self {
        let tool_name = format!("transfer_task_to_{}", snake_case(member.name()));
        let description = format!(
            "Use this tool to transfer a task to {}. Describe the task clearly and include all relevant context.",
            member.name()
        );

        Self {
            member,
            tool_name,
            description,
        }
    }

    pub fn member_name(&self) -> &str {
        self.member.name()
    }
}

#[async_trait::async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        &self.tool_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_description": {
                    "type": "string",
                    "description": "A clear and concise description of the task the agent should achieve"
                },
                "expected_output": {
                    "type": "string",
                    "description": "The expected output from the agent"
                }
            },
            "required": ["task_description"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let task = require_str(&args, "task_description")?;
        let prompt = match args.get("expected_output").and_then(Value::as_str) {
            Some(expected) if !expected.trim().is_empty() => {
                format!("{}\n\nThe expected output is: {}", task, expected.trim())
            }
            _ => task.to_string(),
        };

        info!(member = %self.member.name(), "Transferring task to team member");
        let output = self.member.run(&prompt).await?;
        Ok(output.into_text())
    }
}

/// "Web Search Agent" → "web_search_agent"
fn snake_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
