//! Agent adapter
//!
//! INPUT → MODEL → (TOOL CALLS → MODEL)* → ANSWER
//!
//! The hosted model does the reasoning and picks tools. The adapter only
//! executes the calls it asks for and feeds the results back.

use crate::error::AgentError;
use crate::groq::{ChatMessage, ChatModel};
use crate::models::AgentOutput;
use crate::tools::{Tool, ToolRegistry};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod profiles;
pub mod team;

pub use profiles::{build_agent, AgentSetup};
pub use team::AgentTool;

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = crate::config::DEFAULT_MAX_TOOL_ROUNDS;

/// Anything that turns a user message into an answer
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, message: &str) -> Result<AgentOutput>;
}

/// Agent backed by a chat model with function tools
pub struct LlmAgent {
    name: String,
    role: Option<String>,
    instructions: Vec<String>,
    team: Vec<String>,
    markdown: bool,
    show_tool_calls: bool,
    max_tool_rounds: usize,
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
}

impl LlmAgent {
    pub fn new(name: impl Into<String>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            name: name.into(),
            role: None,
            instructions: Vec::new(),
            team: Vec::new(),
            markdown: false,
            show_tool_calls: false,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            model,
            tools: ToolRegistry::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        for tool in tools {
            self.tools.register(tool);
        }
        self
    }

    /// Add a member agent the model can hand tasks to
    pub fn with_team_member(mut self, member: Arc<dyn Agent>) -> Self {
        let tool = AgentTool::new(member);
        self.team.push(tool.member_name().to_string());
        self.tools.register(Arc::new(tool));
        self
    }

    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn with_show_tool_calls(mut self, show: bool) -> Self {
        self.show_tool_calls = show;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.list()
    }

    pub fn system_prompt(&self) -> String {
        let mut prompt = String::new();

        if let Some(role) = &self.role {
            prompt.push_str(&format!("Your role: {}\n\n", role));
        }

        if !self.team.is_empty() {
            prompt.push_str(
                "You are the leader of a team of AI agents. You can either respond directly \
                 or transfer tasks to the agents in your team, depending on the tools available to them.\n\
                 Team members:\n",
            );
            for member in &self.team {
                prompt.push_str(&format!("- {}\n", member));
            }
            prompt.push('\n');
        }

        if !self.instructions.is_empty() {
            prompt.push_str("Instructions:\n");
            for instruction in &self.instructions {
                prompt.push_str(&format!("- {}\n", instruction));
            }
            prompt.push('\n');
        }

        if self.markdown {
            prompt.push_str("Use markdown to format your answers.\n");
        }

        prompt.trim_end().to_string()
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, message: &str) -> Result<AgentOutput> {
        info!(agent = %self.name, model = %self.model.model_id(), "Agent run started");

        let specs = self.tools.specs();
        let mut messages = Vec::with_capacity(4);
        let system_prompt = self.system_prompt();
        if !system_prompt.is_empty() {
            messages.push(ChatMessage::system(system_prompt));
        }
        messages.push(ChatMessage::user(message));

        let mut call_log = Vec::new();

        for round in 0..=self.max_tool_rounds {
            let reply = self.model.complete(&messages, &specs).await?;
            let calls = reply.requested_tools().to_vec();

            if calls.is_empty() {
                info!(agent = %self.name, rounds = round, "Agent run finished");
                return Ok(self.finish(reply, &call_log));
            }

            if round == self.max_tool_rounds {
                break;
            }

            debug!(agent = %self.name, round, calls = calls.len(), "Model requested tools");
            messages.push(reply);

            for call in calls {
                info!(agent = %self.name, tool = %call.function.name, "Running tool");
                call_log.push(format!(
                    " - Running: {}({})",
                    call.function.name,
                    compact_arguments(&call.function.arguments)
                ));

                let content = match self
                    .tools
                    .execute(&call.function.name, &call.function.arguments)
                    .await
                {
                    Ok(output) => output,
                    Err(e) => {
                        warn!(agent = %self.name, tool = %call.function.name, "Tool failed: {}", e);
                        format!("Error: {}", e)
                    }
                };

                messages.push(ChatMessage::tool_result(call.id, content));
            }
        }

        Err(AgentError::MaxToolRoundsExceeded(self.max_tool_rounds))
    }
}

impl LlmAgent {
    fn finish(&self, reply: ChatMessage, call_log: &[String]) -> AgentOutput {
        let Some(content) = reply.content.clone() else {
            return match serde_json::to_value(&reply) {
                Ok(value) => AgentOutput::Opaque(value),
                Err(_) => AgentOutput::Text(String::new()),
            };
        };

        if self.show_tool_calls && !call_log.is_empty() {
            AgentOutput::Text(format!("{}\n\n{}", call_log.join("\n"), content))
        } else {
            AgentOutput::Text(content)
        }
    }
}

/// `{"symbol": "NVDA"}` → `symbol=NVDA`
fn compact_arguments(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::groq::{FunctionCall, Role, ToolCall, ToolSpec};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Chat model that replays canned replies and records what it was sent
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<ChatMessage>>,
        pub seen: Mutex<Vec<Vec<ChatMessage>>>,
        pub seen_tools: Mutex<Vec<Vec<ToolSpec>>>,
    }

    impl ScriptedModel {
        pub fn new(replies: Vec<ChatMessage>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
                seen_tools: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn model_id(&self) -> &str {
            "scripted-model"
        }

        async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<ChatMessage> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.seen_tools.lock().unwrap().push(tools.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AgentError::LlmError("script exhausted".to_string()))
        }
    }

    pub fn tool_call_reply(calls: &[(&str, &str, &str)]) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            content: None,
            tool_calls: Some(
                calls
                    .iter()
                    .map(|(id, name, args)| ToolCall {
                        id: id.to_string(),
                        kind: "function".to_string(),
                        function: FunctionCall {
                            name: name.to_string(),
                            arguments: args.to_string(),
                        },
                    })
                    .collect(),
            ),
            tool_call_id: None,
        }
    }
}
