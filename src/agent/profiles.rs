//! Static agent assemblies
//!
//! `team`: a leader delegating to a web search agent and a finance agent.
//! `toolkit`: one agent holding every tool directly.

use super::{Agent, LlmAgent};
use crate::config::{AgentProfile, Config};
use crate::groq::{ChatModel, GroqClient};
use crate::models::{Roster, ServiceInfo};
use crate::tools::{finance_tools, DuckDuckGoSearch, YahooFinanceClient};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub const TEAM_AGENTS: [&str; 3] = ["web_search_agent", "finance_agent", "multi_ai_agent"];

pub const TOOLKIT_TOOLS: [&str; 5] = [
    "Web Search",
    "Stock Price",
    "Analyst Recommendations",
    "Stock Fundamentals",
    "Finance News",
];

/// The agent plus what the HTTP layer reports about it
pub struct AgentSetup {
    pub agent: Arc<dyn Agent>,
    pub info: ServiceInfo,
}

/// Build the configured profile against Groq
pub fn build_agent(config: &Config) -> Result<AgentSetup> {
    let model: Arc<dyn ChatModel> = Arc::new(GroqClient::new(
        config.groq_api_key.clone(),
        config.groq_api_base.clone(),
        config.model.clone(),
    )?);

    build_agent_with_model(config.profile, model, config.max_tool_rounds)
}

pub fn build_agent_with_model(
    profile: AgentProfile,
    model: Arc<dyn ChatModel>,
    max_tool_rounds: usize,
) -> Result<AgentSetup> {
    let web_search = Arc::new(DuckDuckGoSearch::new()?);
    let yahoo = Arc::new(YahooFinanceClient::new()?);
    let model_id = model.model_id().to_string();

    let setup = match profile {
        AgentProfile::Team => {
            let web_search_agent = LlmAgent::new("Web Search Agent", model.clone())
                .with_role("Search the web for information")
                .with_tool(web_search)
                .with_instruction("Always include sources")
                .with_markdown(true)
                .with_show_tool_calls(true)
                .with_max_tool_rounds(max_tool_rounds);
            log_tools(&web_search_agent);

            let finance_agent = LlmAgent::new("Finance AI Agent", model.clone())
                .with_tools(finance_tools(yahoo))
                .with_instruction("Use tables to display the data")
                .with_markdown(true)
                .with_show_tool_calls(true)
                .with_max_tool_rounds(max_tool_rounds);
            log_tools(&finance_agent);

            let multi_ai_agent = LlmAgent::new("Multi AI Agent", model)
                .with_team_member(Arc::new(web_search_agent))
                .with_team_member(Arc::new(finance_agent))
                .with_instruction("Always include sources")
                .with_instruction("Use tables to display data")
                .with_markdown(true)
                .with_show_tool_calls(true)
                .with_max_tool_rounds(max_tool_rounds);
            log_tools(&multi_ai_agent);

            AgentSetup {
                agent: Arc::new(multi_ai_agent),
                info: ServiceInfo {
                    root_message: "AI Finance Agent API is running".to_string(),
                    roster: Roster::Agents(TEAM_AGENTS.iter().map(|s| s.to_string()).collect()),
                    model: model_id,
                },
            }
        }
        AgentProfile::Toolkit => {
            let agent = LlmAgent::new("Finance Toolkit Agent", model)
                .with_tool(web_search)
                .with_tools(finance_tools(yahoo))
                .with_instruction("Always include sources")
                .with_instruction("Use tables to display data")
                .with_max_tool_rounds(max_tool_rounds);
            log_tools(&agent);

            AgentSetup {
                agent: Arc::new(agent),
                info: ServiceInfo {
                    root_message: "AI Finance Agent API (toolkit) is running".to_string(),
                    roster: Roster::Tools(TOOLKIT_TOOLS.iter().map(|s| s.to_string()).collect()),
                    model: model_id,
                },
            }
        }
    };

    info!(profile = %profile, agent = %setup.agent.name(), "Agent assembled");
    Ok(setup)
}

fn log_tools(agent: &LlmAgent) {
    debug!(agent = %agent.name(), tools = ?agent.tool_names(), "Agent tools registered");
}
