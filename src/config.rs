//! Startup configuration
//!
//! Everything is read once from the environment (after `.env` is loaded by the
//! binaries). Only the Groq API key is required.

use crate::error::AgentError;
use crate::Result;
use std::fmt;
use std::str::FromStr;

pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 10;

/// Browser origins allowed by CORS (local frontend dev servers)
pub const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:8080", "http://localhost:3000"];

/// Which agent assembly the service runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentProfile {
    /// Leader agent delegating to a web search agent and a finance agent
    #[default]
    Team,
    /// Single agent holding all five tools directly
    Toolkit,
}

impl FromStr for AgentProfile {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "team" | "multi" | "multi_agent" => Ok(AgentProfile::Team),
            "toolkit" | "tools" | "single" => Ok(AgentProfile::Toolkit),
            other => Err(AgentError::InvalidConfig(
                "AGENT_PROFILE".to_string(),
                format!("expected 'team' or 'toolkit', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for AgentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentProfile::Team => "team",
            AgentProfile::Toolkit => "toolkit",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_base: String,
    pub model: String,
    pub profile: AgentProfile,
    pub host: String,
    pub port: u16,
    pub max_tool_rounds: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("groq_api_key", &"<redacted>")
            .field("groq_api_base", &self.groq_api_base)
            .field("model", &self.model)
            .field("profile", &self.profile)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let groq_api_key = lookup(GROQ_API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AgentError::MissingEnvVar(GROQ_API_KEY_VAR.to_string()))?;

        let groq_api_base = lookup("GROQ_API_BASE")
            .unwrap_or_else(|| DEFAULT_GROQ_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("GROQ_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let profile = lookup("AGENT_PROFILE")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup("PORT")
            .map(|v| {
                v.parse::<u16>()
                    .map_err(|e| AgentError::InvalidConfig("PORT".to_string(), e.to_string()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        let max_tool_rounds = lookup("AGENT_MAX_TOOL_ROUNDS")
            .map(|v| {
                v.parse::<usize>().map_err(|e| {
                    AgentError::InvalidConfig("AGENT_MAX_TOOL_ROUNDS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_TOOL_ROUNDS);

        Ok(Self {
            groq_api_key,
            groq_api_base,
            model,
            profile,
            host,
            port,
            max_tool_rounds,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
