//! AI Finance Agent API
//!
//! An HTTP service that answers finance questions with a Groq-hosted model:
//! - `team` profile: a leader delegating to web search and finance agents
//! - `toolkit` profile: a single agent holding every tool
//! - Live data from DuckDuckGo and Yahoo Finance
//!
//! REQUEST FLOW:
//! POST /chat → AGENT → (TOOL CALLS)* → ANSWER

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod groq;
pub mod models;
pub mod tools;

#[cfg(test)]
mod testing;

pub use error::Result;

// Re-export common types
pub use config::{AgentProfile, Config};
pub use models::*;
