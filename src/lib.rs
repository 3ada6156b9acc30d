//! Hoss: agent tools for a character-chat host.
//!
//! Registers a set of tools (group-chat control, agent-only messaging and
//! cross-conversation recall) and executes the calls an agent makes against
//! them, talking to the host over its HTTP API.

pub mod config;
pub mod host;
pub mod plugin;
pub mod recall;
pub mod state;
pub mod tools;
pub mod types;

#[cfg(test)]
mod testing;
