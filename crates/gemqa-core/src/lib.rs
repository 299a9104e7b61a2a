//! # gemqa-core
//!
//! Core types for gemqa, a one-question-at-a-time CLI in front of the
//! Gemini `generateContent` API.
//!
//! ## Turn Pipeline
//!
//! - Console line is classified ([`Input`])
//! - Question is normalized ([`normalize`])
//! - Normalized query is wrapped in the fixed prompt template ([`build_prompt`])
//! - The prompt goes to the answer requester in `gemqa-agent`
//!
//! Nothing survives a turn. There is no history and no cache.

pub mod config;
mod error;
mod input;
mod normalize;
mod prompt;

pub use config::QaConfig;
pub use error::{QaError, Result};
pub use input::Input;
pub use normalize::normalize;
pub use prompt::{build_prompt, SYSTEM_INSTRUCTION};
