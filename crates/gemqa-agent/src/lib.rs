//! # gemqa-agent
//!
//! Gemini `generateContent` client for gemqa.
//!
//! Each call is stateless: one prompt in, one answer string out. Failures
//! are never raised past [`Answerer::answer`]; they come back as the text
//! the user should see.

mod auth;
mod client;
mod retry;
mod types;

pub use auth::get_api_key;
pub use client::{Answerer, GeminiClient};
pub use retry::RetryPolicy;
pub use types::*;
