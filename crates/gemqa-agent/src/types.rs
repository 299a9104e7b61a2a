//! Wire types for the Gemini `generateContent` endpoint

use gemqa_core::{QaError, Result};
use serde::{Deserialize, Serialize};

/// Fallback when the provider gives neither content nor an error message
const UNKNOWN_API_ERROR: &str = "Unknown API Error.";

/// A text fragment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A list of parts, used for both prompt and generated content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// Request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

impl GenerateContentRequest {
    pub fn new(prompt: &str, system_instruction: &str) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            system_instruction: Content::text(system_instruction),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body of a request that made it past the HTTP status check
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl GenerateContentResponse {
    /// First text fragment of the first candidate, or the provider's error
    pub fn into_answer(self) -> Result<String> {
        if let Some(content) = self.candidates.into_iter().next().and_then(|c| c.content) {
            return content
                .parts
                .into_iter()
                .next()
                .and_then(|p| p.text)
                .ok_or_else(|| QaError::Unexpected("response candidate has no text".to_string()));
        }

        let message = self
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());
        Err(QaError::Api(message))
    }
}
