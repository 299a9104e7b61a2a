//! Fixed prompt template and system instruction

/// System instruction sent with every request
pub const SYSTEM_INSTRUCTION: &str = "You are a concise question-answering system. \
Answer the user's query directly and accurately, avoiding conversational filler.";

/// Wrap a normalized query in the prompt template
pub fn build_prompt(normalized: &str) -> String {
    format!(
        "Using the following preprocessed query, provide a concise answer: '{}'",
        normalized
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt() {
        assert_eq!(
            build_prompt("capital of france"),
            "Using the following preprocessed query, provide a concise answer: 'capital of france'"
        );
    }

    #[test]
    fn test_system_instruction_text() {
        assert!(SYSTEM_INSTRUCTION.starts_with("You are a concise question-answering system."));
        assert!(SYSTEM_INSTRUCTION.ends_with("avoiding conversational filler."));
    }
}
