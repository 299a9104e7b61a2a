//! Console line classification

/// What a single console line asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `quit` or `exit`, any case
    Quit,
    /// Empty or whitespace-only, reprompt silently
    Blank,
    /// Anything else, passed through unchanged
    Question(String),
}

impl Input {
    /// Classify a raw line (trailing newline already stripped or not)
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Input::Blank;
        }

        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            return Input::Quit;
        }

        Input::Question(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_sentinels_any_case() {
        for line in ["quit", "QUIT", "Quit", "exit", "EXIT", "eXiT", "  quit\n", "exit\r\n"] {
            assert_eq!(Input::parse(line), Input::Quit, "line: {:?}", line);
        }
    }

    #[test]
    fn test_blank() {
        assert_eq!(Input::parse(""), Input::Blank);
        assert_eq!(Input::parse("   \t\n"), Input::Blank);
    }

    #[test]
    fn test_question_kept_verbatim() {
        assert_eq!(
            Input::parse("Why quit smoking?\n"),
            Input::Question("Why quit smoking?".to_string())
        );
        assert_eq!(
            Input::parse("quitter"),
            Input::Question("quitter".to_string())
        );
    }
}
