/// Search-field text classified once at the input boundary.
///
/// A leading space marks a name search; anything else is first tried as a
/// literal hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Empty,
    Literal(String),
    Query(String),
}

impl QueryInput {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }

        match raw.strip_prefix(' ') {
            Some("") => Self::Empty,
            Some(text) => Self::Query(text.to_string()),
            None => Self::Literal(raw.to_string()),
        }
    }

    /// Text to rank when no hotkey claims the input.
    pub fn search_text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Literal(text) | Self::Query(text) => text,
        }
    }

    pub fn hotkey_candidate(&self) -> Option<&str> {
        match self {
            Self::Literal(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QueryInput;

    #[test]
    fn leading_space_selects_name_search() {
        assert_eq!(QueryInput::parse(" saf"), QueryInput::Query("saf".into()));
        assert_eq!(QueryInput::parse("  saf"), QueryInput::Query(" saf".into()));
        assert_eq!(QueryInput::parse(" saf").hotkey_candidate(), None);
    }

    #[test]
    fn bare_text_is_a_hotkey_literal() {
        let input = QueryInput::parse("ff");
        assert_eq!(input, QueryInput::Literal("ff".into()));
        assert_eq!(input.hotkey_candidate(), Some("ff"));
        assert_eq!(input.search_text(), "ff");
    }

    #[test]
    fn blank_inputs_are_empty() {
        assert_eq!(QueryInput::parse(""), QueryInput::Empty);
        assert_eq!(QueryInput::parse(" "), QueryInput::Empty);
        assert_eq!(QueryInput::Empty.search_text(), "");
    }
}
