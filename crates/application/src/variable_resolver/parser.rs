//! Variable parser for {{variable}} syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without {{ }}).
    pub name: String,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a string and extracts all variable references.
///
/// # Examples
///
/// ```
/// use eavesdrop_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("{{project_url}}/meetings/{{meeting_id}}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "project_url");
/// assert_eq!(refs[1].name, "meeting_id");
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '{' || !matches!(chars.peek(), Some((_, '{'))) {
            continue;
        }
        chars.next(); // consume second {
        let start = i;
        let mut name = String::new();
        let mut found_end = false;

        while let Some((_, ch)) = chars.next() {
            if ch == '}' {
                if let Some(&(end_idx, '}')) = chars.peek() {
                    chars.next(); // consume second }
                    let trimmed = name.trim();
                    if !trimmed.is_empty() {
                        references.push(VariableReference::new(trimmed, start..end_idx + 1));
                    }
                    found_end = true;
                    break;
                }
            }
            name.push(ch);
        }

        // Unterminated reference: nothing after it can close.
        if !found_end {
            break;
        }
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_variable() {
        let refs = parse_variables("{{base_url}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "base_url");
        assert_eq!(refs[0].span, 0..12);
    }

    #[test]
    fn test_parse_url_template() {
        let refs = parse_variables("{{project_url}}/meetings/{{meeting_id}}");
        let names: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["project_url", "meeting_id"]);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let refs = parse_variables("{{ project_id }}");
        assert_eq!(refs[0].name, "project_id");
    }

    #[test]
    fn test_no_variables_in_xml() {
        assert!(parse_variables("<project><name>solum</name></project>").is_empty());
    }

    #[test]
    fn test_unclosed_variable() {
        assert!(parse_variables("{{name").is_empty());
    }

    #[test]
    fn test_empty_and_blank_variables() {
        assert!(parse_variables("{{}}").is_empty());
        assert!(parse_variables("{{   }}").is_empty());
    }

    #[test]
    fn test_single_brace() {
        assert!(parse_variables("{name}").is_empty());
    }

    #[test]
    fn test_adjacent_variables() {
        let names: Vec<_> = parse_variables("{{a}}{{b}}{{c}}")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_span_positions() {
        let input = "{{base_url}}asdf";
        let refs = parse_variables(input);
        assert_eq!(&input[refs[0].span.clone()], "{{base_url}}");
    }
}
