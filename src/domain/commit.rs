use std::sync::OnceLock;

use regex::Regex;

/// Footers that mark a commit as breaking when no configuration overrides them
pub const DEFAULT_BREAKING_CHANGE_INDICATORS: &[&str] = &["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

fn header_regex() -> Option<&'static Regex> {
    static HEADER: OnceLock<Option<Regex>> = OnceLock::new();
    HEADER
        .get_or_init(|| Regex::new(r"^([A-Za-z]+)(?:\(([^)]*)\))?(!)?:\s*(.*)").ok())
        .as_ref()
}

impl ParsedCommit {
    /// Parse a commit message in Conventional Commits form
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text
    pub fn parse(message: &str) -> Self {
        Self::parse_with_indicators(message, DEFAULT_BREAKING_CHANGE_INDICATORS)
    }

    /// Parse a commit message, treating a body line that starts with any of
    /// `indicators` as a breaking-change footer.
    pub fn parse_with_indicators<S: AsRef<str>>(message: &str, indicators: &[S]) -> Self {
        let message = message.trim_start();

        if let Some(captures) = header_regex().and_then(|re| re.captures(message)) {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            let scope = captures
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let has_exclamation = captures.get(3).is_some();
            let description = captures
                .get(4)
                .map(|m| m.as_str().trim_end().to_string())
                .unwrap_or_default();

            let has_footer = message.lines().skip(1).any(|line| {
                let line = line.trim_start();
                indicators
                    .iter()
                    .any(|indicator| line.starts_with(indicator.as_ref()))
            });

            return ParsedCommit {
                r#type,
                scope,
                description,
                is_breaking_change: has_exclamation || has_footer,
            };
        }

        // Default: non-conventional commit
        ParsedCommit {
            r#type: "chore".to_string(),
            scope: None,
            description: message.lines().next().unwrap_or_default().to_string(),
            is_breaking_change: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_scope() {
        let commit = ParsedCommit::parse("feat(auth): add login");
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.scope, Some("auth".to_string()));
        assert_eq!(commit.description, "add login");
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_parse_with_breaking_marker() {
        let commit = ParsedCommit::parse("feat(auth)!: redesign login");
        assert_eq!(commit.r#type, "feat");
        assert!(commit.is_breaking_change);
    }

    #[test]
    fn test_parse_breaking_without_scope() {
        let commit = ParsedCommit::parse("feat!: redesign");
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.scope, None);
        assert!(commit.is_breaking_change);
    }

    #[test]
    fn test_parse_simple_fix() {
        let commit = ParsedCommit::parse("fix: handle empty input\n\nlonger body here");
        assert_eq!(commit.r#type, "fix");
        assert_eq!(commit.description, "handle empty input");
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_parse_uppercase_type_is_normalised() {
        let commit = ParsedCommit::parse("Fix: typo");
        assert_eq!(commit.r#type, "fix");
    }

    #[test]
    fn test_parse_non_conventional() {
        let commit = ParsedCommit::parse("Random commit message");
        assert_eq!(commit.r#type, "chore");
        assert_eq!(commit.description, "Random commit message");
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_parse_breaking_change_footer() {
        let commit = ParsedCommit::parse("fix: something\n\nBREAKING CHANGE: desc");
        assert!(commit.is_breaking_change);

        let commit = ParsedCommit::parse("fix: something\n\nBREAKING-CHANGE: desc");
        assert!(commit.is_breaking_change);
    }

    #[test]
    fn test_indicator_in_subject_is_not_a_footer() {
        let commit = ParsedCommit::parse("docs: explain when to write BREAKING CHANGE: footers");
        assert!(!commit.is_breaking_change);

        let commit =
            ParsedCommit::parse("docs: footers\n\nMention the BREAKING CHANGE: footer in prose.");
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_parse_custom_indicators() {
        let commit =
            ParsedCommit::parse_with_indicators("feat: x\n\n+semver: major", &["+semver: major"]);
        assert!(commit.is_breaking_change);

        let commit = ParsedCommit::parse_with_indicators(
            "feat: x\n\nBREAKING CHANGE: y",
            &["+semver: major"],
        );
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_parse_empty_message() {
        let commit = ParsedCommit::parse("");
        assert_eq!(commit.r#type, "chore");
        assert_eq!(commit.description, "");
    }
}
