use crate::domain::SemVer;
use crate::error::{MreleaserError, Result};

const VERSION_PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "{version}", "v{version}", "release-{version}")
///
/// The default pattern is the bare version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPattern {
    prefix: String,
    suffix: String,
}

impl TagPattern {
    /// Create a new tag pattern
    ///
    /// The pattern must contain exactly one `{version}` placeholder.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut parts = pattern.split(VERSION_PLACEHOLDER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(suffix), None) => Ok(TagPattern {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
            _ => Err(MreleaserError::tag(format!(
                "Pattern '{}' must contain exactly one {} placeholder",
                pattern, VERSION_PLACEHOLDER
            ))),
        }
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &SemVer) -> String {
        format!("{}{}{}", self.prefix, version, self.suffix)
    }

    /// Extract the release version from a tag name, if the tag follows this pattern.
    pub fn parse(&self, tag: &str) -> Option<SemVer> {
        let inner = tag
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        SemVer::parse(inner).ok()
    }
}

impl std::fmt::Display for TagPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.prefix, VERSION_PLACEHOLDER, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.format(&SemVer::new(1, 2, 3)), "v1.2.3");
    }

    #[test]
    fn test_default_pattern_is_bare_version() {
        let pattern = TagPattern::default();
        assert_eq!(pattern.format(&SemVer::new(0, 0, 1)), "0.0.1");
        assert_eq!(pattern.to_string(), "{version}");
    }

    #[test]
    fn test_pattern_format_with_suffix() {
        let pattern = TagPattern::new("release-{version}-final").unwrap();
        assert_eq!(
            pattern.format(&SemVer::new(1, 2, 3)),
            "release-1.2.3-final"
        );
    }

    #[test]
    fn test_pattern_parse() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(pattern.parse("release-1.2.3"), Some(SemVer::new(1, 2, 3)));
        assert_eq!(pattern.parse("1.2.3"), None);
        assert_eq!(pattern.parse("release-latest"), None);
    }

    #[test]
    fn test_default_pattern_accepts_v_prefix() {
        let pattern = TagPattern::default();
        assert_eq!(pattern.parse("v2.0.1"), Some(SemVer::new(2, 0, 1)));
        assert_eq!(pattern.parse("2.0.1"), Some(SemVer::new(2, 0, 1)));
        assert_eq!(pattern.parse("2.0.1-rc.1"), None);
    }

    #[test]
    fn test_pattern_requires_single_placeholder() {
        assert!(TagPattern::new("v1").is_err());
        assert!(TagPattern::new("{version}-{version}").is_err());
    }
}
