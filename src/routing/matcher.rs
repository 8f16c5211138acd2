//! Path matching module
//!
//! Two route shapes: an exact path, or a static prefix followed by exactly
//! one variable segment.

/// Path shape a route responds to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Exact string match
    Exact(String),
    /// `prefix` followed by a single non-empty segment without `/`
    Segment { prefix: String },
}

/// Result of matching a path against a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch<'p> {
    /// The variable segment, for `Segment` patterns
    pub segment: Option<&'p str>,
}

impl PathPattern {
    /// Match `path`, capturing the trailing segment if the pattern has one
    pub fn capture<'p>(&self, path: &'p str) -> Option<PathMatch<'p>> {
        match self {
            Self::Exact(exact) => (path == exact).then_some(PathMatch { segment: None }),
            Self::Segment { prefix } => {
                let segment = path.strip_prefix(prefix.as_str())?;
                if segment.is_empty() || segment.contains('/') {
                    return None;
                }
                Some(PathMatch {
                    segment: Some(segment),
                })
            }
        }
    }

    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        let pattern = PathPattern::Exact("/show".to_string());
        assert_eq!(
            pattern.capture("/show"),
            Some(PathMatch { segment: None })
        );
        assert!(pattern.capture("/show/").is_none());
        assert!(pattern.capture("/showme").is_none());
        assert!(pattern.capture("/").is_none());
    }

    #[test]
    fn test_segment() {
        let pattern = PathPattern::Segment {
            prefix: "/".to_string(),
        };
        assert_eq!(pattern.capture("/abcdef").unwrap().segment, Some("abcdef"));
        assert!(pattern.capture("/").is_none());
        assert!(pattern.capture("/a/b").is_none());
        assert!(pattern.capture("abcdef").is_none());
    }

    #[test]
    fn test_segment_with_longer_prefix() {
        let pattern = PathPattern::Segment {
            prefix: "/raw/".to_string(),
        };
        assert_eq!(pattern.capture("/raw/xyz").unwrap().segment, Some("xyz"));
        assert!(pattern.capture("/raw/").is_none());
        assert!(pattern.capture("/rawxyz").is_none());
    }
}
