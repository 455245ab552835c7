//! Conditional request evaluation.
//!
//! `If-Match` and `If-None-Match` carry either a wildcard or a list of
//! version tags. [`Conditions`] evaluates both against the resource's
//! current tag before a write proceeds; a failed evaluation surfaces
//! as [`StoreError::PreconditionFailed`].

use thiserror::Error;

use crate::error::{StoreError, StoreResult};
use crate::etag::ETag;

/// A parsed conditional header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// `*`: any current version (for if-match), or absence (for
    /// if-none-match).
    Any,
    /// Explicit tags to compare against the current one.
    Tags(Vec<ETag>),
}

/// Parse failure for a conditional header value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed precondition {0:?}")]
pub struct PreconditionError(pub String);

impl Precondition {
    /// Parses a header value: `*`, or comma-separated tags, each
    /// optionally wrapped in double quotes.
    pub fn parse(header: &str) -> Result<Self, PreconditionError> {
        let trimmed = header.trim();
        if trimmed == "*" {
            return Ok(Precondition::Any);
        }
        if trimmed.is_empty() {
            return Err(PreconditionError(header.to_string()));
        }
        let mut tags = Vec::new();
        for part in trimmed.split(',') {
            let part = part.trim();
            let tag = match part.strip_prefix('"') {
                Some(rest) => rest
                    .strip_suffix('"')
                    .ok_or_else(|| PreconditionError(header.to_string()))?,
                None => part,
            };
            if tag.is_empty() || tag.contains('"') {
                return Err(PreconditionError(header.to_string()));
            }
            tags.push(ETag::from(tag));
        }
        Ok(Precondition::Tags(tags))
    }

    fn matches(&self, current: &ETag) -> bool {
        match self {
            Precondition::Any => true,
            Precondition::Tags(tags) => tags.contains(current),
        }
    }
}

/// The conditional headers of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    pub if_match: Option<Precondition>,
    pub if_none_match: Option<Precondition>,
}

impl Conditions {
    /// No conditions; the write proceeds unconditionally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the current tag to equal `etag`.
    pub fn if_match(etag: ETag) -> Self {
        Self {
            if_match: Some(Precondition::Tags(vec![etag])),
            ..Self::default()
        }
    }

    /// Requires that no live resource exists yet.
    pub fn if_absent() -> Self {
        Self {
            if_none_match: Some(Precondition::Any),
            ..Self::default()
        }
    }

    /// Evaluates both conditions against the current tag.
    ///
    /// `current` is `None` when no live resource exists. If-match
    /// requires a live resource whose tag matches; if-none-match
    /// requires the wildcard to see absence, or the tag to miss the
    /// listed ones.
    pub fn check(&self, current: Option<&ETag>) -> StoreResult<()> {
        if let Some(cond) = &self.if_match {
            let holds = match current {
                Some(tag) => cond.matches(tag),
                None => false,
            };
            if !holds {
                return Err(StoreError::PreconditionFailed("if-match".to_string()));
            }
        }
        if let Some(cond) = &self.if_none_match {
            let holds = match current {
                Some(tag) => !cond.matches(tag),
                None => true,
            };
            if !holds {
                return Err(StoreError::PreconditionFailed("if-none-match".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> ETag {
        ETag::from(text)
    }

    // ── Parsing ────────────────────────────────────────────────────

    #[test]
    fn parses_wildcard() {
        assert_eq!(Precondition::parse("*").unwrap(), Precondition::Any);
        assert_eq!(Precondition::parse("  *  ").unwrap(), Precondition::Any);
    }

    #[test]
    fn parses_bare_tag() {
        assert_eq!(
            Precondition::parse("cafe01").unwrap(),
            Precondition::Tags(vec![tag("cafe01")])
        );
    }

    #[test]
    fn parses_quoted_tag_list() {
        assert_eq!(
            Precondition::parse(r#""cafe01", "cafe02""#).unwrap(),
            Precondition::Tags(vec![tag("cafe01"), tag("cafe02")])
        );
    }

    #[test]
    fn parses_mixed_quoting() {
        assert_eq!(
            Precondition::parse(r#"cafe01, "cafe02""#).unwrap(),
            Precondition::Tags(vec![tag("cafe01"), tag("cafe02")])
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(Precondition::parse("").is_err());
        assert!(Precondition::parse("   ").is_err());
        assert!(Precondition::parse(r#""unterminated"#).is_err());
        assert!(Precondition::parse(r#"""#).is_err());
        assert!(Precondition::parse("a,,b").is_err());
        assert!(Precondition::parse(r#"em"bedded"#).is_err());
    }

    // ── Evaluation ─────────────────────────────────────────────────

    #[test]
    fn if_match_requires_matching_tag() {
        let conditions = Conditions::if_match(tag("cafe01"));

        assert!(conditions.check(Some(&tag("cafe01"))).is_ok());
        assert!(matches!(
            conditions.check(Some(&tag("cafe02"))),
            Err(StoreError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn if_match_fails_against_absent_resource() {
        let conditions = Conditions::if_match(tag("cafe01"));
        assert!(conditions.check(None).is_err());

        let wildcard = Conditions {
            if_match: Some(Precondition::Any),
            ..Conditions::default()
        };
        assert!(wildcard.check(None).is_err());
        assert!(wildcard.check(Some(&tag("anything"))).is_ok());
    }

    #[test]
    fn if_none_match_wildcard_requires_absence() {
        let conditions = Conditions::if_absent();

        assert!(conditions.check(None).is_ok());
        assert!(matches!(
            conditions.check(Some(&tag("cafe01"))),
            Err(StoreError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn if_none_match_tags_require_difference() {
        let conditions = Conditions {
            if_none_match: Some(Precondition::Tags(vec![tag("cafe01")])),
            ..Conditions::default()
        };

        assert!(conditions.check(Some(&tag("cafe02"))).is_ok());
        assert!(conditions.check(None).is_ok());
        assert!(conditions.check(Some(&tag("cafe01"))).is_err());
    }

    #[test]
    fn both_conditions_must_hold() {
        let conditions = Conditions {
            if_match: Some(Precondition::Any),
            if_none_match: Some(Precondition::Tags(vec![tag("stale")])),
        };

        assert!(conditions.check(Some(&tag("fresh"))).is_ok());
        assert!(conditions.check(Some(&tag("stale"))).is_err());
    }

    #[test]
    fn no_conditions_always_pass() {
        assert!(Conditions::new().check(None).is_ok());
        assert!(Conditions::new().check(Some(&tag("any"))).is_ok());
    }
}
