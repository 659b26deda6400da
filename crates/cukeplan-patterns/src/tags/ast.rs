//! Syntax tree and evaluation for tag expressions.
//!
//! `not` binds tighter than `and`, which binds tighter than `or`; binary
//! operators associate to the left. Evaluation short-circuits.

use std::collections::HashSet;
use std::fmt;

use super::parser::Parser;
use super::sets::normalise_tag;

/// A compiled tag expression such as `@smoke and not @slow`.
///
/// # Examples
/// ```
/// use cukeplan_patterns::tags::TagExpression;
/// let expr = TagExpression::parse("@smoke and not @slow")
///     .expect("example ensures fallible call succeeds");
/// assert!(expr.evaluate(["@smoke"]));
/// assert!(!expr.evaluate(["@smoke", "@slow"]));
/// assert_eq!(expr.source(), "@smoke and not @slow");
/// ```
#[derive(Clone, Debug)]
pub struct TagExpression {
    source: String,
    root: Expr,
}

#[derive(Clone, Debug)]
pub(super) enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

/// Failure to parse a tag expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExprError {
    offset: usize,
    reason: String,
}

impl TagExprError {
    pub(super) fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset of the offending token.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// What was wrong at that offset.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for TagExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid tag expression at byte {}: {}",
            self.offset, self.reason
        )
    }
}

impl std::error::Error for TagExprError {}

impl TagExpression {
    /// Parse `input` into an expression.
    ///
    /// # Errors
    /// Returns [`TagExprError`] describing the first problem found.
    pub fn parse(input: &str) -> Result<Self, TagExprError> {
        let mut parser = Parser::new(input)?;
        let root = parser.parse_expression()?;
        parser.expect_end()?;
        Ok(Self {
            source: input.to_owned(),
            root,
        })
    }

    /// The text the expression was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a set of tags, with or without their leading `@`.
    pub fn evaluate<I, S>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = tags
            .into_iter()
            .map(|tag| normalise_tag(tag.as_ref()))
            .collect();
        self.root.eval(&set)
    }
}

impl fmt::Display for TagExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Expr {
    fn eval(&self, tags: &HashSet<String>) -> bool {
        match self {
            Self::Tag(tag) => tags.contains(tag),
            Self::Not(inner) => !inner.eval(tags),
            Self::And(lhs, rhs) => lhs.eval(tags) && rhs.eval(tags),
            Self::Or(lhs, rhs) => lhs.eval(tags) || rhs.eval(tags),
        }
    }
}
