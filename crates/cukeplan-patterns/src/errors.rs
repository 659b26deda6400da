//! Error types shared by the expression and parameter-type modules.

use std::fmt;
use thiserror::Error;

/// Location and description of a syntax problem inside a Cucumber expression.
///
/// # Examples
/// ```
/// use cukeplan_patterns::SyntaxErrorInfo;
/// let info = SyntaxErrorInfo::new("an optional must contain some text", 7, "I have ()");
/// assert_eq!(info.position, 7);
/// assert_eq!(info.expression, "I have ()");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Human-readable description of the problem.
    pub message: &'static str,
    /// Zero-based byte offset into the expression.
    pub position: usize,
    /// The expression that failed to parse.
    pub expression: String,
}

impl SyntaxErrorInfo {
    /// Create a new syntax error description.
    #[must_use]
    pub fn new(message: &'static str, position: usize, expression: impl Into<String>) -> Self {
        Self {
            message,
            position,
            expression: expression.into(),
        }
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at byte {} (zero-based) in expression `{}`",
            self.message, self.position, self.expression
        )
    }
}

/// Errors surfaced while compiling step expressions or defining parameter
/// types.
///
/// # Examples
/// ```
/// use cukeplan_patterns::ExpressionError;
/// let err = ExpressionError::UndefinedParameterType {
///     name: "colour".into(),
///     expression: "a {colour} ball".into(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "undefined parameter type `colour` in expression `a {colour} ball`"
/// );
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpressionError {
    /// The expression text is malformed.
    #[error("{0}")]
    Syntax(SyntaxErrorInfo),
    /// A `{name}` parameter references a type that has not been defined.
    #[error("undefined parameter type `{name}` in expression `{expression}`")]
    UndefinedParameterType {
        /// Name inside the braces.
        name: String,
        /// Full expression that referenced the name.
        expression: String,
    },
    /// A parameter type with the same name already exists.
    #[error("parameter type `{name}` is already defined")]
    DuplicateParameterType {
        /// The repeated name.
        name: String,
    },
    /// The parameter type name contains reserved characters.
    #[error("illegal character in parameter type name `{name}`")]
    IllegalParameterTypeName {
        /// The rejected name.
        name: String,
    },
    /// Two preferential parameter types share a regular expression.
    #[error(
        "parameter types `{existing}` and `{name}` are both preferential for regular expression `{regexp}`"
    )]
    ConflictingPreference {
        /// Regular expression shared by both types.
        regexp: String,
        /// Previously registered preferential type.
        existing: String,
        /// Newly registered type.
        name: String,
    },
    /// A capture group matches several parameter types and none is preferred.
    #[error(
        "capture group `{regexp}` in `{expression}` matches parameter types {}; mark one of them as preferential",
        candidates.join(", ")
    )]
    AmbiguousParameterType {
        /// Source of the capture group.
        regexp: String,
        /// Regular expression containing the group.
        expression: String,
        /// Candidate parameter type names in registration order.
        candidates: Vec<String>,
    },
    /// The generated regular expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn syntax_error(
    message: &'static str,
    position: usize,
    expression: &str,
) -> ExpressionError {
    ExpressionError::Syntax(SyntaxErrorInfo::new(message, position, expression))
}
