//! Step expressions: Cucumber expressions and regular expressions behind a
//! single matcher abstraction.

mod compiler;
mod lexer;
mod parser;
mod regular;

use std::fmt;
use std::sync::Arc;

use crate::errors::ExpressionError;
use crate::group::Group;
use crate::parameter::{ParameterType, ParameterTypeRegistry};

pub use compiler::CucumberExpression;
pub use regular::{RegexSource, RegularExpression};

/// Which flavour of pattern a step definition uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    /// A Cucumber expression such as `I have {int} cukes`.
    CucumberExpression,
    /// A regular expression.
    RegularExpression,
}

/// A step pattern as registered, before compilation.
///
/// # Examples
/// ```
/// use cukeplan_patterns::{Expression, ExpressionKind, RegexSource};
/// let text: Expression = "I have {int} cukes".into();
/// assert_eq!(text.kind(), ExpressionKind::CucumberExpression);
///
/// let regex: Expression = RegexSource::new(r"^I have (\d+) cukes$").into();
/// assert_eq!(regex.kind(), ExpressionKind::RegularExpression);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Cucumber expression text.
    Cucumber(String),
    /// Regular expression with optional flags.
    Regular(RegexSource),
}

impl Expression {
    /// The pattern flavour.
    #[must_use]
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Self::Cucumber(_) => ExpressionKind::CucumberExpression,
            Self::Regular(_) => ExpressionKind::RegularExpression,
        }
    }

    /// Compile the pattern into a matcher using the given parameter types.
    ///
    /// # Errors
    /// Propagates [`ExpressionError`] from the underlying compiler, including
    /// [`ExpressionError::UndefinedParameterType`] for unknown `{name}`s.
    pub fn compile(
        &self,
        registry: &ParameterTypeRegistry,
    ) -> Result<Box<dyn StepMatcher>, ExpressionError> {
        Ok(match self {
            Self::Cucumber(source) => Box::new(CucumberExpression::new(source, registry)?),
            Self::Regular(source) => Box::new(RegularExpression::new(source.clone(), registry)?),
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cucumber(source) => f.write_str(source),
            Self::Regular(source) => source.fmt(f),
        }
    }
}

impl From<&str> for Expression {
    fn from(source: &str) -> Self {
        Self::Cucumber(source.to_owned())
    }
}

impl From<String> for Expression {
    fn from(source: String) -> Self {
        Self::Cucumber(source)
    }
}

impl From<RegexSource> for Expression {
    fn from(source: RegexSource) -> Self {
        Self::Regular(source)
    }
}

/// Compiled step pattern able to match step text.
///
/// Implementations are immutable after construction so a single matcher can
/// be shared across threads.
pub trait StepMatcher: fmt::Debug + Send + Sync {
    /// Match the whole step text, returning one argument per parameter.
    fn match_text(&self, text: &str) -> Option<Vec<Argument>>;

    /// The pattern as it should be serialised.
    fn source(&self) -> String;

    /// The pattern flavour.
    fn kind(&self) -> ExpressionKind;
}

/// One parameter extracted from matched step text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    group: Group,
    parameter_type: Arc<ParameterType>,
}

impl Argument {
    pub(crate) fn new(group: Group, parameter_type: Arc<ParameterType>) -> Self {
        Self {
            group,
            parameter_type,
        }
    }

    /// The capture group, including nested groups.
    #[must_use]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// The parameter type that produced this argument.
    #[must_use]
    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    /// Name of the parameter type; empty for anonymous groups.
    #[must_use]
    pub fn parameter_type_name(&self) -> &str {
        self.parameter_type.name()
    }

    /// Group values handed to a transformer, see [`Group::values`].
    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        self.group.values()
    }
}
