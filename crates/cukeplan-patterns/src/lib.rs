//! Step-expression compilation and tag filtering for cukeplan.
//!
//! The crate turns step patterns (Cucumber expressions or regular
//! expressions) into matchers that extract typed arguments, keeps the
//! registry of parameter types those expressions refer to, proposes
//! expressions for undefined steps, and evaluates tag expressions used to
//! scope hooks.

mod errors;
mod expression;
mod generator;
mod group;
mod keyword;
mod parameter;
pub mod tags;

pub use errors::{ExpressionError, SyntaxErrorInfo};
pub use expression::{
    Argument, CucumberExpression, Expression, ExpressionKind, RegexSource, RegularExpression,
    StepMatcher,
};
pub use generator::{ExpressionGenerator, GeneratedExpression};
pub use group::Group;
pub use keyword::{StepKeyword, StepKeywordParseError};
pub use parameter::{Conversion, ParameterType, ParameterTypeRegistry};
