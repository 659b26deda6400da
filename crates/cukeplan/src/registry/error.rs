//! Failures that stop a support code library from being built.

use cukeplan_patterns::ExpressionError;
use cukeplan_patterns::tags::TagExprError;
use thiserror::Error;

use crate::types::SourceReference;

/// Structural problem in the registered support code.
///
/// Unknown parameter types are not errors; they surface as
/// [`crate::messages::UndefinedParameterType`] records instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// A parameter type could not be registered.
    #[error("invalid parameter type `{name}`: {source}")]
    ParameterType {
        /// Name of the rejected type.
        name: String,
        /// Registry failure.
        source: ExpressionError,
    },
    /// A step pattern is malformed.
    #[error("invalid step pattern `{pattern}` at {source_reference}: {source}")]
    Expression {
        /// Pattern as registered.
        pattern: String,
        /// Where the step was declared.
        source_reference: SourceReference,
        /// Compiler failure.
        source: ExpressionError,
    },
    /// A hook tag expression is malformed.
    #[error("invalid tag expression for hook {hook_id}: {source}")]
    TagExpression {
        /// Id of the offending hook.
        hook_id: String,
        /// Parser failure.
        source: TagExprError,
    },
}
