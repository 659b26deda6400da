//! Failures reported when a pickle step is prepared.

use std::error::Error;
use std::fmt;

use crate::localization;
use crate::registry::ArgumentError;
use crate::types::SourceReference;

/// No step definition matches a pickle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefinedStepError {
    /// Text of the unmatched step.
    pub text: String,
    /// Id of the pickle step.
    pub pickle_step_id: String,
}

impl fmt::Display for UndefinedStepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = localization::message_with_args("undefined-step", |args| {
            args.set("text", self.text.clone());
        });
        f.write_str(&localization::strip_directional_isolates(&message))
    }
}

impl Error for UndefinedStepError {}

/// More than one step definition matches a pickle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousStepError {
    /// Text of the step.
    pub text: String,
    /// Id of the pickle step.
    pub pickle_step_id: String,
    /// Declaration sites of every matching definition, in registration order.
    pub sources: Vec<SourceReference>,
}

impl fmt::Display for AmbiguousStepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = localization::message_with_args("ambiguous-step", |args| {
            args.set("text", self.text.clone());
        });
        f.write_str(&localization::strip_directional_isolates(&header))?;
        for (index, source) in self.sources.iter().enumerate() {
            write!(f, "\n{}) {}", index + 1, source.format_location())?;
        }
        Ok(())
    }
}

impl Error for AmbiguousStepError {}

/// Why [`super::TestStep::prepare`] could not bind a step.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PrepareError {
    /// Zero matching definitions.
    #[error(transparent)]
    Undefined(#[from] UndefinedStepError),
    /// Two or more matching definitions.
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousStepError),
    /// The single match produced an argument that failed to convert.
    #[error(transparent)]
    Argument(#[from] ArgumentError),
}
