//! Support code registration and lookup.
//!
//! Registrations accumulate in a [`SupportCodeBuilder`]; [`SupportCodeBuilder::build`]
//! compiles step patterns and hook tag expressions into a
//! [`SupportCodeLibrary`] that is never mutated afterwards.

mod builder;
mod definitions;
mod error;
mod library;
mod transform;

pub use builder::SupportCodeBuilder;
pub use definitions::{
    DefinedParameterType, DefinedStep, DefinedTestCaseHook, DefinedTestRunHook, NewParameterType,
    NewStep, NewTestCaseHook, NewTestRunHook, TestCaseHookKind, TestRunHookKind,
};
pub use error::BuildError;
pub use library::{StepMatch, SupportCodeLibrary};
pub use transform::ArgumentError;
