//! The sealed, queryable support code library.

use cukeplan_patterns::{Argument, ExpressionGenerator, ParameterTypeRegistry};
use hashbrown::HashMap;

use super::definitions::{
    DefinedParameterType, DefinedStep, DefinedTestCaseHook, DefinedTestRunHook,
};
use super::transform::{self, ArgumentError};
use crate::messages::{Envelope, UndefinedParameterType};
use crate::types::{ArgValue, SourceReference, Transformer};

/// A step definition that matched some text, with the extracted arguments.
#[derive(Debug)]
pub struct StepMatch<'a, W> {
    /// The matching definition.
    pub step: &'a DefinedStep<W>,
    /// Arguments in expression order.
    pub arguments: Vec<Argument>,
}

/// Immutable result of [`super::SupportCodeBuilder::build`].
///
/// Every collection keeps registration order. The library is only read
/// after construction, so one instance can serve concurrent plan assembly.
pub struct SupportCodeLibrary<W> {
    pub(super) parameter_types: Vec<DefinedParameterType>,
    pub(super) steps: Vec<DefinedStep<W>>,
    pub(super) before_hooks: Vec<DefinedTestCaseHook<W>>,
    pub(super) after_hooks: Vec<DefinedTestCaseHook<W>>,
    pub(super) before_all_hooks: Vec<DefinedTestRunHook>,
    pub(super) after_all_hooks: Vec<DefinedTestRunHook>,
    pub(super) undefined_parameter_types: Vec<UndefinedParameterType>,
    pub(super) registry: ParameterTypeRegistry,
    pub(super) transformers: HashMap<String, Transformer<W>>,
}

impl<W> SupportCodeLibrary<W> {
    /// Every step definition matching `text`, in registration order.
    #[must_use]
    pub fn find_all_steps_by(&self, text: &str) -> Vec<StepMatch<'_, W>> {
        let matches: Vec<_> = self
            .steps
            .iter()
            .filter_map(|step| {
                step.matcher
                    .match_text(text)
                    .map(|arguments| StepMatch { step, arguments })
            })
            .collect();
        log::trace!("{} step definitions match `{text}`", matches.len());
        matches
    }

    /// Before hooks applying to a test case with `tags`, in registration order.
    #[must_use]
    pub fn find_all_before_hooks_by<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&DefinedTestCaseHook<W>> {
        self.before_hooks
            .iter()
            .filter(|hook| hook.applies_to(tags))
            .collect()
    }

    /// After hooks applying to a test case with `tags`, in registration order.
    ///
    /// Execution order is the reverse; reversing is left to the caller.
    #[must_use]
    pub fn find_all_after_hooks_by<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&DefinedTestCaseHook<W>> {
        self.after_hooks
            .iter()
            .filter(|hook| hook.applies_to(tags))
            .collect()
    }

    /// Copies of the BeforeAll hooks.
    #[must_use]
    pub fn all_before_all_hooks(&self) -> Vec<DefinedTestRunHook> {
        self.before_all_hooks.clone()
    }

    /// Copies of the AfterAll hooks.
    #[must_use]
    pub fn all_after_all_hooks(&self) -> Vec<DefinedTestRunHook> {
        self.after_all_hooks.clone()
    }

    /// Declaration sites of parameter types, steps, Before, After,
    /// BeforeAll and AfterAll hooks, in that order.
    #[must_use]
    pub fn all_sources(&self) -> Vec<SourceReference> {
        self.parameter_types
            .iter()
            .map(|p| &p.source_reference)
            .chain(self.steps.iter().map(|s| &s.source_reference))
            .chain(self.before_hooks.iter().map(|h| &h.source_reference))
            .chain(self.after_hooks.iter().map(|h| &h.source_reference))
            .chain(self.before_all_hooks.iter().map(|h| &h.source_reference))
            .chain(self.after_all_hooks.iter().map(|h| &h.source_reference))
            .cloned()
            .collect()
    }

    /// One envelope per registration in global registration order, followed
    /// by the undefined parameter type notices.
    #[must_use]
    pub fn to_envelopes(&self) -> Vec<Envelope> {
        let mut ordered: Vec<(usize, Envelope)> = self
            .parameter_types
            .iter()
            .map(|p| (p.order, Envelope::ParameterType(p.to_message())))
            .chain(
                self.steps
                    .iter()
                    .map(|s| (s.order, Envelope::StepDefinition(s.to_message()))),
            )
            .chain(
                self.before_hooks
                    .iter()
                    .chain(&self.after_hooks)
                    .map(|h| (h.order, Envelope::Hook(h.to_message()))),
            )
            .chain(
                self.before_all_hooks
                    .iter()
                    .chain(&self.after_all_hooks)
                    .map(|h| (h.order, Envelope::Hook(h.to_message()))),
            )
            .collect();
        ordered.sort_by_key(|(order, _)| *order);
        ordered
            .into_iter()
            .map(|(_, envelope)| envelope)
            .chain(
                self.undefined_parameter_types
                    .iter()
                    .cloned()
                    .map(Envelope::UndefinedParameterType),
            )
            .collect()
    }

    /// Registered parameter types.
    #[must_use]
    pub fn parameter_types(&self) -> &[DefinedParameterType] {
        &self.parameter_types
    }

    /// Matchable step definitions.
    #[must_use]
    pub fn steps(&self) -> &[DefinedStep<W>] {
        &self.steps
    }

    /// Parameter types referenced by steps but never registered.
    #[must_use]
    pub fn undefined_parameter_types(&self) -> &[UndefinedParameterType] {
        &self.undefined_parameter_types
    }

    /// Snippet expression generator over the built-in and registered types.
    #[must_use]
    pub fn expression_generator(&self) -> ExpressionGenerator<'_> {
        ExpressionGenerator::new(&self.registry)
    }

    /// Convert a matched argument into the value handed to a step function.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError`] when the group is absent, a built-in
    /// numeric conversion fails, or a user transformer fails.
    pub fn transform(&self, argument: &Argument, world: &W) -> Result<ArgValue, ArgumentError> {
        let transformer = self.transformers.get(argument.parameter_type_name());
        transform::transform(argument, transformer, world)
    }
}
