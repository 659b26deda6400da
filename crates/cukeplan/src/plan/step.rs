//! Assembled test steps and their lazy preparation.

use std::fmt;
use std::sync::Arc;

use super::error::{AmbiguousStepError, PrepareError, UndefinedStepError};
use crate::datatable::DataTable;
use crate::document::{PickleStep, PickleStepArgument};
use crate::messages::{self, HookTestStep, PickleTestStep, StepMatchArgumentsList};
use crate::registry::{DefinedTestCaseHook, SupportCodeLibrary};
use crate::types::{SourceReference, StepArgument, StepError, SupportCodeFn};

/// Display name of a test step: a keyword-like prefix and a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestStepName {
    /// `Before`, `After`, or the step keyword.
    pub prefix: String,
    /// Hook name or step text.
    pub body: String,
}

/// What a test step runs.
pub enum TestStepKind<'a, W> {
    /// A scenario hook.
    Hook(&'a DefinedTestCaseHook<W>),
    /// A pickle step, matched against the library when prepared.
    Pickle(&'a PickleStep),
}

impl<W> Clone for TestStepKind<'_, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for TestStepKind<'_, W> {}

impl<W> fmt::Debug for TestStepKind<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hook(hook) => f.debug_tuple("Hook").field(hook).finish(),
            Self::Pickle(step) => f.debug_tuple("Pickle").field(step).finish(),
        }
    }
}

/// One executable element of a test case.
pub struct TestStep<'a, W> {
    /// Step id.
    pub id: String,
    /// Display name.
    pub name: TestStepName,
    /// Where the step is declared in the feature file.
    pub source_reference: SourceReference,
    /// Runs even after an earlier step failed. Set for After hooks only.
    pub always: bool,
    /// Hook or pickle step.
    pub kind: TestStepKind<'a, W>,
    pub(super) library: &'a SupportCodeLibrary<W>,
}

impl<W> TestStep<'_, W> {
    /// Bind the step's callable to `world` and its final arguments.
    ///
    /// Matching runs afresh on every call. Hook steps always prepare with
    /// no arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PrepareError::Undefined`] or [`PrepareError::Ambiguous`]
    /// when the step text matches zero or several definitions, and
    /// [`PrepareError::Argument`] when an argument fails to convert.
    pub fn prepare<'w>(&self, world: &'w mut W) -> Result<PreparedStep<'w, W>, PrepareError> {
        let step = match self.kind {
            TestStepKind::Hook(hook) => {
                return Ok(PreparedStep {
                    function: Arc::clone(&hook.function),
                    world,
                    args: Vec::new(),
                });
            }
            TestStepKind::Pickle(step) => step,
        };
        let matches = self.library.find_all_steps_by(&step.text);
        let single = match matches.as_slice() {
            [] => {
                return Err(UndefinedStepError {
                    text: step.text.clone(),
                    pickle_step_id: step.id.clone(),
                }
                .into());
            }
            [single] => single,
            several => {
                return Err(AmbiguousStepError {
                    text: step.text.clone(),
                    pickle_step_id: step.id.clone(),
                    sources: several
                        .iter()
                        .map(|m| m.step.source_reference.clone())
                        .collect(),
                }
                .into());
            }
        };
        let mut args = single
            .arguments
            .iter()
            .map(|argument| self.library.transform(argument, &*world).map(StepArgument::Value))
            .collect::<Result<Vec<_>, _>>()?;
        match &step.argument {
            Some(PickleStepArgument::DataTable(rows)) => {
                args.push(StepArgument::DataTable(DataTable::new(rows.clone())));
            }
            Some(PickleStepArgument::DocString(content)) => {
                args.push(StepArgument::DocString(content.clone()));
            }
            None => {}
        }
        Ok(PreparedStep {
            function: Arc::clone(&single.step.function),
            world,
            args,
        })
    }

    /// Wire form of the step. Pickle steps are matched again here so that
    /// no world is needed.
    #[must_use]
    pub fn to_message(&self) -> messages::TestStep {
        match self.kind {
            TestStepKind::Hook(hook) => messages::TestStep::Hook(HookTestStep {
                id: self.id.clone(),
                hook_id: hook.id.clone(),
            }),
            TestStepKind::Pickle(step) => {
                let matches = self.library.find_all_steps_by(&step.text);
                messages::TestStep::Pickle(PickleTestStep {
                    id: self.id.clone(),
                    pickle_step_id: step.id.clone(),
                    step_definition_ids: matches.iter().map(|m| m.step.id.clone()).collect(),
                    step_match_arguments_lists: matches
                        .iter()
                        .map(|m| StepMatchArgumentsList {
                            step_match_arguments: m.arguments.iter().map(Into::into).collect(),
                        })
                        .collect(),
                })
            }
        }
    }
}

impl<W> fmt::Debug for TestStep<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestStep")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("source_reference", &self.source_reference)
            .field("always", &self.always)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A callable bound to its world and arguments, ready to run.
pub struct PreparedStep<'w, W> {
    function: SupportCodeFn<W>,
    world: &'w mut W,
    args: Vec<StepArgument>,
}

impl<'w, W> PreparedStep<'w, W> {
    /// Final argument list: expression values, then a table or doc string.
    #[must_use]
    pub fn args(&self) -> &[StepArgument] {
        &self.args
    }

    /// Run the callable.
    ///
    /// # Errors
    ///
    /// Propagates whatever the step or hook returns.
    pub fn invoke(self) -> Result<(), StepError> {
        (self.function)(self.world, self.args)
    }

    /// Split into callable, world and arguments for callers that drive
    /// execution themselves.
    #[must_use]
    pub fn into_parts(self) -> (SupportCodeFn<W>, &'w mut W, Vec<StepArgument>) {
        (self.function, self.world, self.args)
    }
}

impl<W> fmt::Debug for PreparedStep<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStep")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
