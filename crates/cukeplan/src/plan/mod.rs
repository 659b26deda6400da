//! Assembly of executable test plans from pickles and a support code library.
//!
//! [`make_test_plan`] turns each pickle into a [`TestCase`]: matching Before
//! hooks, then the pickle steps, then matching After hooks in reverse
//! registration order. Step matching is deferred until a step is prepared,
//! so undefined and ambiguous steps never stop assembly.

mod error;
mod step;

use std::fmt;
use std::sync::Arc;

pub use error::{AmbiguousStepError, PrepareError, UndefinedStepError};
pub use step::{PreparedStep, TestStep, TestStepKind, TestStepName};

use crate::document::{FeatureDocument, Pickle};
use crate::ids::{self, IdGenerator};
use crate::localization;
use crate::messages::{self, Envelope};
use crate::naming::{DefaultNamingStrategy, NamingStrategy};
use crate::registry::{DefinedTestCaseHook, SupportCodeLibrary, TestCaseHookKind};
use crate::types::{Location, SourceReference};

/// Inputs to [`make_test_plan`].
pub struct TestPlanIngredients<'a, W> {
    /// Run the plan belongs to.
    pub test_run_started_id: Option<String>,
    /// Document the pickles were compiled from.
    pub document: &'a FeatureDocument,
    /// Pickles to assemble, in run order.
    pub pickles: &'a [Pickle],
    /// Sealed support code.
    pub support_code_library: &'a SupportCodeLibrary<W>,
}

/// Knobs for [`make_test_plan`].
#[derive(Clone)]
pub struct TestPlanOptions {
    /// Issues test case and test step ids.
    pub new_id: Arc<dyn IdGenerator>,
    /// Names test cases.
    pub naming_strategy: Arc<dyn NamingStrategy>,
}

impl Default for TestPlanOptions {
    fn default() -> Self {
        Self {
            new_id: ids::default_generator(),
            naming_strategy: Arc::new(DefaultNamingStrategy::default()),
        }
    }
}

impl fmt::Debug for TestPlanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestPlanOptions")
            .field("new_id", &self.new_id)
            .finish_non_exhaustive()
    }
}

/// An executable test case assembled from one pickle.
pub struct TestCase<'a, W> {
    /// Test case id.
    pub id: String,
    /// Originating pickle.
    pub pickle: &'a Pickle,
    /// Display name from the naming strategy.
    pub name: String,
    /// Where the scenario or example row is declared.
    pub source_reference: SourceReference,
    /// Before hooks, pickle steps, then After hooks.
    pub test_steps: Vec<TestStep<'a, W>>,
}

impl<W> TestCase<'_, W> {
    /// Wire form of the test case.
    #[must_use]
    pub fn to_message(&self, test_run_started_id: Option<&str>) -> messages::TestCase {
        messages::TestCase {
            id: self.id.clone(),
            pickle_id: self.pickle.id.clone(),
            test_steps: self.test_steps.iter().map(TestStep::to_message).collect(),
            test_run_started_id: test_run_started_id.map(str::to_owned),
        }
    }
}

impl<W> fmt::Debug for TestCase<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id)
            .field("pickle", &self.pickle.id)
            .field("name", &self.name)
            .field("source_reference", &self.source_reference)
            .field("test_steps", &self.test_steps)
            .finish()
    }
}

/// Test cases for one feature document.
pub struct TestPlan<'a, W> {
    /// Run the plan belongs to.
    pub test_run_started_id: Option<String>,
    /// Feature name, or the document uri for unnamed features.
    pub name: Option<String>,
    /// One test case per pickle, in input order.
    pub test_cases: Vec<TestCase<'a, W>>,
}

impl<W> TestPlan<'_, W> {
    /// One test case envelope per test case.
    #[must_use]
    pub fn to_envelopes(&self) -> Vec<Envelope> {
        self.test_cases
            .iter()
            .map(|test_case| {
                Envelope::TestCase(test_case.to_message(self.test_run_started_id.as_deref()))
            })
            .collect()
    }
}

impl<W> fmt::Debug for TestPlan<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestPlan")
            .field("test_run_started_id", &self.test_run_started_id)
            .field("name", &self.name)
            .field("test_cases", &self.test_cases)
            .finish()
    }
}

/// Assemble a test plan.
///
/// For each pickle the test case id is issued first, followed by ids for
/// its Before hook steps, pickle steps and After hook steps in that order.
#[must_use]
pub fn make_test_plan<'a, W>(
    ingredients: TestPlanIngredients<'a, W>,
    options: &TestPlanOptions,
) -> TestPlan<'a, W> {
    let TestPlanIngredients {
        test_run_started_id,
        document,
        pickles,
        support_code_library: library,
    } = ingredients;
    let assembler = Assembler {
        document,
        library,
        options,
    };
    let test_cases: Vec<_> = pickles.iter().map(|pickle| assembler.test_case(pickle)).collect();
    log::debug!(
        "assembled {} test cases for {}",
        test_cases.len(),
        document.uri()
    );
    TestPlan {
        test_run_started_id,
        name: plan_name(document),
        test_cases,
    }
}

fn plan_name(document: &FeatureDocument) -> Option<String> {
    let name = document.feature().name.trim();
    if !name.is_empty() {
        return Some(name.to_owned());
    }
    (!document.uri().is_empty()).then(|| document.uri().to_owned())
}

struct Assembler<'a, 'o, W> {
    document: &'a FeatureDocument,
    library: &'a SupportCodeLibrary<W>,
    options: &'o TestPlanOptions,
}

impl<'a, W> Assembler<'a, '_, W> {
    fn test_case(&self, pickle: &'a Pickle) -> TestCase<'a, W> {
        let lineage = self.document.lineage(pickle);
        let location = lineage.map_or(pickle.location, |lineage| lineage.location());
        let name = lineage.as_ref().map_or_else(
            || {
                log::warn!(
                    "pickle {} has no lineage in {}; using its own name",
                    pickle.id,
                    self.document.uri()
                );
                pickle.name.clone()
            },
            |lineage| self.options.naming_strategy.reduce(lineage, pickle),
        );
        let id = self.options.new_id.new_id();

        let before = self
            .library
            .find_all_before_hooks_by(pickle.tags.as_slice())
            .into_iter()
            .map(|hook| self.hook_step(hook, pickle, location));
        let mut test_steps: Vec<_> = before.collect();
        test_steps.extend(pickle.steps.iter().map(|step| TestStep {
            id: self.options.new_id.new_id(),
            name: TestStepName {
                prefix: step.keyword.clone(),
                body: step.text.clone(),
            },
            source_reference: SourceReference {
                uri: Some(pickle.uri.clone()),
                location: Some(step.location),
            },
            always: false,
            kind: TestStepKind::Pickle(step),
            library: self.library,
        }));
        let after = self.library.find_all_after_hooks_by(pickle.tags.as_slice());
        test_steps.extend(
            after
                .into_iter()
                .rev()
                .map(|hook| self.hook_step(hook, pickle, location)),
        );

        TestCase {
            id,
            pickle,
            name,
            source_reference: SourceReference {
                uri: Some(pickle.uri.clone()),
                location: Some(location),
            },
            test_steps,
        }
    }

    fn hook_step(
        &self,
        hook: &'a DefinedTestCaseHook<W>,
        pickle: &Pickle,
        location: Location,
    ) -> TestStep<'a, W> {
        let (prefix, always) = match hook.kind {
            TestCaseHookKind::Before => (localization::message("hook-step-before"), false),
            TestCaseHookKind::After => (localization::message("hook-step-after"), true),
        };
        TestStep {
            id: self.options.new_id.new_id(),
            name: TestStepName {
                prefix,
                body: hook.name.clone().unwrap_or_default(),
            },
            source_reference: SourceReference {
                uri: Some(pickle.uri.clone()),
                location: Some(location),
            },
            always,
            kind: TestStepKind::Hook(hook),
            library: self.library,
        }
    }
}
