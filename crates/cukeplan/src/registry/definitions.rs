//! Registration inputs and their compiled counterparts.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use cukeplan_patterns::tags::TagExpression;
use cukeplan_patterns::{Expression, ExpressionKind, RegexSource, StepMatcher};

use crate::messages::{self, HookType, StepDefinitionPattern, StepDefinitionPatternType};
use crate::types::{
    ArgValue, SourceReference, StepArgument, StepError, SupportCodeFn, TestRunHookFn, Transformer,
};

/// A parameter type awaiting registration.
pub struct NewParameterType<W> {
    /// Name used inside `{}`.
    pub name: String,
    /// One or more patterns.
    pub regexps: Vec<RegexSource>,
    /// Custom conversion; the built-in text conversion applies when absent.
    pub transformer: Option<Transformer<W>>,
    /// Whether snippet generation may use the type.
    pub use_for_snippets: bool,
    /// Whether the type wins regexp group lookups.
    pub prefer_for_regexp_match: bool,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl<W> NewParameterType<W> {
    /// A snippet-enabled, non-preferential type without a transformer.
    #[must_use]
    pub fn new<I, R>(name: impl Into<String>, regexps: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RegexSource>,
    {
        Self {
            name: name.into(),
            regexps: regexps.into_iter().map(Into::into).collect(),
            transformer: None,
            use_for_snippets: true,
            prefer_for_regexp_match: false,
            source_reference: SourceReference::default(),
        }
    }

    /// Convert matched group values with `transform`.
    ///
    /// The closure receives one entry per capture group of the matched
    /// parameter, or the whole match when the pattern has no groups.
    #[must_use]
    pub fn with_transformer<T, F>(mut self, transform: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&W, &[Option<&str>]) -> Result<T, StepError> + Send + Sync + 'static,
    {
        let transformer: Transformer<W> =
            Arc::new(move |world: &W, values: &[Option<&str>]| {
                transform(world, values).map(|value| Box::new(value) as ArgValue)
            });
        self.transformer = Some(transformer);
        self
    }

    /// Set [`Self::use_for_snippets`].
    #[must_use]
    pub fn with_use_for_snippets(mut self, enabled: bool) -> Self {
        self.use_for_snippets = enabled;
        self
    }

    /// Set [`Self::prefer_for_regexp_match`].
    #[must_use]
    pub fn with_prefer_for_regexp_match(mut self, enabled: bool) -> Self {
        self.prefer_for_regexp_match = enabled;
        self
    }

    /// Record the declaration site.
    #[must_use]
    pub fn with_source_reference(mut self, source_reference: SourceReference) -> Self {
        self.source_reference = source_reference;
        self
    }
}

/// A step definition awaiting registration.
pub struct NewStep<W> {
    /// Cucumber expression or regular expression.
    pub pattern: Expression,
    /// Implementation.
    pub function: SupportCodeFn<W>,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl<W> NewStep<W> {
    /// Pair a pattern with its implementation.
    #[must_use]
    pub fn new<F>(pattern: impl Into<Expression>, function: F) -> Self
    where
        F: Fn(&mut W, Vec<StepArgument>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        Self {
            pattern: pattern.into(),
            function: Arc::new(function),
            source_reference: SourceReference::default(),
        }
    }

    /// Record the declaration site.
    #[must_use]
    pub fn with_source_reference(mut self, source_reference: SourceReference) -> Self {
        self.source_reference = source_reference;
        self
    }
}

/// A Before or After hook awaiting registration.
pub struct NewTestCaseHook<W> {
    /// Display name.
    pub name: Option<String>,
    /// Tag filter; `None` applies to every test case.
    pub tag_expression: Option<String>,
    /// Implementation.
    pub function: SupportCodeFn<W>,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl<W> NewTestCaseHook<W> {
    /// An unnamed hook applying to every test case.
    #[must_use]
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&mut W, Vec<StepArgument>) -> Result<(), StepError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            tag_expression: None,
            function: Arc::new(function),
            source_reference: SourceReference::default(),
        }
    }

    /// Name the hook.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict the hook to test cases matching `expression`.
    #[must_use]
    pub fn with_tag_expression(mut self, expression: impl Into<String>) -> Self {
        self.tag_expression = Some(expression.into());
        self
    }

    /// Record the declaration site.
    #[must_use]
    pub fn with_source_reference(mut self, source_reference: SourceReference) -> Self {
        self.source_reference = source_reference;
        self
    }
}

/// A BeforeAll or AfterAll hook awaiting registration.
#[derive(Clone)]
pub struct NewTestRunHook {
    /// Display name.
    pub name: Option<String>,
    /// Implementation.
    pub function: TestRunHookFn,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl NewTestRunHook {
    /// An unnamed run hook.
    #[must_use]
    pub fn new<F>(function: F) -> Self
    where
        F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            function: Arc::new(function),
            source_reference: SourceReference::default(),
        }
    }

    /// Name the hook.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Record the declaration site.
    #[must_use]
    pub fn with_source_reference(mut self, source_reference: SourceReference) -> Self {
        self.source_reference = source_reference;
        self
    }
}

/// A registered parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedParameterType {
    /// Registry id.
    pub id: String,
    /// Position in global registration order.
    pub order: usize,
    /// Type name.
    pub name: String,
    /// Patterns as used for matching; flagged patterns embed their flags.
    pub regular_expressions: Vec<String>,
    /// Whether snippet generation may use the type.
    pub use_for_snippets: bool,
    /// Whether the type wins regexp group lookups.
    pub prefer_for_regexp_match: bool,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl DefinedParameterType {
    /// Envelope body for this type.
    #[must_use]
    pub fn to_message(&self) -> messages::ParameterType {
        messages::ParameterType {
            id: self.id.clone(),
            name: self.name.clone(),
            regular_expressions: self.regular_expressions.clone(),
            prefer_for_regular_expression_match: self.prefer_for_regexp_match,
            use_for_snippets: self.use_for_snippets,
            source_reference: self.source_reference.clone(),
        }
    }
}

/// A compiled, matchable step definition.
pub struct DefinedStep<W> {
    /// Registry id.
    pub id: String,
    /// Position in global registration order.
    pub order: usize,
    /// Compiled pattern.
    pub matcher: Box<dyn StepMatcher>,
    /// Implementation.
    pub function: SupportCodeFn<W>,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl<W> DefinedStep<W> {
    /// Envelope body for this definition.
    #[must_use]
    pub fn to_message(&self) -> messages::StepDefinition {
        let kind = match self.matcher.kind() {
            ExpressionKind::CucumberExpression => StepDefinitionPatternType::CucumberExpression,
            ExpressionKind::RegularExpression => StepDefinitionPatternType::RegularExpression,
        };
        messages::StepDefinition {
            id: self.id.clone(),
            pattern: StepDefinitionPattern {
                kind,
                source: self.matcher.source(),
            },
            source_reference: self.source_reference.clone(),
        }
    }
}

impl<W> fmt::Debug for DefinedStep<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinedStep")
            .field("id", &self.id)
            .field("order", &self.order)
            .field("matcher", &self.matcher)
            .field("source_reference", &self.source_reference)
            .finish_non_exhaustive()
    }
}

/// Which side of a test case a scenario hook runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCaseHookKind {
    /// Runs before the pickle steps.
    Before,
    /// Runs after the pickle steps.
    After,
}

/// A registered Before or After hook.
pub struct DefinedTestCaseHook<W> {
    /// Registry id.
    pub id: String,
    /// Position in global registration order.
    pub order: usize,
    /// Side of the test case.
    pub kind: TestCaseHookKind,
    /// Display name.
    pub name: Option<String>,
    /// Compiled tag filter.
    pub tag_expression: Option<TagExpression>,
    /// Implementation.
    pub function: SupportCodeFn<W>,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl<W> DefinedTestCaseHook<W> {
    /// Whether the hook applies to a test case carrying `tags`.
    pub fn applies_to<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.tag_expression
            .as_ref()
            .is_none_or(|expression| expression.evaluate(tags.iter().map(AsRef::as_ref)))
    }

    /// Envelope body for this hook.
    #[must_use]
    pub fn to_message(&self) -> messages::Hook {
        messages::Hook {
            id: self.id.clone(),
            kind: match self.kind {
                TestCaseHookKind::Before => HookType::BeforeTestCase,
                TestCaseHookKind::After => HookType::AfterTestCase,
            },
            name: self.name.clone(),
            tag_expression: self
                .tag_expression
                .as_ref()
                .map(|expression| expression.source().to_owned()),
            source_reference: self.source_reference.clone(),
        }
    }
}

impl<W> fmt::Debug for DefinedTestCaseHook<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinedTestCaseHook")
            .field("id", &self.id)
            .field("order", &self.order)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("tag_expression", &self.tag_expression)
            .field("source_reference", &self.source_reference)
            .finish_non_exhaustive()
    }
}

/// Which end of the run a run hook belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestRunHookKind {
    /// Runs before any test case.
    BeforeAll,
    /// Runs after every test case.
    AfterAll,
}

/// A registered BeforeAll or AfterAll hook.
#[derive(Clone)]
pub struct DefinedTestRunHook {
    /// Registry id.
    pub id: String,
    /// Position in global registration order.
    pub order: usize,
    /// End of the run.
    pub kind: TestRunHookKind,
    /// Display name.
    pub name: Option<String>,
    /// Implementation.
    pub function: TestRunHookFn,
    /// Declaration site.
    pub source_reference: SourceReference,
}

impl DefinedTestRunHook {
    /// Envelope body for this hook.
    #[must_use]
    pub fn to_message(&self) -> messages::Hook {
        messages::Hook {
            id: self.id.clone(),
            kind: match self.kind {
                TestRunHookKind::BeforeAll => HookType::BeforeTestRun,
                TestRunHookKind::AfterAll => HookType::AfterTestRun,
            },
            name: self.name.clone(),
            tag_expression: None,
            source_reference: self.source_reference.clone(),
        }
    }
}

impl fmt::Debug for DefinedTestRunHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinedTestRunHook")
            .field("id", &self.id)
            .field("order", &self.order)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("source_reference", &self.source_reference)
            .finish_non_exhaustive()
    }
}
