//! Chainable accumulator for support code registrations.

use std::sync::Arc;

use cukeplan_patterns::tags::TagExpression;
use cukeplan_patterns::{ExpressionError, ParameterType, ParameterTypeRegistry};
use hashbrown::HashMap;

use super::definitions::{
    DefinedParameterType, DefinedStep, DefinedTestCaseHook, DefinedTestRunHook, NewParameterType,
    NewStep, NewTestCaseHook, NewTestRunHook, TestCaseHookKind, TestRunHookKind,
};
use super::error::BuildError;
use super::library::SupportCodeLibrary;
use crate::ids::{self, IdGenerator};
use crate::messages::UndefinedParameterType;
use crate::types::Transformer;

struct Registration<T> {
    id: String,
    order: usize,
    item: T,
}

/// Collects parameter types, steps and hooks, then compiles them into a
/// [`SupportCodeLibrary`].
///
/// Every `add_*` call takes a fresh id from the builder's generator and the
/// next registration order, so envelopes can later be emitted in authorship
/// order across all categories.
///
/// # Examples
/// ```
/// use cukeplan::ids::IncrementingIdGenerator;
/// use cukeplan::registry::{NewStep, NewTestCaseHook, SupportCodeBuilder};
/// use std::sync::Arc;
///
/// let library = SupportCodeBuilder::<()>::new(Arc::new(IncrementingIdGenerator::new()))
///     .add_before_hook(NewTestCaseHook::new(|_, _| Ok(())))
///     .add_step(NewStep::new("I have {int} cukes", |_, _| Ok(())))
///     .build()
///     .unwrap();
/// assert_eq!(library.find_all_steps_by("I have 4 cukes").len(), 1);
/// ```
pub struct SupportCodeBuilder<W> {
    ids: Arc<dyn IdGenerator>,
    next_order: usize,
    parameter_types: Vec<Registration<NewParameterType<W>>>,
    steps: Vec<Registration<NewStep<W>>>,
    before_hooks: Vec<Registration<NewTestCaseHook<W>>>,
    after_hooks: Vec<Registration<NewTestCaseHook<W>>>,
    before_all_hooks: Vec<Registration<NewTestRunHook>>,
    after_all_hooks: Vec<Registration<NewTestRunHook>>,
}

impl<W> Default for SupportCodeBuilder<W> {
    fn default() -> Self {
        Self::new(ids::default_generator())
    }
}

impl<W> SupportCodeBuilder<W> {
    /// An empty builder drawing ids from `ids`.
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            next_order: 0,
            parameter_types: Vec::new(),
            steps: Vec::new(),
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            before_all_hooks: Vec::new(),
            after_all_hooks: Vec::new(),
        }
    }

    fn register<T>(&mut self, item: T) -> Registration<T> {
        let order = self.next_order;
        self.next_order += 1;
        Registration {
            id: self.ids.new_id(),
            order,
            item,
        }
    }

    /// Register a parameter type.
    #[must_use]
    pub fn add_parameter_type(mut self, parameter_type: NewParameterType<W>) -> Self {
        let registration = self.register(parameter_type);
        self.parameter_types.push(registration);
        self
    }

    /// Register a hook run before each matching test case.
    #[must_use]
    pub fn add_before_hook(mut self, hook: NewTestCaseHook<W>) -> Self {
        let registration = self.register(hook);
        self.before_hooks.push(registration);
        self
    }

    /// Register a hook run after each matching test case.
    #[must_use]
    pub fn add_after_hook(mut self, hook: NewTestCaseHook<W>) -> Self {
        let registration = self.register(hook);
        self.after_hooks.push(registration);
        self
    }

    /// Register a step definition.
    #[must_use]
    pub fn add_step(mut self, step: NewStep<W>) -> Self {
        let registration = self.register(step);
        self.steps.push(registration);
        self
    }

    /// Register a hook run once before the whole run.
    #[must_use]
    pub fn add_before_all_hook(mut self, hook: NewTestRunHook) -> Self {
        let registration = self.register(hook);
        self.before_all_hooks.push(registration);
        self
    }

    /// Register a hook run once after the whole run.
    #[must_use]
    pub fn add_after_all_hook(mut self, hook: NewTestRunHook) -> Self {
        let registration = self.register(hook);
        self.after_all_hooks.push(registration);
        self
    }

    /// Compile every registration into a sealed library.
    ///
    /// Registrations are left untouched, so the builder may be built again.
    /// A step referencing an unknown parameter type is dropped and reported
    /// through [`SupportCodeLibrary::undefined_parameter_types`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] for duplicate or illegal parameter types,
    /// malformed step patterns and malformed hook tag expressions.
    pub fn build(&self) -> Result<SupportCodeLibrary<W>, BuildError> {
        let mut registry = ParameterTypeRegistry::new();
        let mut transformers: HashMap<String, Transformer<W>> = HashMap::new();
        let parameter_types = self
            .parameter_types
            .iter()
            .map(|registration| {
                define_parameter_type(&mut registry, &mut transformers, registration)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut undefined = UndefinedParameterTypes::default();
        let mut steps = Vec::with_capacity(self.steps.len());
        for Registration { id, order, item } in &self.steps {
            match item.pattern.compile(&registry) {
                Ok(matcher) => steps.push(DefinedStep {
                    id: id.clone(),
                    order: *order,
                    matcher,
                    function: Arc::clone(&item.function),
                    source_reference: item.source_reference.clone(),
                }),
                Err(ExpressionError::UndefinedParameterType { name, expression }) => {
                    log::warn!(
                        "dropping step `{}` at {}: undefined parameter type `{name}`",
                        item.pattern,
                        item.source_reference
                    );
                    undefined.record(name, expression);
                }
                Err(source) => {
                    return Err(BuildError::Expression {
                        pattern: item.pattern.to_string(),
                        source_reference: item.source_reference.clone(),
                        source,
                    });
                }
            }
        }

        let before_hooks = compile_test_case_hooks(&self.before_hooks, TestCaseHookKind::Before)?;
        let after_hooks = compile_test_case_hooks(&self.after_hooks, TestCaseHookKind::After)?;
        let before_all_hooks = define_test_run_hooks(&self.before_all_hooks, TestRunHookKind::BeforeAll);
        let after_all_hooks = define_test_run_hooks(&self.after_all_hooks, TestRunHookKind::AfterAll);

        log::debug!(
            "built support code library: {} parameter types, {} steps, {} hooks, {} undefined parameter types",
            parameter_types.len(),
            steps.len(),
            before_hooks.len() + after_hooks.len() + before_all_hooks.len() + after_all_hooks.len(),
            undefined.len()
        );

        Ok(SupportCodeLibrary {
            parameter_types,
            steps,
            before_hooks,
            after_hooks,
            before_all_hooks,
            after_all_hooks,
            undefined_parameter_types: undefined.into_records(),
            registry,
            transformers,
        })
    }
}

fn define_parameter_type<W>(
    registry: &mut ParameterTypeRegistry,
    transformers: &mut HashMap<String, Transformer<W>>,
    registration: &Registration<NewParameterType<W>>,
) -> Result<DefinedParameterType, BuildError> {
    let Registration { id, order, item } = registration;
    let parameter_type = ParameterType::new(item.name.clone(), item.regexps.iter().cloned())
        .with_use_for_snippets(item.use_for_snippets)
        .with_prefer_for_regexp_match(item.prefer_for_regexp_match);
    let defined = registry
        .define(parameter_type)
        .map_err(|source| BuildError::ParameterType {
            name: item.name.clone(),
            source,
        })?;
    if let Some(transformer) = &item.transformer {
        transformers.insert(item.name.clone(), Arc::clone(transformer));
    }
    Ok(DefinedParameterType {
        id: id.clone(),
        order: *order,
        name: item.name.clone(),
        regular_expressions: defined.patterns(),
        use_for_snippets: item.use_for_snippets,
        prefer_for_regexp_match: item.prefer_for_regexp_match,
        source_reference: item.source_reference.clone(),
    })
}

fn compile_test_case_hooks<W>(
    hooks: &[Registration<NewTestCaseHook<W>>],
    kind: TestCaseHookKind,
) -> Result<Vec<DefinedTestCaseHook<W>>, BuildError> {
    hooks
        .iter()
        .map(|Registration { id, order, item }| {
            let tag_expression = item
                .tag_expression
                .as_deref()
                .map(TagExpression::parse)
                .transpose()
                .map_err(|source| BuildError::TagExpression {
                    hook_id: id.clone(),
                    source,
                })?;
            Ok(DefinedTestCaseHook {
                id: id.clone(),
                order: *order,
                kind,
                name: item.name.clone(),
                tag_expression,
                function: Arc::clone(&item.function),
                source_reference: item.source_reference.clone(),
            })
        })
        .collect()
}

fn define_test_run_hooks(
    hooks: &[Registration<NewTestRunHook>],
    kind: TestRunHookKind,
) -> Vec<DefinedTestRunHook> {
    hooks
        .iter()
        .map(|Registration { id, order, item }| DefinedTestRunHook {
            id: id.clone(),
            order: *order,
            kind,
            name: item.name.clone(),
            function: Arc::clone(&item.function),
            source_reference: item.source_reference.clone(),
        })
        .collect()
}

/// Unknown parameter type references grouped by name in first-seen order.
#[derive(Default)]
struct UndefinedParameterTypes {
    by_name: Vec<(String, Vec<String>)>,
}

impl UndefinedParameterTypes {
    fn record(&mut self, name: String, expression: String) {
        if let Some((_, expressions)) = self.by_name.iter_mut().find(|(seen, _)| *seen == name) {
            if !expressions.contains(&expression) {
                expressions.push(expression);
            }
            return;
        }
        self.by_name.push((name, vec![expression]));
    }

    fn len(&self) -> usize {
        self.by_name.iter().map(|(_, expressions)| expressions.len()).sum()
    }

    fn into_records(self) -> Vec<UndefinedParameterType> {
        self.by_name
            .into_iter()
            .flat_map(|(name, expressions)| {
                expressions.into_iter().map(move |expression| UndefinedParameterType {
                    name: name.clone(),
                    expression,
                })
            })
            .collect()
    }
}
