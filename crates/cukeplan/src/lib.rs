//! Support code registry and test plan assembly for Gherkin runners.
//!
//! Register parameter types, steps and hooks on a [`SupportCodeBuilder`],
//! seal them into a [`SupportCodeLibrary`], then combine the library with a
//! parsed [`FeatureDocument`] and its pickles to get a [`TestPlan`]. Steps
//! are matched lazily; call [`TestStep::prepare`] to bind a step to a world.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use cukeplan::{
//!     FeatureDocument, IncrementingIdGenerator, NewStep, SupportCodeBuilder,
//!     TestPlanIngredients, TestPlanOptions, make_test_plan,
//! };
//!
//! #[derive(Default)]
//! struct World {
//!     apples: i64,
//! }
//!
//! let library = SupportCodeBuilder::new(Arc::new(IncrementingIdGenerator::new()))
//!     .add_step(NewStep::new("I have {int} apples", |world: &mut World, args| {
//!         world.apples = args
//!             .first()
//!             .and_then(|a| a.downcast_ref::<i64>())
//!             .copied()
//!             .unwrap_or_default();
//!         Ok(())
//!     }))
//!     .build()
//!     .unwrap();
//! let document = FeatureDocument::parse(
//!     "features/apples.feature",
//!     "Feature: Apples\n  Scenario: counting\n    Given I have 3 apples\n",
//! )
//! .unwrap();
//! let ids = IncrementingIdGenerator::new();
//! let pickles = document.compile_pickles(&ids);
//! let plan = make_test_plan(
//!     TestPlanIngredients {
//!         test_run_started_id: None,
//!         document: &document,
//!         pickles: &pickles,
//!         support_code_library: &library,
//!     },
//!     &TestPlanOptions::default(),
//! );
//!
//! let mut world = World::default();
//! for step in &plan.test_cases[0].test_steps {
//!     step.prepare(&mut world).unwrap().invoke().unwrap();
//! }
//! assert_eq!(world.apples, 3);
//! ```

pub mod config;
pub mod datatable;
pub mod document;
pub mod ids;
pub mod localization;
pub mod messages;
pub mod naming;
pub mod plan;
pub mod registry;
mod types;

pub use cukeplan_patterns::{
    Argument, Expression, ExpressionError, ExpressionGenerator, RegexSource, StepKeyword,
    StepMatcher,
};
pub use datatable::{DataTable, DataTableError};
pub use document::{DocumentError, FeatureDocument, Lineage, Pickle, PickleStep};
pub use ids::{IdGenerator, IncrementingIdGenerator, UuidIdGenerator};
pub use messages::Envelope;
pub use naming::{DefaultNamingStrategy, ExampleName, FeatureName, NameLength, NamingStrategy};
pub use plan::{
    AmbiguousStepError, PrepareError, PreparedStep, TestCase, TestPlan, TestPlanIngredients,
    TestPlanOptions, TestStep, TestStepKind, TestStepName, UndefinedStepError, make_test_plan,
};
pub use registry::{
    ArgumentError, BuildError, NewParameterType, NewStep, NewTestCaseHook, NewTestRunHook,
    StepMatch, SupportCodeBuilder, SupportCodeLibrary,
};
pub use types::{
    ArgValue, Location, SourceReference, StepArgument, StepError, SupportCodeFn, TestRunHookFn,
    Transformer,
};
