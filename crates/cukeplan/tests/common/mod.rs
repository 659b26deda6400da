//! Shared helpers for cukeplan integration tests.

use std::path::Path;
use std::sync::Arc;

use cukeplan::{
    FeatureDocument, IncrementingIdGenerator, Pickle, SupportCodeBuilder, SupportCodeLibrary,
    TestPlan, TestPlanIngredients, TestPlanOptions, make_test_plan,
};

/// World threaded through every prepared step.
#[derive(Debug, Default)]
pub struct World {
    pub log: Vec<String>,
}

/// Parse a fixture from `tests/features`, using its relative path as the uri.
pub fn load(name: &str) -> FeatureDocument {
    let uri = format!("tests/features/{name}");
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(&uri);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    FeatureDocument::parse(uri, &text).unwrap_or_else(|e| panic!("parse {name}: {e}"))
}

/// Compile pickles with a fresh counter.
pub fn pickles(document: &FeatureDocument) -> Vec<Pickle> {
    document.compile_pickles(&IncrementingIdGenerator::new())
}

/// A builder issuing ids from its own counter.
pub fn builder() -> SupportCodeBuilder<World> {
    SupportCodeBuilder::new(Arc::new(IncrementingIdGenerator::new()))
}

/// Options with deterministic ids and the default naming strategy.
pub fn options() -> TestPlanOptions {
    TestPlanOptions {
        new_id: Arc::new(IncrementingIdGenerator::new()),
        ..TestPlanOptions::default()
    }
}

/// Assemble a plan with [`options`].
pub fn plan<'a>(
    document: &'a FeatureDocument,
    pickles: &'a [Pickle],
    library: &'a SupportCodeLibrary<World>,
) -> TestPlan<'a, World> {
    make_test_plan(
        TestPlanIngredients {
            test_run_started_id: None,
            document,
            pickles,
            support_code_library: library,
        },
        &options(),
    )
}
