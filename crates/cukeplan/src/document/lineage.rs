//! The chain of document elements a pickle was compiled from.

use gherkin::{Examples, Feature, Rule, Scenario};

use crate::types::Location;

/// Structural ancestry of a pickle.
#[derive(Debug, Clone, Copy)]
pub struct Lineage<'a> {
    /// The feature.
    pub feature: &'a Feature,
    /// The rule, when the scenario sits inside one.
    pub rule: Option<&'a Rule>,
    /// The scenario or outline.
    pub scenario: &'a Scenario,
    /// The examples group for outline rows.
    pub examples: Option<&'a Examples>,
    /// Index of [`Self::examples`] within the outline.
    pub examples_index: Option<usize>,
    /// Cells of the example row.
    pub example: Option<&'a [String]>,
    /// Index of [`Self::example`] within its table, header excluded.
    pub example_index: Option<usize>,
    pub(super) declared_at: Location,
}

impl Lineage<'_> {
    /// Name of the examples group, if it has a non-empty one.
    #[must_use]
    pub fn examples_name(&self) -> Option<&str> {
        self.examples.and_then(|examples| examples.name.declared())
    }

    /// Declared location of the pickle: the example row for outlines,
    /// otherwise the scenario.
    #[must_use]
    pub fn location(&self) -> Location {
        self.declared_at
    }
}

/// Names that may be absent or blank.
trait DeclaredName {
    fn declared(&self) -> Option<&str>;
}

impl DeclaredName for String {
    fn declared(&self) -> Option<&str> {
        let name = self.trim();
        (!name.is_empty()).then_some(name)
    }
}

impl DeclaredName for Option<String> {
    fn declared(&self) -> Option<&str> {
        self.as_ref().and_then(|name| name.declared())
    }
}
