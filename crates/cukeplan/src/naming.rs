//! Display names for test cases.

use crate::document::{Lineage, Pickle};

/// Produces the display name of a test case from its lineage.
pub trait NamingStrategy: Send + Sync {
    /// Name the test case compiled from `pickle`.
    fn reduce(&self, lineage: &Lineage<'_>, pickle: &Pickle) -> String;
}

impl<F> NamingStrategy for F
where
    F: Fn(&Lineage<'_>, &Pickle) -> String + Send + Sync,
{
    fn reduce(&self, lineage: &Lineage<'_>, pickle: &Pickle) -> String {
        self(lineage, pickle)
    }
}

/// How many lineage parts a name keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameLength {
    /// Every non-empty part, joined with ` - `.
    #[default]
    Long,
    /// Only the last non-empty part.
    Short,
}

/// Whether the feature name leads the test case name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeatureName {
    /// Prefix the feature name.
    Include,
    /// Leave the feature name out.
    #[default]
    Exclude,
}

/// How outline rows are labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExampleName {
    /// `#<group>.<row>`, both 1-based.
    #[default]
    Number,
    /// The pickle name with placeholders substituted.
    Pickle,
    /// `#<group>.<row>: <pickle name>` when substitution changed the name,
    /// otherwise just the number.
    NumberAndPickleIfParameterised,
}

/// The configurable built-in naming strategy.
///
/// The default is long form without the feature name, numbering example
/// rows, e.g. `a rule - a parameterised scenario - under 5 - #1.1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultNamingStrategy {
    /// Long or short names.
    pub length: NameLength,
    /// Feature name handling.
    pub feature_name: FeatureName,
    /// Example row labelling.
    pub example_name: ExampleName,
}

impl DefaultNamingStrategy {
    /// Build a strategy from its three settings.
    #[must_use]
    pub const fn new(length: NameLength, feature_name: FeatureName, example_name: ExampleName) -> Self {
        Self {
            length,
            feature_name,
            example_name,
        }
    }

    fn example_label(&self, lineage: &Lineage<'_>, pickle: &Pickle) -> Option<String> {
        let (group, row) = lineage.examples_index.zip(lineage.example_index)?;
        let number = format!("#{}.{}", group + 1, row + 1);
        Some(match self.example_name {
            ExampleName::Number => number,
            ExampleName::Pickle => pickle.name.clone(),
            ExampleName::NumberAndPickleIfParameterised => {
                if pickle.name == lineage.scenario.name {
                    number
                } else {
                    format!("{number}: {}", pickle.name)
                }
            }
        })
    }
}

impl NamingStrategy for DefaultNamingStrategy {
    fn reduce(&self, lineage: &Lineage<'_>, pickle: &Pickle) -> String {
        let feature = match self.feature_name {
            FeatureName::Include => Some(lineage.feature.name.clone()),
            FeatureName::Exclude => None,
        };
        let parts: Vec<String> = feature
            .into_iter()
            .chain(lineage.rule.map(|rule| rule.name.clone()))
            .chain(Some(lineage.scenario.name.clone()))
            .chain(lineage.examples_name().map(str::to_owned))
            .chain(self.example_label(lineage, pickle))
            .map(|part| part.trim().to_owned())
            .filter(|part| !part.is_empty())
            .collect();
        match self.length {
            NameLength::Long => parts.join(" - "),
            NameLength::Short => parts.last().cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FeatureDocument;
    use crate::ids::IncrementingIdGenerator;
    use rstest::rstest;

    const FEATURE: &str = "\
Feature: a feature
  Scenario: plain
    Given a step

  Rule: a rule
    Scenario Outline: a parameterised scenario
      Given a step with <value>

      Examples: under 5
        | value |
        | 1     |
        | 2     |
";

    fn names(strategy: &dyn NamingStrategy) -> Vec<String> {
        let document = FeatureDocument::parse("features/naming.feature", FEATURE)
            .unwrap_or_else(|e| panic!("parse: {e}"));
        document
            .compile_pickles(&IncrementingIdGenerator::new())
            .iter()
            .filter_map(|pickle| {
                document
                    .lineage(pickle)
                    .map(|lineage| strategy.reduce(&lineage, pickle))
            })
            .collect()
    }

    #[rstest]
    #[case(DefaultNamingStrategy::default(), &["plain", "a rule - a parameterised scenario - under 5 - #1.1", "a rule - a parameterised scenario - under 5 - #1.2"])]
    #[case(
        DefaultNamingStrategy::new(NameLength::Long, FeatureName::Include, ExampleName::Number),
        &["a feature - plain", "a feature - a rule - a parameterised scenario - under 5 - #1.1", "a feature - a rule - a parameterised scenario - under 5 - #1.2"]
    )]
    #[case(
        DefaultNamingStrategy::new(NameLength::Short, FeatureName::Exclude, ExampleName::Number),
        &["plain", "#1.1", "#1.2"]
    )]
    #[case(
        DefaultNamingStrategy::new(NameLength::Short, FeatureName::Exclude, ExampleName::Pickle),
        &["plain", "a parameterised scenario", "a parameterised scenario"]
    )]
    #[case(
        DefaultNamingStrategy::new(NameLength::Long, FeatureName::Exclude, ExampleName::NumberAndPickleIfParameterised),
        &["plain", "a rule - a parameterised scenario - under 5 - #1.1", "a rule - a parameterised scenario - under 5 - #1.2"]
    )]
    fn default_strategy_variants(#[case] strategy: DefaultNamingStrategy, #[case] expected: &[&str]) {
        assert_eq!(names(&strategy), expected);
    }

    #[test]
    fn closures_are_strategies() {
        let by_id = |_: &Lineage<'_>, pickle: &Pickle| format!("{}: {}", pickle.id, pickle.name);
        assert_eq!(names(&by_id).first().map(String::as_str), Some("1: plain"));
    }
}
