//! Feature documents and the pickles compiled from them.

mod lineage;
mod pickle;

use gherkin::{Examples, Feature, GherkinEnv, LineCol};
use thiserror::Error;

pub use lineage::Lineage;
pub use pickle::{Pickle, PickleSource, PickleStep, PickleStepArgument};

use crate::ids::IdGenerator;
use crate::types::Location;
use pickle::{PickleCompiler, ScenarioScope};

/// Failure to load a feature document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The Gherkin text could not be parsed.
    #[error("failed to parse feature `{uri}`: {source}")]
    Parse {
        /// Uri of the document.
        uri: String,
        /// Parser failure.
        source: gherkin::ParseError,
    },
}

/// A parsed feature and the uri it was loaded from.
#[derive(Debug, Clone)]
pub struct FeatureDocument {
    uri: String,
    feature: Feature,
    text: Option<String>,
}

impl FeatureDocument {
    /// Parse Gherkin `text` using the default English keywords.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] when the text is not valid Gherkin.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::document::FeatureDocument;
    /// let document = FeatureDocument::parse(
    ///     "features/cukes.feature",
    ///     "Feature: Cukes\n  Scenario: eating\n    Given I have 4 cukes\n",
    /// )
    /// .unwrap();
    /// assert_eq!(document.feature().name, "Cukes");
    /// ```
    pub fn parse(uri: impl Into<String>, text: &str) -> Result<Self, DocumentError> {
        let uri = uri.into();
        let mut text = text.to_owned();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        match Feature::parse(text.as_str(), GherkinEnv::default()) {
            Ok(feature) => Ok(Self {
                uri,
                feature,
                text: Some(text),
            }),
            Err(source) => Err(DocumentError::Parse { uri, source }),
        }
    }

    /// Wrap an already parsed feature.
    ///
    /// Without the source text, example rows are assumed to follow their
    /// header on consecutive lines.
    #[must_use]
    pub fn from_feature(uri: impl Into<String>, feature: Feature) -> Self {
        Self {
            uri: uri.into(),
            feature,
            text: None,
        }
    }

    /// Uri the document was loaded from.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The parsed feature.
    #[must_use]
    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Compile every scenario into pickles.
    ///
    /// Feature-level scenarios come first, then each rule's scenarios.
    /// Every step id is issued before the id of the pickle containing it.
    #[must_use]
    pub fn compile_pickles(&self, ids: &dyn IdGenerator) -> Vec<Pickle> {
        let mut compiler = PickleCompiler {
            document: self,
            ids,
            pickles: Vec::new(),
        };
        let background = self
            .feature
            .background
            .as_ref()
            .map_or(&[][..], |background| background.steps.as_slice());
        for (index, scenario) in self.feature.scenarios.iter().enumerate() {
            compiler.compile_scenario(&ScenarioScope {
                rule: None,
                index,
                scenario,
                backgrounds: [background, &[]],
            });
        }
        for (rule_index, rule) in self.feature.rules.iter().enumerate() {
            let rule_background = rule
                .background
                .as_ref()
                .map_or(&[][..], |background| background.steps.as_slice());
            for (index, scenario) in rule.scenarios.iter().enumerate() {
                compiler.compile_scenario(&ScenarioScope {
                    rule: Some((rule_index, rule.tags.as_slice())),
                    index,
                    scenario,
                    backgrounds: [background, rule_background],
                });
            }
        }
        log::debug!(
            "compiled {} pickles from {}",
            compiler.pickles.len(),
            self.uri
        );
        compiler.pickles
    }

    /// The feature, rule, scenario and example row a pickle came from.
    ///
    /// Returns `None` when the pickle was not compiled from this document.
    #[must_use]
    pub fn lineage(&self, pickle: &Pickle) -> Option<Lineage<'_>> {
        if pickle.uri != self.uri {
            return None;
        }
        let source = pickle.source;
        let rule = match source.rule {
            Some(index) => Some(self.feature.rules.get(index)?),
            None => None,
        };
        let scenarios = rule.map_or(&self.feature.scenarios, |rule| &rule.scenarios);
        let scenario = scenarios.get(source.scenario)?;
        let examples = match source.examples {
            Some(index) => Some(scenario.examples.get(index)?),
            None => None,
        };
        let example = match (examples, source.example_row) {
            (Some(examples), Some(row)) => Some(
                examples
                    .table
                    .as_ref()?
                    .rows
                    .get(row + 1)?
                    .as_slice(),
            ),
            _ => None,
        };
        let example_index = example.and(source.example_row);
        let declared_at = examples
            .zip(example_index)
            .and_then(|(examples, row)| self.example_row_location(examples, row))
            .unwrap_or_else(|| pickle::location(scenario.position));
        Some(Lineage {
            feature: &self.feature,
            rule,
            scenario,
            examples,
            examples_index: source.examples,
            example,
            example_index,
            declared_at,
        })
    }

    /// Location of the `row`-th data row of `examples`, header excluded.
    ///
    /// Rows are found in the source text, skipping blank and comment lines
    /// between them.
    pub(crate) fn example_row_location(&self, examples: &Examples, row: usize) -> Option<Location> {
        let table = examples.table.as_ref()?;
        let Some(text) = self.text.as_deref() else {
            return Some(pickle::location(LineCol {
                line: table.position.line.saturating_add(row).saturating_add(1),
                col: table.position.col,
            }));
        };
        // `position.line` is 1-based, so skipping that many lines lands just
        // below the header.
        let (index, content) = text
            .lines()
            .enumerate()
            .skip(table.position.line)
            .filter(|(_, line)| {
                let line = line.trim_start();
                !line.is_empty() && !line.starts_with('#')
            })
            .nth(row)?;
        let indent = content.chars().take_while(|c| c.is_whitespace()).count();
        Some(pickle::location(LineCol {
            line: index.saturating_add(1),
            col: indent.saturating_add(1),
        }))
    }

    /// Declared location of a pickle, resolved through its lineage.
    #[must_use]
    pub fn location_of(&self, pickle: &Pickle) -> Option<Location> {
        self.lineage(pickle).map(|lineage| lineage.location())
    }
}

#[cfg(test)]
mod tests;
