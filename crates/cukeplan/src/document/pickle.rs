//! Compiled scenarios and the compiler that produces them.

use cukeplan_patterns::StepKeyword;
use cukeplan_patterns::tags::merge_tag_sets;
use gherkin::{LineCol, Scenario, Step};

use super::FeatureDocument;
use crate::ids::IdGenerator;
use crate::types::Location;

/// A flattened, executable scenario.
///
/// An outline yields one pickle per example row with placeholders
/// substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickle {
    /// Unique id.
    pub id: String,
    /// Uri of the feature file.
    pub uri: String,
    /// Scenario name after placeholder substitution.
    pub name: String,
    /// Feature, rule, scenario and examples tags, each with a leading `@`.
    pub tags: Vec<String>,
    /// Background steps followed by scenario steps.
    pub steps: Vec<PickleStep>,
    /// Scenario location, or the example row location for outlines.
    pub location: Location,
    /// Position of the originating elements in the feature.
    pub source: PickleSource,
}

/// Indices locating a pickle's origin inside its feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickleSource {
    /// Index into the feature's rules.
    pub rule: Option<usize>,
    /// Index into the scenarios of the rule, or of the feature.
    pub scenario: usize,
    /// Index into the scenario's examples groups.
    pub examples: Option<usize>,
    /// Index of the data row within the examples table, header excluded.
    pub example_row: Option<usize>,
}

/// One step of a pickle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickleStep {
    /// Unique id.
    pub id: String,
    /// Keyword as written, trimmed.
    pub keyword: String,
    /// Keyword category with `And`/`But` resolved.
    pub kind: StepKeyword,
    /// Step text after placeholder substitution.
    pub text: String,
    /// Attached table or doc string.
    pub argument: Option<PickleStepArgument>,
    /// Location of the step in the feature.
    pub location: Location,
}

/// Data attached to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickleStepArgument {
    /// Table cells row by row.
    DataTable(Vec<Vec<String>>),
    /// Doc string content.
    DocString(String),
}

pub(super) fn location(position: LineCol) -> Location {
    Location::new(to_u32(position.line), to_u32(position.col))
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Substitutions for one example row.
struct ExampleRow<'a> {
    header: &'a [String],
    values: &'a [String],
}

impl ExampleRow<'_> {
    fn interpolate(&self, text: &str) -> String {
        self.header
            .iter()
            .zip(self.values)
            .fold(text.to_owned(), |acc, (name, value)| {
                acc.replace(&format!("<{name}>"), value)
            })
    }
}

/// Where a scenario sits in the feature.
pub(super) struct ScenarioScope<'a> {
    pub(super) rule: Option<(usize, &'a [String])>,
    pub(super) index: usize,
    pub(super) scenario: &'a Scenario,
    pub(super) backgrounds: [&'a [Step]; 2],
}

pub(super) struct PickleCompiler<'a> {
    pub(super) document: &'a FeatureDocument,
    pub(super) ids: &'a dyn IdGenerator,
    pub(super) pickles: Vec<Pickle>,
}

impl PickleCompiler<'_> {
    pub(super) fn compile_scenario(&mut self, scope: &ScenarioScope<'_>) {
        let feature = self.document.feature();
        let rule_tags = scope.rule.map_or(&[][..], |(_, tags)| tags);
        let tags = merge_tag_sets(
            &merge_tag_sets(&feature.tags, rule_tags),
            &scope.scenario.tags,
        );
        let source = PickleSource {
            rule: scope.rule.map(|(index, _)| index),
            scenario: scope.index,
            examples: None,
            example_row: None,
        };
        if scope.scenario.examples.is_empty() {
            let steps = self.compile_steps(scope, None);
            self.push(
                scope.scenario.name.clone(),
                tags,
                steps,
                location(scope.scenario.position),
                source,
            );
            return;
        }
        for (examples_index, examples) in scope.scenario.examples.iter().enumerate() {
            let Some((header, rows)) = examples
                .table
                .as_ref()
                .and_then(|table| table.rows.split_first())
            else {
                continue;
            };
            let tags = merge_tag_sets(&tags, &examples.tags);
            for (row_index, values) in rows.iter().enumerate() {
                let row = ExampleRow { header, values };
                let steps = self.compile_steps(scope, Some(&row));
                let row_location = self
                    .document
                    .example_row_location(examples, row_index)
                    .unwrap_or_else(|| location(scope.scenario.position));
                self.push(
                    row.interpolate(&scope.scenario.name),
                    tags.clone(),
                    steps,
                    row_location,
                    PickleSource {
                        examples: Some(examples_index),
                        example_row: Some(row_index),
                        ..source
                    },
                );
            }
        }
    }

    fn push(
        &mut self,
        name: String,
        tags: Vec<String>,
        steps: Vec<PickleStep>,
        location: Location,
        source: PickleSource,
    ) {
        self.pickles.push(Pickle {
            id: self.ids.new_id(),
            uri: self.document.uri().to_owned(),
            name,
            tags,
            steps,
            location,
            source,
        });
    }

    fn compile_steps(&self, scope: &ScenarioScope<'_>, row: Option<&ExampleRow<'_>>) -> Vec<PickleStep> {
        let mut previous = None;
        let background = scope
            .backgrounds
            .iter()
            .flat_map(|steps| steps.iter())
            .map(|step| (step, None));
        let scenario = scope.scenario.steps.iter().map(|step| (step, row));
        background
            .chain(scenario)
            .map(|(step, row)| self.compile_step(step, row, &mut previous))
            .collect()
    }

    fn compile_step(
        &self,
        step: &Step,
        row: Option<&ExampleRow<'_>>,
        previous: &mut Option<StepKeyword>,
    ) -> PickleStep {
        let substitute = |text: &str| row.map_or_else(|| text.to_owned(), |row| row.interpolate(text));
        let keyword = step.keyword.trim().to_owned();
        let kind = keyword
            .parse::<StepKeyword>()
            .unwrap_or_else(|_| StepKeyword::from(step.ty))
            .resolve(previous);
        let argument = step
            .table
            .as_ref()
            .map(|table| {
                PickleStepArgument::DataTable(
                    table
                        .rows
                        .iter()
                        .map(|cells| cells.iter().map(|cell| substitute(cell)).collect())
                        .collect(),
                )
            })
            .or_else(|| {
                step.docstring
                    .as_deref()
                    .map(|content| PickleStepArgument::DocString(substitute(content)))
            });
        PickleStep {
            id: self.ids.new_id(),
            keyword,
            kind,
            text: substitute(&step.value),
            argument,
            location: location(step.position),
        }
    }
}
