//! Envelope records emitted for support code and test cases.
//!
//! Field names and enum strings follow the Cucumber messages wire format so
//! the output of `serde_json` can feed existing formatters directly.

use serde::{Deserialize, Serialize};

use crate::types::SourceReference;

/// One self-describing record in the output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Envelope {
    /// A registered parameter type.
    ParameterType(ParameterType),
    /// A compiled step definition.
    StepDefinition(StepDefinition),
    /// A scenario or run hook.
    Hook(Hook),
    /// A parameter type referenced by a step but never registered.
    UndefinedParameterType(UndefinedParameterType),
    /// An assembled test case.
    TestCase(TestCase),
}

/// Parameter type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterType {
    /// Registry id.
    pub id: String,
    /// Name used inside `{}` in expressions.
    pub name: String,
    /// Patterns in the form used for matching.
    pub regular_expressions: Vec<String>,
    /// Whether this type wins regexp group lookups.
    pub prefer_for_regular_expression_match: bool,
    /// Whether snippets may use this type.
    pub use_for_snippets: bool,
    /// Declaration site.
    pub source_reference: SourceReference,
}

/// Flavour of a step definition pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepDefinitionPatternType {
    /// A Cucumber expression.
    CucumberExpression,
    /// A regular expression.
    RegularExpression,
}

/// Pattern of a step definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinitionPattern {
    /// Pattern flavour.
    #[serde(rename = "type")]
    pub kind: StepDefinitionPatternType,
    /// Pattern text.
    pub source: String,
}

/// Step definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    /// Registry id.
    pub id: String,
    /// Matching pattern.
    pub pattern: StepDefinitionPattern,
    /// Declaration site.
    pub source_reference: SourceReference,
}

/// When a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookType {
    /// Before each test case.
    BeforeTestCase,
    /// After each test case.
    AfterTestCase,
    /// Once before the run.
    BeforeTestRun,
    /// Once after the run.
    AfterTestRun,
}

/// Hook definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    /// Registry id.
    pub id: String,
    /// Hook kind.
    #[serde(rename = "type")]
    pub kind: HookType,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tag filter source for scenario hooks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_expression: Option<String>,
    /// Declaration site.
    pub source_reference: SourceReference,
}

/// Notice of a parameter type name no registration provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndefinedParameterType {
    /// Missing name.
    pub name: String,
    /// Expression that referenced it.
    pub expression: String,
}

/// Assembled test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Test case id.
    pub id: String,
    /// Originating pickle id.
    pub pickle_id: String,
    /// Steps in execution order.
    pub test_steps: Vec<TestStep>,
    /// Run the case belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_run_started_id: Option<String>,
}

/// A test step: either a hook invocation or a pickle step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestStep {
    /// Runs a scenario hook.
    Hook(HookTestStep),
    /// Runs the definition matching a pickle step.
    Pickle(PickleTestStep),
}

impl TestStep {
    /// The step id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Hook(step) => &step.id,
            Self::Pickle(step) => &step.id,
        }
    }
}

/// Hook invocation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HookTestStep {
    /// Step id.
    pub id: String,
    /// Hook that runs.
    pub hook_id: String,
}

/// Pickle step and every definition matching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickleTestStep {
    /// Step id.
    pub id: String,
    /// Pickle step being run.
    pub pickle_step_id: String,
    /// Matching definitions, empty when undefined.
    pub step_definition_ids: Vec<String>,
    /// Arguments per matching definition.
    pub step_match_arguments_lists: Vec<StepMatchArgumentsList>,
}

/// Arguments extracted by one matching definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMatchArgumentsList {
    /// Arguments in expression order.
    pub step_match_arguments: Vec<StepMatchArgument>,
}

/// One extracted argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMatchArgument {
    /// Captured group tree.
    pub group: Group,
    /// Parameter type name; empty for anonymous groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_type_name: Option<String>,
}

/// Captured group with its nested groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Byte offset in the step text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// Captured text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Nested groups.
    #[serde(default)]
    pub children: Vec<Group>,
}

impl From<&cukeplan_patterns::Group> for Group {
    fn from(group: &cukeplan_patterns::Group) -> Self {
        Self {
            start: group.start,
            value: group.value.clone(),
            children: group.children.iter().map(Self::from).collect(),
        }
    }
}

impl From<&cukeplan_patterns::Argument> for StepMatchArgument {
    fn from(argument: &cukeplan_patterns::Argument) -> Self {
        Self {
            group: argument.group().into(),
            parameter_type_name: Some(argument.parameter_type_name().to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hook_envelope_uses_wire_names() {
        let envelope = Envelope::Hook(Hook {
            id: "0".into(),
            kind: HookType::BeforeTestCase,
            name: None,
            tag_expression: Some("@smoke".into()),
            source_reference: SourceReference::new("hooks.rs", 3, 1),
        });
        let value = serde_json::to_value(&envelope).unwrap_or_else(|e| panic!("serialise: {e}"));
        assert_eq!(
            value,
            json!({
                "hook": {
                    "id": "0",
                    "type": "BEFORE_TEST_CASE",
                    "tagExpression": "@smoke",
                    "sourceReference": {"uri": "hooks.rs", "location": {"line": 3, "column": 1}}
                }
            })
        );
    }

    #[test]
    fn test_steps_deserialise_to_the_right_variant() {
        let steps: Vec<TestStep> = serde_json::from_value(json!([
            {"id": "1", "hookId": "0"},
            {"id": "2", "pickleStepId": "p", "stepDefinitionIds": [], "stepMatchArgumentsLists": []}
        ]))
        .unwrap_or_else(|e| panic!("deserialise: {e}"));
        assert!(matches!(steps.first(), Some(TestStep::Hook(_))));
        assert!(matches!(steps.get(1), Some(TestStep::Pickle(_))));
        assert_eq!(steps.get(1).map(TestStep::id), Some("2"));
    }

    #[test]
    fn anonymous_arguments_carry_an_empty_type_name() {
        use cukeplan_patterns::{ParameterTypeRegistry, RegexSource, RegularExpression, StepMatcher};

        let expression = RegularExpression::new(
            RegexSource::new(r"^(\w+) has (\d+)$"),
            &ParameterTypeRegistry::new(),
        )
        .unwrap_or_else(|e| panic!("compile: {e}"));
        let arguments: Vec<StepMatchArgument> = expression
            .match_text("bob has 3")
            .unwrap_or_else(|| panic!("expected a match"))
            .iter()
            .map(Into::into)
            .collect();
        let value = serde_json::to_value(&arguments).unwrap_or_else(|e| panic!("serialise: {e}"));
        assert_eq!(
            value,
            json!([
                {"group": {"start": 0, "value": "bob", "children": []}, "parameterTypeName": ""},
                {"group": {"start": 8, "value": "3", "children": []}, "parameterTypeName": "int"}
            ])
        );
    }
}
