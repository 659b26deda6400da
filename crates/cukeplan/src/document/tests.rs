//! Unit tests for pickle compilation and lineage lookups.

use cukeplan_patterns::StepKeyword;
use rstest::{fixture, rstest};

use super::{FeatureDocument, PickleStepArgument};
use crate::ids::IncrementingIdGenerator;

const OUTLINE: &str = "\
@billing
Feature: Refunds
  Background:
    Given a customer

  Scenario: plain refund
    When they ask for a refund
    And they wait
    Then the money returns

  Rule: limits
    Background:
      Given a limit

    @slow
    Scenario Outline: refund <amount>
      When they ask for <amount>
      Then they see <outcome>

      @edge
      Examples: small
        | amount | outcome |
        | 5      | ok      |
        | 50     | denied  |
";

#[fixture]
fn document() -> FeatureDocument {
    FeatureDocument::parse("features/refunds.feature", OUTLINE)
        .unwrap_or_else(|e| panic!("parse fixture: {e}"))
}

#[rstest]
fn compiles_scenarios_then_rule_rows(document: FeatureDocument) {
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let names: Vec<&str> = pickles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["plain refund", "refund 5", "refund 50"]);
    assert!(pickles.iter().all(|p| p.uri == "features/refunds.feature"));
}

#[rstest]
fn step_ids_precede_the_pickle_id(document: FeatureDocument) {
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let Some(first) = pickles.first() else {
        panic!("expected pickles");
    };
    let step_ids: Vec<&str> = first.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(step_ids, vec!["0", "1", "2", "3"]);
    assert_eq!(first.id, "4");
}

#[rstest]
fn backgrounds_precede_scenario_steps(document: FeatureDocument) {
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let Some(row) = pickles.get(1) else {
        panic!("expected an outline row");
    };
    let texts: Vec<&str> = row.steps.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["a customer", "a limit", "they ask for 5", "they see ok"]
    );
}

#[rstest]
fn conjunctions_resolve_to_the_previous_keyword(document: FeatureDocument) {
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let kinds: Vec<(&str, StepKeyword)> = pickles
        .first()
        .map(|p| p.steps.iter().map(|s| (s.keyword.as_str(), s.kind)).collect())
        .unwrap_or_default();
    assert_eq!(
        kinds,
        vec![
            ("Given", StepKeyword::Given),
            ("When", StepKeyword::When),
            ("And", StepKeyword::When),
            ("Then", StepKeyword::Then),
        ]
    );
}

#[rstest]
fn tags_merge_down_the_hierarchy(document: FeatureDocument) {
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let tags: Vec<Vec<String>> = pickles.iter().map(|p| p.tags.clone()).collect();
    assert_eq!(
        tags,
        vec![
            vec!["@billing".to_owned()],
            vec!["@billing".to_owned(), "@slow".to_owned(), "@edge".to_owned()],
            vec!["@billing".to_owned(), "@slow".to_owned(), "@edge".to_owned()],
        ]
    );
}

#[rstest]
fn example_rows_are_located_below_the_header(document: FeatureDocument) {
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let lines: Vec<u32> = pickles.iter().map(|p| p.location.line).collect();
    assert_eq!(lines, vec![6, 23, 24]);
}

#[rstest]
fn lineage_resolves_rule_and_example(document: FeatureDocument) {
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let Some(row) = pickles.get(2) else {
        panic!("expected a second outline row");
    };
    let Some(lineage) = document.lineage(row) else {
        panic!("lineage should resolve");
    };
    assert_eq!(lineage.rule.map(|r| r.name.as_str()), Some("limits"));
    assert_eq!(lineage.scenario.name, "refund <amount>");
    assert_eq!(lineage.examples_name(), Some("small"));
    assert_eq!(lineage.examples_index, Some(0));
    assert_eq!(lineage.example_index, Some(1));
    assert_eq!(
        lineage.example.map(<[String]>::to_vec),
        Some(vec!["50".to_owned(), "denied".to_owned()])
    );
    assert_eq!(document.location_of(row), Some(row.location));
}

#[test]
fn attaches_tables_and_doc_strings() {
    let text = "\
Feature: Arguments
  Scenario Outline: shapes
    Given a table
      | name | <value> |
    And a doc string
      \"\"\"
      value is <value>
      \"\"\"

    Examples:
      | value |
      | 7     |
";
    let document = FeatureDocument::parse("features/arguments.feature", text)
        .unwrap_or_else(|e| panic!("parse: {e}"));
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let Some(steps) = pickles.first().map(|p| p.steps.as_slice()) else {
        panic!("expected one pickle");
    };
    assert!(matches!(
        steps.first().and_then(|s| s.argument.as_ref()),
        Some(PickleStepArgument::DataTable(rows)) if rows == &vec![vec!["name".to_owned(), "7".to_owned()]]
    ));
    assert!(matches!(
        steps.get(1).and_then(|s| s.argument.as_ref()),
        Some(PickleStepArgument::DocString(content)) if content.trim() == "value is 7"
    ));
}

#[test]
fn parse_errors_name_the_document() {
    let Err(err) = FeatureDocument::parse("features/broken.feature", "Scenario without feature") else {
        panic!("invalid Gherkin must fail");
    };
    assert!(err.to_string().contains("features/broken.feature"));
}

#[test]
fn foreign_pickles_have_no_lineage() {
    let document = FeatureDocument::parse("a.feature", "Feature: one\n  Scenario: alpha\n    Given x\n")
        .unwrap_or_else(|e| panic!("parse: {e}"));
    let other = FeatureDocument::parse("b.feature", "Feature: two\n  Scenario: beta\n    Given x\n")
        .unwrap_or_else(|e| panic!("parse: {e}"));
    let pickles = other.compile_pickles(&IncrementingIdGenerator::new());
    let Some(beta) = pickles.first() else {
        panic!("expected a pickle");
    };
    let alpha = document.compile_pickles(&IncrementingIdGenerator::new());
    assert_eq!(alpha.first().map(|p| p.source), Some(beta.source));
    assert!(document.lineage(beta).is_none());
    assert!(document.location_of(beta).is_none());
    assert!(other.lineage(beta).is_some());
}

const SPACED_EXAMPLES: &str = "\
Feature: Spacing
  Scenario Outline: row <n>
    Given <n>

    Examples:
      | n |

      | 1 |
      # skipped
      | 2 |
";

#[test]
fn example_rows_skip_blank_and_comment_lines() {
    let document = FeatureDocument::parse("features/spacing.feature", SPACED_EXAMPLES)
        .unwrap_or_else(|e| panic!("parse: {e}"));
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let locations: Vec<(u32, Option<u32>)> = pickles
        .iter()
        .map(|p| (p.location.line, p.location.column))
        .collect();
    assert_eq!(locations, vec![(8, Some(7)), (10, Some(7))]);
    let lineage_lines: Vec<Option<u32>> = pickles
        .iter()
        .map(|p| document.location_of(p).map(|l| l.line))
        .collect();
    assert_eq!(lineage_lines, vec![Some(8), Some(10)]);
}

#[test]
fn prebuilt_features_place_rows_after_the_header() {
    let feature = gherkin::Feature::parse(SPACED_EXAMPLES, gherkin::GherkinEnv::default())
        .unwrap_or_else(|e| panic!("parse: {e}"));
    let document = FeatureDocument::from_feature("features/spacing.feature", feature);
    let pickles = document.compile_pickles(&IncrementingIdGenerator::new());
    let lines: Vec<u32> = pickles.iter().map(|p| p.location.line).collect();
    assert_eq!(lines, vec![7, 8]);
}
