//! Parsing, precedence and error coverage for tag expressions.

use rstest::rstest;

use super::{TagExpression, merge_tag_sets};

fn parse_expression(input: &str) -> TagExpression {
    TagExpression::parse(input).unwrap_or_else(|err| panic!("parse expression `{input}`: {err}"))
}

fn parse_error_message(input: &str) -> String {
    match TagExpression::parse(input) {
        Ok(expr) => panic!("expected parse error for `{input}`, got {expr:?}"),
        Err(err) => err.to_string(),
    }
}

#[rstest]
#[case("@smoke", &["@smoke"], true)]
#[case("@smoke", &["@regression"], false)]
#[case("not @foo", &["@bar"], true)]
#[case("not @foo", &["@foo"], false)]
#[case("@a or @b and @c", &["@a"], true)]
#[case("@a or @b and @c", &["@b"], false)]
#[case("@a or @b and @c", &["@b", "@c"], true)]
#[case("not (@a or @b)", &["@c"], true)]
#[case("@a Or nOt @b", &["@c"], true)]
#[case("@a and @b and @c", &["@a", "@b"], false)]
#[case("@jira:ABC-1", &["@jira:ABC-1"], true)]
#[case(r"@with\(paren\)", &["@with(paren)"], true)]
#[case(r"@a\ b", &["@a b"], true)]
#[case(r"@a\ b and not @c", &["@a"], false)]
#[case(r"@back\\slash", &[r"@back\slash"], true)]
fn evaluates_expressions(#[case] input: &str, #[case] tags: &[&str], #[case] expected: bool) {
    assert_eq!(parse_expression(input).evaluate(tags), expected);
}

#[test]
fn accepts_tags_without_leading_at() {
    let expr = parse_expression("@smoke");
    assert!(expr.evaluate(["smoke"]));
}

#[test]
fn keeps_source_text() {
    let expr = parse_expression("@fast and not @wip");
    assert_eq!(expr.to_string(), "@fast and not @wip");
}

#[rstest]
#[case("@a and", "expected tag or '(' after 'and'")]
#[case("@a && @b", "unexpected character '&'")]
#[case("", "expected tag or '('")]
#[case("(@a", "missing ')'")]
#[case("@a @b", "unexpected token @b")]
#[case("@", "expected tag name after '@'")]
#[case("@a xor @b", "unexpected identifier 'xor'")]
#[case(r"@a\", "tag ends with an escape")]
fn reports_parse_errors(#[case] input: &str, #[case] expected: &str) {
    let err = parse_error_message(input);
    assert!(err.contains(expected), "unexpected error message: {err}");
}

#[test]
fn reports_error_offset() {
    let Err(err) = TagExpression::parse("@a or )") else {
        panic!("expected failure");
    };
    assert_eq!(err.offset(), 6);
}

#[test]
fn merges_and_normalises_tag_sets() {
    let merged = merge_tag_sets(
        &["feature".to_string(), "@shared".to_string()],
        &["@shared".to_string(), "scenario".to_string()],
    );
    assert_eq!(merged, vec!["@feature", "@shared", "@scenario"]);
}
