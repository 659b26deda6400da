//! Behavioural coverage for step expressions through the public API.

use cukeplan_patterns::{
    Expression, ExpressionError, ExpressionKind, ParameterType, ParameterTypeRegistry,
    RegexSource,
};
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> ParameterTypeRegistry {
    ParameterTypeRegistry::new()
}

fn compile(
    expression: impl Into<Expression>,
    registry: &ParameterTypeRegistry,
) -> Box<dyn cukeplan_patterns::StepMatcher> {
    let expression = expression.into();
    expression
        .compile(registry)
        .unwrap_or_else(|e| panic!("`{expression}` should compile: {e}"))
}

#[rstest]
#[case("I have {int} cuke(s)", "I have 1 cuke", true)]
#[case("I have {int} cuke(s)", "I have 42 cukes", true)]
#[case("I have {int} cuke(s)", "I have many cukes", false)]
#[case("in my belly/stomach", "in my stomach", true)]
#[case("in my belly/stomach", "in my belly/stomach", false)]
#[case(r"a \(literal\) paren", "a (literal) paren", true)]
#[case("{float} degrees", "-3.5 degrees", true)]
#[case("{} left", "anything at all left", true)]
fn matches_cucumber_expressions(
    registry: ParameterTypeRegistry,
    #[case] source: &str,
    #[case] text: &str,
    #[case] expected: bool,
) {
    let matcher = compile(source, &registry);
    assert_eq!(matcher.match_text(text).is_some(), expected);
    assert_eq!(matcher.kind(), ExpressionKind::CucumberExpression);
}

#[rstest]
fn reports_argument_positions_for_serialisation(registry: ParameterTypeRegistry) {
    let matcher = compile("a step with {int} and {int}", &registry);
    let Some(arguments) = matcher.match_text("a step with 4 and 5") else {
        panic!("expected a match");
    };
    let groups: Vec<(Option<usize>, Option<&str>)> = arguments
        .iter()
        .map(|a| (a.group().start, a.group().value.as_deref()))
        .collect();
    assert_eq!(groups, vec![(Some(12), Some("4")), (Some(18), Some("5"))]);
    assert!(arguments.iter().all(|a| a.group().children.is_empty()));
}

#[rstest]
fn serialises_flagged_regular_expressions(registry: ParameterTypeRegistry) {
    let matcher = compile(
        RegexSource::new(r"there are (\d+) widgets").with_flags("i"),
        &registry,
    );
    assert_eq!(matcher.source(), r"/there are (\d+) widgets/i");
    assert_eq!(matcher.kind(), ExpressionKind::RegularExpression);
}

#[rstest]
fn custom_parameter_types_participate_in_expressions(mut registry: ParameterTypeRegistry) {
    registry
        .define(ParameterType::new("colour", ["red|green|blue"]))
        .unwrap_or_else(|e| panic!("define colour: {e}"));
    let matcher = compile("a {colour} ball", &registry);
    let Some(arguments) = matcher.match_text("a green ball") else {
        panic!("expected a match");
    };
    let names: Vec<&str> = arguments.iter().map(|a| a.parameter_type_name()).collect();
    assert_eq!(names, vec!["colour"]);
    assert!(matcher.match_text("a purple ball").is_none());
}

#[rstest]
fn undefined_parameter_types_are_distinguishable(registry: ParameterTypeRegistry) {
    let expression = Expression::from("a {flight} is late");
    let Err(err) = expression.compile(&registry) else {
        panic!("compilation should fail");
    };
    assert!(matches!(
        err,
        ExpressionError::UndefinedParameterType { ref name, ref expression }
            if name == "flight" && expression == "a {flight} is late"
    ));
}

#[rstest]
fn invalid_regular_expressions_surface_regex_errors(registry: ParameterTypeRegistry) {
    let expression = Expression::from(RegexSource::new("unclosed (group"));
    assert!(matches!(
        expression.compile(&registry),
        Err(ExpressionError::Regex(_))
    ));
}
