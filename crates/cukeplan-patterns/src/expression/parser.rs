//! Build the Cucumber expression syntax tree from lexed tokens.
//!
//! Parsing happens in two passes. The first resolves optionals and
//! parameters, which are delimited by explicit brackets. The second groups
//! `/`-separated runs into alternations; an alternation extends over adjacent
//! text and optionals and stops at whitespace or a parameter.

use crate::errors::{ExpressionError, syntax_error};

use super::lexer::{Token, lex_expression};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Text(String),
    Optional(Vec<Node>),
    Alternation(Vec<Vec<Node>>),
    Parameter { name: String, start: usize },
}

enum Item {
    Node(Node),
    Whitespace(String),
    Separator(usize),
}

pub(crate) fn parse_expression(expression: &str) -> Result<Vec<Node>, ExpressionError> {
    let tokens = lex_expression(expression)?;
    let mut iter = tokens.into_iter();
    let mut items = Vec::new();

    while let Some(token) = iter.next() {
        let item = match token {
            Token::Text { text, .. } => Item::Node(Node::Text(text)),
            Token::Whitespace { text, .. } => Item::Whitespace(text),
            Token::Alternation { index } => Item::Separator(index),
            Token::EndOptional { .. } => Item::Node(Node::Text(")".into())),
            Token::EndParameter { .. } => Item::Node(Node::Text("}".into())),
            Token::BeginParameter { index } => {
                Item::Node(parse_parameter(&mut iter, index, expression)?)
            }
            Token::BeginOptional { index } => {
                Item::Node(parse_optional(&mut iter, index, expression)?)
            }
        };
        items.push(item);
    }

    group_alternations(items, expression)
}

fn parse_parameter(
    tokens: &mut impl Iterator<Item = Token>,
    start: usize,
    expression: &str,
) -> Result<Node, ExpressionError> {
    let mut name = String::new();
    for token in tokens.by_ref() {
        match token {
            Token::EndParameter { .. } => {
                if name.contains(['{', '}', '(', ')', '\\', '/']) {
                    return Err(syntax_error(
                        "parameter names may not contain '{', '}', '(', ')', '\\' or '/'",
                        start,
                        expression,
                    ));
                }
                return Ok(Node::Parameter { name, start });
            }
            Token::Text { text, .. } | Token::Whitespace { text, .. } => name.push_str(&text),
            Token::BeginParameter { index } => {
                return Err(syntax_error(
                    "a parameter may not contain another parameter",
                    index,
                    expression,
                ));
            }
            Token::BeginOptional { index }
            | Token::EndOptional { index }
            | Token::Alternation { index } => {
                return Err(syntax_error(
                    "parameter names may not contain '{', '}', '(', ')', '\\' or '/'",
                    index,
                    expression,
                ));
            }
        }
    }
    Err(syntax_error(
        "the '{' does not have a matching '}'",
        start,
        expression,
    ))
}

fn parse_optional(
    tokens: &mut impl Iterator<Item = Token>,
    start: usize,
    expression: &str,
) -> Result<Node, ExpressionError> {
    let mut text = String::new();
    for token in tokens.by_ref() {
        match token {
            Token::EndOptional { .. } => {
                if text.trim().is_empty() {
                    return Err(syntax_error(
                        "an optional must contain some text",
                        start,
                        expression,
                    ));
                }
                return Ok(Node::Optional(vec![Node::Text(text)]));
            }
            Token::Text { text: chunk, .. } | Token::Whitespace { text: chunk, .. } => {
                text.push_str(&chunk);
            }
            Token::EndParameter { .. } => text.push('}'),
            Token::BeginParameter { index } => {
                return Err(syntax_error(
                    "an optional may not contain a parameter type",
                    index,
                    expression,
                ));
            }
            Token::BeginOptional { index } => {
                return Err(syntax_error(
                    "an optional may not contain another optional",
                    index,
                    expression,
                ));
            }
            Token::Alternation { index } => {
                return Err(syntax_error(
                    "an alternation can not be used inside an optional",
                    index,
                    expression,
                ));
            }
        }
    }
    Err(syntax_error(
        "the '(' does not have a matching ')'",
        start,
        expression,
    ))
}

fn group_alternations(items: Vec<Item>, expression: &str) -> Result<Vec<Node>, ExpressionError> {
    let mut nodes = Vec::new();
    let mut segment: Vec<Item> = Vec::new();

    for item in items {
        match item {
            Item::Whitespace(text) => {
                flush_segment(&mut segment, &mut nodes, expression)?;
                nodes.push(Node::Text(text));
            }
            Item::Node(parameter @ Node::Parameter { .. }) => {
                flush_segment(&mut segment, &mut nodes, expression)?;
                nodes.push(parameter);
            }
            other => segment.push(other),
        }
    }
    flush_segment(&mut segment, &mut nodes, expression)?;
    Ok(nodes)
}

fn flush_segment(
    segment: &mut Vec<Item>,
    nodes: &mut Vec<Node>,
    expression: &str,
) -> Result<(), ExpressionError> {
    if !segment.iter().any(|item| matches!(item, Item::Separator(_))) {
        nodes.extend(segment.drain(..).filter_map(|item| match item {
            Item::Node(node) => Some(node),
            Item::Whitespace(_) | Item::Separator(_) => None,
        }));
        return Ok(());
    }

    let mut alternatives = Vec::new();
    let mut current = Vec::new();
    let mut last_separator = 0;
    for item in segment.drain(..) {
        match item {
            Item::Separator(index) => {
                alternatives.push(check_alternative(std::mem::take(&mut current), index, expression)?);
                last_separator = index;
            }
            Item::Node(node) => current.push(node),
            Item::Whitespace(_) => {}
        }
    }
    alternatives.push(check_alternative(current, last_separator, expression)?);
    nodes.push(Node::Alternation(alternatives));
    Ok(())
}

fn check_alternative(
    alternative: Vec<Node>,
    separator: usize,
    expression: &str,
) -> Result<Vec<Node>, ExpressionError> {
    if alternative.is_empty() {
        return Err(syntax_error(
            "an alternative may not be empty",
            separator,
            expression,
        ));
    }
    if alternative.iter().all(|node| matches!(node, Node::Optional(_))) {
        return Err(syntax_error(
            "an alternative may not exclusively contain optionals",
            separator,
            expression,
        ));
    }
    Ok(alternative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(input: &str) -> Vec<Node> {
        parse_expression(input).unwrap_or_else(|e| panic!("`{input}` should parse: {e}"))
    }

    fn text(value: &str) -> Node {
        Node::Text(value.into())
    }

    #[test]
    fn parses_optional_text() {
        assert_eq!(
            parse("cuke(s)"),
            vec![text("cuke"), Node::Optional(vec![text("s")])]
        );
    }

    #[test]
    fn groups_alternation_between_whitespace() {
        assert_eq!(
            parse("in my belly/stomach"),
            vec![
                text("in"),
                text(" "),
                text("my"),
                text(" "),
                Node::Alternation(vec![vec![text("belly")], vec![text("stomach")]]),
            ]
        );
    }

    #[test]
    fn alternation_stops_at_parameters() {
        let nodes = parse("{int}st/nd");
        assert_eq!(
            nodes,
            vec![
                Node::Parameter {
                    name: "int".into(),
                    start: 0
                },
                Node::Alternation(vec![vec![text("st")], vec![text("nd")]]),
            ]
        );
    }

    #[test]
    fn stray_closing_brackets_are_text() {
        assert_eq!(parse("a)b}"), vec![text("a"), text(")"), text("b"), text("}")]);
    }

    #[rstest]
    #[case("a ()", "an optional must contain some text")]
    #[case("a ({int})", "an optional may not contain a parameter type")]
    #[case("a (b/c)", "an alternation can not be used inside an optional")]
    #[case("a (b", "the '(' does not have a matching ')'")]
    #[case("a {int", "the '{' does not have a matching '}'")]
    #[case("a /b", "an alternative may not be empty")]
    #[case("(a)/b", "an alternative may not exclusively contain optionals")]
    #[case("{a(b}", "parameter names may not contain")]
    fn reports_syntax_errors(#[case] input: &str, #[case] expected: &str) {
        let Err(err) = parse_expression(input) else {
            panic!("`{input}` should fail");
        };
        assert!(
            err.to_string().contains(expected),
            "unexpected error for `{input}`: {err}"
        );
    }
}
