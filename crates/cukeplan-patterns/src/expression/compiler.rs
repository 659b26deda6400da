//! Convert parsed Cucumber expressions into anchored regular expressions.

use std::sync::Arc;

use crate::errors::ExpressionError;
use crate::group::TreeRegexp;
use crate::parameter::{ParameterType, ParameterTypeRegistry};

use super::parser::{Node, parse_expression};
use super::{Argument, ExpressionKind, StepMatcher};

/// A compiled Cucumber expression such as `I have {int} cuke(s)`.
#[derive(Debug, Clone)]
pub struct CucumberExpression {
    source: String,
    tree: TreeRegexp,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl CucumberExpression {
    /// Compile `source` against the parameter types known to `registry`.
    ///
    /// # Errors
    /// Returns [`ExpressionError::UndefinedParameterType`] when a `{name}`
    /// is not registered, [`ExpressionError::Syntax`] for malformed input,
    /// and [`ExpressionError::Regex`] if the generated regex is rejected.
    ///
    /// # Examples
    /// ```
    /// use cukeplan_patterns::{CucumberExpression, ParameterTypeRegistry};
    /// let registry = ParameterTypeRegistry::new();
    /// let expression = CucumberExpression::new("I have {int} cuke(s)", &registry)
    ///     .expect("example ensures fallible call succeeds");
    /// assert_eq!(expression.regex_source(), r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$");
    /// ```
    pub fn new(source: &str, registry: &ParameterTypeRegistry) -> Result<Self, ExpressionError> {
        let nodes = parse_expression(source)?;
        let mut regex = String::with_capacity(source.len().saturating_mul(2) + 2);
        let mut parameter_types = Vec::new();
        regex.push('^');
        for node in &nodes {
            rewrite(node, registry, source, &mut regex, &mut parameter_types)?;
        }
        regex.push('$');
        Ok(Self {
            source: source.to_owned(),
            tree: TreeRegexp::new(&regex)?,
            parameter_types,
        })
    }

    /// The generated regular expression.
    #[must_use]
    pub fn regex_source(&self) -> &str {
        self.tree.regex().as_str()
    }

    /// Parameter types in the order their `{name}` appears.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }
}

fn rewrite(
    node: &Node,
    registry: &ParameterTypeRegistry,
    expression: &str,
    regex: &mut String,
    parameter_types: &mut Vec<Arc<ParameterType>>,
) -> Result<(), ExpressionError> {
    match node {
        Node::Text(text) => regex.push_str(&regex::escape(text)),
        Node::Optional(children) => {
            regex.push_str("(?:");
            for child in children {
                rewrite(child, registry, expression, regex, parameter_types)?;
            }
            regex.push_str(")?");
        }
        Node::Alternation(alternatives) => {
            regex.push_str("(?:");
            for (index, alternative) in alternatives.iter().enumerate() {
                if index > 0 {
                    regex.push('|');
                }
                for child in alternative {
                    rewrite(child, registry, expression, regex, parameter_types)?;
                }
            }
            regex.push(')');
        }
        Node::Parameter { name, .. } => {
            let parameter_type = registry.lookup_by_name(name).ok_or_else(|| {
                ExpressionError::UndefinedParameterType {
                    name: name.clone(),
                    expression: expression.to_owned(),
                }
            })?;
            regex.push_str(&parameter_type.capture_pattern());
            parameter_types.push(Arc::clone(parameter_type));
        }
    }
    Ok(())
}

impl StepMatcher for CucumberExpression {
    fn match_text(&self, text: &str) -> Option<Vec<Argument>> {
        let root = self.tree.match_text(text)?;
        Some(
            root.children
                .into_iter()
                .zip(&self.parameter_types)
                .map(|(group, parameter_type)| Argument::new(group, Arc::clone(parameter_type)))
                .collect(),
        )
    }

    fn source(&self) -> String {
        self.source.clone()
    }

    fn kind(&self) -> ExpressionKind {
        ExpressionKind::CucumberExpression
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn compile(source: &str) -> CucumberExpression {
        CucumberExpression::new(source, &ParameterTypeRegistry::new())
            .unwrap_or_else(|e| panic!("`{source}` should compile: {e}"))
    }

    #[rstest]
    #[case("a step", "^a step$")]
    #[case("a cuke(s)", "^a cuke(?:s)?$")]
    #[case("belly/stomach", "^(?:belly|stomach)$")]
    #[case("a {word}", r"^a ([^\s]+)$")]
    #[case("1.5 (x)", r"^1\.5 (?:x)?$")]
    fn builds_anchored_regex(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(compile(source).regex_source(), expected);
    }

    #[test]
    fn matches_with_typed_arguments() {
        let expression = compile("I have {int} cukes in my {word}");
        let Some(arguments) = expression.match_text("I have 42 cukes in my belly") else {
            panic!("expected a match");
        };
        let names: Vec<&str> = arguments.iter().map(Argument::parameter_type_name).collect();
        assert_eq!(names, vec!["int", "word"]);
        let Some(first) = arguments.first() else {
            panic!("expected an argument");
        };
        assert_eq!(first.group().start, Some(7));
        assert_eq!(first.group().value.as_deref(), Some("42"));
    }

    #[test]
    fn string_parameter_exposes_quoted_content() {
        let expression = compile("I say {string}");
        let Some(arguments) = expression.match_text(r#"I say "hello""#) else {
            panic!("expected a match");
        };
        let values = arguments.first().map(Argument::values).unwrap_or_default();
        assert_eq!(values, vec![Some("hello"), None]);
    }

    #[test]
    fn rejects_partial_matches() {
        assert!(compile("a step").match_text("a step too far").is_none());
    }

    #[test]
    fn reports_undefined_parameter_types() {
        let Err(err) = CucumberExpression::new("a {colour} ball", &ParameterTypeRegistry::new())
        else {
            panic!("undefined type should fail");
        };
        assert!(matches!(
            err,
            ExpressionError::UndefinedParameterType { ref name, .. } if name == "colour"
        ));
    }
}
