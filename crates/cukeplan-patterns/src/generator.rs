//! Generate Cucumber expressions from undefined step text for snippets.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::parameter::{ParameterType, ParameterTypeRegistry};

const MAX_EXPRESSIONS: usize = 256;

/// A candidate expression proposed for a step that has no definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedExpression {
    source: String,
    parameter_types: Vec<Arc<ParameterType>>,
    parameter_names: Vec<String>,
}

impl GeneratedExpression {
    /// The expression text, e.g. `I have {int} cukes`.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter types in the order they appear.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }

    /// Suggested argument names; repeated types are numbered (`int`, `int2`).
    #[must_use]
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }
}

struct Matcher<'a> {
    parameter_type: &'a Arc<ParameterType>,
    regex: Regex,
}

struct Found<'a> {
    start: usize,
    len: usize,
    parameter_type: &'a Arc<ParameterType>,
}

/// Proposes expressions by replacing recognisable values with parameters.
///
/// # Examples
/// ```
/// use cukeplan_patterns::{ExpressionGenerator, ParameterTypeRegistry};
/// let registry = ParameterTypeRegistry::new();
/// let generated = ExpressionGenerator::new(&registry)
///     .generate_expressions("I have 17 cukes in my belly");
/// let sources: Vec<&str> = generated.iter().map(|g| g.source()).collect();
/// assert_eq!(
///     sources,
///     vec!["I have {int} cukes in my belly", "I have {float} cukes in my belly"]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExpressionGenerator<'a> {
    registry: &'a ParameterTypeRegistry,
}

impl<'a> ExpressionGenerator<'a> {
    /// Create a generator over the snippet-enabled types in `registry`.
    #[must_use]
    pub fn new(registry: &'a ParameterTypeRegistry) -> Self {
        Self { registry }
    }

    /// Generate every expression combination for `text`.
    #[must_use]
    pub fn generate_expressions(&self, text: &str) -> Vec<GeneratedExpression> {
        let matchers = self.matchers();
        let mut literals = Vec::new();
        let mut combinations: Vec<Vec<Arc<ParameterType>>> = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let found: Vec<Found<'_>> = matchers
                .iter()
                .filter_map(|matcher| {
                    find_word_match(&matcher.regex, text, pos).map(|(start, len)| Found {
                        start,
                        len,
                        parameter_type: matcher.parameter_type,
                    })
                })
                .collect();
            let Some(best) = found
                .iter()
                .min_by(|a, b| a.start.cmp(&b.start).then(b.len.cmp(&a.len)))
            else {
                break;
            };
            let (start, len) = (best.start, best.len);

            let mut parameter_types: Vec<Arc<ParameterType>> = Vec::new();
            for candidate in found.iter().filter(|f| f.start == start && f.len == len) {
                if !parameter_types
                    .iter()
                    .any(|t| t.name() == candidate.parameter_type.name())
                {
                    parameter_types.push(Arc::clone(candidate.parameter_type));
                }
            }
            parameter_types.sort_by_key(|t| !t.prefer_for_regexp_match());

            literals.push(escape(text.get(pos..start).unwrap_or_default()));
            combinations.push(parameter_types);
            pos = start + len;
        }
        literals.push(escape(text.get(pos..).unwrap_or_default()));

        expand(&literals, &combinations)
    }

    fn matchers(&self) -> Vec<Matcher<'a>> {
        let mut matchers = Vec::new();
        for parameter_type in self.registry.parameter_types() {
            if !parameter_type.use_for_snippets() {
                continue;
            }
            for pattern in parameter_type.patterns() {
                if let Ok(regex) = Regex::new(&pattern) {
                    matchers.push(Matcher {
                        parameter_type,
                        regex,
                    });
                }
            }
        }
        matchers
    }
}

/// Find the first non-empty match at or after `from` that spans whole words.
fn find_word_match(regex: &Regex, text: &str, from: usize) -> Option<(usize, usize)> {
    let mut at = from;
    while let Some(rest) = text.get(at..) {
        let found = regex.find(rest)?;
        let start = at + found.start();
        let end = at + found.end();
        if !found.is_empty() && is_boundary_before(text, start) && is_boundary_after(text, end) {
            return Some((start, found.len()));
        }
        let step = rest.chars().next()?.len_utf8();
        at += step;
    }
    None
}

fn is_boundary(ch: char) -> bool {
    !ch.is_alphanumeric()
}

fn is_boundary_before(text: &str, start: usize) -> bool {
    text.get(..start)
        .and_then(|head| head.chars().next_back())
        .is_none_or(is_boundary)
}

fn is_boundary_after(text: &str, end: usize) -> bool {
    text.get(end..)
        .and_then(|tail| tail.chars().next())
        .is_none_or(is_boundary)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '(' | '{' | '/') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn expand(literals: &[String], combinations: &[Vec<Arc<ParameterType>>]) -> Vec<GeneratedExpression> {
    let mut chosen: Vec<Vec<Arc<ParameterType>>> = vec![Vec::new()];
    for options in combinations {
        let mut next = Vec::new();
        for prefix in &chosen {
            for option in options {
                if next.len() >= MAX_EXPRESSIONS {
                    break;
                }
                let mut extended = prefix.clone();
                extended.push(Arc::clone(option));
                next.push(extended);
            }
        }
        chosen = next;
    }

    chosen
        .into_iter()
        .map(|parameter_types| {
            let mut usage: HashMap<&str, usize> = HashMap::new();
            let mut source = String::new();
            let mut parameter_names = Vec::with_capacity(parameter_types.len());
            let mut literal_iter = literals.iter();
            for parameter_type in &parameter_types {
                if let Some(literal) = literal_iter.next() {
                    source.push_str(literal);
                }
                source.push('{');
                source.push_str(parameter_type.name());
                source.push('}');
                let count = usage.entry(parameter_type.name()).or_insert(0);
                *count += 1;
                parameter_names.push(if *count == 1 {
                    parameter_type.name().to_owned()
                } else {
                    format!("{}{count}", parameter_type.name())
                });
            }
            for literal in literal_iter {
                source.push_str(literal);
            }
            GeneratedExpression {
                source,
                parameter_types,
                parameter_names,
            }
        })
        .collect()
}
