//! Regular-expression step patterns and their flag handling.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::errors::ExpressionError;
use crate::group::TreeRegexp;
use crate::parameter::{ParameterType, ParameterTypeRegistry};

use super::{Argument, ExpressionKind, StepMatcher};

/// A regular-expression source with optional inline flags.
///
/// `Display` renders the slash-delimited form when flags are present, which
/// is how flagged patterns are serialised.
///
/// # Examples
/// ```
/// use cukeplan_patterns::RegexSource;
/// let plain = RegexSource::new(r"^there are (\d+) widgets$");
/// assert_eq!(plain.to_string(), r"^there are (\d+) widgets$");
///
/// let flagged = RegexSource::new(r"there are (\d+) widgets").with_flags("i");
/// assert_eq!(flagged.to_string(), r"/there are (\d+) widgets/i");
/// assert_eq!(flagged.to_pattern(), r"(?i:there are (\d+) widgets)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegexSource {
    source: String,
    flags: String,
}

impl RegexSource {
    /// Wrap an unflagged source.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: String::new(),
        }
    }

    /// Attach inline flags such as `i`, `m`, `s`, `x` or `U`.
    #[must_use]
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    /// The pattern without flags.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flags as supplied.
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// The source with flags applied to a scoped group, suitable for
    /// embedding in a larger pattern.
    #[must_use]
    pub fn to_pattern(&self) -> String {
        if self.flags.is_empty() {
            self.source.clone()
        } else {
            format!("(?{}:{})", self.flags, self.source)
        }
    }

    /// The source with flags applied to the whole pattern.
    fn to_standalone_pattern(&self) -> String {
        if self.flags.is_empty() {
            self.source.clone()
        } else {
            format!("(?{}){}", self.flags, self.source)
        }
    }
}

impl fmt::Display for RegexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flags.is_empty() {
            f.write_str(&self.source)
        } else {
            write!(f, "/{}/{}", self.source, self.flags)
        }
    }
}

impl From<&str> for RegexSource {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for RegexSource {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<&Regex> for RegexSource {
    fn from(regex: &Regex) -> Self {
        Self::new(regex.as_str())
    }
}

/// A compiled regular-expression step pattern.
///
/// The pattern is not anchored. Each top-level capture group is typed by
/// looking its source up in the parameter-type registry, falling back to
/// the anonymous type.
#[derive(Debug, Clone)]
pub struct RegularExpression {
    source: RegexSource,
    tree: TreeRegexp,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl RegularExpression {
    /// Compile `source`, resolving capture groups against `registry`.
    ///
    /// # Errors
    /// Returns [`ExpressionError::Regex`] when the pattern is invalid and
    /// [`ExpressionError::AmbiguousParameterType`] when a group matches
    /// several non-preferential parameter types.
    pub fn new(source: RegexSource, registry: &ParameterTypeRegistry) -> Result<Self, ExpressionError> {
        let tree = TreeRegexp::new(&source.to_standalone_pattern())?;
        let mut parameter_types = Vec::with_capacity(tree.tree().children().len());
        for group in tree.tree().children() {
            let parameter_type = registry
                .lookup_by_regexp(&group.source, source.source())?
                .map_or_else(|| registry.anonymous(), Arc::clone);
            parameter_types.push(parameter_type);
        }
        Ok(Self {
            source,
            tree,
            parameter_types,
        })
    }

    /// The pattern as registered.
    #[must_use]
    pub fn regex_source(&self) -> &RegexSource {
        &self.source
    }

    /// Parameter types assigned to the top-level capture groups.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }
}

impl StepMatcher for RegularExpression {
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
        self.source.to_string()
    }

    fn kind(&self) -> ExpressionKind {
        ExpressionKind::RegularExpression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: RegexSource, registry: &ParameterTypeRegistry) -> RegularExpression {
        RegularExpression::new(source, registry)
            .unwrap_or_else(|e| panic!("regex should compile: {e}"))
    }

    #[test]
    fn types_groups_from_registry() {
        let registry = ParameterTypeRegistry::new();
        let expression = compile(RegexSource::new(r"^I have (\d+) cukes in my (.+)$"), &registry);
        let names: Vec<&str> = expression
            .parameter_types()
            .iter()
            .map(|t| t.name())
            .collect();
        assert_eq!(names, vec!["int", ""]);
    }

    #[test]
    fn applies_flags_when_matching() {
        let registry = ParameterTypeRegistry::new();
        let expression = compile(
            RegexSource::new(r"there are (\d+) widgets").with_flags("i"),
            &registry,
        );
        let Some(arguments) = expression.match_text("THERE ARE 3 WIDGETS") else {
            panic!("flagged expression should match case-insensitively");
        };
        assert_eq!(arguments.len(), 1);
        assert_eq!(expression.source(), r"/there are (\d+) widgets/i");
    }

    #[test]
    fn matches_unanchored() {
        let registry = ParameterTypeRegistry::new();
        let expression = compile(RegexSource::new(r"(\d+) cukes"), &registry);
        assert!(expression.match_text("I have 5 cukes today").is_some());
    }

    #[test]
    fn resolves_multi_group_parameter_types() {
        let mut registry = ParameterTypeRegistry::new();
        registry
            .define(ParameterType::new("flight", ["([A-Z]{3})-([A-Z]{3})"]))
            .unwrap_or_else(|e| panic!("define flight: {e}"));
        let expression = compile(RegexSource::new(r"^([A-Z]{3})-([A-Z]{3}) is delayed$"), &registry);
        assert_eq!(expression.parameter_types().len(), 2);
        let wrapped = compile(
            RegexSource::new(r"^(([A-Z]{3})-([A-Z]{3})) is delayed$"),
            &registry,
        );
        let Some(arguments) = wrapped.match_text("LHR-CDG is delayed") else {
            panic!("expected a match");
        };
        let Some(flight) = arguments.first() else {
            panic!("expected a flight argument");
        };
        assert_eq!(flight.parameter_type_name(), "flight");
        assert_eq!(flight.values(), vec![Some("LHR"), Some("CDG")]);
    }

    #[test]
    fn parentheses_inside_nested_classes_do_not_shift_groups() {
        let registry = ParameterTypeRegistry::new();
        let expression = compile(RegexSource::new(r"^([[:alpha:]()]+) (\d+)$"), &registry);
        let Some(arguments) = expression.match_text("ab(c) 12") else {
            panic!("expected a match");
        };
        let typed: Vec<(&str, Option<&str>)> = arguments
            .iter()
            .map(|a| (a.parameter_type_name(), a.group().value.as_deref()))
            .collect();
        assert_eq!(typed, vec![("", Some("ab(c)")), ("int", Some("12"))]);
    }
}
