//! Parameter types and the registry that resolves them by name or regexp.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ExpressionError;
use crate::expression::RegexSource;

const INTEGER_REGEXPS: [&str; 2] = [r"-?\d+", r"\d+"];
const FLOAT_REGEXP: &str = r"[-+]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][-+]?\d+)?";
const WORD_REGEXP: &str = r"[^\s]+";
const STRING_REGEXPS: [&str; 2] = [r#""([^"\\]*(\\.[^"\\]*)*)""#, r"'([^'\\]*(\\.[^'\\]*)*)'"];
const ANONYMOUS_REGEXP: &str = r".*";

/// Built-in value conversion applied when no custom transformer is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Parse the first group value as a signed integer.
    Integer,
    /// Parse the first group value as a floating-point number.
    Float,
    /// Pass the first group value through as text.
    Text,
    /// Use the first participating group and unescape embedded quotes.
    QuotedString,
}

/// A named, reusable pattern fragment usable inside step expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterType {
    name: String,
    regexps: Vec<RegexSource>,
    use_for_snippets: bool,
    prefer_for_regexp_match: bool,
    conversion: Conversion,
    builtin: bool,
}

impl ParameterType {
    /// Create a user-defined parameter type converting its first group to text.
    ///
    /// # Examples
    /// ```
    /// use cukeplan_patterns::ParameterType;
    /// let colour = ParameterType::new("colour", ["red|blue"]);
    /// assert_eq!(colour.name(), "colour");
    /// assert!(colour.use_for_snippets());
    /// assert!(!colour.prefer_for_regexp_match());
    /// ```
    #[must_use]
    pub fn new<I, R>(name: impl Into<String>, regexps: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RegexSource>,
    {
        Self {
            name: name.into(),
            regexps: regexps.into_iter().map(Into::into).collect(),
            use_for_snippets: true,
            prefer_for_regexp_match: false,
            conversion: Conversion::Text,
            builtin: false,
        }
    }

    fn builtin(name: &str, regexps: &[&str], conversion: Conversion) -> Self {
        Self {
            conversion,
            builtin: true,
            ..Self::new(name, regexps.iter().copied())
        }
    }

    /// Whether snippet generation may propose this type.
    #[must_use]
    pub fn with_use_for_snippets(mut self, enabled: bool) -> Self {
        self.use_for_snippets = enabled;
        self
    }

    /// Whether this type wins when several share a capture-group regexp.
    #[must_use]
    pub fn with_prefer_for_regexp_match(mut self, enabled: bool) -> Self {
        self.prefer_for_regexp_match = enabled;
        self
    }

    /// Override the fallback conversion.
    #[must_use]
    pub fn with_conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = conversion;
        self
    }

    /// The registered name; the anonymous type uses an empty name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Patterns as registered.
    #[must_use]
    pub fn regexps(&self) -> &[RegexSource] {
        &self.regexps
    }

    /// Pattern strings exactly as they are spliced into compiled expressions.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.regexps.iter().map(RegexSource::to_pattern).collect()
    }

    /// See [`with_use_for_snippets`](Self::with_use_for_snippets).
    #[must_use]
    pub fn use_for_snippets(&self) -> bool {
        self.use_for_snippets
    }

    /// See [`with_prefer_for_regexp_match`](Self::with_prefer_for_regexp_match).
    #[must_use]
    pub fn prefer_for_regexp_match(&self) -> bool {
        self.prefer_for_regexp_match
    }

    /// Fallback conversion used when no transformer is registered.
    #[must_use]
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// `true` for the types every registry starts with.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// `true` for the catch-all type used by unrecognised regexp groups.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Regexp fragment for a compiled Cucumber expression: a single capture
    /// group wrapping every alternative pattern.
    pub(crate) fn capture_pattern(&self) -> String {
        let patterns = self.patterns();
        match patterns.as_slice() {
            [single] => format!("({single})"),
            many => {
                let alternatives: Vec<String> =
                    many.iter().map(|p| format!("(?:{p})")).collect();
                format!("({})", alternatives.join("|"))
            }
        }
    }
}

/// Parameter types known to an expression compiler.
///
/// A new registry already holds the built-in types (`int`, `float`, `word`,
/// `string`, the anonymous type, and the numeric aliases) so user types can
/// be layered on top in registration order.
#[derive(Debug, Clone)]
pub struct ParameterTypeRegistry {
    ordered: Vec<Arc<ParameterType>>,
    by_name: HashMap<String, Arc<ParameterType>>,
    by_regexp: HashMap<String, Vec<Arc<ParameterType>>>,
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterTypeRegistry {
    /// Create a registry populated with the built-in parameter types.
    ///
    /// # Examples
    /// ```
    /// use cukeplan_patterns::ParameterTypeRegistry;
    /// let registry = ParameterTypeRegistry::new();
    /// assert!(registry.lookup_by_name("int").is_some());
    /// assert!(registry.lookup_by_name("").is_some_and(|t| t.is_anonymous()));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            ordered: Vec::new(),
            by_name: HashMap::new(),
            by_regexp: HashMap::new(),
        };
        let builtins = [
            ParameterType::builtin("int", &INTEGER_REGEXPS, Conversion::Integer)
                .with_prefer_for_regexp_match(true),
            ParameterType::builtin("float", &[FLOAT_REGEXP], Conversion::Float)
                .with_prefer_for_regexp_match(true),
            ParameterType::builtin("word", &[WORD_REGEXP], Conversion::Text)
                .with_use_for_snippets(false),
            ParameterType::builtin("string", &STRING_REGEXPS, Conversion::QuotedString),
            ParameterType::builtin("", &[ANONYMOUS_REGEXP], Conversion::Text)
                .with_use_for_snippets(false),
            ParameterType::builtin("double", &[FLOAT_REGEXP], Conversion::Float)
                .with_use_for_snippets(false),
            ParameterType::builtin("bigdecimal", &[FLOAT_REGEXP], Conversion::Float)
                .with_use_for_snippets(false),
            ParameterType::builtin("byte", &INTEGER_REGEXPS, Conversion::Integer)
                .with_use_for_snippets(false),
            ParameterType::builtin("short", &INTEGER_REGEXPS, Conversion::Integer)
                .with_use_for_snippets(false),
            ParameterType::builtin("long", &INTEGER_REGEXPS, Conversion::Integer)
                .with_use_for_snippets(false),
            ParameterType::builtin("biginteger", &INTEGER_REGEXPS, Conversion::Integer)
                .with_use_for_snippets(false),
        ];
        for parameter_type in builtins {
            registry.insert(parameter_type);
        }
        registry
    }

    /// Register a parameter type.
    ///
    /// # Errors
    /// Returns [`ExpressionError::DuplicateParameterType`] when the name is
    /// taken, [`ExpressionError::IllegalParameterTypeName`] when it contains
    /// one of `{}()\/`, and [`ExpressionError::ConflictingPreference`] when a
    /// second preferential type claims the same regexp.
    pub fn define(
        &mut self,
        parameter_type: ParameterType,
    ) -> Result<Arc<ParameterType>, ExpressionError> {
        let name = parameter_type.name();
        if name.contains(['{', '}', '(', ')', '\\', '/']) {
            return Err(ExpressionError::IllegalParameterTypeName { name: name.into() });
        }
        if self.by_name.contains_key(name) {
            return Err(ExpressionError::DuplicateParameterType { name: name.into() });
        }
        if parameter_type.prefer_for_regexp_match() {
            for pattern in parameter_type.patterns() {
                let existing = self
                    .by_regexp
                    .get(&pattern)
                    .and_then(|types| types.first())
                    .filter(|first| first.prefer_for_regexp_match());
                if let Some(existing) = existing {
                    return Err(ExpressionError::ConflictingPreference {
                        regexp: pattern,
                        existing: existing.name().to_owned(),
                        name: name.to_owned(),
                    });
                }
            }
        }
        Ok(self.insert(parameter_type))
    }

    fn insert(&mut self, parameter_type: ParameterType) -> Arc<ParameterType> {
        let shared = Arc::new(parameter_type);
        for pattern in shared.patterns() {
            let candidates = self.by_regexp.entry(pattern).or_default();
            if shared.prefer_for_regexp_match() {
                candidates.insert(0, Arc::clone(&shared));
            } else {
                candidates.push(Arc::clone(&shared));
            }
        }
        self.by_name
            .insert(shared.name().to_owned(), Arc::clone(&shared));
        self.ordered.push(Arc::clone(&shared));
        shared
    }

    /// Find a parameter type by its name.
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&Arc<ParameterType>> {
        self.by_name.get(name)
    }

    /// Find the parameter type owning a capture-group regexp.
    ///
    /// # Errors
    /// Returns [`ExpressionError::AmbiguousParameterType`] when several types
    /// share the regexp and the first of them is not preferential.
    pub fn lookup_by_regexp(
        &self,
        regexp: &str,
        expression: &str,
    ) -> Result<Option<&Arc<ParameterType>>, ExpressionError> {
        let Some(candidates) = self.by_regexp.get(regexp) else {
            return Ok(None);
        };
        match candidates.as_slice() {
            [first, _, ..] if !first.prefer_for_regexp_match() => {
                Err(ExpressionError::AmbiguousParameterType {
                    regexp: regexp.to_owned(),
                    expression: expression.to_owned(),
                    candidates: candidates.iter().map(|t| t.name().to_owned()).collect(),
                })
            }
            _ => Ok(candidates.first()),
        }
    }

    /// The anonymous catch-all type.
    pub(crate) fn anonymous(&self) -> Arc<ParameterType> {
        self.by_name.get("").map_or_else(
            || Arc::new(ParameterType::builtin("", &[ANONYMOUS_REGEXP], Conversion::Text)),
            Arc::clone,
        )
    }

    /// Every registered type in registration order, built-ins first.
    pub fn parameter_types(&self) -> impl Iterator<Item = &Arc<ParameterType>> {
        self.ordered.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("int", r"((?:-?\d+)|(?:\d+))")]
    #[case("word", r"([^\s]+)")]
    #[case("", "(.*)")]
    fn builds_capture_patterns(#[case] name: &str, #[case] expected: &str) {
        let registry = ParameterTypeRegistry::new();
        let Some(parameter_type) = registry.lookup_by_name(name) else {
            panic!("built-in `{name}` should exist");
        };
        assert_eq!(parameter_type.capture_pattern(), expected);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = ParameterTypeRegistry::new();
        let Err(err) = registry.define(ParameterType::new("int", [r"\d+"])) else {
            panic!("duplicate name should fail");
        };
        assert!(matches!(err, ExpressionError::DuplicateParameterType { .. }));
    }

    #[rstest]
    #[case("with space{")]
    #[case("a/b")]
    #[case("(x)")]
    fn rejects_reserved_characters(#[case] name: &str) {
        let mut registry = ParameterTypeRegistry::new();
        assert!(matches!(
            registry.define(ParameterType::new(name, ["x"])),
            Err(ExpressionError::IllegalParameterTypeName { .. })
        ));
    }

    #[test]
    fn prefers_preferential_type_for_shared_regexp() {
        let registry = ParameterTypeRegistry::new();
        let found = registry
            .lookup_by_regexp(r"\d+", "")
            .unwrap_or_else(|e| panic!("lookup should succeed: {e}"));
        assert_eq!(found.map(|t| t.name()), Some("int"));
    }

    #[test]
    fn reports_ambiguous_regexp_without_preference() {
        let mut registry = ParameterTypeRegistry::new();
        for name in ["colour", "flavour"] {
            registry
                .define(ParameterType::new(name, ["[a-z]+"]))
                .unwrap_or_else(|e| panic!("define {name}: {e}"));
        }
        let Err(err) = registry.lookup_by_regexp("[a-z]+", "^(?:the )?([a-z]+)$") else {
            panic!("lookup should be ambiguous");
        };
        assert!(err.to_string().contains("colour, flavour"));
    }

    #[test]
    fn rejects_second_preferential_type_for_regexp() {
        let mut registry = ParameterTypeRegistry::new();
        let clash = ParameterType::new("count", [r"\d+"]).with_prefer_for_regexp_match(true);
        assert!(matches!(
            registry.define(clash),
            Err(ExpressionError::ConflictingPreference { .. })
        ));
    }

    #[test]
    fn flagged_regexps_are_listed_inline() {
        let mut registry = ParameterTypeRegistry::new();
        let defined = registry
            .define(ParameterType::new(
                "shout",
                [RegexSource::new("[a-z]+").with_flags("i")],
            ))
            .unwrap_or_else(|e| panic!("define: {e}"));
        assert_eq!(defined.patterns(), vec!["(?i:[a-z]+)".to_string()]);
    }
}
