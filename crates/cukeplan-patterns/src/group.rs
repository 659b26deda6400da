//! Capture-group trees built from regular expression sources.
//!
//! The `regex` crate reports capture positions as a flat list. Step argument
//! serialisation needs the nesting as well, so the source is parsed with
//! `regex-syntax` to recover which capturing groups contain which.
//! Non-capturing groups are transparent: their capturing children are
//! attached to the nearest capturing ancestor.

use regex::{Captures, Regex};
use regex_syntax::ast::{Ast, parse::Parser};

use crate::errors::ExpressionError;

/// One matched capture group and its nested capturing groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Matched text, or `None` when the group did not participate.
    pub value: Option<String>,
    /// Byte offset of the match within the step text.
    pub start: Option<usize>,
    /// Byte offset one past the end of the match.
    pub end: Option<usize>,
    /// Nested capturing groups in source order.
    pub children: Vec<Self>,
}

impl Group {
    /// Values handed to parameter transformers.
    ///
    /// A group without children yields its own value; otherwise each child
    /// contributes one entry so multi-group parameter types see every part.
    ///
    /// # Examples
    /// ```
    /// use cukeplan_patterns::Group;
    /// let leaf = Group { value: Some("42".into()), start: Some(0), end: Some(2), children: vec![] };
    /// assert_eq!(leaf.values(), vec![Some("42")]);
    /// ```
    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        if self.children.is_empty() {
            vec![self.value.as_deref()]
        } else {
            self.children
                .iter()
                .map(|child| child.value.as_deref())
                .collect()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GroupBuilder {
    pub(crate) source: String,
    index: usize,
    children: Vec<Self>,
}

impl GroupBuilder {
    pub(crate) fn children(&self) -> &[Self] {
        &self.children
    }

    fn build(&self, captures: &Captures<'_>) -> Group {
        let matched = captures.get(self.index);
        Group {
            value: matched.map(|m| m.as_str().to_owned()),
            start: matched.map(|m| m.start()),
            end: matched.map(|m| m.end()),
            children: self
                .children
                .iter()
                .map(|child| child.build(captures))
                .collect(),
        }
    }
}

/// Recover the capturing-group hierarchy of a regular expression source.
///
/// # Errors
///
/// Returns [`regex::Error::Syntax`] when `source` does not parse.
pub(crate) fn parse_group_tree(source: &str) -> Result<GroupBuilder, regex::Error> {
    let ast = Parser::new()
        .parse(source)
        .map_err(|error| regex::Error::Syntax(error.to_string()))?;
    let mut root = GroupBuilder {
        source: source.to_owned(),
        index: 0,
        children: Vec::new(),
    };
    collect_groups(&ast, source, &mut root.children);
    Ok(root)
}

fn collect_groups(ast: &Ast, source: &str, into: &mut Vec<GroupBuilder>) {
    match ast {
        Ast::Group(group) => match group.capture_index() {
            Some(index) => {
                let body = group.ast.span();
                let mut builder = GroupBuilder {
                    source: source
                        .get(body.start.offset..body.end.offset)
                        .unwrap_or_default()
                        .to_owned(),
                    index: usize::try_from(index).unwrap_or(usize::MAX),
                    children: Vec::new(),
                };
                collect_groups(&group.ast, source, &mut builder.children);
                into.push(builder);
            }
            None => collect_groups(&group.ast, source, into),
        },
        Ast::Repetition(repetition) => collect_groups(&repetition.ast, source, into),
        Ast::Alternation(alternation) => {
            for branch in &alternation.asts {
                collect_groups(branch, source, into);
            }
        }
        Ast::Concat(concat) => {
            for item in &concat.asts {
                collect_groups(item, source, into);
            }
        }
        _ => {}
    }
}

/// A compiled regular expression paired with its capture-group hierarchy.
#[derive(Debug, Clone)]
pub(crate) struct TreeRegexp {
    regex: Regex,
    tree: GroupBuilder,
}

impl TreeRegexp {
    pub(crate) fn new(pattern: &str) -> Result<Self, ExpressionError> {
        let regex = Regex::new(pattern)?;
        Ok(Self {
            tree: parse_group_tree(pattern)?,
            regex,
        })
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn tree(&self) -> &GroupBuilder {
        &self.tree
    }

    /// Match `text`, returning the root group (the whole match) on success.
    pub(crate) fn match_text(&self, text: &str) -> Option<Group> {
        let captures = self.regex.captures(text)?;
        Some(self.tree.build(&captures))
    }
}
