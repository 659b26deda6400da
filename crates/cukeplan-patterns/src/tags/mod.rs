//! Tag expressions used to restrict hooks to matching scenarios, plus tag
//! set normalisation.
//!
//! Tags are compared in their `@tag` form. Parsed feature files may supply
//! tags without the leading `@`; [`normalise_tag`] and [`merge_tag_sets`]
//! bring them into shape before evaluation.

mod ast;
mod lexer;
mod parser;
mod sets;

pub use ast::{TagExprError, TagExpression};
pub use sets::{merge_tag_sets, normalise_tag};

#[cfg(test)]
mod tests;
