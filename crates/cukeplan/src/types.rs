//! Types shared by the registry, documents and the test plan.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::datatable::DataTable;

/// Error returned by user callables and transformers.
pub type StepError = Box<dyn Error + Send + Sync>;

/// A step or scenario hook implementation operating on the world `W`.
pub type SupportCodeFn<W> =
    Arc<dyn Fn(&mut W, Vec<StepArgument>) -> Result<(), StepError> + Send + Sync>;

/// A run-scoped hook implementation.
pub type TestRunHookFn = Arc<dyn Fn() -> Result<(), StepError> + Send + Sync>;

/// Converts the group values of a matched parameter into a typed value.
pub type Transformer<W> =
    Arc<dyn Fn(&W, &[Option<&str>]) -> Result<ArgValue, StepError> + Send + Sync>;

/// A transformed expression argument.
pub type ArgValue = Box<dyn Any + Send + Sync>;

/// Line and optional column within a source file. Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Line number.
    pub line: u32,
    /// Column number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Location {
    /// A location with both line and column.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }
}

/// Where a piece of support code or a document element was declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    /// File the item came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Position within the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl SourceReference {
    /// Reference a position in `uri`.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::SourceReference;
    /// let source = SourceReference::new("steps.rs", 1, 2);
    /// assert_eq!(source.format_location(), "steps.rs:1:2");
    /// ```
    #[must_use]
    pub fn new(uri: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            uri: Some(uri.into()),
            location: Some(Location::new(line, column)),
        }
    }

    /// Reference a file without a position.
    #[must_use]
    pub fn file(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            location: None,
        }
    }

    /// Render as `uri:line:column`, with `?` standing in for missing parts.
    #[must_use]
    pub fn format_location(&self) -> String {
        let uri = self.uri.as_deref().unwrap_or("?");
        let line = self
            .location
            .map_or_else(|| "?".to_owned(), |l| l.line.to_string());
        let column = self
            .location
            .and_then(|l| l.column)
            .map_or_else(|| "?".to_owned(), |c| c.to_string());
        format!("{uri}:{line}:{column}")
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_location())
    }
}

/// One argument passed to a prepared step function.
pub enum StepArgument {
    /// A value produced from an expression parameter.
    Value(ArgValue),
    /// The step's attached table.
    DataTable(DataTable),
    /// The step's attached doc string.
    DocString(String),
}

impl StepArgument {
    /// Borrow an expression value as `T`.
    ///
    /// # Examples
    /// ```
    /// use cukeplan::StepArgument;
    /// let arg = StepArgument::Value(Box::new(42_i64));
    /// assert_eq!(arg.downcast_ref::<i64>(), Some(&42));
    /// assert_eq!(arg.downcast_ref::<String>(), None);
    /// ```
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Value(value) => value.downcast_ref(),
            Self::DataTable(_) | Self::DocString(_) => None,
        }
    }

    /// Take ownership of an expression value as `T`.
    ///
    /// # Errors
    ///
    /// Returns the argument unchanged when it is not a `T` value.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        match self {
            Self::Value(value) => value.downcast().map(|v| *v).map_err(Self::Value),
            other @ (Self::DataTable(_) | Self::DocString(_)) => Err(other),
        }
    }

    /// The attached table, if this is one.
    #[must_use]
    pub fn as_data_table(&self) -> Option<&DataTable> {
        match self {
            Self::DataTable(table) => Some(table),
            Self::Value(_) | Self::DocString(_) => None,
        }
    }

    /// The attached doc string, if this is one.
    #[must_use]
    pub fn as_doc_string(&self) -> Option<&str> {
        match self {
            Self::DocString(text) => Some(text),
            Self::Value(_) | Self::DataTable(_) => None,
        }
    }
}

impl fmt::Debug for StepArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Value(..)"),
            Self::DataTable(table) => f.debug_tuple("DataTable").field(table).finish(),
            Self::DocString(text) => f.debug_tuple("DocString").field(text).finish(),
        }
    }
}
