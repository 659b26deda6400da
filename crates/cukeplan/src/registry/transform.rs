//! Conversion of matched expression arguments into step values.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use cukeplan_patterns::{Argument, Conversion};

use crate::localization;
use crate::types::{ArgValue, StepError, Transformer};

/// Failure to convert a matched argument.
#[derive(Debug)]
#[non_exhaustive]
pub enum ArgumentError {
    /// The parameter's group did not participate in the match.
    MissingValue {
        /// Parameter type name.
        name: String,
    },
    /// An integer parameter does not fit `i64`.
    InvalidInteger {
        /// Parameter type name.
        name: String,
        /// Matched text.
        value: String,
        /// Parser failure.
        source: ParseIntError,
    },
    /// A float parameter could not be parsed.
    InvalidFloat {
        /// Parameter type name.
        name: String,
        /// Matched text.
        value: String,
        /// Parser failure.
        source: ParseFloatError,
    },
    /// A user transformer returned an error.
    Transformer {
        /// Parameter type name.
        name: String,
        /// Transformer failure.
        source: StepError,
    },
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MissingValue { name } => {
                localization::message_with_args("argument-missing-value", |args| {
                    args.set("name", name.clone());
                })
            }
            Self::InvalidInteger { name, value, .. } => {
                localization::message_with_args("argument-invalid-integer", |args| {
                    args.set("name", name.clone());
                    args.set("value", value.clone());
                })
            }
            Self::InvalidFloat { name, value, .. } => {
                localization::message_with_args("argument-invalid-float", |args| {
                    args.set("name", name.clone());
                    args.set("value", value.clone());
                })
            }
            Self::Transformer { name, source } => {
                localization::message_with_args("argument-transformer-failed", |args| {
                    args.set("name", name.clone());
                    args.set("reason", source.to_string());
                })
            }
        };
        f.write_str(&localization::strip_directional_isolates(&message))
    }
}

impl std::error::Error for ArgumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingValue { .. } => None,
            Self::InvalidInteger { source, .. } => Some(source),
            Self::InvalidFloat { source, .. } => Some(source),
            Self::Transformer { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Convert `argument`, preferring a user transformer over the built-in
/// conversion of its parameter type.
pub(crate) fn transform<W>(
    argument: &Argument,
    transformer: Option<&Transformer<W>>,
    world: &W,
) -> Result<ArgValue, ArgumentError> {
    let name = argument.parameter_type_name();
    let values = argument.values();
    if let Some(transformer) = transformer {
        return transformer(world, &values).map_err(|source| ArgumentError::Transformer {
            name: name.to_owned(),
            source,
        });
    }
    convert(argument.parameter_type().conversion(), name, &values)
}

fn convert(
    conversion: Conversion,
    name: &str,
    values: &[Option<&str>],
) -> Result<ArgValue, ArgumentError> {
    let missing = || ArgumentError::MissingValue {
        name: name.to_owned(),
    };
    match conversion {
        Conversion::QuotedString => {
            let quoted = values.iter().find_map(|value| *value).ok_or_else(missing)?;
            Ok(Box::new(quoted.replace("\\\"", "\"").replace("\\'", "'")))
        }
        Conversion::Integer => {
            let value = values.first().copied().flatten().ok_or_else(missing)?;
            value
                .parse::<i64>()
                .map(|parsed| Box::new(parsed) as ArgValue)
                .map_err(|source| ArgumentError::InvalidInteger {
                    name: name.to_owned(),
                    value: value.to_owned(),
                    source,
                })
        }
        Conversion::Float => {
            let value = values.first().copied().flatten().ok_or_else(missing)?;
            value
                .parse::<f64>()
                .map(|parsed| Box::new(parsed) as ArgValue)
                .map_err(|source| ArgumentError::InvalidFloat {
                    name: name.to_owned(),
                    value: value.to_owned(),
                    source,
                })
        }
        Conversion::Text => {
            let value = values.first().copied().flatten().ok_or_else(missing)?;
            Ok(Box::new(value.to_owned()))
        }
    }
}
