//! Step keyword classification for compiled scenario steps.

use gherkin::StepType;
use std::fmt;
use std::str::FromStr;

/// Keyword category of a Gherkin step.
///
/// Compiled steps carry the resolved category, so `And`/`But` only appear
/// while resolving and never in a finished scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Context: puts the system in a known state.
    Given,
    /// Action: an event or interaction.
    When,
    /// Outcome: an observable result.
    Then,
    /// Continues the previous keyword.
    And,
    /// Continues the previous keyword with a contrast.
    But,
}

impl StepKeyword {
    /// Canonical English spelling.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukeplan_patterns::StepKeyword;
    /// assert_eq!(StepKeyword::Then.as_str(), "Then");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// `true` for `And` and `But`.
    #[must_use]
    pub const fn is_conjunction(&self) -> bool {
        matches!(self, Self::And | Self::But)
    }

    /// Resolve a conjunction against the last primary keyword seen.
    ///
    /// Primary keywords are returned unchanged and recorded in `prev`. A
    /// conjunction with nothing before it counts as `Given`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukeplan_patterns::StepKeyword;
    /// let mut prev = None;
    /// assert_eq!(StepKeyword::But.resolve(&mut prev), StepKeyword::Given);
    /// assert_eq!(StepKeyword::When.resolve(&mut prev), StepKeyword::When);
    /// assert_eq!(StepKeyword::And.resolve(&mut prev), StepKeyword::When);
    /// ```
    #[must_use]
    pub fn resolve(self, prev: &mut Option<Self>) -> Self {
        if self.is_conjunction() {
            prev.unwrap_or(Self::Given)
        } else {
            *prev = Some(self);
            self
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword text that is not one of the English step keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepKeywordParseError(pub String);

impl fmt::Display for StepKeywordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised step keyword `{}`", self.0)
    }
}

impl std::error::Error for StepKeywordParseError {}

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        [Self::Given, Self::When, Self::Then, Self::And, Self::But]
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StepKeywordParseError(trimmed.to_owned()))
    }
}

impl From<StepType> for StepKeyword {
    fn from(ty: StepType) -> Self {
        match ty {
            StepType::Given => Self::Given,
            StepType::When => Self::When,
            StepType::Then => Self::Then,
        }
    }
}
